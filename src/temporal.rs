// ⏰ Temporal anchors - where each reporting period starts
//
// Everything here works on the process' local wall clock. Instants are
// naive (no offset attached): "2024-03-15T09:00" means 09:00 on the salon's clock.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Storage format for instants. Fixed width, so text comparison in SQLite
/// orders the same way as the instants themselves.
pub const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

// ============================================================================
// TEMPORAL ANCHORS
// ============================================================================

/// The three period starts used by the dashboard.
///
/// - `start_of_today`: today at 00:00
/// - `start_of_week`: Monday of the current week at 00:00 (independent of locale)
/// - `start_of_month`: day 1 of the current month at 00:00
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalAnchors {
    pub start_of_today: NaiveDateTime,
    pub start_of_week: NaiveDateTime,
    pub start_of_month: NaiveDateTime,
}

impl TemporalAnchors {
    /// Compute the anchors for an explicit "now".
    pub fn at(now: NaiveDateTime) -> Self {
        let today = now.date();
        let start_of_today = today.and_time(NaiveTime::MIN);

        // 0 = Sunday .. 6 = Saturday, shifted so Monday is 0
        let day_of_week = today.weekday().num_days_from_sunday();
        let days_since_monday = (day_of_week + 6) % 7;
        let start_of_week = start_of_today - Duration::days(i64::from(days_since_monday));

        let first_of_month = today - Duration::days(i64::from(today.day0()));
        let start_of_month = first_of_month.and_time(NaiveTime::MIN);

        TemporalAnchors {
            start_of_today,
            start_of_week,
            start_of_month,
        }
    }

    /// Anchors for the current local time.
    pub fn now() -> Self {
        Self::at(local_now())
    }

    /// Earliest of the three anchors. A week can start in the previous month,
    /// so this is not always `start_of_month`.
    pub fn earliest(&self) -> NaiveDateTime {
        self.start_of_week.min(self.start_of_month)
    }

    /// Exclusive upper bound of today.
    pub fn end_of_today(&self) -> NaiveDateTime {
        self.start_of_today + Duration::days(1)
    }
}

/// Current local wall-clock time.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

// ============================================================================
// PARSING / FORMATTING
// ============================================================================

/// Parse an instant as sent by a client.
///
/// Accepted:
/// - RFC 3339 with offset (`2024-01-10T09:00:00Z`), converted to local time
/// - naive date-time (`2024-01-10T09:00`, `2024-01-10T09:00:00.250`, `2024-01-10 09:00:00`)
/// - bare date (`2024-01-10`), meaning local midnight
///
/// Years outside `0..=9999` are refused: they don't fit [`INSTANT_FORMAT`]'s
/// fixed width and would sort out of order in storage.
pub fn parse_instant(input: &str) -> Option<NaiveDateTime> {
    parse_any(input.trim()).filter(|dt| (0..=9999).contains(&dt.year()))
}

fn parse_any(input: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Format an instant for storage (see [`INSTANT_FORMAT`]).
pub fn format_instant(instant: NaiveDateTime) -> String {
    instant.format(INSTANT_FORMAT).to_string()
}
