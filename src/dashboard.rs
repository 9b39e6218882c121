// 🏠 Dashboard snapshot - today's schedule, what's next, and the money so far

use crate::aggregation::{summarize_entries, FinanceSummary};
use crate::db::{list_appointments_between, list_finance_entries, list_upcoming_appointments};
use crate::error::StoreResult;
use crate::models::{Appointment, FinanceEntry};
use crate::temporal::TemporalAnchors;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;

/// How many upcoming bookings the dashboard shows
pub const UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub generated_at: NaiveDateTime,
    pub anchors: TemporalAnchors,
    pub todays_appointments: Vec<Appointment>,
    pub upcoming_appointments: Vec<Appointment>,
    pub totals: FinanceSummary,
    /// Entries the totals were computed from, newest first
    #[serde(skip)]
    pub finance_entries: Vec<FinanceEntry>,
}

impl Dashboard {
    /// Build the dashboard as of `now`.
    ///
    /// Finance entries are fetched once, from the earliest anchor, and all
    /// three periods are summed from that single list.
    pub fn load(conn: &Connection, now: NaiveDateTime) -> StoreResult<Self> {
        let anchors = TemporalAnchors::at(now);

        let todays_appointments =
            list_appointments_between(conn, anchors.start_of_today, anchors.end_of_today())?;
        let upcoming_appointments = list_upcoming_appointments(conn, now, UPCOMING_LIMIT)?;
        let finance_entries = list_finance_entries(conn, Some(anchors.earliest()))?;
        let totals = summarize_entries(&finance_entries, &anchors);

        tracing::debug!(
            today = todays_appointments.len(),
            upcoming = upcoming_appointments.len(),
            entries = finance_entries.len(),
            "dashboard loaded"
        );

        Ok(Dashboard {
            generated_at: now,
            anchors,
            todays_appointments,
            upcoming_appointments,
            totals,
            finance_entries,
        })
    }
}

/// Totals only, for callers that don't need the appointment lists.
pub fn finance_summary(conn: &Connection, now: NaiveDateTime) -> StoreResult<FinanceSummary> {
    let anchors = TemporalAnchors::at(now);
    let entries = list_finance_entries(conn, Some(anchors.earliest()))?;
    Ok(summarize_entries(&entries, &anchors))
}
