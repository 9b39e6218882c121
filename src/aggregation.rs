// 📊 Period Aggregator - income/expense totals from an anchor onwards
//
// Pure functions over entries that are already in memory. No I/O, no locks,
// safe to call from any thread.

use crate::models::FinanceEntry;
use crate::temporal::TemporalAnchors;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Kind tag that routes an entry into the income bucket.
/// Every other tag, known or not, counts as expense.
pub const INCOME_TAG: &str = "INCOME";

// ============================================================================
// INPUT / OUTPUT
// ============================================================================

/// The three fields the aggregator looks at.
///
/// `kind` is a plain tag rather than [`EntryKind`](crate::models::EntryKind)
/// so snapshots coming from outside the store (imports, other clients) with
/// unexpected tags still aggregate, falling into expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSnapshot {
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub occurred_on: NaiveDateTime,
}

impl FinanceSnapshot {
    pub fn new(amount: f64, kind: impl Into<String>, occurred_on: NaiveDateTime) -> Self {
        FinanceSnapshot {
            amount,
            kind: kind.into(),
            occurred_on,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == INCOME_TAG
    }
}

impl From<&FinanceEntry> for FinanceSnapshot {
    fn from(entry: &FinanceEntry) -> Self {
        FinanceSnapshot::new(entry.amount, entry.kind.as_str(), entry.occurred_on)
    }
}

/// Totals for one period bucket. Unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PeriodTotals {
    pub income: f64,
    pub expense: f64,
}

impl PeriodTotals {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Daily / weekly / monthly totals computed from one snapshot of entries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FinanceSummary {
    pub daily: PeriodTotals,
    pub weekly: PeriodTotals,
    pub monthly: PeriodTotals,
}

impl FinanceSummary {
    /// `(label, totals)` in display order.
    pub fn periods(&self) -> [(&'static str, PeriodTotals); 3] {
        [
            ("daily", self.daily),
            ("weekly", self.weekly),
            ("monthly", self.monthly),
        ]
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Sum every entry with `occurred_on >= anchor` into income or expense.
///
/// No upper bound: entries dated in the future are included. Amounts are
/// added in input order with plain `f64` addition; a NaN amount would
/// propagate (the store never lets one in).
pub fn aggregate(entries: &[FinanceSnapshot], anchor: NaiveDateTime) -> PeriodTotals {
    entries
        .iter()
        .filter(|entry| entry.occurred_on >= anchor)
        .fold(PeriodTotals::default(), |mut acc, entry| {
            if entry.is_income() {
                acc.income += entry.amount;
            } else {
                acc.expense += entry.amount;
            }
            acc
        })
}

/// Run [`aggregate`] once per anchor over the same slice, so the three
/// periods always agree with each other.
pub fn summarize(entries: &[FinanceSnapshot], anchors: &TemporalAnchors) -> FinanceSummary {
    FinanceSummary {
        daily: aggregate(entries, anchors.start_of_today),
        weekly: aggregate(entries, anchors.start_of_week),
        monthly: aggregate(entries, anchors.start_of_month),
    }
}

/// Convenience wrapper for stored entries.
pub fn summarize_entries(entries: &[FinanceEntry], anchors: &TemporalAnchors) -> FinanceSummary {
    let snapshots: Vec<FinanceSnapshot> = entries.iter().map(FinanceSnapshot::from).collect();
    summarize(&snapshots, anchors)
}

/// Two decimals with a dollar sign, e.g. `$1234.50`.
pub fn format_currency(value: f64) -> String {
    format!("${:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn sample_entries() -> Vec<FinanceSnapshot> {
        vec![
            FinanceSnapshot::new(220.0, "INCOME", day(2024, 3, 14)),
            FinanceSnapshot::new(45.0, "EXPENSE", day(2024, 3, 13)),
            FinanceSnapshot::new(30.0, "EXPENSE", day(2024, 3, 15)),
            FinanceSnapshot::new(80.0, "INCOME", day(2024, 3, 4)),
            FinanceSnapshot::new(12.5, "EXPENSE", day(2024, 2, 28)),
        ]
    }

    #[test]
    fn test_entries_after_anchor_are_split_by_kind() {
        let entries = vec![
            FinanceSnapshot::new(100.0, "INCOME", day(2024, 1, 10)),
            FinanceSnapshot::new(40.0, "EXPENSE", day(2024, 1, 10)),
        ];

        let totals = aggregate(&entries, day(2024, 1, 1));

        assert_eq!(totals, PeriodTotals { income: 100.0, expense: 40.0 });
        assert_eq!(totals.net(), 60.0);
    }

    #[test]
    fn test_entries_before_anchor_are_excluded() {
        let entries = vec![FinanceSnapshot::new(50.0, "INCOME", day(2023, 12, 31))];

        let totals = aggregate(&entries, day(2024, 1, 1));

        assert_eq!(totals, PeriodTotals::default());
    }

    #[test]
    fn test_anchor_is_inclusive() {
        let entries = vec![FinanceSnapshot::new(50.0, "INCOME", day(2024, 1, 1))];

        assert_eq!(aggregate(&entries, day(2024, 1, 1)).income, 50.0);
    }

    #[test]
    fn test_empty_entries_give_zero() {
        assert_eq!(aggregate(&[], day(2024, 1, 1)), PeriodTotals::default());
        assert_eq!(aggregate(&[], NaiveDateTime::MIN), PeriodTotals::default());
    }

    #[test]
    fn test_future_entries_are_counted() {
        let entries = vec![FinanceSnapshot::new(99.0, "INCOME", day(2030, 1, 1))];

        assert_eq!(aggregate(&entries, day(2024, 1, 1)).income, 99.0);
    }

    #[test]
    fn test_unknown_kind_falls_into_expense() {
        let entries = vec![
            FinanceSnapshot::new(10.0, "REFUND", day(2024, 1, 2)),
            FinanceSnapshot::new(5.0, "income", day(2024, 1, 2)),
            FinanceSnapshot::new(1.0, "", day(2024, 1, 2)),
        ];

        let totals = aggregate(&entries, day(2024, 1, 1));

        assert_eq!(totals.income, 0.0);
        assert_eq!(totals.expense, 16.0);
    }

    #[test]
    fn test_later_anchor_never_increases_totals() {
        let entries = sample_entries();
        let anchors = [
            day(2024, 2, 1),
            day(2024, 2, 28),
            day(2024, 3, 4),
            day(2024, 3, 11),
            day(2024, 3, 14),
            day(2024, 3, 15),
            day(2024, 3, 16),
        ];

        for pair in anchors.windows(2) {
            let earlier = aggregate(&entries, pair[0]);
            let later = aggregate(&entries, pair[1]);
            assert!(earlier.income >= later.income, "income at {:?}", pair);
            assert!(earlier.expense >= later.expense, "expense at {:?}", pair);
        }
    }

    #[test]
    fn test_totals_are_non_negative_for_non_negative_amounts() {
        let entries = sample_entries();

        for anchor in [day(2020, 1, 1), day(2024, 3, 10), day(2099, 1, 1)] {
            let totals = aggregate(&entries, anchor);
            assert!(totals.income + totals.expense >= 0.0);
        }
    }

    #[test]
    fn test_aggregate_is_repeatable_and_leaves_input_alone() {
        let entries = sample_entries();
        let before = entries.clone();

        let first = aggregate(&entries, day(2024, 3, 1));
        let second = aggregate(&entries, day(2024, 3, 1));

        assert_eq!(first, second);
        assert_eq!(entries, before);
    }

    #[test]
    fn test_summarize_uses_each_anchor() {
        // Friday 2024-03-15: week from 03-11, month from 03-01
        let anchors = TemporalAnchors::at(day(2024, 3, 15));
        let summary = summarize(&sample_entries(), &anchors);

        assert_eq!(summary.daily, PeriodTotals { income: 0.0, expense: 30.0 });
        assert_eq!(summary.weekly, PeriodTotals { income: 220.0, expense: 75.0 });
        assert_eq!(summary.monthly, PeriodTotals { income: 300.0, expense: 75.0 });

        let labels: Vec<&str> = summary.periods().iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["daily", "weekly", "monthly"]);
    }

    #[test]
    fn test_format_currency_rounds_only_for_display() {
        let entries = vec![
            FinanceSnapshot::new(0.105, "INCOME", day(2024, 1, 1)),
            FinanceSnapshot::new(0.105, "INCOME", day(2024, 1, 1)),
        ];

        let totals = aggregate(&entries, day(2024, 1, 1));

        assert!((totals.income - 0.21).abs() < 1e-12);
        assert_eq!(format_currency(totals.income), "$0.21");
        assert_eq!(format_currency(65.0), "$65.00");
    }
}
