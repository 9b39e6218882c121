// 🌱 Demo data - two regulars, two bookings today, a few days of cashflow
//
// Everything is placed relative to `now` so the dashboard has something to
// show right after seeding.

use crate::db::{create_appointment, create_client, create_finance_entry, reset_database};
use crate::models::{MoneyInput, NewAppointment, NewClient, NewFinanceEntry};
use crate::temporal::format_instant;
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub clients: usize,
    pub appointments: usize,
    pub finance_entries: usize,
}

/// Wipe all tables and insert the demo records.
pub fn seed_demo_data(conn: &Connection, now: NaiveDateTime) -> Result<SeedReport> {
    reset_database(conn)?;

    let alex = create_client(
        conn,
        NewClient {
            name: Some("Alex Rivera".to_string()),
            phone: Some("555-0102".to_string()),
            email: Some("alex@example.com".to_string()),
            notes: Some("Prefers morning appointments".to_string()),
        },
    )
    .context("Failed to seed client")?;

    let jordan = create_client(
        conn,
        NewClient {
            name: Some("Jordan Kim".to_string()),
            phone: Some("555-0178".to_string()),
            email: Some("jordan@example.com".to_string()),
            notes: Some("Color touch-up every 6 weeks".to_string()),
        },
    )
    .context("Failed to seed client")?;

    let today = now.date().and_time(NaiveTime::MIN);
    let morning = today + Duration::hours(9);

    let bookings = [
        ("Precision Cut", morning, Duration::hours(1), 65.0, alex.id),
        ("Full Color", morning + Duration::hours(2), Duration::hours(2), 180.0, jordan.id),
    ];
    for (service, start, length, price, client_id) in bookings {
        create_appointment(
            conn,
            NewAppointment {
                service: Some(service.to_string()),
                start: Some(format_instant(start)),
                end: Some(format_instant(start + length)),
                price: Some(MoneyInput::Number(price)),
                status: Some("SCHEDULED".to_string()),
                client_id: Some(client_id),
            },
        )
        .context("Failed to seed appointment")?;
    }

    let entries = [
        ("INCOME", 220.0, "Haircut & color", "Weekend bookings", 1),
        ("EXPENSE", 45.0, "Supplies", "Shampoo and color stock", 2),
        ("EXPENSE", 30.0, "Coffee & snacks", "Client refreshments", 0),
    ];
    for (kind, amount, category, notes, days_ago) in entries {
        create_finance_entry(
            conn,
            NewFinanceEntry {
                kind: Some(kind.to_string()),
                amount: Some(MoneyInput::Number(amount)),
                category: Some(category.to_string()),
                notes: Some(notes.to_string()),
                occurred_on: Some(format_instant(today - Duration::days(days_ago))),
            },
        )
        .context("Failed to seed finance entry")?;
    }

    Ok(SeedReport {
        clients: 2,
        appointments: bookings.len(),
        finance_entries: entries.len(),
    })
}
