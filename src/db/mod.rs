// 🗄️ Record Store - SQLite persistence for clients, appointments, finance entries
//
// Free functions over a borrowed `Connection`. Schema setup returns `anyhow`,
// record operations return `StoreResult` so callers can tell a bad request
// from a missing row from a broken database.

pub mod appointments;
pub mod clients;
pub mod finance;

use crate::temporal::{format_instant, INSTANT_FORMAT};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use std::path::Path;

pub use appointments::{
    create_appointment, delete_appointment, get_appointment, list_appointments,
    list_appointments_between, list_upcoming_appointments, update_appointment,
};
pub use clients::{create_client, delete_client, get_client, list_clients, update_client};
pub use finance::{
    create_finance_entry, delete_finance_entry, get_finance_entry, list_finance_entries,
    update_finance_entry,
};

/// Open (or create) the database file and make sure the schema exists.
pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL for crash recovery; in-memory databases silently keep "memory"
    conn.pragma_update(None, "journal_mode", "WAL")
        .context("Failed to enable WAL mode")?;
    conn.pragma_update(None, "foreign_keys", "ON")
        .context("Failed to enable foreign keys")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS clients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            phone TEXT,
            email TEXT,
            notes TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Deleting a client keeps the appointment as a walk-in
        CREATE TABLE IF NOT EXISTS appointments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            service TEXT NOT NULL,
            starts_at TEXT NOT NULL,
            ends_at TEXT NOT NULL,
            price REAL NOT NULL,
            status TEXT NOT NULL DEFAULT 'SCHEDULED',
            client_id INTEGER REFERENCES clients(id) ON DELETE SET NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS finance_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            type TEXT NOT NULL,
            amount REAL NOT NULL,
            category TEXT NOT NULL,
            notes TEXT,
            occurred_on TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_appointments_start ON appointments(starts_at);
        CREATE INDEX IF NOT EXISTS idx_appointments_client ON appointments(client_id);
        CREATE INDEX IF NOT EXISTS idx_finance_occurred_on ON finance_entries(occurred_on);",
    )
    .context("Failed to create schema")?;

    Ok(())
}

/// Remove every record (used before seeding demo data).
pub fn reset_database(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "DELETE FROM finance_entries;
         DELETE FROM appointments;
         DELETE FROM clients;",
    )
    .context("Failed to clear tables")?;
    Ok(())
}

/// Row counts as (clients, appointments, finance entries).
pub fn record_counts(conn: &Connection) -> Result<(i64, i64, i64)> {
    let count = |table: &str| -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        Ok(conn.query_row(&sql, [], |row| row.get(0))?)
    };

    Ok((count("clients")?, count("appointments")?, count("finance_entries")?))
}

// ============================================================================
// INSTANT COLUMNS
// ============================================================================

pub(crate) fn instant_param(instant: NaiveDateTime) -> String {
    format_instant(instant)
}

pub(crate) fn instant_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&raw, INSTANT_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
