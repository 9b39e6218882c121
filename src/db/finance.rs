// Finance entries table

use super::{instant_column, instant_param};
use crate::error::{StoreError, StoreResult};
use crate::models::{
    optional_text, required_instant, required_money, required_text, EntryKind, FinanceEntry,
    FinanceEntryPatch, NewFinanceEntry,
};
use chrono::NaiveDateTime;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const ENTITY: &str = "finance entry";

const SELECT_ENTRIES: &str =
    "SELECT id, type, amount, category, notes, occurred_on FROM finance_entries";

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<FinanceEntry> {
    Ok(FinanceEntry {
        id: row.get(0)?,
        kind: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        notes: row.get(4)?,
        occurred_on: instant_column(row, 5)?,
    })
}

/// Entries newest first, optionally only those with `occurred_on >= from`.
pub fn list_finance_entries(
    conn: &Connection,
    from: Option<NaiveDateTime>,
) -> StoreResult<Vec<FinanceEntry>> {
    let (clause, args) = match from {
        Some(from) => ("WHERE occurred_on >= ?1", vec![instant_param(from)]),
        None => ("", Vec::new()),
    };
    let sql = format!("{SELECT_ENTRIES} {clause} ORDER BY occurred_on DESC, id DESC");
    let mut stmt = conn.prepare(&sql)?;

    let entries = stmt
        .query_map(params_from_iter(args), entry_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(entries)
}

pub fn get_finance_entry(conn: &Connection, id: i64) -> StoreResult<FinanceEntry> {
    let sql = format!("{SELECT_ENTRIES} WHERE id = ?1");
    conn.query_row(&sql, [id], entry_from_row)
        .optional()?
        .ok_or(StoreError::NotFound { entity: ENTITY, id })
}

fn required_kind(raw: Option<String>) -> StoreResult<EntryKind> {
    let raw = raw.ok_or_else(|| StoreError::validation("type is required"))?;
    Ok(raw.parse::<EntryKind>()?)
}

/// Log income or an expense.
pub fn create_finance_entry(conn: &Connection, input: NewFinanceEntry) -> StoreResult<FinanceEntry> {
    let kind = required_kind(input.kind)?;
    let amount = required_money("amount", input.amount.as_ref())?;
    let category = required_text("category", input.category)?;
    let occurred_on = required_instant("occurredOn", input.occurred_on.as_deref())?;

    conn.execute(
        "INSERT INTO finance_entries (type, amount, category, notes, occurred_on)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            kind,
            amount,
            category,
            optional_text(input.notes),
            instant_param(occurred_on),
        ],
    )?;

    let id = conn.last_insert_rowid();
    tracing::info!(entry_id = id, %kind, amount, "finance entry logged");

    get_finance_entry(conn, id)
}

pub fn update_finance_entry(
    conn: &Connection,
    id: i64,
    patch: FinanceEntryPatch,
) -> StoreResult<FinanceEntry> {
    let mut entry = get_finance_entry(conn, id)?;

    if patch.kind.is_some() {
        entry.kind = required_kind(patch.kind)?;
    }
    if let Some(amount) = patch.amount.as_ref() {
        entry.amount = amount.resolve("amount")?;
    }
    if patch.category.is_some() {
        entry.category = required_text("category", patch.category)?;
    }
    if let Some(notes) = patch.notes {
        entry.notes = optional_text(notes);
    }
    if let Some(occurred_on) = patch.occurred_on.as_deref() {
        entry.occurred_on = required_instant("occurredOn", Some(occurred_on))?;
    }

    conn.execute(
        "UPDATE finance_entries
         SET type = ?1, amount = ?2, category = ?3, notes = ?4, occurred_on = ?5
         WHERE id = ?6",
        params![
            entry.kind,
            entry.amount,
            entry.category,
            entry.notes,
            instant_param(entry.occurred_on),
            id,
        ],
    )?;

    tracing::info!(entry_id = id, "finance entry updated");
    get_finance_entry(conn, id)
}

pub fn delete_finance_entry(conn: &Connection, id: i64) -> StoreResult<()> {
    let removed = conn.execute("DELETE FROM finance_entries WHERE id = ?1", [id])?;
    if removed == 0 {
        return Err(StoreError::NotFound { entity: ENTITY, id });
    }

    tracing::info!(entry_id = id, "finance entry deleted");
    Ok(())
}
