// Clients table

use crate::error::{StoreError, StoreResult};
use crate::models::{optional_text, required_text, Client, ClientPatch, NewClient};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ENTITY: &str = "client";

fn client_from_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
        notes: row.get(4)?,
    })
}

/// All clients, alphabetically.
pub fn list_clients(conn: &Connection) -> StoreResult<Vec<Client>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, phone, email, notes
         FROM clients
         ORDER BY name ASC, id ASC",
    )?;

    let clients = stmt
        .query_map([], client_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(clients)
}

pub fn get_client(conn: &Connection, id: i64) -> StoreResult<Client> {
    conn.query_row(
        "SELECT id, name, phone, email, notes FROM clients WHERE id = ?1",
        [id],
        client_from_row,
    )
    .optional()?
    .ok_or(StoreError::NotFound { entity: ENTITY, id })
}

pub(crate) fn client_exists(conn: &Connection, id: i64) -> StoreResult<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM clients WHERE id = ?1", [id], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

pub fn create_client(conn: &Connection, input: NewClient) -> StoreResult<Client> {
    let name = required_text("name", input.name)?;

    conn.execute(
        "INSERT INTO clients (name, phone, email, notes) VALUES (?1, ?2, ?3, ?4)",
        params![
            name,
            optional_text(input.phone),
            optional_text(input.email),
            optional_text(input.notes),
        ],
    )?;

    let id = conn.last_insert_rowid();
    tracing::info!(client_id = id, "client created");

    get_client(conn, id)
}

/// Apply the fields present in `patch`; everything else keeps its value.
pub fn update_client(conn: &Connection, id: i64, patch: ClientPatch) -> StoreResult<Client> {
    let mut client = get_client(conn, id)?;

    if patch.name.is_some() {
        client.name = required_text("name", patch.name)?;
    }
    if let Some(phone) = patch.phone {
        client.phone = optional_text(phone);
    }
    if let Some(email) = patch.email {
        client.email = optional_text(email);
    }
    if let Some(notes) = patch.notes {
        client.notes = optional_text(notes);
    }

    conn.execute(
        "UPDATE clients SET name = ?1, phone = ?2, email = ?3, notes = ?4 WHERE id = ?5",
        params![client.name, client.phone, client.email, client.notes, id],
    )?;

    tracing::info!(client_id = id, "client updated");
    get_client(conn, id)
}

/// Delete a client. Their appointments stay on the books as walk-ins.
pub fn delete_client(conn: &Connection, id: i64) -> StoreResult<()> {
    let removed = conn.execute("DELETE FROM clients WHERE id = ?1", [id])?;
    if removed == 0 {
        return Err(StoreError::NotFound { entity: ENTITY, id });
    }

    tracing::info!(client_id = id, "client deleted");
    Ok(())
}
