// Appointments table

use super::{instant_column, instant_param};
use crate::db::clients::client_exists;
use crate::error::{StoreError, StoreResult};
use crate::models::{
    required_instant, required_money, required_text, Appointment, AppointmentPatch,
    AppointmentStatus, NewAppointment,
};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};

const ENTITY: &str = "appointment";

const SELECT_APPOINTMENTS: &str = "
    SELECT a.id, a.service, a.starts_at, a.ends_at, a.price, a.status, a.client_id, c.name
    FROM appointments a
    LEFT JOIN clients c ON c.id = a.client_id";

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        service: row.get(1)?,
        start: instant_column(row, 2)?,
        end: instant_column(row, 3)?,
        price: row.get(4)?,
        status: row.get(5)?,
        client_id: row.get(6)?,
        client_name: row.get(7)?,
    })
}

fn query_appointments(
    conn: &Connection,
    clause: &str,
    params: impl rusqlite::Params,
) -> StoreResult<Vec<Appointment>> {
    let sql = format!("{SELECT_APPOINTMENTS} {clause}");
    let mut stmt = conn.prepare(&sql)?;

    let appointments = stmt
        .query_map(params, appointment_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(appointments)
}

/// Appointments starting at or after `from`, earliest first.
pub fn list_appointments(conn: &Connection, from: NaiveDateTime) -> StoreResult<Vec<Appointment>> {
    query_appointments(
        conn,
        "WHERE a.starts_at >= ?1 ORDER BY a.starts_at ASC, a.id ASC",
        [instant_param(from)],
    )
}

/// Appointments with `from <= start < until`, earliest first.
pub fn list_appointments_between(
    conn: &Connection,
    from: NaiveDateTime,
    until: NaiveDateTime,
) -> StoreResult<Vec<Appointment>> {
    query_appointments(
        conn,
        "WHERE a.starts_at >= ?1 AND a.starts_at < ?2 ORDER BY a.starts_at ASC, a.id ASC",
        [instant_param(from), instant_param(until)],
    )
}

/// Next `limit` bookings from `now` that are still happening (cancelled ones are skipped).
pub fn list_upcoming_appointments(
    conn: &Connection,
    now: NaiveDateTime,
    limit: usize,
) -> StoreResult<Vec<Appointment>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    query_appointments(
        conn,
        "WHERE a.starts_at >= ?1 AND a.status IN ('SCHEDULED', 'COMPLETED')
         ORDER BY a.starts_at ASC, a.id ASC
         LIMIT ?2",
        params![instant_param(now), limit],
    )
}

pub fn get_appointment(conn: &Connection, id: i64) -> StoreResult<Appointment> {
    let sql = format!("{SELECT_APPOINTMENTS} WHERE a.id = ?1");
    conn.query_row(&sql, [id], appointment_from_row)
        .optional()?
        .ok_or(StoreError::NotFound { entity: ENTITY, id })
}

fn ensure_client(conn: &Connection, client_id: Option<i64>) -> StoreResult<()> {
    match client_id {
        Some(id) if !client_exists(conn, id)? => Err(StoreError::UnknownClient(id)),
        _ => Ok(()),
    }
}

fn parse_status(raw: Option<String>) -> StoreResult<Option<AppointmentStatus>> {
    raw.map(|s| s.parse::<AppointmentStatus>())
        .transpose()
        .map_err(StoreError::from)
}

/// Book an appointment. Status defaults to SCHEDULED; no client = walk-in.
pub fn create_appointment(conn: &Connection, input: NewAppointment) -> StoreResult<Appointment> {
    let service = required_text("service", input.service)?;
    let start = required_instant("start", input.start.as_deref())?;
    let end = required_instant("end", input.end.as_deref())?;
    let price = required_money("price", input.price.as_ref())?;
    let status = parse_status(input.status)?.unwrap_or_default();
    ensure_client(conn, input.client_id)?;

    conn.execute(
        "INSERT INTO appointments (service, starts_at, ends_at, price, status, client_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            service,
            instant_param(start),
            instant_param(end),
            price,
            status,
            input.client_id,
        ],
    )?;

    let id = conn.last_insert_rowid();
    tracing::info!(appointment_id = id, %status, "appointment booked");

    get_appointment(conn, id)
}

/// Reschedule, re-price, change status or reassign. Absent fields are kept.
pub fn update_appointment(
    conn: &Connection,
    id: i64,
    patch: AppointmentPatch,
) -> StoreResult<Appointment> {
    let mut appointment = get_appointment(conn, id)?;

    if patch.service.is_some() {
        appointment.service = required_text("service", patch.service)?;
    }
    if let Some(start) = patch.start.as_deref() {
        appointment.start = required_instant("start", Some(start))?;
    }
    if let Some(end) = patch.end.as_deref() {
        appointment.end = required_instant("end", Some(end))?;
    }
    if let Some(price) = patch.price.as_ref() {
        appointment.price = price.resolve("price")?;
    }
    if let Some(status) = parse_status(patch.status)? {
        appointment.status = status;
    }
    if let Some(client_id) = patch.client_id {
        ensure_client(conn, client_id)?;
        appointment.client_id = client_id;
    }

    conn.execute(
        "UPDATE appointments
         SET service = ?1, starts_at = ?2, ends_at = ?3, price = ?4, status = ?5, client_id = ?6
         WHERE id = ?7",
        params![
            appointment.service,
            instant_param(appointment.start),
            instant_param(appointment.end),
            appointment.price,
            appointment.status,
            appointment.client_id,
            id,
        ],
    )?;

    tracing::info!(appointment_id = id, status = %appointment.status, "appointment updated");

    // Re-read so client_name follows a reassignment
    get_appointment(conn, id)
}

pub fn delete_appointment(conn: &Connection, id: i64) -> StoreResult<()> {
    let removed = conn.execute("DELETE FROM appointments WHERE id = ?1", [id])?;
    if removed == 0 {
        return Err(StoreError::NotFound { entity: ENTITY, id });
    }

    tracing::info!(appointment_id = id, "appointment deleted");
    Ok(())
}
