// 💇 Records - clients, appointments, finance entries
//
// Stored shapes plus the request shapes used to create and patch them.
// Request fields are all optional so a missing field becomes a
// `StoreError::Validation` with a readable message instead of a serde error.

use crate::error::{StoreError, StoreResult, UnknownVariant};
use crate::temporal::parse_instant;
use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ENTRY KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    /// Money coming in
    Income,

    /// Money going out
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "INCOME",
            EntryKind::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(EntryKind::Income),
            "EXPENSE" => Ok(EntryKind::Expense),
            other => Err(UnknownVariant {
                kind: "finance entry type",
                value: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// APPOINTMENT STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(AppointmentStatus::Scheduled),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            other => Err(UnknownVariant {
                kind: "appointment status",
                value: other.to_string(),
            }),
        }
    }
}

// Both enums live in TEXT columns
macro_rules! text_column {
    ($ty:ty) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: UnknownVariant| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

text_column!(EntryKind);
text_column!(AppointmentStatus);

// ============================================================================
// STORED RECORDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub service: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub price: f64,
    pub status: AppointmentStatus,
    /// `None` for walk-ins
    pub client_id: Option<i64>,
    pub client_name: Option<String>,
}

impl Appointment {
    /// Display name for the customer ("Walk-in" when no client is linked)
    pub fn customer_label(&self) -> &str {
        self.client_name.as_deref().unwrap_or("Walk-in")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceEntry {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Stored as submitted; rounding only happens for display
    pub amount: f64,
    pub category: String,
    pub notes: Option<String>,
    pub occurred_on: NaiveDateTime,
}

// ============================================================================
// REQUEST SHAPES
// ============================================================================

/// Money as submitted: either a JSON number or a numeric string ("65.50").
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MoneyInput {
    Number(f64),
    Text(String),
}

impl MoneyInput {
    /// Resolve to a finite, non-negative value.
    pub fn resolve(&self, field: &str) -> StoreResult<f64> {
        let value = match self {
            MoneyInput::Number(n) => *n,
            MoneyInput::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| StoreError::validation(format!("Invalid {field}")))?,
        };

        if !value.is_finite() {
            return Err(StoreError::validation(format!("Invalid {field}")));
        }
        if value < 0.0 {
            return Err(StoreError::validation(format!("{field} must not be negative")));
        }

        // "-0" passes the sign check above; store it as plain zero
        Ok(value + 0.0)
    }
}

impl From<f64> for MoneyInput {
    fn from(value: f64) -> Self {
        MoneyInput::Number(value)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

/// Partial update. Outer `None` = leave unchanged, `Some(None)` = clear.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub service: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub price: Option<MoneyInput>,
    pub status: Option<String>,
    pub client_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    pub service: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub price: Option<MoneyInput>,
    pub status: Option<String>,
    /// `Some(None)` turns the appointment into a walk-in
    #[serde(default, deserialize_with = "explicit_null")]
    pub client_id: Option<Option<i64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFinanceEntry {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub amount: Option<MoneyInput>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub occurred_on: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceEntryPatch {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub amount: Option<MoneyInput>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub notes: Option<Option<String>>,
    pub occurred_on: Option<String>,
}

/// Distinguish a field sent as `null` from one that was left out.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================================================
// FIELD VALIDATION
// ============================================================================

/// Required, non-blank text.
pub fn required_text(field: &str, value: Option<String>) -> StoreResult<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        Some(_) => Err(StoreError::validation(format!("{field} must not be empty"))),
        None => Err(StoreError::validation(format!("{field} is required"))),
    }
}

/// Optional text; blank strings are stored as NULL.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

pub fn required_instant(field: &str, value: Option<&str>) -> StoreResult<NaiveDateTime> {
    let raw = value.ok_or_else(|| StoreError::validation(format!("{field} is required")))?;
    parse_instant(raw).ok_or_else(|| StoreError::validation(format!("Invalid {field}: {raw}")))
}

pub fn required_money(field: &str, value: Option<&MoneyInput>) -> StoreResult<f64> {
    value
        .ok_or_else(|| StoreError::validation(format!("{field} is required")))?
        .resolve(field)
}
