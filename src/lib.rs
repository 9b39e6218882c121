// Salon Books - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod aggregation;    // Period Aggregator: income/expense from an anchor onwards
pub mod config;
pub mod dashboard;
pub mod db;             // Record Store: clients, appointments, finance entries
pub mod error;
pub mod models;
pub mod seed;
pub mod temporal;       // Temporal anchors: today / week / month starts

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use aggregation::{
    aggregate, format_currency, summarize, summarize_entries,
    FinanceSnapshot, FinanceSummary, PeriodTotals, INCOME_TAG,
};
pub use config::Config;
pub use dashboard::{finance_summary, Dashboard};
pub use db::{open_database, setup_database};
pub use error::{StoreError, StoreResult};
pub use models::{
    Appointment, AppointmentPatch, AppointmentStatus, Client, ClientPatch,
    EntryKind, FinanceEntry, FinanceEntryPatch, MoneyInput,
    NewAppointment, NewClient, NewFinanceEntry,
};
pub use temporal::{local_now, parse_instant, TemporalAnchors};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
