// Store errors
//
// CRUD operations return `StoreResult`; the HTTP layer maps each variant to a
// status code. Setup and CLI plumbing use `anyhow` instead.

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Input rejected before touching the database
    #[error("{0}")]
    Validation(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Appointment points at a client that does not exist
    #[error("client with id {0} does not exist")]
    UnknownClient(i64),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation(message.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A stored or submitted enum value that isn't one of the known variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl From<UnknownVariant> for StoreError {
    fn from(err: UnknownVariant) -> Self {
        StoreError::Validation(err.to_string())
    }
}
