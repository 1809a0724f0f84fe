/// Error types for aquasonda
///
/// `StoreError` covers the reading store, `IngestError` is what callers of
/// the ingestion path see, `FilterError` covers real-time channel
/// parameters.
use thiserror::Error;

// =============================================================================
// STORE ERRORS
// =============================================================================

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("no {table} row with id {id}")]
    MissingRow { table: &'static str, id: i64 },

    #[error("failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Unavailable(String),
}

impl StoreError {
    /// True for foreign key / unique / check constraint failures
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StoreError::Sqlite(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

// =============================================================================
// INGESTION ERRORS
// =============================================================================

#[derive(Debug, Error)]
pub enum IngestError {
    /// Malformed submission (bad id, unparseable timestamp)
    #[error("{0}")]
    InvalidInput(String),

    /// Unknown sensor installation
    #[error("sensor installation {0} not found")]
    NotFound(i64),

    /// Persistence layer unavailable; nothing was exposed to the caller
    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

impl IngestError {
    /// Stable machine-readable code used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::InvalidInput(_) => "INVALID_INPUT",
            IngestError::NotFound(_) => "NOT_FOUND",
            IngestError::StoreFailure(_) => "STORE_FAILURE",
        }
    }
}

// =============================================================================
// SUBSCRIPTION FILTER ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("must supply sensorInstalledId or installationId")]
    Missing,

    #[error("supply only one of sensorInstalledId or installationId")]
    Ambiguous,

    #[error("{field} must be a positive integer, got '{value}'")]
    InvalidValue { field: &'static str, value: String },
}
