use thiserror::Error;

/// Storage-level failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row with the requested key.
    #[error("record not found")]
    NotFound,

    /// A unique column already holds the submitted value.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("background task failed: {0}")]
    Task(String),
}

impl StoreError {
    /// Classify a failed write: unique-constraint violations become
    /// `Conflict(what)`, anything else stays a database error.
    pub(crate) fn from_write(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return StoreError::Conflict(what.to_string());
            }
        }
        StoreError::Database(err)
    }
}
