use thiserror::Error;

/// Errors that can occur within the job registry.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No job with the given ID exists in the store.
    #[error("Job not found: {id}")]
    JobNotFound { id: i64 },

    /// The run does not exist or its terminal write already happened.
    #[error("Run {id} not found or already finished")]
    RunAlreadyFinished { id: i64 },
}

pub type Result<T> = std::result::Result<T, StoreError>;
