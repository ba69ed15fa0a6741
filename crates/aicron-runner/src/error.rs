use thiserror::Error;

/// Errors that can occur within the execution runner.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The configured command string tokenized to nothing.
    #[error("Runner command is empty")]
    EmptyCommand,

    /// The command's binary could not be found on PATH. Raised before any
    /// run record is created.
    #[error("Could not find '{bin}' in PATH")]
    ResolveFailed { bin: String },

    /// Underlying registry failure while recording the run.
    #[error("Registry error: {0}")]
    Store(#[from] aicron_store::StoreError),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
