use thiserror::Error;

/// Errors that can occur while synchronising the crontab.
#[derive(Debug, Error)]
pub enum CrontabError {
    /// The `crontab` binary could not be spawned or spoken to.
    #[error("Failed to invoke crontab: {0}")]
    Spawn(#[from] std::io::Error),

    /// A schedule expression without exactly five fields.
    #[error("Invalid cron expression {0:?}: need 5 fields")]
    InvalidSchedule(String),

    /// `crontab -` exited non-zero. The table and the job registry may now
    /// disagree; no rollback is attempted.
    #[error("Failed to write crontab: {stderr}")]
    WriteFailed { stderr: String },

    /// The table changed between read and write-back.
    #[error("Crontab was modified concurrently; re-run the command")]
    ConcurrentlyModified,
}

pub type Result<T> = std::result::Result<T, CrontabError>;
