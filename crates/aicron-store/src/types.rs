use serde::{Deserialize, Serialize};

/// A persisted unit of recurring work.
///
/// Prompt and schedule are immutable after creation; only the active flag
/// and deletion are mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Monotonic SQLite rowid — primary key.
    pub id: i64,
    /// Free-text prompt forwarded to the runner command.
    pub prompt: String,
    /// Five-field cron expression, verbatim as entered.
    pub schedule: String,
    /// Paused jobs keep their row but have no crontab entry.
    pub active: bool,
    /// RFC 3339 UTC timestamp of creation.
    pub created_at: String,
}

/// One execution attempt of a job's prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: i64,
    /// Owning job; the row is deleted with it.
    pub job_id: i64,
    pub started_at: String,
    /// NULL while the run is in flight; written exactly once.
    pub finished_at: Option<String>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    /// 0 is the only success indicator.
    pub exit_code: Option<i64>,
}

impl Run {
    /// A run is in flight exactly while `finished_at` is unset.
    pub fn in_flight(&self) -> bool {
        self.finished_at.is_none()
    }
}

/// A run joined with the prompt of its owning job, for the recent-runs view.
#[derive(Debug, Clone)]
pub struct RecentRun {
    pub run: Run,
    pub prompt: String,
}
