use std::sync::Mutex;

use chrono::Utc;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::db::init_db;
use crate::error::{Result, StoreError};
use crate::types::{Job, RecentRun, Run};

/// Thread-safe handle over the registry database.
///
/// Wraps a single SQLite connection in a `Mutex`. Each CLI invocation is a
/// short-lived process holding exactly one connection, so a Mutex is
/// sufficient; access is released implicitly on process exit.
pub struct JobStore {
    db: Mutex<Connection>,
}

impl JobStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    /// Open `path`, apply the WAL and foreign-key pragmas, and run the
    /// schema migration. `":memory:"` works for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        init_db(&conn)?;
        Ok(Self::new(conn))
    }

    // -----------------------------------------------------------------------
    // Jobs
    // -----------------------------------------------------------------------

    /// Insert a new active job and return its monotonic ID.
    pub fn create_job(&self, prompt: &str, schedule: &str) -> Result<i64> {
        let now = Utc::now().to_rfc3339();
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO jobs (prompt, schedule, active, created_at)
             VALUES (?1, ?2, 1, ?3)",
            rusqlite::params![prompt, schedule, now],
        )?;
        let id = db.last_insert_rowid();
        info!(job_id = id, %schedule, "job created");
        Ok(id)
    }

    /// Retrieve a job by ID, returning `None` if it does not exist.
    pub fn get_job(&self, id: i64) -> Result<Option<Job>> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            "SELECT id, prompt, schedule, active, created_at FROM jobs WHERE id = ?1",
            rusqlite::params![id],
            row_to_job,
        ) {
            Ok(job) => Ok(Some(job)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    /// Return all jobs ordered by ID.
    pub fn list_jobs(&self) -> Result<Vec<Job>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT id, prompt, schedule, active, created_at FROM jobs ORDER BY id",
        )?;
        let rows = stmt.query_map([], row_to_job)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Flip the active flag. `JobNotFound` when no row matches.
    pub fn set_job_active(&self, id: i64, active: bool) -> Result<()> {
        let db = self.db.lock().unwrap();
        let rows_changed = db.execute(
            "UPDATE jobs SET active = ?1 WHERE id = ?2",
            rusqlite::params![active as i64, id],
        )?;
        if rows_changed == 0 {
            return Err(StoreError::JobNotFound { id });
        }
        debug!(job_id = id, active, "job active flag updated");
        Ok(())
    }

    /// Delete a job; the cascade removes its runs.
    pub fn delete_job(&self, id: i64) -> Result<()> {
        let db = self.db.lock().unwrap();
        let rows_changed = db.execute("DELETE FROM jobs WHERE id = ?1", rusqlite::params![id])?;
        if rows_changed == 0 {
            return Err(StoreError::JobNotFound { id });
        }
        info!(job_id = id, "job deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Runs
    // -----------------------------------------------------------------------

    /// Open a new in-flight run row for `job_id` with only a start timestamp.
    pub fn create_run(&self, job_id: i64) -> Result<i64> {
        let now = Utc::now().to_rfc3339();
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO runs (job_id, started_at) VALUES (?1, ?2)",
            rusqlite::params![job_id, now],
        )?;
        Ok(db.last_insert_rowid())
    }

    /// Finalize a run exactly once.
    ///
    /// The `finished_at IS NULL` guard makes the terminal write idempotent
    /// at the database level: a second attempt matches no row and returns
    /// `RunAlreadyFinished` instead of overwriting the recorded outcome.
    pub fn finish_run(
        &self,
        run_id: i64,
        stdout: Option<&str>,
        stderr: Option<&str>,
        exit_code: Option<i64>,
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let db = self.db.lock().unwrap();
        let rows_changed = db.execute(
            "UPDATE runs
             SET finished_at = ?1, stdout = ?2, stderr = ?3, exit_code = ?4
             WHERE id = ?5 AND finished_at IS NULL",
            rusqlite::params![now, stdout, stderr, exit_code, run_id],
        )?;
        if rows_changed == 0 {
            return Err(StoreError::RunAlreadyFinished { id: run_id });
        }
        debug!(run_id, ?exit_code, "run finalized");
        Ok(())
    }

    /// The most recent runs of one job, newest first.
    pub fn runs_for_job(&self, job_id: i64, limit: usize) -> Result<Vec<Run>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT id, job_id, started_at, finished_at, stdout, stderr, exit_code
             FROM runs WHERE job_id = ?1
             ORDER BY started_at DESC, id DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(rusqlite::params![job_id, limit as i64], row_to_run)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// The most recent runs across all jobs, joined with the owning prompt.
    pub fn recent_runs(&self, limit: usize) -> Result<Vec<RecentRun>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT r.id, r.job_id, r.started_at, r.finished_at, r.stdout, r.stderr,
                    r.exit_code, j.prompt
             FROM runs r JOIN jobs j ON j.id = r.job_id
             ORDER BY r.started_at DESC, r.id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(rusqlite::params![limit as i64], |row| {
            Ok(RecentRun {
                run: row_to_run(row)?,
                prompt: row.get(7)?,
            })
        })?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// The single most recent run of a job, if any.
    pub fn last_run(&self, job_id: i64) -> Result<Option<Run>> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            "SELECT id, job_id, started_at, finished_at, stdout, stderr, exit_code
             FROM runs WHERE job_id = ?1
             ORDER BY started_at DESC, id DESC
             LIMIT 1",
            rusqlite::params![job_id],
            row_to_run,
        ) {
            Ok(run) => Ok(Some(run)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    // -----------------------------------------------------------------------
    // Config key/value
    // -----------------------------------------------------------------------

    pub fn config_get(&self, key: &str) -> Result<Option<String>> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            "SELECT value FROM config WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get(0),
        ) {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    pub fn config_set(&self, key: &str, value: &str) -> Result<()> {
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    pub fn config_delete(&self, key: &str) -> Result<()> {
        let db = self.db.lock().unwrap();
        db.execute("DELETE FROM config WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
    }

    /// All config pairs ordered by key.
    pub fn config_all(&self) -> Result<Vec<(String, String)>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare("SELECT key, value FROM config ORDER BY key")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }
}

/// Map a SQLite row to a `Job`.
fn row_to_job(row: &rusqlite::Row<'_>) -> rusqlite::Result<Job> {
    Ok(Job {
        id: row.get(0)?,
        prompt: row.get(1)?,
        schedule: row.get(2)?,
        active: row.get::<_, i64>(3)? != 0,
        created_at: row.get(4)?,
    })
}

/// Map a SQLite row to a `Run`.
fn row_to_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<Run> {
    Ok(Run {
        id: row.get(0)?,
        job_id: row.get(1)?,
        started_at: row.get(2)?,
        finished_at: row.get(3)?,
        stdout: row.get(4)?,
        stderr: row.get(5)?,
        exit_code: row.get(6)?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> JobStore {
        JobStore::open(":memory:").unwrap()
    }

    #[test]
    fn create_and_get_roundtrip() {
        let store = store();
        let id = store.create_job("say hi", "0 9 * * *").unwrap();
        let job = store.get_job(id).unwrap().unwrap();
        assert_eq!(job.prompt, "say hi");
        assert_eq!(job.schedule, "0 9 * * *");
        assert!(job.active);
        assert!(!job.created_at.is_empty());
    }

    #[test]
    fn ids_are_monotonic() {
        let store = store();
        let a = store.create_job("a", "* * * * *").unwrap();
        let b = store.create_job("b", "* * * * *").unwrap();
        assert!(b > a);
        let jobs = store.list_jobs().unwrap();
        assert_eq!(jobs.iter().map(|j| j.id).collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn get_missing_job_is_none() {
        let store = store();
        assert!(store.get_job(42).unwrap().is_none());
    }

    #[test]
    fn set_active_flips_flag() {
        let store = store();
        let id = store.create_job("a", "* * * * *").unwrap();
        store.set_job_active(id, false).unwrap();
        assert!(!store.get_job(id).unwrap().unwrap().active);
        store.set_job_active(id, true).unwrap();
        assert!(store.get_job(id).unwrap().unwrap().active);
    }

    #[test]
    fn set_active_unknown_job_errors() {
        let store = store();
        let err = store.set_job_active(7, false).unwrap_err();
        assert!(matches!(err, StoreError::JobNotFound { id: 7 }));
    }

    #[test]
    fn delete_cascades_to_runs() {
        let store = store();
        let id = store.create_job("a", "* * * * *").unwrap();
        let run_id = store.create_run(id).unwrap();
        store
            .finish_run(run_id, Some("out"), Some(""), Some(0))
            .unwrap();
        store.delete_job(id).unwrap();
        assert!(store.get_job(id).unwrap().is_none());
        assert!(store.runs_for_job(id, 10).unwrap().is_empty());
        assert!(store.recent_runs(10).unwrap().is_empty());
    }

    #[test]
    fn run_starts_in_flight_and_finishes_once() {
        let store = store();
        let id = store.create_job("a", "* * * * *").unwrap();
        let run_id = store.create_run(id).unwrap();

        let run = store.last_run(id).unwrap().unwrap();
        assert!(run.in_flight());
        assert!(run.stdout.is_none());
        assert!(run.exit_code.is_none());

        store
            .finish_run(run_id, Some("hello"), Some(""), Some(0))
            .unwrap();
        let run = store.last_run(id).unwrap().unwrap();
        assert!(!run.in_flight());
        assert_eq!(run.stdout.as_deref(), Some("hello"));
        assert_eq!(run.exit_code, Some(0));

        // Second terminal write is rejected, not silently applied.
        let err = store
            .finish_run(run_id, None, Some("again"), Some(1))
            .unwrap_err();
        assert!(matches!(err, StoreError::RunAlreadyFinished { .. }));
        let run = store.last_run(id).unwrap().unwrap();
        assert_eq!(run.exit_code, Some(0));
    }

    #[test]
    fn finish_run_accepts_null_columns() {
        let store = store();
        let id = store.create_job("a", "* * * * *").unwrap();
        let run_id = store.create_run(id).unwrap();
        store
            .finish_run(run_id, None, Some("spawn failed: no such file"), Some(1))
            .unwrap();
        let run = store.last_run(id).unwrap().unwrap();
        assert!(run.stdout.is_none());
        assert_eq!(run.exit_code, Some(1));
    }

    #[test]
    fn recent_runs_join_prompt_and_order_newest_first() {
        let store = store();
        let a = store.create_job("first prompt", "* * * * *").unwrap();
        let b = store.create_job("second prompt", "* * * * *").unwrap();
        let ra = store.create_run(a).unwrap();
        let rb = store.create_run(b).unwrap();
        store.finish_run(ra, Some(""), Some(""), Some(0)).unwrap();
        store.finish_run(rb, Some(""), Some(""), Some(2)).unwrap();

        let recent = store.recent_runs(10).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].run.id, rb);
        assert_eq!(recent[0].prompt, "second prompt");
        assert_eq!(recent[1].prompt, "first prompt");
    }

    #[test]
    fn runs_for_job_respects_limit() {
        let store = store();
        let id = store.create_job("a", "* * * * *").unwrap();
        for _ in 0..5 {
            let r = store.create_run(id).unwrap();
            store.finish_run(r, Some(""), Some(""), Some(0)).unwrap();
        }
        assert_eq!(store.runs_for_job(id, 3).unwrap().len(), 3);
    }

    #[test]
    fn config_roundtrip_and_overwrite() {
        let store = store();
        assert!(store.config_get("prompt_command").unwrap().is_none());
        store.config_set("prompt_command", "claude -p").unwrap();
        store.config_set("prompt_command", "opencode run").unwrap();
        assert_eq!(
            store.config_get("prompt_command").unwrap().as_deref(),
            Some("opencode run")
        );
        assert_eq!(
            store.config_all().unwrap(),
            vec![("prompt_command".to_string(), "opencode run".to_string())]
        );
        store.config_delete("prompt_command").unwrap();
        assert!(store.config_get("prompt_command").unwrap().is_none());
    }
}
