use rusqlite::Connection;

use crate::error::Result;

/// Initialise the registry schema in `conn`.
///
/// Creates the `jobs`, `runs` and `config` tables (idempotent) plus the
/// indexes the run-history queries rely on. Requires `foreign_keys=ON` on
/// the connection for the cascade delete to take effect.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS jobs (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            prompt      TEXT    NOT NULL,
            schedule    TEXT    NOT NULL,
            active      INTEGER NOT NULL DEFAULT 1,
            created_at  TEXT    NOT NULL
        );

        CREATE TABLE IF NOT EXISTS runs (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            job_id      INTEGER NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
            started_at  TEXT    NOT NULL,
            finished_at TEXT,
            stdout      TEXT,
            stderr      TEXT,
            exit_code   INTEGER
        );

        CREATE TABLE IF NOT EXISTS config (
            key         TEXT PRIMARY KEY,
            value       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_runs_job_id     ON runs(job_id);
        CREATE INDEX IF NOT EXISTS idx_runs_started_at ON runs(started_at);
        ",
    )?;
    Ok(())
}
