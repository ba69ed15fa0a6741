//! Round trips to the external `crontab` binary.
//!
//! Install and remove follow read-modify-write over the whole table: the
//! write replaces the entire crontab in one `crontab -` invocation, so
//! other readers never see a partially-written table. There is no lock on
//! the table itself; instead the table is re-read just before writing and
//! compared against the first snapshot, and a mismatch aborts the update.

use std::collections::BTreeMap;
use std::process::Stdio;

use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{CrontabError, Result};
use crate::table;

/// Read the current crontab text.
///
/// `crontab -l` exits non-zero when the user has no crontab yet; that is a
/// recognised non-error condition and yields an empty table.
pub async fn read() -> Result<String> {
    let output = Command::new("crontab")
        .arg("-l")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        debug!("crontab -l reported no table; treating as empty");
        return Ok(String::new());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Replace the whole crontab with `content`.
///
/// A non-zero exit is a hard failure: the table and the job registry may
/// now disagree, and the caller must surface it.
async fn write(content: &str) -> Result<()> {
    let mut child = Command::new("crontab")
        .arg("-")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(content.as_bytes()).await?;
        // Dropping the handle closes the pipe so crontab sees EOF.
    }

    let output = child.wait_with_output().await?;
    if !output.status.success() {
        return Err(CrontabError::WriteFailed {
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}

fn snapshot_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Write `updated` back unless the table changed since `snapshot` was taken.
async fn commit(snapshot: &str, updated: &str) -> Result<()> {
    let current = read().await?;
    if snapshot_hash(&current) != snapshot {
        return Err(CrontabError::ConcurrentlyModified);
    }
    write(updated).await
}

/// Install (or replace) the two-line block for `job_id`.
///
/// Precondition: `schedule` has exactly five fields. Postcondition: exactly
/// one block for `job_id` exists and all other content is unchanged.
pub async fn install(job_id: i64, schedule: &str, command: &str, log_path: &str) -> Result<()> {
    table::validate_expression(schedule)?;

    let existing = read().await?;
    let snapshot = snapshot_hash(&existing);
    let invocation = table::invocation_line(schedule, command, job_id, log_path);
    let updated = table::upsert_entry(&existing, job_id, &invocation);

    commit(&snapshot, &updated).await?;
    info!(job_id, %schedule, "crontab entry installed");
    Ok(())
}

/// Remove the block for `job_id`. A missing marker is a no-op, not an error.
pub async fn remove(job_id: i64) -> Result<()> {
    let existing = read().await?;
    let updated = table::remove_entry(&existing, job_id);
    if updated == existing {
        debug!(job_id, "no crontab entry to remove");
        return Ok(());
    }

    let snapshot = snapshot_hash(&existing);
    commit(&snapshot, &updated).await?;
    info!(job_id, "crontab entry removed");
    Ok(())
}

/// Map each managed job ID to its current invocation line.
pub async fn list() -> Result<BTreeMap<i64, String>> {
    Ok(table::list_entries(&read().await?))
}
