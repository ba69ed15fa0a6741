//! Pure text transformations over the crontab table.
//!
//! Everything here is deterministic string-in/string-out so the invariants
//! (one block per job, foreign lines untouched, idempotence) are testable
//! without touching the real crontab.

use std::collections::BTreeMap;

use crate::error::{CrontabError, Result};

/// Marker prefix identifying blocks owned by aicron.
pub const MARKER_PREFIX: &str = "# aicron:job:";

/// The marker line for `job_id`.
pub fn marker(job_id: i64) -> String {
    format!("{MARKER_PREFIX}{job_id}")
}

/// Check that `expr` is a five-field cron expression.
///
/// Field contents are not validated beyond the count; cron itself is the
/// authority on what each field accepts.
pub fn validate_expression(expr: &str) -> Result<()> {
    if expr.split_whitespace().count() == 5 {
        Ok(())
    } else {
        Err(CrontabError::InvalidSchedule(expr.to_string()))
    }
}

/// The invocation line installed below a marker:
/// `<schedule> PATH=… HOME=… <command> run <job_id> >> <log_path> 2>&1`.
///
/// PATH and HOME are baked in because cron strips the environment; the
/// prompt itself never appears on this line — the `run` subcommand reads it
/// back from the registry.
pub fn invocation_line(schedule: &str, command: &str, job_id: i64, log_path: &str) -> String {
    let path = std::env::var("PATH").unwrap_or_default();
    let home = std::env::var("HOME").unwrap_or_default();
    format!("{schedule} PATH={path} HOME={home} {command} run {job_id} >> {log_path} 2>&1")
}

/// Scanner state for [`remove_entry`].
enum ScanState {
    /// Passing foreign lines through, watching for the marker.
    Seeking,
    /// The marker was just dropped; the single line that follows is the
    /// invocation line the block owns and is dropped too.
    InsideOwnedBlock,
}

/// Drop the two-line block for `job_id`, if present.
///
/// All other lines pass through unchanged in relative order, blank lines
/// and comments included. A table without the marker comes back as-is, so
/// the operation is an idempotent no-op rather than an error.
pub fn remove_entry(table: &str, job_id: i64) -> String {
    let target = marker(job_id);
    let mut state = ScanState::Seeking;
    let mut kept: Vec<&str> = Vec::new();

    for line in table.split('\n') {
        match state {
            ScanState::Seeking => {
                if line == target {
                    state = ScanState::InsideOwnedBlock;
                } else {
                    kept.push(line);
                }
            }
            ScanState::InsideOwnedBlock => {
                state = ScanState::Seeking;
            }
        }
    }

    kept.join("\n")
}

/// Replace-or-append the block for `job_id`.
///
/// Any pre-existing block for the job is removed first, then the new block
/// is appended, separated from prior content by exactly one newline. The
/// result always ends with a trailing newline — `crontab -` requires one.
pub fn upsert_entry(table: &str, job_id: i64, invocation: &str) -> String {
    let cleaned = remove_entry(table, job_id);
    let trimmed = cleaned.trim_end();

    let mut out = String::new();
    if !trimmed.is_empty() {
        out.push_str(trimmed);
        out.push('\n');
    }
    out.push_str(&marker(job_id));
    out.push('\n');
    out.push_str(invocation);
    out.push('\n');
    out
}

/// Scan for managed blocks: marker line → the line that follows it.
///
/// Malformed markers are skipped silently: a non-numeric identifier, or a
/// marker on the final line with nothing after it.
pub fn list_entries(table: &str) -> BTreeMap<i64, String> {
    let lines: Vec<&str> = table.split('\n').collect();
    let mut entries = BTreeMap::new();

    for (i, line) in lines.iter().enumerate() {
        if let Some(rest) = line.strip_prefix(MARKER_PREFIX) {
            if let Ok(id) = rest.parse::<i64>() {
                if i + 1 < lines.len() {
                    entries.insert(id, lines[i + 1].to_string());
                }
            }
        }
    }

    entries
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
