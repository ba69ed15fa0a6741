//! Spawn a job's prompt through the resolved command and record the
//! outcome.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{info, warn};

use aicron_store::{Job, JobStore};

use crate::command::ResolvedCommand;
use crate::error::Result;

/// Exit code recorded when the runner itself fails: spawn error, timeout,
/// or output-collection failure. Never 0, so downstream display treats it
/// like any other failed run.
pub const FAULT_EXIT_CODE: i64 = 1;

/// What got recorded for one execution attempt.
#[derive(Debug)]
pub struct RunOutcome {
    pub run_id: i64,
    pub exit_code: i64,
}

/// Execute `job`'s prompt through `resolved`, bounded by `timeout`.
///
/// Callers have already checked that the job is active. A run row is
/// created immediately before spawning and finalized exactly once on every
/// path; the returned outcome mirrors what was written to the row.
pub async fn execute(
    store: &JobStore,
    job: &Job,
    resolved: &ResolvedCommand,
    timeout: Duration,
) -> Result<RunOutcome> {
    let run_id = store.create_run(job.id)?;
    info!(
        job_id = job.id,
        run_id,
        program = %resolved.program.display(),
        "run started"
    );

    let spawned = Command::new(&resolved.program)
        .args(&resolved.args)
        .arg(&job.prompt)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();

    let child = match spawned {
        Ok(child) => child,
        Err(e) => {
            return finish_fault(store, job.id, run_id, format!("spawn failed: {e}"));
        }
    };

    // `wait_with_output` takes the child by value, so drive it on a spawned
    // task and keep the PID for the timeout kill path.
    let pid = child.id();
    let (tx, rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        let _ = tx.send(child.wait_with_output().await);
    });

    match tokio::time::timeout(timeout, rx).await {
        // Child exited within the deadline.
        Ok(Ok(Ok(output))) => {
            let exit_code = i64::from(output.status.code().unwrap_or(-1));
            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            store.finish_run(run_id, Some(&stdout), Some(&stderr), Some(exit_code))?;
            info!(job_id = job.id, run_id, exit_code, "run finished");
            Ok(RunOutcome { run_id, exit_code })
        }

        // wait_with_output() failed while collecting output.
        Ok(Ok(Err(e))) => finish_fault(
            store,
            job.id,
            run_id,
            format!("output collection failed: {e}"),
        ),

        // The wait task panicked and dropped the sender.
        Ok(Err(_recv)) => finish_fault(
            store,
            job.id,
            run_id,
            "wait task panicked unexpectedly".to_string(),
        ),

        // Deadline expired — kill the child by PID.
        Err(_elapsed) => {
            if let Some(raw_pid) = pid {
                // Safety: raw_pid is our direct child, still running.
                unsafe {
                    libc::kill(raw_pid as libc::pid_t, libc::SIGKILL);
                }
            }
            finish_fault(
                store,
                job.id,
                run_id,
                format!("timed out after {}s; process killed", timeout.as_secs()),
            )
        }
    }
}

/// Finalize a run on a runner-side fault: null stdout, descriptive stderr,
/// sentinel exit code.
fn finish_fault(store: &JobStore, job_id: i64, run_id: i64, msg: String) -> Result<RunOutcome> {
    warn!(job_id, run_id, "{msg}");
    store.finish_run(run_id, None, Some(&msg), Some(FAULT_EXIT_CODE))?;
    Ok(RunOutcome {
        run_id,
        exit_code: FAULT_EXIT_CODE,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::resolve;

    fn store_with_job(prompt: &str) -> (JobStore, Job) {
        let store = JobStore::open(":memory:").unwrap();
        let id = store.create_job(prompt, "* * * * *").unwrap();
        let job = store.get_job(id).unwrap().unwrap();
        (store, job)
    }

    #[tokio::test]
    async fn prompt_is_appended_as_final_argument() {
        let (store, job) = store_with_job("say hi");
        let resolved = resolve("echo").unwrap();

        let outcome = execute(&store, &job, &resolved, Duration::from_secs(30))
            .await
            .unwrap();

        assert_eq!(outcome.exit_code, 0);
        let run = store.last_run(job.id).unwrap().unwrap();
        assert!(!run.in_flight());
        assert_eq!(run.stdout.as_deref(), Some("say hi\n"));
        assert_eq!(run.exit_code, Some(0));
    }

    #[tokio::test]
    async fn child_exit_code_is_recorded() {
        let (store, job) = store_with_job("exit 3");
        // `sh -c <prompt>` makes the prompt the script body.
        let resolved = resolve("sh -c").unwrap();

        let outcome = execute(&store, &job, &resolved, Duration::from_secs(30))
            .await
            .unwrap();

        assert_eq!(outcome.exit_code, 3);
        let run = store.last_run(job.id).unwrap().unwrap();
        assert_eq!(run.exit_code, Some(3));
    }

    #[tokio::test]
    async fn stderr_is_captured_separately() {
        let (store, job) = store_with_job("echo out; echo err >&2");
        let resolved = resolve("sh -c").unwrap();

        execute(&store, &job, &resolved, Duration::from_secs(30))
            .await
            .unwrap();

        let run = store.last_run(job.id).unwrap().unwrap();
        assert_eq!(run.stdout.as_deref(), Some("out\n"));
        assert_eq!(run.stderr.as_deref(), Some("err\n"));
    }

    #[tokio::test]
    async fn spawn_failure_still_finalizes_the_run() {
        let (store, job) = store_with_job("ignored");
        let resolved = ResolvedCommand {
            program: "/nonexistent/aicron-test-binary".into(),
            args: vec![],
        };

        let outcome = execute(&store, &job, &resolved, Duration::from_secs(30))
            .await
            .unwrap();

        assert_eq!(outcome.exit_code, FAULT_EXIT_CODE);
        let run = store.last_run(job.id).unwrap().unwrap();
        assert!(!run.in_flight());
        assert!(run.stdout.is_none());
        assert!(run.stderr.unwrap().contains("spawn failed"));
        assert_eq!(run.exit_code, Some(FAULT_EXIT_CODE));
    }

    #[tokio::test]
    async fn timeout_kills_the_child_and_finalizes() {
        let (store, job) = store_with_job("sleep 30");
        let resolved = resolve("sh -c").unwrap();

        let outcome = execute(&store, &job, &resolved, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(outcome.exit_code, FAULT_EXIT_CODE);
        let run = store.last_run(job.id).unwrap().unwrap();
        assert!(!run.in_flight());
        assert!(run.stdout.is_none());
        assert!(run.stderr.unwrap().contains("timed out after 1s"));
    }

    #[tokio::test]
    async fn each_attempt_gets_its_own_run_row() {
        let (store, job) = store_with_job("say hi");
        let resolved = resolve("echo").unwrap();

        let first = execute(&store, &job, &resolved, Duration::from_secs(30))
            .await
            .unwrap();
        let second = execute(&store, &job, &resolved, Duration::from_secs(30))
            .await
            .unwrap();

        assert_ne!(first.run_id, second.run_id);
        assert_eq!(store.runs_for_job(job.id, 10).unwrap().len(), 2);
    }
}
