use std::time::Duration;

use anyhow::bail;

use aicron_core::config::PROMPT_COMMAND_KEY;
use aicron_core::AicronConfig;
use aicron_store::JobStore;

use super::require_job;

/// Execute a job now. This is the subcommand the installed cron line
/// invokes; its stdout/stderr land in the cron log.
///
/// A missing or paused job exits non-zero before any run record is
/// created. The child's own failure is not an error here — it is recorded
/// in the run row and inspected via `show`/`runs`.
pub async fn run(store: &JobStore, config: &AicronConfig, id: i64) -> anyhow::Result<()> {
    let job = require_job(store, id)?;
    if !job.active {
        bail!("Job #{id} is paused");
    }

    // Configured command: config table beats aicron.toml beats the default.
    let configured = store
        .config_get(PROMPT_COMMAND_KEY)?
        .unwrap_or_else(|| config.runner.command.clone());
    let resolved = aicron_runner::resolve(&configured)?;

    let timeout = Duration::from_secs(config.runner.timeout_secs);
    let outcome = aicron_runner::execute(store, &job, &resolved, timeout).await?;
    tracing::info!(
        job_id = id,
        run_id = outcome.run_id,
        exit_code = outcome.exit_code,
        "run recorded"
    );
    Ok(())
}
