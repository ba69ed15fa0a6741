use aicron_core::AicronConfig;
use aicron_store::JobStore;

use super::{invocation_command, require_job};

/// Disable a job: drop its crontab block, then clear the active flag.
/// Pausing an already-paused job is a no-op, not an error.
pub async fn pause(store: &JobStore, id: i64) -> anyhow::Result<()> {
    let job = require_job(store, id)?;
    if !job.active {
        println!("Job #{id} is already paused");
        return Ok(());
    }

    aicron_crontab::sync::remove(id).await?;
    store.set_job_active(id, false)?;

    println!("Paused job #{id}");
    Ok(())
}

/// Re-enable a paused job: reinstall its crontab block, then set the
/// active flag. Resuming an already-active job is a no-op, not an error.
pub async fn resume(store: &JobStore, config: &AicronConfig, id: i64) -> anyhow::Result<()> {
    let job = require_job(store, id)?;
    if job.active {
        println!("Job #{id} is already active");
        return Ok(());
    }

    let command = invocation_command()?;
    aicron_crontab::sync::install(id, &job.schedule, &command, &config.crontab.log_path).await?;
    store.set_job_active(id, true)?;

    println!("Resumed job #{id}");
    Ok(())
}
