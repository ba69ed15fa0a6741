use aicron_core::AicronConfig;
use aicron_store::JobStore;

use super::invocation_command;

/// Create a job and install its crontab block.
///
/// The schedule is validated before anything is written. If the crontab
/// write-back fails after the job row was created, the error is surfaced
/// as-is: registry and table may now disagree, and no rollback is
/// attempted.
pub async fn create(
    store: &JobStore,
    config: &AicronConfig,
    prompt: &str,
    schedule: &str,
) -> anyhow::Result<()> {
    aicron_crontab::table::validate_expression(schedule)?;

    let job_id = store.create_job(prompt, schedule)?;
    let command = invocation_command()?;
    aicron_crontab::sync::install(job_id, schedule, &command, &config.crontab.log_path).await?;

    println!("Created job #{job_id}");
    println!("  Prompt:    {prompt}");
    println!("  Schedule:  {schedule}");
    println!("  Status:    active");
    Ok(())
}
