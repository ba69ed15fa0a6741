use aicron_store::JobStore;

use super::require_job;

/// Delete a job: crontab entry first, then the row (runs cascade with it).
pub async fn remove(store: &JobStore, id: i64) -> anyhow::Result<()> {
    require_job(store, id)?;

    aicron_crontab::sync::remove(id).await?;
    store.delete_job(id)?;

    println!("Removed job #{id} and its run history");
    Ok(())
}
