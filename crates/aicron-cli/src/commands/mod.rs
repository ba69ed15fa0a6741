mod config;
mod create;
mod list;
mod pause;
mod recent;
mod remove;
mod run;
mod show;

pub use config::{config_delete, config_get, config_list, config_set};
pub use create::create;
pub use list::list;
pub use pause::{pause, resume};
pub use recent::recent;
pub use remove::remove;
pub use run::run;
pub use show::show;

use anyhow::{anyhow, Context};
use aicron_store::{Job, JobStore};

/// Fetch a job or fail with the user-facing not-found message.
pub(crate) fn require_job(store: &JobStore, id: i64) -> anyhow::Result<Job> {
    store
        .get_job(id)
        .context("reading job registry")?
        .ok_or_else(|| anyhow!("Job #{id} not found"))
}

/// The absolute path cron should invoke — this very executable.
pub(crate) fn invocation_command() -> anyhow::Result<String> {
    let exe = std::env::current_exe().context("resolving own executable path")?;
    Ok(exe.display().to_string())
}
