use std::collections::BTreeMap;

use aicron_store::JobStore;

use crate::render;

/// One-line-per-job overview, the default command.
///
/// Active jobs are cross-checked against the crontab: a job the registry
/// thinks is active but that has no managed block is marked, since that
/// divergence is never auto-healed. The cross-check is skipped when the
/// crontab cannot be read at all.
pub async fn list(store: &JobStore) -> anyhow::Result<()> {
    let jobs = store.list_jobs()?;

    if jobs.is_empty() {
        println!("No jobs yet. Create one with: aicron create 'your prompt' -s '0 9 * * *'");
        return Ok(());
    }

    let entries: Option<BTreeMap<i64, String>> = match aicron_crontab::sync::list().await {
        Ok(entries) => Some(entries),
        Err(e) => {
            tracing::debug!("skipping crontab cross-check: {e}");
            None
        }
    };

    println!(
        "{:<6}{:<10}{:<16}{:<13}{}",
        "ID", "STATUS", "SCHEDULE", "LAST RUN", "PROMPT"
    );
    println!("{}", "-".repeat(80));

    let mut drifted = false;
    for job in jobs {
        let missing_entry = job.active
            && entries
                .as_ref()
                .is_some_and(|m| !m.contains_key(&job.id));
        drifted |= missing_entry;

        let status = match (job.active, missing_entry) {
            (true, false) => "active",
            (true, true) => "active!",
            (false, _) => "paused",
        };
        let last = match store.last_run(job.id)? {
            Some(run) => render::time_ago(&run.started_at),
            None => "never".to_string(),
        };
        println!(
            "{:<6}{:<10}{:<16}{:<13}{}",
            format!("#{}", job.id),
            status,
            job.schedule,
            last,
            render::preview(&job.prompt, 40)
        );
    }

    if drifted {
        println!();
        println!("! active job without a crontab entry — pause and resume it to reinstall");
    }
    Ok(())
}
