use aicron_store::JobStore;

use crate::render;

/// The 10 most recent runs across all jobs, newest first.
pub fn recent(store: &JobStore) -> anyhow::Result<()> {
    let runs = store.recent_runs(10)?;

    if runs.is_empty() {
        println!("No runs yet. Create a job with: aicron create 'your prompt' -s '0 9 * * *'");
        return Ok(());
    }

    println!("{:<6}{:<9}{:<13}{}", "JOB", "EXIT", "WHEN", "PROMPT");
    println!("{}", "-".repeat(70));

    for entry in runs {
        let exit = match entry.run.exit_code {
            None => "...".to_string(),
            Some(code) => code.to_string(),
        };
        println!(
            "{:<6}{:<9}{:<13}{}",
            format!("#{}", entry.run.job_id),
            exit,
            render::time_ago(&entry.run.started_at),
            render::preview(&entry.prompt, 40)
        );
    }
    Ok(())
}
