use aicron_store::JobStore;

use super::require_job;
use crate::render;

/// Stdout lines shown per run before the preview is cut off.
const STDOUT_PREVIEW_LINES: usize = 20;

/// Job details plus its last 10 runs.
pub fn show(store: &JobStore, id: i64) -> anyhow::Result<()> {
    let job = require_job(store, id)?;
    let status = if job.active { "active" } else { "paused" };

    println!();
    println!("Job #{}", job.id);
    println!("  Prompt:    {}", job.prompt);
    println!("  Schedule:  {}", job.schedule);
    println!("  Status:    {status}");
    println!("  Created:   {}", render::format_ts(&job.created_at));

    let runs = store.runs_for_job(job.id, 10)?;
    if runs.is_empty() {
        println!();
        println!("No runs yet.");
        return Ok(());
    }

    println!();
    println!("Recent runs:");
    for run in runs {
        println!();
        println!(
            "  Run #{} · {} · {}",
            run.id,
            render::format_ts(&run.started_at),
            render::exit_label(run.exit_code)
        );

        if let Some(ref stdout) = run.stdout {
            let lines: Vec<&str> = stdout.trim_end().lines().collect();
            for line in lines.iter().take(STDOUT_PREVIEW_LINES) {
                println!("    {line}");
            }
            if lines.len() > STDOUT_PREVIEW_LINES {
                println!("    ... {} more lines", lines.len() - STDOUT_PREVIEW_LINES);
            }
        }
        if run.exit_code.is_some_and(|code| code != 0) {
            if let Some(ref stderr) = run.stderr {
                if !stderr.is_empty() {
                    println!("    stderr: {}", render::preview(stderr, 200));
                }
            }
        }
    }
    Ok(())
}
