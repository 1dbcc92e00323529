//! CLI presentation: text and JSON rendering of summaries, job lists and batch reports.

use crate::batch::{BatchJob, BatchReport, JobStatus};
use crate::collision::CollisionSpec;
use crate::error::EvgenError;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;

fn to_json(value: &serde_json::Value) -> Result<String, EvgenError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| EvgenError::ConfigError(format!("Failed to serialize output: {}", e)))
}

pub fn format_collision(collision: &CollisionSpec, format: &str) -> Result<String, EvgenError> {
    if format == "json" {
        return to_json(&serde_json::json!({
            "label": collision.label(),
            "process": collision.process_expression(),
            "beam_parameters": collision.beam_parameters(),
            "summary": collision.describe(),
        }));
    }
    Ok(collision.describe())
}

fn job_detail(job: &BatchJob) -> String {
    match job {
        BatchJob::Materialize { process, .. } => process.clone(),
        BatchJob::Generate { options, .. } => options
            .parameters
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Job listing for dry runs.
pub fn format_job_list(jobs: &[BatchJob], format: &str) -> Result<String, EvgenError> {
    if format == "json" {
        let arr: Vec<serde_json::Value> = jobs
            .iter()
            .map(|job| {
                serde_json::json!({
                    "directory": job.directory(),
                    "action": job.action(),
                    "detail": job_detail(job),
                })
            })
            .collect();
        return to_json(&serde_json::Value::Array(arr));
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Directory", "Action", "Detail"]);
    for (i, job) in jobs.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            job.directory().to_string(),
            job.action(),
            job_detail(job),
        ]);
    }
    Ok(format!("{}\n{} job(s) planned", table, jobs.len()))
}

pub fn format_batch_report(report: &BatchReport, format: &str) -> Result<String, EvgenError> {
    if format == "json" {
        let value = serde_json::to_value(report)
            .map_err(|e| EvgenError::ConfigError(format!("Failed to serialize report: {}", e)))?;
        return to_json(&value);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Directory", "Action", "Status", "Detail"]);
    for outcome in &report.outcomes {
        let (status, detail) = match &outcome.status {
            JobStatus::Succeeded => ("ok".green().to_string(), String::new()),
            JobStatus::Failed(msg) => ("failed".red().to_string(), msg.clone()),
            JobStatus::Skipped(reason) => ("skipped".yellow().to_string(), reason.clone()),
        };
        table.add_row(vec![
            outcome.directory.clone(),
            outcome.action.clone(),
            status,
            detail,
        ]);
    }

    let elapsed = report.finished_at - report.started_at;
    Ok(format!(
        "{}\n{} succeeded, {} failed, {} skipped in {:.1}s",
        table,
        report.succeeded(),
        report.failed(),
        report.skipped(),
        elapsed.num_milliseconds() as f64 / 1000.0
    ))
}
