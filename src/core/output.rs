//! Rendering of deployment reports for the CLI.
//!
//! Human output is one colored line per template followed by a summary;
//! `--json` emits a single document for scripts.

use crate::core::remap::CONFIG_DIR;
use crate::core::scaffold::{DeployReport, Outcome, OutcomeStatus};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

pub fn header(version: &str, target: &str) -> String {
    format!(
        "\n{} {}\n\nInstalling to: {}\n",
        "OpenCode Agent FlowKit".bright_cyan().bold(),
        format!("v{}", version).bright_black(),
        target
    )
}

pub fn outcome_line(report: &DeployReport, outcome: &Outcome) -> String {
    let rel = report.relative(&outcome.path).display();
    match &outcome.status {
        OutcomeStatus::Created => format!("  {} {}", "Created:".green(), rel),
        OutcomeStatus::Skipped => format!("  {} {} (already exists)", "Skipped:".yellow(), rel),
        OutcomeStatus::Failed { error } => format!("  {} {} - {}", "Error:".red().bold(), rel, error),
    }
}

pub fn summary(report: &DeployReport) -> String {
    let (created, skipped, failed) = (report.created(), report.skipped(), report.failed());
    if failed > 0 {
        return format!(
            "{} {} created, {} skipped, {} errors",
            "Completed with errors:".bright_yellow().bold(),
            created,
            skipped,
            failed
        );
    }
    if created == 0 && skipped > 0 {
        return format!(
            "{} all {} files already exist. Use {} to overwrite.",
            "No changes:".bright_blue(),
            skipped,
            "--force".bright_cyan().bold()
        );
    }
    let mut line = format!("{} {} files installed", "Done!".green().bold(), created);
    if skipped > 0 {
        line.push_str(&format!(", {} skipped", skipped));
    }
    line
}

pub fn next_steps() -> String {
    format!(
        "{}\n   1. Edit {}/config.json to configure models (optional)\n   2. Create AGENTS.md with your project's code style (optional)\n   3. Start planning: opencode -> select \"plan\" mode",
        "Next steps:".bright_white().bold(),
        CONFIG_DIR
    )
}

/// Full human-readable report, ready to print.
pub fn render_text(report: &DeployReport) -> String {
    let mut out: Vec<String> = report
        .outcomes
        .iter()
        .map(|o| outcome_line(report, o))
        .collect();
    out.push(String::new());
    out.push(summary(report));
    if report.created() > 0 {
        out.push(String::new());
        out.push(next_steps());
    }
    out.join("\n")
}

#[derive(Serialize)]
struct JsonReport<'a> {
    target: &'a Path,
    created: usize,
    skipped: usize,
    failed: usize,
    outcomes: &'a [Outcome],
}

pub fn render_json(report: &DeployReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonReport {
        target: &report.target_root,
        created: report.created(),
        skipped: report.skipped(),
        failed: report.failed(),
        outcomes: &report.outcomes,
    })
}
