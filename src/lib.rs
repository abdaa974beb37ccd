//! OpenCode Agent FlowKit: drop an agent workflow into any repository.
//!
//! The binary carries a small tree of templates (OpenCode configuration, a
//! planning document, agent definitions, supporting docs) and installs it into
//! a target project.
//!
//! # Layout produced
//!
//! | Bundled path | Installed at |
//! |--------------|--------------|
//! | `config.json`, `plan.md` | `.opencode/<name>` |
//! | `agents/<file>` | `.opencode/agents/<file>` |
//! | anything else | same relative path under the target |
//!
//! Existing files are left alone unless `--force` is given. Directories are
//! only ever created, never removed.
//!
//! # Library use
//!
//! ```no_run
//! use opencode_agent_flowkit::core::assets::TemplateSet;
//! use opencode_agent_flowkit::core::scaffold::{DeployOptions, deploy};
//!
//! let templates = TemplateSet::embedded().unwrap();
//! let opts = DeployOptions {
//!     target_root: "/path/to/repo".into(),
//!     overwrite: false,
//! };
//! let report = deploy(&templates, &opts).unwrap();
//! println!("{} created, {} skipped", report.created(), report.skipped());
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: template bundle, remap rules, deployment engine, report rendering

pub mod core;

use crate::core::{
    assets::TemplateSet,
    error::FlowkitError,
    output,
    scaffold::{self, DeployOptions},
    telemetry,
};

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(
    name = "opencode-agent-flowkit",
    version = env!("CARGO_PKG_VERSION"),
    about = "Install OpenCode agent workflow configuration in any repository.",
    after_help = "Examples:\n  opencode-agent-flowkit              # Install in current dir\n  opencode-agent-flowkit ./my-repo    # Install in specific dir\n  opencode-agent-flowkit --force      # Overwrite existing files"
)]
struct Cli {
    /// Directory to install to.
    #[clap(value_name = "TARGET_DIR", default_value = ".")]
    target_dir: PathBuf,
    /// Overwrite existing files.
    #[clap(short, long, env = "FLOWKIT_FORCE")]
    force: bool,
    /// Print the report as JSON instead of text.
    #[clap(long)]
    json: bool,
    /// Emit debug diagnostics on stderr.
    #[clap(long)]
    verbose: bool,
}

pub fn run() -> Result<ExitCode, FlowkitError> {
    let cli = Cli::parse();
    telemetry::init_tracing(if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    });

    let target_root = std::path::absolute(&cli.target_dir)?;
    if !target_root.exists() {
        return Err(FlowkitError::TargetMissing(target_root));
    }

    let templates = TemplateSet::embedded()?;
    let opts = DeployOptions {
        target_root,
        overwrite: cli.force,
    };

    if !cli.json {
        println!(
            "{}",
            output::header(env!("CARGO_PKG_VERSION"), &opts.target_root.display().to_string())
        );
    }

    let report = match scaffold::deploy(&templates, &opts) {
        Ok(report) => report,
        Err(abort) => {
            if !cli.json {
                for outcome in &abort.partial.outcomes {
                    println!("{}", output::outcome_line(&abort.partial, outcome));
                }
            }
            return Err(abort.error);
        }
    };

    if cli.json {
        println!("{}", output::render_json(&report)?);
    } else {
        println!("{}\n", output::render_text(&report));
    }

    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
