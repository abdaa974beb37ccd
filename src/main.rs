use colored::Colorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    match opencode_agent_flowkit::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
