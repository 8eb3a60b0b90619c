//! Command-line host for the gift option core.
//!
//! # Responsibility
//! - Replay scripted checkout sessions against `giftwrap_core`.
//! - Keep output deterministic for quick local sanity checks.

use clap::{Parser, Subcommand};
use giftwrap_core::{core_version, init_logging, load_script, run_script, ReplayReport};
use log::error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "giftwrap", version, about = "Gift option reconciliation host")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the core crate version.
    Version,
    /// Replay a JSON script of cart, delivery and toggle events.
    Replay {
        script: PathBuf,
        #[arg(long, help = "Output the report as JSON")]
        json: bool,
        #[arg(long, requires = "log_dir", help = "trace|debug|info|warn|error")]
        log_level: Option<String>,
        #[arg(long, help = "Absolute directory for rolling log files")]
        log_dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Commands::Version => {
            println!("giftwrap_core version={}", core_version());
            ExitCode::SUCCESS
        }
        Commands::Replay {
            script,
            json,
            log_level,
            log_dir,
        } => match replay(&script, json, log_level, log_dir) {
            Ok(()) => ExitCode::SUCCESS,
            Err(message) => {
                error!("event=replay_failed module=cli status=error error={message}");
                eprintln!("error: {message}");
                ExitCode::FAILURE
            }
        },
    }
}

fn replay(
    script: &Path,
    json: bool,
    log_level: Option<String>,
    log_dir: Option<PathBuf>,
) -> Result<(), String> {
    if let Some(dir) = log_dir {
        let level = log_level.unwrap_or_else(|| giftwrap_core::default_log_level().to_string());
        init_logging(&level, &dir.to_string_lossy())?;
    }

    let script = load_script(script).map_err(|err| err.to_string())?;
    let report = run_script(&script).map_err(|err| err.to_string())?;
    if json {
        let rendered = serde_json::to_string_pretty(&report).map_err(|err| err.to_string())?;
        println!("{rendered}");
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ReplayReport) {
    for step in &report.steps {
        let change = step
            .change
            .as_ref()
            .map(|change| change.kind())
            .unwrap_or("-");
        println!(
            "{:>6}ms {:<24} fired={} change={:<16} selected={} session_open={} notification={}",
            step.at_ms,
            step.label,
            step.deadlines_fired,
            change,
            step.selected,
            step.session_open,
            step.notification.as_str()
        );
    }
    match &report.final_block.banner {
        Some(banner) => println!("banner: {}", banner.title),
        None => println!("banner: none"),
    }
}
