//! LANDC Command-Line Interface
//!
//! Prints the effective configuration or replays a command log against a
//! fresh ledger.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use landc::clock::{Clock, ManualClock, SystemClock};
use landc::replay::replay;
use landc::{init_tracing, load_config, Ledger, LedgerSummary};

/// LANDC tokenized rent ledger
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(name = "landc")]
struct LandcCli {
    /// Configuration file path
    #[arg(short, long, env = "LANDC_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: LandcCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum LandcCommand {
    /// Print the effective configuration as TOML
    Config,

    /// Apply a JSON Lines command log to a fresh ledger
    Replay {
        /// Command log, one {"at": ts, "command": {...}} per line
        file: PathBuf,

        /// Time for entries without "at" (defaults to now)
        #[arg(long)]
        at: Option<u64>,
    },
}

#[derive(Serialize)]
struct RejectedLine {
    line: usize,
    command: &'static str,
    error: String,
}

#[derive(Serialize)]
struct ReplayFooter<'a> {
    applied: usize,
    rejected: usize,
    summary: &'a LedgerSummary,
}

fn main() -> Result<()> {
    let cli = LandcCli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.log_level);

    match cli.command {
        LandcCommand::Config => {
            print!("{}", config.to_toml_string()?);
        }
        LandcCommand::Replay { file, at } => {
            let default_at = at.unwrap_or_else(|| SystemClock.now());
            let clock = Arc::new(ManualClock::new(default_at));
            let ledger = Ledger::with_clock(&config, clock.clone())?;

            let reader = BufReader::new(
                File::open(&file).with_context(|| format!("opening {}", file.display()))?,
            );
            let report = replay(&ledger, &clock, reader, default_at)?;

            for line in &report.lines {
                match &line.result {
                    Ok(outcome) => println!("{}", serde_json::to_string(outcome)?),
                    Err(err) => {
                        let rejected = RejectedLine {
                            line: line.line,
                            command: line.command,
                            error: err.to_string(),
                        };
                        println!("{}", serde_json::to_string(&rejected)?);
                    }
                }
            }

            let summary = ledger.summary()?;
            let footer = ReplayFooter {
                applied: report.applied(),
                rejected: report.rejected(),
                summary: &summary,
            };
            println!("{}", serde_json::to_string_pretty(&footer)?);
        }
    }

    Ok(())
}
