// SPDX-FileCopyrightText: 2026 Praxis contributors
//
// SPDX-License-Identifier: Apache-2.0

//! The `praxis` command-line interface: expand a draft series, check a
//! proposed occurrence against a schedule snapshot, canonicalize rule
//! strings.

mod cmd_check;
mod cmd_expand;
mod cmd_rule;
mod config;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cmd_check::CmdCheck;
use crate::cmd_expand::CmdExpand;
use crate::cmd_rule::CmdRule;
use crate::config::parse_config;

#[derive(Parser)]
#[command(name = "praxis", version)]
#[command(about = "Recurring-event expansion and scheduling checks", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// IANA timezone, overriding the configured one
    #[arg(short, long, global = true)]
    timezone: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Expand a draft series into its occurrences
    Expand(CmdExpand),

    /// Parse a recurrence rule and print its canonical form
    Rule(CmdRule),

    /// Check a proposed occurrence against a schedule snapshot
    Check(CmdCheck),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = parse_config(cli.config, cli.timezone)?;

    match cli.command {
        Commands::Expand(cmd) => cmd.run(&config),
        Commands::Rule(cmd) => cmd.run(),
        Commands::Check(cmd) => cmd.run(&config),
    }
}
