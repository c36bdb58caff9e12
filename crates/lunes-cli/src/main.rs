// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Luau parser command-line interface.
//!
//! This is the main entry point for the `lunes` command.

use clap::{Parser, Subcommand};
use miette::Result;

mod commands;

/// Lunes: a lossless Luau parser
#[derive(Debug, Parser)]
#[command(name = "lunes")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Benchmark the parser against source files
    Bench {
        /// Source files to parse
        #[arg(required = true)]
        paths: Vec<String>,

        /// Number of timed runs per file (the best is reported)
        #[arg(long, default_value_t = 5)]
        runs: u32,
    },

    /// Parse source files and report the first error, if any
    Check {
        /// Source files to check
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber only if RUST_LOG is explicitly set,
    // to keep stdout clean for the bench table.
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .try_init();
    }

    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    match cli.command {
        Command::Bench { paths, runs } => commands::bench::bench(&paths, runs),
        Command::Check { paths } => commands::check::check(&paths),
    }
}
