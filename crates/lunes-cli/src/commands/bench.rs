// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Benchmark the parser against source files.
//!
//! Reads each file, times `parse` over several runs, and prints a table of
//! `name | size KB | time ms | speed KB/s | result`. The best run is
//! reported, which is the steadiest number for a single-threaded parser.

use std::fs;
use std::time::Instant;

use camino::Utf8PathBuf;
use lunes_core::source_analysis::parse;
use miette::{Context, IntoDiagnostic, Result};
use tracing::debug;

/// One row of the benchmark table.
struct Row {
    name: String,
    size_kb: f64,
    time_ms: f64,
    result: String,
}

/// Benchmark the parser against the given files.
pub fn bench(paths: &[String], runs: u32) -> Result<()> {
    let runs = runs.max(1);
    let mut rows = Vec::new();

    for path in paths {
        let path = Utf8PathBuf::from(path);
        let source = fs::read_to_string(&path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read '{path}'"))?;

        debug!(%path, bytes = source.len(), runs, "benchmarking");

        let mut best = f64::INFINITY;
        let mut result = String::from("ok");
        for _ in 0..runs {
            let started = Instant::now();
            let outcome = parse(&source);
            let elapsed = started.elapsed().as_secs_f64() * 1000.0;
            best = best.min(elapsed);
            if let Err(error) = outcome {
                result = format!("error: {error}");
            }
        }

        rows.push(Row {
            name: path
                .file_name()
                .map_or_else(|| path.to_string(), ToString::to_string),
            size_kb: source.len() as f64 / 1024.0,
            time_ms: best,
            result,
        });
    }

    print_table(&rows);
    Ok(())
}

/// Prints the benchmark table.
fn print_table(rows: &[Row]) {
    let name_width = rows
        .iter()
        .map(|row| row.name.len())
        .chain(std::iter::once("name".len()))
        .max()
        .unwrap_or(4);

    println!(
        "{:<name_width$} | {:>9} | {:>9} | {:>10} | result",
        "name", "size KB", "time ms", "speed KB/s",
    );
    println!("{:-<name_width$}-+-----------+-----------+------------+-------", "");
    for row in rows {
        let speed = if row.time_ms > 0.0 {
            row.size_kb / (row.time_ms / 1000.0)
        } else {
            f64::INFINITY
        };
        println!(
            "{:<name_width$} | {:>9.2} | {:>9.3} | {:>10.0} | {}",
            row.name, row.size_kb, row.time_ms, speed, row.result,
        );
    }
}
