// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parse source files and report the first error with its source span.

use std::fs;

use camino::Utf8PathBuf;
use lunes_core::source_analysis::parse;
use lunes_core::unparse::unparse;
use miette::{Context, IntoDiagnostic, NamedSource, Result};
use tracing::debug;

/// Parse each file; fail with a labeled diagnostic on the first error.
pub fn check(paths: &[String]) -> Result<()> {
    for path in paths {
        let path = Utf8PathBuf::from(path);
        let source = fs::read_to_string(&path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read '{path}'"))?;

        match parse(&source) {
            Ok(cst) => {
                // The round trip is cheap; verifying it here turns any
                // lossless-invariant regression into a user-visible error.
                if unparse(&cst) == source {
                    debug!(%path, "parsed cleanly");
                    println!("{path}: ok");
                } else {
                    miette::bail!("{path}: parse succeeded but re-emit differs from the source");
                }
            }
            Err(error) => {
                return Err(miette::Report::new(error)
                    .with_source_code(NamedSource::new(path.as_str(), source)));
            }
        }
    }
    Ok(())
}
