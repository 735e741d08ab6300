//! `idoc seed`: store the six sample documents verbatim.

use crate::output::{OutputMode, render_mode};
use anyhow::{Context as _, Result};
use clap::Args;
use issuedoc_core::config::EffectiveConfig;
use issuedoc_core::flow::{SAMPLE_DOCUMENTS, seed_raw};
use serde::Serialize;

use super::open_store;

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Drop and recreate the table first.
    #[arg(long)]
    pub reset: bool,
}

#[derive(Debug, Serialize)]
struct SeedReport {
    written: usize,
    documents: usize,
}

/// Execute `idoc seed`.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or written.
pub fn run_seed(args: &SeedArgs, config: &EffectiveConfig, output: OutputMode) -> Result<()> {
    let mut store = open_store(config)?;
    if args.reset {
        store.reset().context("reset document table")?;
    }

    let written = seed_raw(&mut store, SAMPLE_DOCUMENTS).context("write sample documents")?;
    let report = SeedReport {
        written,
        documents: store.count().context("count documents")?,
    };

    render_mode(
        output,
        &report,
        |r, w| writeln!(w, "{}\t{}", r.written, r.documents),
        |r, w| writeln!(w, "Seeded {} documents ({} stored)", r.written, r.documents),
    )
}
