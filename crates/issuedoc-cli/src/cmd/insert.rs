//! `idoc insert`: validate documents and store their canonical form.

use crate::input::read_documents;
use crate::output::{OutputMode, render_mode};
use anyhow::Result;
use clap::Args;
use issuedoc_core::config::EffectiveConfig;
use issuedoc_core::flow::ingest;
use issuedoc_core::parse_issue;
use std::path::PathBuf;

use super::{DocumentOutcome, check::finish, open_store, outcome_blocks, outcome_rows};

#[derive(Args, Debug)]
pub struct InsertArgs {
    /// Document files; reads stdin when omitted or `-`.
    pub files: Vec<PathBuf>,

    /// Treat every non-blank line as a separate document.
    #[arg(long)]
    pub lines: bool,

    /// Validate only; do not write to the store.
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute `idoc insert`. Each document is handled independently; invalid
/// ones are reported and never written.
///
/// # Errors
///
/// Returns an error if input or the store cannot be opened, or if any
/// document was rejected.
pub fn run_insert(args: &InsertArgs, config: &EffectiveConfig, output: OutputMode) -> Result<()> {
    let docs = read_documents(&args.files, args.lines)?;

    let outcomes: Vec<DocumentOutcome> = if args.dry_run {
        docs.into_iter()
            .map(|doc| DocumentOutcome::from_result(doc.source, parse_issue(&doc.bytes)))
            .collect()
    } else {
        let mut store = open_store(config)?;
        docs.into_iter()
            .map(|doc| DocumentOutcome::from_result(doc.source, ingest(&mut store, &doc.bytes)))
            .collect()
    };

    let heading = if args.dry_run { "Insert (dry run)" } else { "Insert" };
    render_mode(output, &outcomes, |o, w| outcome_rows(o, w), |o, w| {
        outcome_blocks(heading, o, w)
    })?;

    finish(&outcomes)
}
