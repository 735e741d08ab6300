//! `idoc check`: decode and validate documents without storing them.

use crate::input::read_documents;
use crate::output::{OutputMode, render_mode};
use anyhow::Result;
use clap::Args;
use issuedoc_core::parse_issue;
use std::path::PathBuf;

use super::{DocumentOutcome, outcome_blocks, outcome_rows};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Document files; reads stdin when omitted or `-`.
    pub files: Vec<PathBuf>,

    /// Treat every non-blank line as a separate document.
    #[arg(long)]
    pub lines: bool,
}

/// Execute `idoc check`.
///
/// # Errors
///
/// Returns an error if input cannot be read, or if any document is invalid.
pub fn run_check(args: &CheckArgs, output: OutputMode) -> Result<()> {
    let outcomes: Vec<DocumentOutcome> = read_documents(&args.files, args.lines)?
        .into_iter()
        .map(|doc| DocumentOutcome::from_result(doc.source, parse_issue(&doc.bytes)))
        .collect();

    render_mode(output, &outcomes, |o, w| outcome_rows(o, w), |o, w| {
        outcome_blocks("Check", o, w)
    })?;

    finish(&outcomes)
}

/// Fail the command if any outcome was rejected.
pub(crate) fn finish(outcomes: &[DocumentOutcome]) -> Result<()> {
    let rejected = outcomes.iter().filter(|o| !o.ok).count();
    if rejected > 0 {
        anyhow::bail!("{rejected} of {} documents rejected", outcomes.len());
    }
    Ok(())
}
