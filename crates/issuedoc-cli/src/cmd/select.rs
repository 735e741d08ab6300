//! `idoc select`: read every stored document and keep one variant.

use crate::output::{OutputMode, issue_block, issue_row, pretty_rule, pretty_section, render_mode};
use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use issuedoc_core::config::EffectiveConfig;
use issuedoc_core::flow::{BatchReport, collect_bugs, collect_feature_requests, collect_issues};
use issuedoc_core::model::Issue;
use serde::Serialize;

use super::open_store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindFilter {
    Bug,
    FeatureRequest,
    All,
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Which variant to keep.
    #[arg(long, value_enum, default_value_t = KindFilter::Bug)]
    pub kind: KindFilter,

    /// Leave documents of the other variant out of the rejection list.
    #[arg(long)]
    pub hide_other: bool,
}

#[derive(Debug, Serialize)]
struct SelectedRejection {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    code: &'static str,
    error: String,
}

#[derive(Debug, Serialize)]
struct SelectReport {
    total: usize,
    accepted: Vec<Issue>,
    rejected: Vec<SelectedRejection>,
}

impl SelectReport {
    fn from_batch<T: Into<Issue>>(batch: BatchReport<T>, hide_other: bool) -> Self {
        let total = batch.total();
        let rejected = batch
            .rejected
            .into_iter()
            .filter(|r| !(hide_other && r.error.is_wrong_variant()))
            .map(|r| SelectedRejection {
                index: r.index,
                id: r.id,
                code: r.error.code().code(),
                error: r.error.to_string(),
            })
            .collect();
        Self {
            total,
            accepted: batch.accepted.into_iter().map(Into::into).collect(),
            rejected,
        }
    }
}

/// Execute `idoc select`. Bad documents are reported and skipped; the
/// command still succeeds.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or scanned.
pub fn run_select(args: &SelectArgs, config: &EffectiveConfig, output: OutputMode) -> Result<()> {
    let store = open_store(config)?;

    let report = match args.kind {
        KindFilter::Bug => SelectReport::from_batch(
            collect_bugs(&store).context("scan document store")?,
            args.hide_other,
        ),
        KindFilter::FeatureRequest => SelectReport::from_batch(
            collect_feature_requests(&store).context("scan document store")?,
            args.hide_other,
        ),
        KindFilter::All => SelectReport::from_batch(
            collect_issues(&store).context("scan document store")?,
            args.hide_other,
        ),
    };

    render_mode(
        output,
        &report,
        |r, w| {
            for issue in &r.accepted {
                issue_row(w, issue)?;
            }
            for rejection in &r.rejected {
                writeln!(
                    w,
                    "!\t{}\t{}\t{}\t{}",
                    rejection.index,
                    rejection.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                    rejection.code,
                    rejection.error
                )?;
            }
            Ok(())
        },
        |r, w| {
            pretty_section(w, &format!("{} of {} documents selected", r.accepted.len(), r.total))?;
            for issue in &r.accepted {
                issue_block(w, issue)?;
                pretty_rule(w)?;
            }
            if !r.rejected.is_empty() {
                writeln!(w)?;
                pretty_section(w, "Skipped")?;
                for rejection in &r.rejected {
                    let id = rejection
                        .id
                        .map_or_else(|| "?".to_string(), |id| format!("#{id}"));
                    writeln!(
                        w,
                        "  [{}] row {} {}: {}",
                        rejection.code, rejection.index, id, rejection.error
                    )?;
                }
            }
            Ok(())
        },
    )
}
