pub mod check;
pub mod completions;
pub mod init;
pub mod insert;
pub mod seed;
pub mod select;

use anyhow::{Context as _, Result};
use issuedoc_core::config::EffectiveConfig;
use issuedoc_core::store::SqliteStore;
use issuedoc_core::{Issue, IssueError};
use serde::Serialize;

/// Open the configured SQLite store, creating the table if needed.
pub fn open_store(config: &EffectiveConfig) -> Result<SqliteStore> {
    SqliteStore::open(&config.store_path, &config.project.store.table).with_context(|| {
        format!(
            "open document store {} (table {})",
            config.store_path.display(),
            config.project.store.table
        )
    })
}

/// Per-document result shared by `insert` and `check`.
#[derive(Debug, Serialize)]
pub struct DocumentOutcome {
    pub source: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<Issue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentOutcome {
    pub fn from_result(source: String, result: Result<Issue, IssueError>) -> Self {
        match result {
            Ok(issue) => Self {
                source,
                ok: true,
                issue: Some(issue),
                error_code: None,
                error: None,
            },
            Err(err) => Self {
                source,
                ok: false,
                issue: None,
                error_code: Some(err.code().code()),
                error: Some(err.to_string()),
            },
        }
    }
}

/// Text rows for a list of outcomes: `ok <source> <id> <kind>` or
/// `rejected <source> <code> <message>`.
pub fn outcome_rows(outcomes: &[DocumentOutcome], w: &mut dyn std::io::Write) -> std::io::Result<()> {
    for outcome in outcomes {
        match (&outcome.issue, outcome.error_code, &outcome.error) {
            (Some(issue), _, _) => {
                writeln!(w, "ok\t{}\t{}\t{}", outcome.source, issue.id(), issue.kind())?;
            }
            (None, code, message) => writeln!(
                w,
                "rejected\t{}\t{}\t{}",
                outcome.source,
                code.unwrap_or("-"),
                message.as_deref().unwrap_or("")
            )?,
        }
    }
    Ok(())
}

/// Pretty rendering for a list of outcomes under `heading`.
pub fn outcome_blocks(
    heading: &str,
    outcomes: &[DocumentOutcome],
    w: &mut dyn std::io::Write,
) -> std::io::Result<()> {
    crate::output::pretty_section(w, heading)?;
    for outcome in outcomes {
        match &outcome.issue {
            Some(issue) => writeln!(
                w,
                "  ok        {}  #{} ({})",
                outcome.source,
                issue.id(),
                issue.kind()
            )?,
            None => writeln!(
                w,
                "  rejected  {}  [{}] {}",
                outcome.source,
                outcome.error_code.unwrap_or("-"),
                outcome.error.as_deref().unwrap_or("")
            )?,
        }
    }
    let accepted = outcomes.iter().filter(|o| o.ok).count();
    writeln!(w)?;
    writeln!(w, "{accepted} accepted, {} rejected", outcomes.len() - accepted)
}
