use crate::output::{OutputMode, pretty_kv, render_mode};
use anyhow::{Context as _, Result};
use clap::Args;
use issuedoc_core::config::{DEFAULT_CONFIG_TOML, EffectiveConfig, PROJECT_DIR};
use serde::Serialize;
use std::path::Path;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Drop and recreate the document table, discarding stored documents.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct InitReport {
    config: String,
    config_written: bool,
    store: String,
    table: String,
    reset: bool,
    documents: usize,
}

/// Execute `idoc init`. Creates `.issuedoc/config.toml` (unless present)
/// and the document table.
///
/// # Errors
///
/// Returns an error if the config cannot be written or the store cannot be
/// opened or reset.
pub fn run_init(
    args: &InitArgs,
    config: &EffectiveConfig,
    output: OutputMode,
    project_root: &Path,
) -> Result<()> {
    let project_dir = project_root.join(PROJECT_DIR);
    std::fs::create_dir_all(&project_dir)
        .with_context(|| format!("create {}", project_dir.display()))?;

    let config_path = project_dir.join("config.toml");
    let config_written = !config_path.exists();
    if config_written {
        std::fs::write(&config_path, DEFAULT_CONFIG_TOML)
            .with_context(|| format!("write {}", config_path.display()))?;
    }

    let store = super::open_store(config)?;
    if args.force {
        store.reset().context("reset document table")?;
    }

    let report = InitReport {
        config: config_path.display().to_string(),
        config_written,
        store: config.store_path.display().to_string(),
        table: store.table().to_string(),
        reset: args.force,
        documents: store.count().context("count documents")?,
    };

    render_mode(
        output,
        &report,
        |r, w| writeln!(w, "{}\t{}\t{}", r.store, r.table, r.documents),
        |r, w| {
            writeln!(w, "Initialized issuedoc project")?;
            pretty_kv(w, "config", &r.config)?;
            pretty_kv(w, "store", &r.store)?;
            pretty_kv(w, "table", &r.table)?;
            pretty_kv(w, "documents", r.documents.to_string())?;
            if r.reset {
                writeln!(w, "(table was reset)")?;
            }
            Ok(())
        },
    )
}
