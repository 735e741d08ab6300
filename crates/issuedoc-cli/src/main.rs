#![forbid(unsafe_code)]

mod cmd;
mod input;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use issuedoc_core::config::{self, EffectiveConfig};
use output::{CliError, OutputMode, render_error};
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "issuedoc: validate, store and read back bug / feature-request documents",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Database path (overrides ISSUEDOC_DB and project config).
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Create project config and the document table",
        after_help = "EXAMPLES:\n    # Initialize in the current directory\n    idoc init\n\n    # Discard every stored document\n    idoc init --force"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        about = "Validate documents and store them",
        long_about = "Decode and validate each document, then store its canonical encoding. Unknown keys are dropped. Invalid documents are reported and not stored.",
        after_help = "EXAMPLES:\n    # Insert from a file\n    idoc insert bug.json\n\n    # Insert from stdin\n    echo '{\"id\":3,\"reporter_id\":33,\"priority\":3,\"status\":\"new\",\"sponsor_id\":333}' | idoc insert\n\n    # One document per line, validate only\n    idoc insert --lines --dry-run issues.jsonl"
    )]
    Insert(cmd::insert::InsertArgs),

    #[command(
        about = "Validate documents without storing them",
        after_help = "EXAMPLES:\n    idoc check bug.json --format json"
    )]
    Check(cmd::check::CheckArgs),

    #[command(
        about = "Store the six sample documents verbatim",
        long_about = "Store six sample documents without validation: two bugs, a feature request, a bug with an extra key, a bug missing version_affected, and a document with both variants."
    )]
    Seed(cmd::seed::SeedArgs),

    #[command(
        about = "Read all documents and keep one variant",
        long_about = "Scan every stored document. Valid documents of the requested variant are listed; everything else is reported and skipped.",
        after_help = "EXAMPLES:\n    # Bugs only (default)\n    idoc select\n\n    # Feature requests as JSON\n    idoc select --kind feature-request --json"
    )]
    Select(cmd::select::SelectArgs),

    #[command(about = "Generate shell completions")]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("ISSUEDOC_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "issuedoc=debug,info"
        } else {
            "issuedoc=info,warn"
        })
    });

    let format = env::var("ISSUEDOC_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_root = env::current_dir()?;
    let config = match config::resolve_config(&project_root, cli.db.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            let output = output::resolve_output_mode(cli.format, cli.json, None);
            render_error(
                output,
                &CliError::with_code(
                    format!("{err:#}"),
                    issuedoc_core::ErrorCode::ConfigParseError,
                ),
            )?;
            return Err(err);
        }
    };
    let output = output::resolve_output_mode(cli.format, cli.json, config.output);
    debug!(store = %config.store_path.display(), ?output, "resolved configuration");

    run_command(&cli.command, &config, output, &project_root)
}

fn run_command(
    command: &Commands,
    config: &EffectiveConfig,
    output: OutputMode,
    project_root: &std::path::Path,
) -> anyhow::Result<()> {
    let result = match command {
        Commands::Init(args) => cmd::init::run_init(args, config, output, project_root),
        Commands::Insert(args) => cmd::insert::run_insert(args, config, output),
        Commands::Check(args) => cmd::check::run_check(args, output),
        Commands::Seed(args) => cmd::seed::run_seed(args, config, output),
        Commands::Select(args) => cmd::select::run_select(args, config, output),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    };

    if output.is_json() {
        if let Err(err) = &result {
            render_error(output, &CliError::from_anyhow(err))?;
        }
    }
    result
}
