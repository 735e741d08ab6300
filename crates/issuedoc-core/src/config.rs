use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::store::sqlite::DEFAULT_TABLE;

/// Project directory holding config and the default database.
pub const PROJECT_DIR: &str = ".issuedoc";

/// Environment variable overriding the database path.
pub const DB_ENV: &str = "ISSUEDOC_DB";

/// Template written by `idoc init`.
pub const DEFAULT_CONFIG_TOML: &str = "[store]\n\
    path = \".issuedoc/issues.sqlite3\"\n\
    table = \"issue\"\n";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            table: default_table(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

/// Config after merging project file, user file, environment and flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    /// Absolute (or project-relative resolved) database path.
    pub store_path: PathBuf,
    /// Preferred output mode from config files, normalized.
    pub output: Option<&'static str>,
}

/// Load `.issuedoc/config.toml` under `project_root`, or defaults if absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(PROJECT_DIR).join("config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the user-level config from the platform config dir, or defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("issuedoc/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve the effective config for a command run in `project_root`.
///
/// # Errors
///
/// Returns an error if either config file is unreadable or malformed.
pub fn resolve_config(project_root: &Path, cli_db: Option<&Path>) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;

    let env_db = env::var_os(DB_ENV).map(PathBuf::from);
    let store_path = resolve_store_path(project_root, cli_db, env_db, &project.store.path);
    let output = resolve_output_preference(&project, &user);

    Ok(EffectiveConfig {
        project,
        user,
        store_path,
        output,
    })
}

/// Flag, then environment, then project config. Relative paths are taken
/// from `project_root`.
fn resolve_store_path(
    project_root: &Path,
    cli_db: Option<&Path>,
    env_db: Option<PathBuf>,
    configured: &Path,
) -> PathBuf {
    let chosen = cli_db
        .map(Path::to_path_buf)
        .or(env_db)
        .unwrap_or_else(|| configured.to_path_buf());

    if chosen.is_absolute() {
        chosen
    } else {
        project_root.join(chosen)
    }
}

fn resolve_output_preference(project: &ProjectConfig, user: &UserConfig) -> Option<&'static str> {
    project
        .output
        .format
        .as_deref()
        .and_then(normalize_output_mode)
        .or_else(|| user.output.as_deref().and_then(normalize_output_mode))
}

/// Map a configured output name onto `pretty`, `text` or `json`.
#[must_use]
pub fn normalize_output_mode(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "human" => Some("pretty"),
        "text" | "table" => Some("text"),
        "json" => Some("json"),
        _ => None,
    }
}

fn default_store_path() -> PathBuf {
    Path::new(PROJECT_DIR).join("issues.sqlite3")
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}
