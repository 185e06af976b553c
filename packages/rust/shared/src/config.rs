//! Application configuration for GuideConverter.
//!
//! User config lives at `~/.guideconverter/guideconverter.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GuideConverterError, Result};
use crate::types::GuideSource;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "guideconverter.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".guideconverter";

// ---------------------------------------------------------------------------
// Config structs (matching guideconverter.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where guides and shared fragments are fetched from.
    #[serde(default)]
    pub source: SourceConfig,

    /// HTTP fetch behaviour.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Substitution table files.
    #[serde(default)]
    pub replacements: ReplacementsConfig,

    /// Output location.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[source]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Host serving raw repository files.
    #[serde(default = "default_raw_host")]
    pub raw_host: String,

    /// Organization owning the guide repositories.
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Base URL of the shared guides-common fragments.
    #[serde(default = "default_common_url")]
    pub common_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            raw_host: default_raw_host(),
            owner: default_owner(),
            common_url: default_common_url(),
        }
    }
}

fn default_raw_host() -> String {
    "raw.githubusercontent.com".into()
}
fn default_owner() -> String {
    "openliberty".into()
}
fn default_common_url() -> String {
    "https://raw.githubusercontent.com/OpenLiberty/guides-common/dev".into()
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts after a network failure or 5xx response.
    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_retries() -> u32 {
    1
}

/// `[replacements]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacementsConfig {
    /// Loop substitution table (regex patterns applied to every main line).
    #[serde(default = "default_loop_file")]
    pub loop_file: String,

    /// Heading-marker substitution table.
    #[serde(default = "default_heading_file")]
    pub heading_file: String,
}

impl Default for ReplacementsConfig {
    fn default() -> Self {
        Self {
            loop_file: default_loop_file(),
            heading_file: default_heading_file(),
        }
    }
}

fn default_loop_file() -> String {
    "config/loop-replacements.toml".into()
}
fn default_heading_file() -> String {
    "config/heading-replacements.toml".into()
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the `<guide>.md` file is written to.
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    ".".into()
}

// ---------------------------------------------------------------------------
// Convert config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime conversion configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Remote locations for this run.
    pub source: GuideSource,
    /// Output directory.
    pub output_dir: PathBuf,
    /// Loop substitution table file.
    pub loop_file: PathBuf,
    /// Heading substitution table file.
    pub heading_file: PathBuf,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Extra fetch attempts.
    pub retries: u32,
}

impl From<&AppConfig> for ConvertConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            source: GuideSource::new(
                &config.source.raw_host,
                &config.source.owner,
                &config.source.common_url,
            ),
            output_dir: PathBuf::from(&config.output.dir),
            loop_file: PathBuf::from(&config.replacements.loop_file),
            heading_file: PathBuf::from(&config.replacements.heading_file),
            timeout_secs: config.fetch.timeout_secs,
            retries: config.fetch.retries,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.guideconverter/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| GuideConverterError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.guideconverter/guideconverter.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| GuideConverterError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        GuideConverterError::config(format!("failed to parse {}: {e}", path.display()))
    })
}
