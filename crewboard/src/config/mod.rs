//! Configuration system for the `Crewboard` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/crewboard/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    auth: AuthFileConfig,
    store: StoreFileConfig,
    ui: UiFileConfig,
}

/// `[auth]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct AuthFileConfig {
    team: Option<String>,
    member: Option<String>,
}

/// `[store]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StoreFileConfig {
    data_dir: Option<PathBuf>,
    search_limit: Option<usize>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
    search_debounce_ms: Option<u64>,
    timestamp_format: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -- Auth --
    /// Team to log into. `None` runs the seeded demo team.
    pub team: Option<String>,
    /// Member to select after login (overrides the auto-selected one).
    pub member: Option<String>,
    /// Team password (CLI/env only — never read from the config file).
    pub password: Option<String>,
    /// Register the team instead of logging in.
    pub register: bool,

    // -- Store --
    /// Data directory for the store snapshot and session cache.
    pub data_dir: Option<PathBuf>,
    /// Maximum number of search results per query.
    pub search_limit: usize,

    // -- UI --
    /// Poll timeout for the TUI event loop.
    pub poll_timeout: Duration,
    /// Keyboard-silence window before a live search is dispatched.
    pub search_debounce: Duration,
    /// Timestamp display format string (chrono).
    pub timestamp_format: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            team: None,
            member: None,
            password: None,
            register: false,
            data_dir: None,
            search_limit: 50,
            poll_timeout: Duration::from_millis(50),
            search_debounce: Duration::from_millis(150),
            timestamp_format: "%b %e".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// CLI args and env vars are parsed via `clap`. If `--config` is given
    /// and the file does not exist, returns an error. If no `--config` is
    /// given, the default path (`~/.config/crewboard/config.toml`) is tried
    /// and silently ignored if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve a `ClientConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default. This is separated from `load()` to
    /// enable unit testing without CLI parsing.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            team: cli.team.clone().or_else(|| file.auth.team.clone()),
            member: cli.member.clone().or_else(|| file.auth.member.clone()),
            password: cli.password.clone(),
            register: cli.register,
            data_dir: cli
                .data_dir
                .clone()
                .or_else(|| file.store.data_dir.clone()),
            search_limit: file.store.search_limit.unwrap_or(defaults.search_limit),
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            search_debounce: file
                .ui
                .search_debounce_ms
                .map_or(defaults.search_debounce, Duration::from_millis),
            timestamp_format: cli
                .timestamp_format
                .clone()
                .or_else(|| file.ui.timestamp_format.clone())
                .unwrap_or(defaults.timestamp_format),
        }
    }

    /// Directory holding the store snapshot and session cache.
    ///
    /// Falls back to the platform data dir (`~/.local/share/crewboard`).
    /// `None` means no usable directory exists — run without persistence.
    #[must_use]
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_local_dir().map(|d| d.join("crewboard")))
    }

    /// Path of the store snapshot file, if persistence is available.
    #[must_use]
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.resolved_data_dir().map(|d| d.join("store.json"))
    }

    /// Path of the session cache file, if persistence is available.
    #[must_use]
    pub fn session_cache_path(&self) -> Option<PathBuf> {
        self.resolved_data_dir().map(|d| d.join("session.json"))
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Terminal-native team task board")]
pub struct CliArgs {
    /// Team name to log into.
    #[arg(long, env = "CREWBOARD_TEAM")]
    pub team: Option<String>,

    /// Team password.
    #[arg(long, env = "CREWBOARD_PASSWORD")]
    pub password: Option<String>,

    /// Member to select after login.
    #[arg(long, env = "CREWBOARD_MEMBER")]
    pub member: Option<String>,

    /// Register a new team instead of logging in.
    #[arg(long)]
    pub register: bool,

    /// Path to config file (default: `~/.config/crewboard/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Data directory for the store snapshot and session cache.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Timestamp display format (chrono format string).
    #[arg(long)]
    pub timestamp_format: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "CREWBOARD_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/crewboard.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            // No config dir available — use defaults.
            return Ok(ConfigFile::default());
        };
        config_dir.join("crewboard").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
