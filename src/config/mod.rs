//! Configuration for the visualization deck
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/vizdeck/config.toml)
//! 3. Built-in defaults (lowest priority)

use crate::viz::Mode;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod logging;
mod serialization;

#[cfg(test)]
mod tests;

pub use logging::{FileLogging, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulated latency of the demo data source
const DEFAULT_LATENCY_MS: u64 = 250;

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Theme name: "dark", "light", "nord", "solarized"
    pub theme: String,

    /// Renderer visibility: debug mode also offers debug-only renderers
    pub mode: Mode,

    /// Directory scanned for contributed renderer definitions
    pub contributions_dir: PathBuf,

    /// Workspace opened when none is given on the command line
    pub workspace: Option<PathBuf>,

    /// Data access settings
    pub data: DataConfig,

    /// Result type → renderer name, layered over the built-in overrides
    pub defaults: BTreeMap<String, String>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            mode: Mode::Production,
            contributions_dir: PathBuf::from("./contrib"),
            workspace: None,
            data: DataConfig::default(),
            defaults: BTreeMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

/// `[data]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    /// Delay applied to every series/metadata read, in milliseconds
    pub latency_ms: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            latency_ms: DEFAULT_LATENCY_MS,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileData {
    pub latency_ms: Option<u64>,
}

impl DataConfig {
    fn from_file(file: Option<FileData>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            latency_ms: file.latency_ms.unwrap_or(DEFAULT_LATENCY_MS),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub theme: Option<String>,
    pub mode: Option<Mode>,
    pub contributions_dir: Option<String>,
    pub workspace: Option<String>,

    /// Optional [data] section
    pub data: Option<FileData>,

    /// Optional [defaults] table
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/vizdeck/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("vizdeck").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };
        if path.exists() {
            return;
        }
        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // config is optional
            }
        }
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// A config file that exists but does not parse is fatal: the process
    /// exits with a message pointing at the file.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  Tip: `mode` must be \"production\" or \"debug\", and");
                    eprintln!("  [defaults] maps result types to renderer names.\n");
                    eprintln!("  To reset, run `vizdeck config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Self {
        Self::resolve(Self::load_file_config(), |key| std::env::var(key).ok())
    }

    /// Layer `env` over `file` over the defaults
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let theme = env("VIZDECK_THEME")
            .or(file.theme)
            .unwrap_or(defaults.theme);

        // An unparseable env value is ignored rather than fatal
        let mode = env("VIZDECK_MODE")
            .and_then(|v| serde_json::from_value(serde_json::Value::String(v.to_lowercase())).ok())
            .or(file.mode)
            .unwrap_or(defaults.mode);

        let contributions_dir = env("VIZDECK_CONTRIB_DIR")
            .or(file.contributions_dir)
            .map(PathBuf::from)
            .unwrap_or(defaults.contributions_dir);

        let workspace = env("VIZDECK_WORKSPACE")
            .or(file.workspace)
            .map(PathBuf::from);

        let mut data = DataConfig::from_file(file.data);
        if let Some(latency) = env("VIZDECK_LATENCY_MS").and_then(|v| v.parse().ok()) {
            data.latency_ms = latency;
        }

        Self {
            theme,
            mode,
            contributions_dir,
            workspace,
            data,
            defaults: file.defaults,
            logging: LoggingConfig::resolve(file.logging, &env),
        }
    }
}
