//! `[logging]` section: filter level and the optional JSON file sink

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::RollingFileAppender;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// How often the JSON log file starts over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    /// One file for the lifetime of the logs directory
    Never,
}

impl LogRotation {
    /// Case-insensitive; anything unrecognised rotates daily
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "never" => Self::Never,
            _ => Self::Daily,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }

    /// Rolling appender writing `<prefix>.<period>` files into `dir`
    pub fn appender(self, dir: &Path, prefix: &str) -> RollingFileAppender {
        match self {
            Self::Hourly => tracing_appender::rolling::hourly(dir, prefix),
            Self::Daily => tracing_appender::rolling::daily(dir, prefix),
            Self::Never => tracing_appender::rolling::never(dir, prefix),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter for the `vizdeck` target; `RUST_LOG` still wins over it
    pub level: String,
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_rotation: LogRotation::Daily,
            file_prefix: "vizdeck".to_string(),
        }
    }
}

/// `[logging]` as written in config.toml
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    /// Layer `VIZDECK_LOG_LEVEL` / `VIZDECK_LOG_DIR` over the file section
    ///
    /// An unknown level is dropped with a warning on stderr (the subscriber
    /// does not exist yet) and the next layer down is used.
    pub fn resolve(file: Option<FileLogging>, env: impl Fn(&str) -> Option<String>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let level = [env("VIZDECK_LOG_LEVEL"), file.level]
            .into_iter()
            .flatten()
            .map(|l| l.trim().to_ascii_lowercase())
            .find(|l| {
                let known = LEVELS.contains(&l.as_str());
                if !known {
                    eprintln!("Warning: ignoring unknown log level {l:?}");
                }
                known
            })
            .unwrap_or(defaults.level);

        // Pointing the logs somewhere implies wanting them
        let env_dir = env("VIZDECK_LOG_DIR").map(PathBuf::from);
        let file_enabled = env_dir.is_some() || file.file_enabled.unwrap_or(defaults.file_enabled);
        let file_dir = env_dir
            .or(file.file_dir.map(PathBuf::from))
            .unwrap_or(defaults.file_dir);

        Self {
            level,
            file_enabled,
            file_dir,
            file_rotation: file
                .file_rotation
                .map(|s| LogRotation::parse(&s))
                .unwrap_or(defaults.file_rotation),
            file_prefix: file.file_prefix.unwrap_or(defaults.file_prefix),
        }
    }

    /// Default directive for the env filter
    pub fn directive(&self) -> String {
        format!("vizdeck={}", self.level)
    }
}
