//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

/// TOML string literal with escaping
fn quote(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}

impl Config {
    /// Serialize the [defaults] table
    pub(super) fn defaults_to_toml(&self) -> String {
        if self.defaults.is_empty() {
            // Show example comments when no overrides are configured
            return r#"# "kmeans_mds" = "Raw"
# "correlation_dataset" = "Correlation matrix"
"#
            .to_string();
        }

        // BTreeMap keeps the output deterministic
        self.defaults
            .iter()
            .map(|(ty, renderer)| format!("{} = {}\n", quote(ty), quote(renderer)))
            .collect()
    }

    /// Render the whole configuration as a commented TOML file
    pub fn to_toml(&self) -> String {
        let workspace = match &self.workspace {
            Some(path) => format!("workspace = {}", quote(&path.display().to_string())),
            None => "# workspace = \"./workspace.json\"".to_string(),
        };

        format!(
            r#"# vizdeck configuration

# Theme: dark, light, nord, solarized
theme = {theme}

# Renderer visibility: production hides debug-only renderers, debug shows them
mode = "{mode}"

# Directory scanned (recursively) for viztool_def*.json renderer definitions
contributions_dir = {contrib}

# Workspace opened when none is given on the command line
{workspace}

# Data access
[data]
# Simulated latency of the demo data source, in milliseconds
latency_ms = {latency}

# Default renderer per result type (layered over the built-in table)
[defaults]
{defaults}
# Logging (RUST_LOG overrides the level filter entirely)
[logging]
level = {log_level}  # trace, debug, info, warn, error; env VIZDECK_LOG_LEVEL
# JSON log files, in addition to the Logs modal or stderr.
# Setting VIZDECK_LOG_DIR enables them.
file_enabled = {log_file_enabled}
file_dir = {log_file_dir}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = {log_file_prefix}
"#,
            theme = quote(&self.theme),
            mode = self.mode,
            contrib = quote(&self.contributions_dir.display().to_string()),
            workspace = workspace,
            latency = self.data.latency_ms,
            defaults = self.defaults_to_toml(),
            log_level = quote(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = quote(&self.logging.file_dir.display().to_string()),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = quote(&self.logging.file_prefix),
        )
    }
}
