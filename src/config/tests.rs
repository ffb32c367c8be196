//! Configuration tests
//!
//! The template produced by `to_toml` must always parse back into the same
//! effective configuration, so a freshly generated config file never changes
//! behavior.

use super::logging::LogRotation;
use super::*;
use std::collections::HashMap;

fn parse(toml_str: &str) -> FileConfig {
    toml::from_str(toml_str)
        .unwrap_or_else(|e| panic!("config should parse.\nTOML:\n{}\nError: {:?}", toml_str, e))
}

fn no_env(_: &str) -> Option<String> {
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let resolved = Config::resolve(parse(&config.to_toml()), no_env);

    assert_eq!(resolved.theme, config.theme);
    assert_eq!(resolved.mode, config.mode);
    assert_eq!(resolved.contributions_dir, config.contributions_dir);
    assert_eq!(resolved.workspace, None);
    assert_eq!(resolved.data, config.data);
    assert!(resolved.defaults.is_empty());
    assert_eq!(resolved.logging.file_rotation, LogRotation::Daily);
}

#[test]
fn test_config_roundtrip_customized() {
    let mut config = Config::default();
    config.theme = "nord".to_string();
    config.mode = Mode::Debug;
    config.workspace = Some(PathBuf::from("/tmp/ws \"quoted\".json"));
    config.data.latency_ms = 0;
    config
        .defaults
        .insert("kmeans_mds".to_string(), "Correlation matrix".to_string());
    config.logging.file_enabled = true;
    config.logging.file_rotation = LogRotation::Hourly;

    let resolved = Config::resolve(parse(&config.to_toml()), no_env);

    assert_eq!(resolved.theme, "nord");
    assert_eq!(resolved.mode, Mode::Debug);
    assert_eq!(resolved.workspace, config.workspace);
    assert_eq!(resolved.data.latency_ms, 0);
    assert_eq!(
        resolved.defaults.get("kmeans_mds").map(String::as_str),
        Some("Correlation matrix")
    );
    assert!(resolved.logging.file_enabled);
    assert_eq!(resolved.logging.file_rotation, LogRotation::Hourly);
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_env_overrides_file() {
    let file = parse(
        r#"
theme = "light"
mode = "production"
[data]
latency_ms = 500
"#,
    );
    let env: HashMap<&str, &str> = [
        ("VIZDECK_THEME", "solarized"),
        ("VIZDECK_MODE", "DEBUG"),
        ("VIZDECK_LATENCY_MS", "10"),
        ("VIZDECK_CONTRIB_DIR", "/opt/viz"),
    ]
    .into_iter()
    .collect();

    let resolved = Config::resolve(file, |k| env.get(k).map(|v| v.to_string()));

    assert_eq!(resolved.theme, "solarized");
    assert_eq!(resolved.mode, Mode::Debug);
    assert_eq!(resolved.data.latency_ms, 10);
    assert_eq!(resolved.contributions_dir, PathBuf::from("/opt/viz"));
}

#[test]
fn test_invalid_env_values_are_ignored() {
    let file = parse("mode = \"debug\"\n[data]\nlatency_ms = 42\n");
    let resolved = Config::resolve(file, |k| match k {
        "VIZDECK_MODE" => Some("verbose".to_string()),
        "VIZDECK_LATENCY_MS" => Some("soon".to_string()),
        _ => None,
    });
    assert_eq!(resolved.mode, Mode::Debug);
    assert_eq!(resolved.data.latency_ms, 42);
}

#[test]
fn test_empty_file_uses_defaults() {
    let resolved = Config::resolve(parse(""), no_env);
    assert_eq!(resolved.theme, "dark");
    assert_eq!(resolved.mode, Mode::Production);
    assert_eq!(resolved.data.latency_ms, DEFAULT_LATENCY_MS);
    assert_eq!(resolved.logging.level, "info");
}

#[test]
fn test_invalid_mode_is_a_parse_error() {
    let parsed: Result<FileConfig, _> = toml::from_str("mode = \"verbose\"");
    assert!(parsed.is_err());
}

#[test]
fn test_unknown_rotation_falls_back_to_daily() {
    assert_eq!(LogRotation::parse("weekly"), LogRotation::Daily);
    assert_eq!(LogRotation::parse("HOURLY"), LogRotation::Hourly);
    assert_eq!(LogRotation::parse("never"), LogRotation::Never);
}

#[test]
fn test_log_env_overrides() {
    let file = parse("[logging]\nlevel = \"warn\"\nfile_dir = \"/var/log/vizdeck\"\n");

    let resolved = Config::resolve(file, |k| match k {
        "VIZDECK_LOG_LEVEL" => Some("DEBUG".to_string()),
        "VIZDECK_LOG_DIR" => Some("/tmp/vizdeck-logs".to_string()),
        _ => None,
    });
    assert_eq!(resolved.logging.level, "debug");
    assert_eq!(resolved.logging.file_dir, PathBuf::from("/tmp/vizdeck-logs"));
    assert!(resolved.logging.file_enabled);
    assert_eq!(resolved.logging.directive(), "vizdeck=debug");
}

#[test]
fn test_unknown_log_level_falls_through() {
    let file = parse("[logging]\nlevel = \"warn\"\n");
    let resolved = Config::resolve(file, |k| {
        (k == "VIZDECK_LOG_LEVEL").then(|| "loud".to_string())
    });
    assert_eq!(resolved.logging.level, "warn");
    assert!(!resolved.logging.file_enabled);
}
