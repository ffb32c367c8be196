// Startup module - assembles the renderer catalog and reports it
//
// This module provides:
// - Registry assembly: built-in renderers plus contributed definitions
// - The selection policy, with config overrides layered on the built-in table
// - Catalog printing for the `renderers` command
// - The boot sequence written to the Logs modal

use crate::config::{Config, VERSION};
use crate::renderers::builtin_registry;
use crate::viz::contrib;
use crate::viz::{ModeFlag, NavigationController, Registry, SelectionPolicy};
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use std::fmt::Write as _;

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// Built-ins plus every definition found under the contributions directory
///
/// Any contribution error aborts startup: the catalog must be consistent.
pub fn build_registry(config: &Config) -> Result<Registry> {
    let dir = &config.contributions_dir;
    let contributions = contrib::discover(dir)
        .with_context(|| format!("Failed to load renderer contributions from {}", dir.display()))?;
    let count = contributions.len();

    let registry = builtin_registry(contributions).context("Invalid renderer catalog")?;
    tracing::debug!(
        renderers = ?registry.names(),
        contributed = count,
        dir = %dir.display(),
        "renderer registry frozen"
    );
    Ok(registry)
}

pub fn selection_policy(config: &Config, mode: ModeFlag) -> SelectionPolicy {
    SelectionPolicy::new(mode).with_overrides(config.defaults.clone())
}

/// Human-readable catalog, as printed by `vizdeck renderers`
///
/// With `result_type`, only the renderers offered for that type are listed,
/// in selection order, and the default one is starred.
pub fn format_catalog(
    registry: &Registry,
    policy: &SelectionPolicy,
    result_type: Option<&str>,
) -> String {
    use colors::*;

    let mut out = String::new();
    let mode = policy.mode().get();

    match result_type {
        Some(ty) => {
            let _ = writeln!(out, "  {BOLD}Renderers for \"{ty}\"{RESET} {DIM}({mode} mode){RESET}");
            let default = policy.default_renderer_for(registry, ty).map(|d| d.name.as_str());
            let available = policy.available(registry, ty);
            if available.is_empty() {
                let _ = writeln!(out, "    {DIM}(none){RESET}");
            }
            for d in available {
                let marker = if Some(d.name.as_str()) == default {
                    format!("{YELLOW}★{RESET}")
                } else {
                    " ".to_string()
                };
                let _ = writeln!(out, "    {marker} {BOLD}{:<22}{RESET} {DIM}{}{RESET}", d.name, d.description);
            }
            if let Some(name) = policy.override_for(ty) {
                if registry.lookup_by_name(name).is_none() {
                    let _ = writeln!(
                        out,
                        "    {DIM}override \"{name}\" is not registered, first match used{RESET}"
                    );
                }
            }
        }
        None => {
            let _ = writeln!(out, "  {BOLD}Renderer catalog{RESET} {DIM}({} registered){RESET}", registry.len());
            if registry.is_empty() {
                let _ = writeln!(out, "    {DIM}(none){RESET}");
            }
            for d in registry.iter() {
                let types = if d.is_fallback() {
                    format!("{DIM}any type (fallback){RESET}")
                } else {
                    d.accepted_types.join(", ")
                };
                let badge = if d.debug_only {
                    format!(" {MAGENTA}[debug]{RESET}")
                } else {
                    String::new()
                };
                let _ = writeln!(out);
                let _ = writeln!(out, "    {CYAN}{BOLD}{}{RESET}{badge}", d.name);
                if !d.description.is_empty() {
                    let _ = writeln!(out, "      {}", d.description);
                }
                let _ = writeln!(out, "      {DIM}types:{RESET}   {types}");
                if !d.required_context.is_empty() {
                    let ctx: Vec<_> = d.required_context.iter().map(|k| k.as_str()).collect();
                    let _ = writeln!(out, "      {DIM}context:{RESET} {}", ctx.join(", "));
                }
                for (gesture, effect) in &d.gesture_map {
                    let _ = writeln!(out, "      {GREEN}{gesture:<8}{RESET} {effect}");
                }
            }
        }
    }
    out
}

/// Boot sequence shown in the Logs modal
pub fn log_startup(config: &Config, controller: &NavigationController, workspace: &Workspace) {
    tracing::info!("═══════════════════════════════════");
    tracing::info!("  📊 VIZDECK v{}", VERSION);
    tracing::info!("═══════════════════════════════════");

    let registry = controller.registry();
    let contributed = registry
        .len()
        .saturating_sub(crate::renderers::builtin_descriptors().len());
    tracing::info!("  ✓ {} renderers ({} contributed)", registry.len(), contributed);
    tracing::info!("  ✓ contributions from {}", config.contributions_dir.display());
    tracing::info!("  ✓ mode: {}", controller.policy().mode().get());
    tracing::info!("  ✓ data latency: {} ms", config.data.latency_ms);
    tracing::info!(
        "▸ Workspace \"{}\": {} results",
        workspace.title(),
        workspace.results.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::Mode;
    use std::path::PathBuf;

    fn config_with(dir: PathBuf) -> Config {
        Config {
            contributions_dir: dir,
            ..Config::default()
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("vizdeck-startup-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_contributions_dir_yields_builtins() {
        let config = config_with(PathBuf::from("/nonexistent/vizdeck/contrib"));
        let registry = build_registry(&config).unwrap();
        assert_eq!(registry.len(), crate::renderers::builtin_descriptors().len());
    }

    #[test]
    fn contributions_are_merged() {
        let dir = scratch_dir("merge");
        std::fs::write(
            dir.join("viztool_def.json"),
            r#"{"name": "Correlation matrix", "types": ["correlation_dataset"], "classRef": "Table"}"#,
        )
        .unwrap();

        let registry = build_registry(&config_with(dir.clone())).unwrap();
        assert!(registry.lookup_by_name("Correlation matrix").is_some());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn clashing_contribution_aborts() {
        let dir = scratch_dir("clash");
        std::fs::write(
            dir.join("viztool_def.json"),
            r#"{"name": "Table", "types": ["table"], "classRef": "Table"}"#,
        )
        .unwrap();

        let err = build_registry(&config_with(dir.clone())).unwrap_err();
        assert!(format!("{err:#}").contains("registered twice"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn config_defaults_override_builtin_table() {
        let mut config = Config::default();
        config
            .defaults
            .insert("kmeans_mds".to_string(), "Text".to_string());
        let registry = builtin_registry(Vec::new()).unwrap();
        let policy = selection_policy(&config, ModeFlag::new(Mode::Production));
        // Text does not accept kmeans_mds, but an override naming a registered
        // renderer wins regardless
        assert_eq!(
            policy
                .default_renderer_for(&registry, "kmeans_mds")
                .map(|d| d.name.as_str()),
            Some("Text")
        );
    }

    #[test]
    fn catalog_for_a_type_stars_the_default() {
        let registry = builtin_registry(Vec::new()).unwrap();
        let policy = SelectionPolicy::new(ModeFlag::new(Mode::Debug));
        let out = format_catalog(&registry, &policy, Some("ts_list"));

        let starred: Vec<_> = out.lines().filter(|l| l.contains('★')).collect();
        assert_eq!(starred.len(), 1);
        assert!(starred[0].contains("TsTable"));
        assert!(out.contains("Inspector"));
    }

    #[test]
    fn full_catalog_lists_gestures() {
        let registry = builtin_registry(Vec::new()).unwrap();
        let policy = SelectionPolicy::new(ModeFlag::default());
        let out = format_catalog(&registry, &policy, None);
        assert!(out.contains("any type (fallback)"));
        assert!(out.contains("[debug]"));
        assert!(out.contains("Enter"));
    }
}
