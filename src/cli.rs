// CLI module - command-line argument parsing and handlers
//
// Without a subcommand the TUI opens a workspace. Subcommands:
// - renderers [--type T] [--debug]: print the catalog or the selection for a type
// - config --show: Display effective configuration
// - config --reset: Regenerate config file with defaults
// - config --path: Show config file path

use crate::config::{Config, VERSION};
use crate::startup;
use crate::viz::{Mode, ModeFlag};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// vizdeck - explore operator results through pluggable visualizations
#[derive(Parser, Debug)]
#[command(name = "vizdeck")]
#[command(version = VERSION)]
#[command(about = "Terminal deck of pluggable result visualizations", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Workspace file (JSON) to open
    pub workspace: Option<PathBuf>,

    /// Start in debug mode (offers debug-only renderers)
    #[arg(long)]
    pub debug: bool,

    /// Open the built-in demo workspace
    #[arg(long)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered renderers
    Renderers {
        /// Only show renderers offered for this result type
        #[arg(long = "type", value_name = "TYPE")]
        result_type: Option<String>,

        /// Include debug-only renderers
        #[arg(long)]
        debug: bool,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if self.debug {
            config.mode = Mode::Debug;
        }
        if let Some(path) = &self.workspace {
            config.workspace = Some(path.clone());
        }
    }
}

/// Run a subcommand to completion
pub fn handle_command(command: &Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Renderers { result_type, debug } => {
            handle_renderers(config, result_type.as_deref(), *debug)
        }
        Commands::Config { show, reset, path } => {
            if *path {
                handle_config_path()
            } else if *show {
                handle_config_show(config);
                Ok(())
            } else if *reset {
                handle_config_reset()
            } else {
                println!("Usage: vizdeck config [--show|--reset|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --path    Show config file path");
                Ok(())
            }
        }
    }
}

fn handle_renderers(config: &Config, result_type: Option<&str>, debug: bool) -> Result<()> {
    let registry = startup::build_registry(config)?;
    let mode = if debug { Mode::Debug } else { config.mode };
    let policy = startup::selection_policy(config, ModeFlag::new(mode));

    println!();
    print!("{}", startup::format_catalog(&registry, &policy, result_type));
    println!();
    Ok(())
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show(config: &Config) {
    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read confirmation")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}
