// vizdeck - Terminal deck of pluggable result visualizations
//
// Opens an operator workspace and lets the user browse its results through
// renderers picked from a frozen catalog of built-in and contributed plugins.
//
// Architecture:
// - Viz engine: registry, selection policy and the navigation controller
// - Renderers: built-in visualizations mounted on a shared surface
// - Data: asynchronous time-series source with simulated latency
// - TUI (ratatui): results list, mount surface, history breadcrumb
// - Host events: mpsc channel from renderer capabilities to the TUI loop

mod cli;
mod config;
mod data;
mod demo;
mod logging;
mod renderers;
mod startup;
mod tui;
mod viz;
mod workspace;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::Config;
use logging::LogBuffer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tui::theme::ThemeKind;
use viz::{EngineServices, ModeFlag, MountSurface, NavigationController};
use workspace::Workspace;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Precedence: CLI flags > env vars > config file > defaults
    let mut config = Config::from_env();
    cli.apply(&mut config);

    // Subcommands print to the terminal, so logs go to stderr
    if let Some(command) = &cli.command {
        let _file_guard = logging::init(&config.logging, None);
        return cli::handle_command(command, &config);
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    // In TUI mode logs are captured to the buffer shown by the Logs modal.
    // The guard must stay alive so the file writer flushes on exit.
    let log_buffer = LogBuffer::new();
    let _file_guard = logging::init(&config.logging, Some(log_buffer.clone()));

    let workspace = load_workspace(&cli, &config)?;

    let registry = startup::build_registry(&config)?.shared();
    let policy = startup::selection_policy(&config, ModeFlag::new(config.mode));

    // Renderer capabilities post to this channel; the TUI loop drains it
    let (host_tx, host_rx) = mpsc::unbounded_channel();
    let services = EngineServices {
        events: host_tx,
        data: Arc::new(workspace.data_source(Duration::from_millis(config.data.latency_ms))),
        surface: MountSurface::new(),
    };
    let controller = NavigationController::new(registry, policy, services);

    startup::log_startup(&config, &controller, &workspace);

    let app = tui::app::App::new(
        workspace,
        controller,
        ThemeKind::from_name(&config.theme),
        log_buffer,
    );
    tui::run_tui(app, host_rx).await?;

    tracing::info!("vizdeck shut down");
    Ok(())
}

/// CLI path, then the configured path, then the demo workspace
fn load_workspace(cli: &Cli, config: &Config) -> Result<Workspace> {
    if cli.demo {
        tracing::info!("Opening the demo workspace");
        return Ok(demo::demo_workspace());
    }

    match &config.workspace {
        Some(path) => Workspace::load(path)
            .with_context(|| format!("Failed to open workspace {}", path.display())),
        None => {
            tracing::info!("No workspace given, opening the demo workspace");
            Ok(demo::demo_workspace())
        }
    }
}
