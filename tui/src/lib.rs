//! Terminal front end for the project-management mind map.
//!
//! `run_main` sets up file logging, loads the built-in content tree,
//! takes over the terminal and runs the [`app::App`] event loop until the
//! user quits.

// All user-visible output goes through the terminal or the log file.
#![deny(clippy::print_stdout, clippy::print_stderr)]

use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use pmmap_core::ContentModel;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod app;
mod app_event;
mod app_event_sender;
mod cli;
mod detail_panel;
mod diagram;
mod donut;
mod grid_view;
mod key_hint;
mod render;
mod slide;
mod style;
mod tui;

pub use cli::Cli;

const LOG_FILE_NAME: &str = "pmmap-tui.log";
const DEFAULT_LOG_FILTER: &str = "pmmap_core=info,pmmap_tui=info";

pub fn run_main(cli: Cli) -> anyhow::Result<()> {
    let log_dir = cli.log_dir.clone().unwrap_or_else(default_log_dir);
    let _log_guard = init_logging(&log_dir)?;
    tracing::info!("pmmap-tui v{} starting", env!("CARGO_PKG_VERSION"));

    let model = ContentModel::builtin().context("loading built-in content")?;
    if let Some(id) = cli.open.as_deref()
        && model.topic(id).is_none()
    {
        anyhow::bail!("unknown topic `{id}`; run `topic-dump --list` for the identifiers");
    }

    let mut terminal = tui::init().context("initializing terminal")?;
    let mut app = app::App::new(model);
    if let Some(id) = cli.open.as_deref() {
        app.open_at_startup(id);
    }
    let result = app.run(&mut terminal);
    tui::restore().context("restoring terminal")?;

    tracing::info!("pmmap-tui exiting");
    result.context("running event loop")
}

fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".pmmap").join("log"))
        .unwrap_or_else(|| std::env::temp_dir().join("pmmap-log"))
}

/// Route `tracing` output to `<log_dir>/pmmap-tui.log`. The terminal is in
/// raw mode on the alternate screen, so nothing may log to stdout/stderr.
fn init_logging(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(guard)
}
