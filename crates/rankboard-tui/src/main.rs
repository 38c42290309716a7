// Rankboard entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build the HTTP sheet source
// 4. Create mpsc channels and queue the initial view load
// 5. Spawn app logic task
// 6. Run the TUI until the user quits
// 7. Cleanup on exit
//
// Usage: rankboard [PLAYER]
// With PLAYER the player view opens first instead of the overview.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use rankboard_core::config;
use rankboard_core::source::HttpCsvSource;
use rankboard_tui::app::{self, AppState};
use rankboard_tui::protocol::UserCommand;
use rankboard_tui::tui::{self, ViewState};
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Rankboard starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {} players, timeout {}s, cache busting {}",
        config.registry.len(),
        config.fetch.timeout_secs,
        if config.fetch.cache_bust { "on" } else { "off" }
    );

    // 3. Build the sheet source
    let source =
        HttpCsvSource::from_config(&config.fetch).context("failed to build HTTP client")?;

    // 4. Channels and initial view
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(64);

    let mut view_state = ViewState::new(config.registry.clone(), config.display.clone());
    let initial = match std::env::args().nth(1) {
        Some(name) => {
            info!("Opening player view for {}", name);
            view_state.open_player(&name);
            UserCommand::ShowPlayer(name)
        }
        None => UserCommand::ShowOverview,
    };
    cmd_tx
        .send(initial)
        .await
        .context("failed to queue initial view")?;

    // 5. Spawn app logic task
    let app_state = AppState::new(config, Arc::new(source));
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 6. Run the TUI (blocks until the user quits)
    if let Err(e) = tui::run(ui_rx, cmd_tx, view_state).await {
        error!("TUI error: {}", e);
    }

    // 7. Wait for the app task; an in-flight fetch is bounded by the timeout.
    let _ = tokio::time::timeout(Duration::from_secs(5), app_handle).await;

    info!("Rankboard shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = match directories::ProjectDirs::from("", "", "rankboard") {
        Some(dirs) => dirs.data_dir().join("logs"),
        None => std::env::current_dir()?.join("logs"),
    };
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("rankboard.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("rankboard_core=info,rankboard_tui=info,rankboard=info,warn")
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
