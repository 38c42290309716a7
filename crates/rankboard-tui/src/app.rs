// Application orchestrator: owns the data source and turns user commands
// into view loads.
//
// Each view load is one fetch, awaited inline, followed by one pure pipeline
// run. Commands are handled strictly in order, so there is never more than
// one fetch in flight.

use std::sync::Arc;

use chrono::Local;
use rankboard_core::config::Config;
use rankboard_core::pipeline::{build_overview, build_player_report};
use rankboard_core::source::TabularSource;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::protocol::{TabId, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// A view the user asked for. Kept so `Refresh` can repeat it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRequest {
    Overview,
    Player(String),
}

pub struct AppState {
    pub config: Config,
    pub source: Arc<dyn TabularSource>,
    pub current: Option<ViewRequest>,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn TabularSource>) -> Self {
        AppState {
            config,
            source,
            current: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the app loop until `Quit` arrives or the command channel closes.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    while let Some(cmd) = cmd_rx.recv().await {
        if cmd == UserCommand::Quit {
            info!("Quit command received, shutting down");
            return Ok(());
        }
        handle_user_command(&mut state, cmd, &ui_tx).await;
    }

    info!("Command channel closed, shutting down");
    Ok(())
}

/// Handle a user command from the TUI.
pub async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let request = match cmd {
        UserCommand::ShowOverview => ViewRequest::Overview,
        UserCommand::ShowPlayer(name) => ViewRequest::Player(name),
        UserCommand::Refresh => match state.current.clone() {
            Some(request) => {
                info!("Refreshing {:?}", request);
                request
            }
            None => return,
        },
        // Handled in the main loop
        UserCommand::Quit => return,
    };

    state.current = Some(request.clone());
    match request {
        ViewRequest::Overview => load_overview(state, ui_tx).await,
        ViewRequest::Player(name) => load_player(state, &name, ui_tx).await,
    }
}

async fn load_overview(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx.send(UiUpdate::Loading(TabId::Overview)).await;

    let grid = match state.source.fetch_grid(&state.config.overview_url).await {
        Ok(grid) => grid,
        Err(e) => {
            warn!("Overview fetch failed: {}", e);
            let _ = ui_tx
                .send(UiUpdate::FetchFailed {
                    tab: TabId::Overview,
                    message: e.to_string(),
                })
                .await;
            return;
        }
    };

    let update = match build_overview(&grid, &state.config.registry) {
        Some(overview) => {
            info!(
                "Overview loaded: {} players, {} dates",
                overview.series.len(),
                overview.labels.len()
            );
            UiUpdate::OverviewLoaded {
                overview: Box::new(overview),
                refreshed_at: Local::now(),
            }
        }
        None => {
            info!("Overview sheet has no header row");
            UiUpdate::NoData(TabId::Overview)
        }
    };
    let _ = ui_tx.send(update).await;
}

async fn load_player(state: &AppState, name: &str, ui_tx: &mpsc::Sender<UiUpdate>) {
    let Some(entity) = state.config.registry.get(name) else {
        info!("Unknown player requested: {}", name);
        let _ = ui_tx
            .send(UiUpdate::PlayerNotFound(name.to_string()))
            .await;
        return;
    };

    let _ = ui_tx.send(UiUpdate::Loading(TabId::Player)).await;

    let grid = match state.source.fetch_grid(&entity.url).await {
        Ok(grid) => grid,
        Err(e) => {
            warn!("Match sheet fetch for {} failed: {}", name, e);
            let _ = ui_tx
                .send(UiUpdate::FetchFailed {
                    tab: TabId::Player,
                    message: e.to_string(),
                })
                .await;
            return;
        }
    };

    let update = match build_player_report(&grid) {
        Some(report) => {
            info!(
                "Player {} loaded: {} games, streak {}",
                name, report.stats.total_games, report.stats.streak
            );
            UiUpdate::PlayerLoaded {
                name: name.to_string(),
                report: Box::new(report),
                refreshed_at: Local::now(),
            }
        }
        None => {
            info!("Match sheet for {} has no header row", name);
            UiUpdate::NoData(TabId::Player)
        }
    };
    let _ = ui_tx.send(update).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rankboard_core::config::{
        DisplayConfig, EntityRegistry, FetchConfig, RegisteredEntity, Rgb,
    };
    use rankboard_core::source::{parse_grid, SourceError};
    use rankboard_core::table::Grid;

    const OVERVIEW_URL: &str = "mem://overview";

    const OVERVIEW_CSV: &str = "\
,Date,Ant,Kiko
,1/1,\"2,400\",3100
,1/2,2500,
";

    const ANT_CSV: &str = "\
Date,Map,Mode,Elim,Death,W/L
1/1,Ilios,Control,10,5,W
1/1,Dorado,Escort,3,0,L
1/2,Numbani,Hybrid,6,6,W
";

    /// In-memory source. Unknown URLs fail with a decode error.
    #[derive(Default)]
    struct FakeSource {
        sheets: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn with_sheet(mut self, url: &str, body: &str) -> Self {
            self.sheets.insert(url.to_string(), body.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TabularSource for FakeSource {
        async fn fetch_grid(&self, url: &str) -> Result<Grid, SourceError> {
            self.calls.lock().unwrap().push(url.to_string());
            let body: &[u8] = match self.sheets.get(url) {
                Some(text) => text.as_bytes(),
                None => &[0xff, 0xfe, b'\n'],
            };
            parse_grid(body).map_err(|source| SourceError::Csv {
                url: url.to_string(),
                source,
            })
        }
    }

    fn test_config() -> Config {
        Config {
            overview_url: OVERVIEW_URL.to_string(),
            fetch: FetchConfig {
                timeout_secs: 5,
                cache_bust: false,
            },
            display: DisplayConfig::default(),
            registry: EntityRegistry::new(vec![
                RegisteredEntity {
                    name: "Ant".into(),
                    color: Rgb(0xFF, 0x52, 0x52),
                    url: "mem://ant".into(),
                },
                RegisteredEntity {
                    name: "Kiko".into(),
                    color: Rgb(0x44, 0x8A, 0xFF),
                    url: "mem://kiko".into(),
                },
            ]),
        }
    }

    fn create_test_app_state(source: Arc<FakeSource>) -> AppState {
        AppState::new(test_config(), source)
    }

    fn full_source() -> Arc<FakeSource> {
        Arc::new(
            FakeSource::default()
                .with_sheet(OVERVIEW_URL, OVERVIEW_CSV)
                .with_sheet("mem://ant", ANT_CSV)
                .with_sheet("mem://kiko", "nothing,to,see\n"),
        )
    }

    fn drain(rx: &mut mpsc::Receiver<UiUpdate>) -> Vec<UiUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = rx.try_recv() {
            updates.push(update);
        }
        updates
    }

    // -----------------------------------------------------------------------
    // Tests: view loads
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn show_overview_sends_loading_then_overview() {
        let source = full_source();
        let mut state = create_test_app_state(source.clone());
        let (ui_tx, mut ui_rx) = mpsc::channel(16);

        handle_user_command(&mut state, UserCommand::ShowOverview, &ui_tx).await;

        let updates = drain(&mut ui_rx);
        assert_eq!(updates.len(), 2);
        assert!(matches!(updates[0], UiUpdate::Loading(TabId::Overview)));
        match &updates[1] {
            UiUpdate::OverviewLoaded { overview, .. } => {
                assert_eq!(overview.labels, vec!["1/1", "1/2"]);
                assert_eq!(overview.leaderboard[0].name, "Kiko");
                assert_eq!(overview.leaderboard[0].sr, 3100);
                assert_eq!(overview.leaderboard[1].sr, 2500);
            }
            other => panic!("expected OverviewLoaded, got {:?}", other),
        }
        assert_eq!(source.calls(), vec![OVERVIEW_URL]);
        assert_eq!(state.current, Some(ViewRequest::Overview));
    }

    #[tokio::test]
    async fn show_player_fetches_registered_url() {
        let source = full_source();
        let mut state = create_test_app_state(source.clone());
        let (ui_tx, mut ui_rx) = mpsc::channel(16);

        handle_user_command(&mut state, UserCommand::ShowPlayer("Ant".into()), &ui_tx).await;

        let updates = drain(&mut ui_rx);
        assert!(matches!(updates[0], UiUpdate::Loading(TabId::Player)));
        match &updates[1] {
            UiUpdate::PlayerLoaded { name, report, .. } => {
                assert_eq!(name, "Ant");
                assert_eq!(report.stats.total_games, 3);
                assert_eq!(report.stats.kd(), "1.73");
                assert_eq!(report.stats.win_rate(), "66.7%");
                assert_eq!(report.stats.streak, 1);
                assert_eq!(report.history[0].map, "Numbani");
            }
            other => panic!("expected PlayerLoaded, got {:?}", other),
        }
        assert_eq!(source.calls(), vec!["mem://ant"]);
    }

    #[tokio::test]
    async fn unknown_player_is_not_found_without_fetching() {
        let source = full_source();
        let mut state = create_test_app_state(source.clone());
        let (ui_tx, mut ui_rx) = mpsc::channel(16);

        handle_user_command(&mut state, UserCommand::ShowPlayer("Nobody".into()), &ui_tx).await;

        let updates = drain(&mut ui_rx);
        assert_eq!(updates.len(), 1);
        assert!(matches!(&updates[0], UiUpdate::PlayerNotFound(n) if n == "Nobody"));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn sheet_without_header_reports_no_data() {
        let source = full_source();
        let mut state = create_test_app_state(source);
        let (ui_tx, mut ui_rx) = mpsc::channel(16);

        handle_user_command(&mut state, UserCommand::ShowPlayer("Kiko".into()), &ui_tx).await;

        let updates = drain(&mut ui_rx);
        assert!(matches!(updates.last(), Some(UiUpdate::NoData(TabId::Player))));
    }

    #[tokio::test]
    async fn fetch_failure_is_reported_once() {
        let source = Arc::new(FakeSource::default());
        let mut state = create_test_app_state(source.clone());
        let (ui_tx, mut ui_rx) = mpsc::channel(16);

        handle_user_command(&mut state, UserCommand::ShowOverview, &ui_tx).await;

        let updates = drain(&mut ui_rx);
        assert_eq!(updates.len(), 2);
        match &updates[1] {
            UiUpdate::FetchFailed { tab, message } => {
                assert_eq!(*tab, TabId::Overview);
                assert!(message.contains(OVERVIEW_URL));
            }
            other => panic!("expected FetchFailed, got {:?}", other),
        }
        // No retry
        assert_eq!(source.calls().len(), 1);
    }

    // -----------------------------------------------------------------------
    // Tests: refresh
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn refresh_before_any_view_does_nothing() {
        let source = full_source();
        let mut state = create_test_app_state(source.clone());
        let (ui_tx, mut ui_rx) = mpsc::channel(16);

        handle_user_command(&mut state, UserCommand::Refresh, &ui_tx).await;

        assert!(drain(&mut ui_rx).is_empty());
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn refresh_repeats_last_view_with_identical_result() {
        let source = full_source();
        let mut state = create_test_app_state(source.clone());
        let (ui_tx, mut ui_rx) = mpsc::channel(16);

        handle_user_command(&mut state, UserCommand::ShowPlayer("Ant".into()), &ui_tx).await;
        handle_user_command(&mut state, UserCommand::Refresh, &ui_tx).await;

        assert_eq!(source.calls(), vec!["mem://ant", "mem://ant"]);

        let reports: Vec<_> = drain(&mut ui_rx)
            .into_iter()
            .filter_map(|u| match u {
                UiUpdate::PlayerLoaded { report, .. } => Some(report),
                _ => None,
            })
            .collect();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0], reports[1]);
    }

    // -----------------------------------------------------------------------
    // Tests: run loop
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn run_processes_commands_in_order_and_quits() {
        let source = full_source();
        let state = create_test_app_state(source.clone());
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (ui_tx, mut ui_rx) = mpsc::channel(32);

        let handle = tokio::spawn(run(cmd_rx, ui_tx, state));

        cmd_tx.send(UserCommand::ShowOverview).await.unwrap();
        cmd_tx.send(UserCommand::ShowPlayer("Ant".into())).await.unwrap();
        cmd_tx.send(UserCommand::Quit).await.unwrap();

        handle.await.unwrap().unwrap();

        assert_eq!(source.calls(), vec![OVERVIEW_URL, "mem://ant"]);
        let updates = drain(&mut ui_rx);
        assert!(matches!(updates[1], UiUpdate::OverviewLoaded { .. }));
        assert!(matches!(updates[3], UiUpdate::PlayerLoaded { .. }));
    }

    #[tokio::test]
    async fn run_stops_when_command_channel_closes() {
        let state = create_test_app_state(full_source());
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (ui_tx, _ui_rx) = mpsc::channel(8);

        drop(cmd_tx);
        run(cmd_rx, ui_tx, state).await.unwrap();
    }
}
