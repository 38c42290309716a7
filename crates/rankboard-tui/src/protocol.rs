// Messages exchanged between the app task and the TUI task.
//
// The app task owns the data source and pushes `UiUpdate`s; the TUI owns the
// terminal and sends `UserCommand`s back. Both directions use tokio mpsc.

use chrono::{DateTime, Local};
use rankboard_core::pipeline::Overview;
use rankboard_core::stats::PlayerReport;

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabId {
    Overview,
    Player,
}

/// Load state of one screen, as shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    /// The sheet was fetched but had no recognizable header.
    NoData,
    /// The requested player is not in the registry.
    NotFound,
    Failed(String),
}

/// App -> TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    Loading(TabId),
    OverviewLoaded {
        overview: Box<Overview>,
        refreshed_at: DateTime<Local>,
    },
    PlayerLoaded {
        name: String,
        report: Box<PlayerReport>,
        refreshed_at: DateTime<Local>,
    },
    NoData(TabId),
    PlayerNotFound(String),
    FetchFailed {
        tab: TabId,
        message: String,
    },
}

/// TUI -> App.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    ShowOverview,
    ShowPlayer(String),
    /// Re-run the load of whatever view was last requested.
    Refresh,
    Quit,
}
