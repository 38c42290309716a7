// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the last view models the app task sent.
// The app pushes `UiUpdate` messages over an mpsc channel; the TUI applies
// them to `ViewState` and re-renders at ~30 fps.

pub mod animation;
pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use rankboard_core::config::{DisplayConfig, EntityRegistry};
use rankboard_core::pipeline::Overview;
use rankboard_core::stats::PlayerReport;
use tokio::sync::mpsc;

use crate::protocol::{LoadState, TabId, UiUpdate, UserCommand};

use animation::CountUp;
use layout::{build_layout, split_overview_body, AppLayout};

/// Scroll offset keys.
pub const SR_TABLE_SCROLL: &str = "sr_table";
pub const MATCH_HISTORY_SCROLL: &str = "match_history";

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the last loaded view models.
pub struct ViewState {
    /// Which tab is showing.
    pub active_tab: TabId,
    /// Tracked players in config order; drives player cycling.
    pub players: EntityRegistry,
    /// Index into `players` for the player tab.
    pub selected_player: usize,
    /// Name shown on the player tab. May be a name missing from `players`
    /// when one was given on the command line.
    pub player_name: Option<String>,
    pub overview: Option<Overview>,
    pub overview_state: LoadState,
    pub report: Option<PlayerReport>,
    pub player_state: LoadState,
    /// KD count-up for the current report.
    pub kd_animation: Option<CountUp>,
    pub display: DisplayConfig,
    /// Wall-clock time of the last successful load.
    pub last_refresh: Option<DateTime<Local>>,
    /// Per-widget scroll offsets (keyed by widget name).
    pub scroll_offset: HashMap<String, usize>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            active_tab: TabId::Overview,
            players: EntityRegistry::default(),
            selected_player: 0,
            player_name: None,
            overview: None,
            overview_state: LoadState::Idle,
            report: None,
            player_state: LoadState::Idle,
            kd_animation: None,
            display: DisplayConfig::default(),
            last_refresh: None,
            scroll_offset: HashMap::new(),
        }
    }
}

impl ViewState {
    pub fn new(players: EntityRegistry, display: DisplayConfig) -> Self {
        ViewState {
            players,
            display,
            ..ViewState::default()
        }
    }

    /// Switch to the player tab for `name`, selecting it when registered.
    pub fn open_player(&mut self, name: &str) {
        self.active_tab = TabId::Player;
        if let Some(idx) = self.players.entities().iter().position(|e| e.name == name) {
            self.selected_player = idx;
        }
        self.player_name = Some(name.to_string());
    }

    /// Registered name at the current selection.
    pub fn selected_name(&self) -> Option<&str> {
        self.players
            .entities()
            .get(self.selected_player)
            .map(|e| e.name.as_str())
    }

    /// Move the selection by `step` (wrapping) and return the new name.
    pub fn cycle_player(&mut self, step: isize) -> Option<String> {
        let len = self.players.len();
        if len == 0 {
            return None;
        }
        let next = (self.selected_player as isize + step).rem_euclid(len as isize);
        self.selected_player = next as usize;
        let name = self.selected_name()?.to_string();
        self.player_name = Some(name.clone());
        Some(name)
    }

    /// Load state of the active tab.
    pub fn load_state(&self) -> &LoadState {
        match self.active_tab {
            TabId::Overview => &self.overview_state,
            TabId::Player => &self.player_state,
        }
    }

    /// KD text for the stat card at `now`, counting up while animating.
    pub fn kd_text(&self, now: Instant) -> String {
        let Some(report) = &self.report else {
            return "0.00".to_string();
        };
        match &self.kd_animation {
            Some(anim) if !anim.is_finished_at(now) => anim.display_at(now),
            _ => report.stats.kd(),
        }
    }

    pub fn scroll_key(&self) -> &'static str {
        match self.active_tab {
            TabId::Overview => SR_TABLE_SCROLL,
            TabId::Player => MATCH_HISTORY_SCROLL,
        }
    }

    /// Rows available to scroll in the active tab's table.
    fn scrollable_rows(&self) -> usize {
        match self.active_tab {
            TabId::Overview => self.overview.as_ref().map_or(0, |o| o.table.rows.len()),
            TabId::Player => self.report.as_ref().map_or(0, |r| r.history.len()),
        }
    }

    pub fn scroll_up(&mut self, amount: usize) {
        let key = self.scroll_key();
        let offset = self.scroll_offset.entry(key.to_string()).or_insert(0);
        *offset = offset.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        let max = self.scrollable_rows().saturating_sub(1);
        let key = self.scroll_key();
        let offset = self.scroll_offset.entry(key.to_string()).or_insert(0);
        *offset = (*offset + amount).min(max);
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Loading(TabId::Overview) => {
            state.overview_state = LoadState::Loading;
        }
        UiUpdate::Loading(TabId::Player) => {
            state.player_state = LoadState::Loading;
        }
        UiUpdate::OverviewLoaded {
            overview,
            refreshed_at,
        } => {
            state.overview = Some(*overview);
            state.overview_state = LoadState::Loaded;
            state.last_refresh = Some(refreshed_at);
            state.scroll_offset.remove(SR_TABLE_SCROLL);
        }
        UiUpdate::PlayerLoaded {
            name,
            report,
            refreshed_at,
        } => {
            state.kd_animation = state.display.animate.then(|| {
                CountUp::new(
                    report.stats.kd_value(),
                    Duration::from_millis(state.display.animation_ms),
                    Instant::now(),
                )
            });
            state.player_name = Some(name);
            state.report = Some(*report);
            state.player_state = LoadState::Loaded;
            state.last_refresh = Some(refreshed_at);
            state.scroll_offset.remove(MATCH_HISTORY_SCROLL);
        }
        UiUpdate::NoData(TabId::Overview) => {
            state.overview = None;
            state.overview_state = LoadState::NoData;
        }
        UiUpdate::NoData(TabId::Player) => {
            state.report = None;
            state.kd_animation = None;
            state.player_state = LoadState::NoData;
        }
        UiUpdate::PlayerNotFound(name) => {
            state.player_name = Some(name);
            state.report = None;
            state.kd_animation = None;
            state.player_state = LoadState::NotFound;
        }
        UiUpdate::FetchFailed { tab, message } => match tab {
            TabId::Overview => {
                state.overview = None;
                state.overview_state = LoadState::Failed(message);
            }
            TabId::Player => {
                state.report = None;
                state.kd_animation = None;
                state.player_state = LoadState::Failed(message);
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    match state.active_tab {
        TabId::Overview => {
            widgets::leaderboard::render(frame, layout.cards, state);
            let body = split_overview_body(layout.body);
            widgets::sr_chart::render(frame, body.chart, state);
            widgets::sr_table::render(frame, body.table, state);
        }
        TabId::Player => {
            widgets::stat_cards::render(frame, layout.cards, state);
            widgets::match_history::render(frame, layout.body, state);
        }
    }
    render_help_bar(frame, &layout, state);
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let text = match state.active_tab {
        TabId::Overview => " q:Quit | 1-2:Tabs | j/k:Scroll | r:Refresh",
        TabId::Player => " q:Quit | 1-2:Tabs | h/l:Player | j/k:Scroll | r:Refresh",
    };
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    mut view_state: ViewState,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Channel closed: app is shutting down
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(e.into()),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(e.into());
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
