// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app task,
// or into local ViewState mutations (tab selection, scrolling).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::ViewState;
use crate::protocol::{TabId, UserCommand};

/// Rows moved per PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press needs the app task (a view
/// load, a refresh, quitting). Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows emits Press and Release for each keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    match key_event.code {
        KeyCode::Char('1') => {
            view_state.active_tab = TabId::Overview;
            Some(UserCommand::ShowOverview)
        }
        KeyCode::Char('2') => {
            let name = view_state
                .player_name
                .clone()
                .or_else(|| view_state.selected_name().map(str::to_string))?;
            view_state.open_player(&name);
            Some(UserCommand::ShowPlayer(name))
        }

        KeyCode::Left | KeyCode::Char('h') => cycle(view_state, -1),
        KeyCode::Right | KeyCode::Char('l') => cycle(view_state, 1),

        KeyCode::Up | KeyCode::Char('k') => {
            view_state.scroll_up(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view_state.scroll_down(1);
            None
        }
        KeyCode::PageUp => {
            view_state.scroll_up(PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            view_state.scroll_down(PAGE_SIZE);
            None
        }

        KeyCode::Char('r') => Some(UserCommand::Refresh),
        KeyCode::Char('q') => Some(UserCommand::Quit),

        _ => None,
    }
}

/// Player cycling only applies on the player tab.
fn cycle(view_state: &mut ViewState, step: isize) -> Option<UserCommand> {
    if view_state.active_tab != TabId::Player {
        return None;
    }
    view_state.cycle_player(step).map(UserCommand::ShowPlayer)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
