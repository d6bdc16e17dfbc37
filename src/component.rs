//! Component trait - Interface for UI components
//!
//! The sidebar, the mounted view and every dialog implement this trait. They
//! turn terminal events into `Action`s and never mutate app-level state
//! directly; the `App` routes each action to whichever component owns it.

use crate::action::Action;
use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

/// Trait for UI components
///
/// 1. `handle_key_event` / `handle_mouse_event` map input to an Action
/// 2. `update` applies an Action, optionally returning a follow-up
/// 3. `draw` renders into the given area
pub trait Component {
    /// Called once after construction
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Map a key press to an Action. Local cursor movement may happen here.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let _ = mouse;
        Ok(None)
    }

    /// Apply an Action. A returned Action is fed back into the app loop
    /// (a view asking for a fetch, for example).
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Render into `area`
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
