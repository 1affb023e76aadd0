//! The contract between the app loop and a screen.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::action::Action;

/// A screen reacts to keys and dispatched actions, and draws itself.
/// Either hook may hand back one follow-up action for the app loop.
pub trait Component: Send {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>>;

    fn update(&mut self, action: &Action) -> Result<Option<Action>>;

    fn render(&self, frame: &mut Frame, area: Rect);

    /// True while a text field or popup owns the keyboard; quit and help
    /// are then left to the screen.
    fn captures_input(&self) -> bool {
        false
    }

    fn id(&self) -> &str;
}
