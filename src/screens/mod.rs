pub mod messenger;
pub mod signup;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Position;

use crate::action::Action;
use crate::state::ChatState;
use crate::widgets::Widget;

/// Width of the grid the built-in screens are laid out on.
pub const SCREEN_WIDTH: u16 = 80;
/// Height of the grid the built-in screens are laid out on.
pub const SCREEN_HEIGHT: u16 = 36;

/// An ordered set of widgets with at most one of them active.
///
/// Insertion order is both the hit-test order and the draw order, so a
/// widget added later is painted over earlier ones but loses clicks to them.
#[derive(Default)]
pub struct Screen {
    widgets: Vec<Widget>,
    active: Option<usize>,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_widget(&mut self, widget: impl Into<Widget>) {
        self.widgets.push(widget.into());
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The first widget under `at` becomes active and gets the click.
    /// Clicking empty space keeps the current active widget.
    pub fn handle_click(&mut self, at: Position, state: &mut ChatState) -> Option<Action> {
        let index = self.widgets.iter().position(|w| w.rect().contains(at))?;
        self.active = Some(index);
        self.widgets[index].handle_click(at, state)
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &mut ChatState) -> Option<Action> {
        let index = self.active?;
        self.widgets.get_mut(index)?.handle_key(key, state)
    }

    pub fn draw(&mut self, frame: &mut Frame<'_>, state: &ChatState) {
        let active = self.active;
        for (index, widget) in self.widgets.iter_mut().enumerate() {
            widget.draw(frame, state, active == Some(index));
        }
    }
}
