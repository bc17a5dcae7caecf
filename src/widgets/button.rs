use ratatui::Frame;
use ratatui::layout::{Position, Size};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};

use super::{bounds, visible};
use crate::action::Action;
use crate::theme::tui_palette as tp;

/// Labelled button that emits a fixed action when clicked.
pub struct Button {
    pos: Position,
    size: Size,
    label: String,
    on_click: Action,
}

impl Button {
    pub fn new(pos: Position, size: Size, label: impl Into<String>, on_click: Action) -> Self {
        Self {
            pos,
            size,
            label: label.into(),
            on_click,
        }
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn handle_click(&mut self) -> Option<Action> {
        Some(self.on_click.clone())
    }

    pub fn draw(&self, frame: &mut Frame<'_>, is_active: bool) {
        let Some(area) = visible(frame, bounds(self.pos, self.size)) else {
            return;
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(tp::outline(is_active));
        let label = Line::styled(self.label.as_str(), Style::default().fg(tp::TITLE));
        frame.render_widget(Paragraph::new(label).centered().block(block), area);
    }
}
