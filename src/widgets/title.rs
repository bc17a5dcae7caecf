use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use super::visible;
use crate::theme::tui_palette as tp;

/// Static heading centred horizontally on `pos.x`.
///
/// The hit box still starts at `pos`, so it sits right of the drawn text.
pub struct ScreenTitle {
    pos: Position,
    size: Size,
    text: String,
}

impl ScreenTitle {
    pub fn new(pos: Position, text: impl Into<String>) -> Self {
        let text = text.into();
        let width = u16::try_from(Line::from(text.as_str()).width()).unwrap_or(u16::MAX);
        Self {
            pos,
            size: Size::new(width, 1),
            text,
        }
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let x = self.pos.x.saturating_sub(self.size.width / 2);
        let target = Rect::new(x, self.pos.y, self.size.width, self.size.height);
        let Some(area) = visible(frame, target) else {
            return;
        };
        frame.render_widget(Paragraph::new(Line::styled(self.text.as_str(), tp::title())), area);
    }
}
