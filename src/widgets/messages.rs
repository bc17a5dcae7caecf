use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::visible;
use crate::message::ChatMessage;
use crate::state::ChatState;
use crate::theme::tui_palette as tp;

/// Rows per message: author and timestamp, then the text.
const ENTRY_HEIGHT: u16 = 2;
/// Blank rows between messages.
const ENTRY_GAP: u16 = 1;

/// Chat history, newest message at the bottom edge, older ones stacked
/// upwards until the top of the widget is reached.
pub struct MessagesList {
    pos: Position,
    size: Size,
}

impl MessagesList {
    pub fn new(pos: Position, size: Size) -> Self {
        Self { pos, size }
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn draw(&self, frame: &mut Frame<'_>, state: &ChatState) {
        let top = self.pos.y;
        let mut bottom = self.pos.y.saturating_add(self.size.height);

        for message in state.messages.iter().rev() {
            let Some(entry_top) = bottom.checked_sub(ENTRY_HEIGHT) else {
                break;
            };
            if entry_top < top {
                break;
            }
            let entry = Rect::new(self.pos.x, entry_top, self.size.width, ENTRY_HEIGHT);
            if let Some(area) = visible(frame, entry) {
                frame.render_widget(Paragraph::new(entry_lines(message, self.size.width)), area);
            }
            bottom = entry_top.saturating_sub(ENTRY_GAP);
        }
    }
}

fn entry_lines(message: &ChatMessage, width: u16) -> Vec<Line<'static>> {
    let author = Span::styled(message.author.clone(), tp::author());
    let timestamp = Span::styled(message.timestamp.clone(), Style::default().fg(tp::TIMESTAMP));
    let padding = usize::from(width).saturating_sub(author.width() + timestamp.width());

    vec![
        Line::from(vec![author, Span::raw(" ".repeat(padding)), timestamp]),
        Line::styled(message.text.clone(), Style::default().fg(tp::TEXT)),
    ]
}
