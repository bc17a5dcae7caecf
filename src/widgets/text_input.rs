use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Position, Size};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};

use super::{bounds, visible};
use crate::action::Action;
use crate::state::{ChatState, Field};
use crate::theme::tui_palette as tp;

/// Single-line text box bound to one [`Field`] of the state.
pub struct TextInput {
    pos: Position,
    size: Size,
    label: String,
    field: Field,
    on_enter: Action,
    masked: bool,
}

impl TextInput {
    /// Enter sends the current message unless overridden with
    /// [`on_enter`](Self::on_enter).
    pub fn new(pos: Position, size: Size, label: impl Into<String>, field: Field) -> Self {
        Self {
            pos,
            size,
            label: label.into(),
            field,
            on_enter: Action::SendMessage,
            masked: false,
        }
    }

    pub fn on_enter(mut self, action: Action) -> Self {
        self.on_enter = action;
        self
    }

    /// Render the buffer as asterisks.
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &mut ChatState) -> Option<Action> {
        match key.code {
            KeyCode::Backspace => {
                state.field_mut(self.field).pop();
                None
            }
            KeyCode::Enter => Some(self.on_enter.clone()),
            KeyCode::Char(c) if is_printable(c, key.modifiers) => {
                state.field_mut(self.field).push(c);
                None
            }
            _ => None,
        }
    }

    pub fn draw(&self, frame: &mut Frame<'_>, state: &ChatState, is_active: bool) {
        let Some(area) = visible(frame, bounds(self.pos, self.size)) else {
            return;
        };

        let raw = state.field(self.field);
        let mut value = if self.masked {
            "*".repeat(raw.chars().count())
        } else {
            raw.to_string()
        };
        if is_active {
            value.push('|');
        }

        // Keep the end of long input in view.
        let line = Line::from(Span::styled(value, Style::default().fg(tp::TEXT)));
        let inner_width = usize::from(area.width.saturating_sub(2));
        let overflow = line.width().saturating_sub(inner_width);
        let scroll = u16::try_from(overflow).unwrap_or(u16::MAX);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(tp::outline(is_active))
            .title(Span::styled(
                format!(" {} ", self.label),
                Style::default().fg(tp::LABEL),
            ));
        frame.render_widget(Paragraph::new(line).block(block).scroll((0, scroll)), area);
    }
}

fn is_printable(c: char, modifiers: KeyModifiers) -> bool {
    !c.is_control() && !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}
