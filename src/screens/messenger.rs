use ratatui::layout::{Position, Size};

use super::Screen;
use crate::action::Action;
use crate::state::Field;
use crate::widgets::{Button, Contacts, MessagesList, ScreenTitle, TextInput};

/// Chat view: history, message box, send button and the contacts panel.
///
/// The contacts panel goes last so its expanded body paints over the rest.
pub fn build() -> Screen {
    let mut screen = Screen::new();
    screen.add_widget(ScreenTitle::new(Position::new(53, 1), "Messenger"));
    screen.add_widget(TextInput::new(
        Position::new(28, 31),
        Size::new(38, 3),
        "Type your message...",
        Field::CurrentMessage,
    ));
    screen.add_widget(Button::new(
        Position::new(67, 31),
        Size::new(12, 3),
        "Send",
        Action::SendMessage,
    ));
    screen.add_widget(MessagesList::new(Position::new(28, 4), Size::new(51, 26)));
    screen.add_widget(Contacts::new(
        Position::new(1, 1),
        Size::new(14, 3),
        Size::new(26, 34),
    ));
    screen
}
