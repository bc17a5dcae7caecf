//! Retained-mode widgets.
//!
//! Every widget owns its position and size, draws itself onto the frame and
//! reacts to clicks and key presses by editing the [`ChatState`] it is
//! handed. Work that needs the network is returned as an [`Action`].

mod button;
mod contacts;
mod messages;
mod text_input;
mod title;

pub use button::Button;
pub use contacts::{ContactItem, Contacts};
pub use messages::MessagesList;
pub use text_input::TextInput;
pub use title::ScreenTitle;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};

use crate::action::Action;
use crate::state::ChatState;

/// The closed set of widgets a [`Screen`](crate::screens::Screen) can hold.
pub enum Widget {
    TextInput(TextInput),
    Button(Button),
    Title(ScreenTitle),
    Messages(MessagesList),
    ContactItem(ContactItem),
    Contacts(Contacts),
}

impl Widget {
    pub fn pos(&self) -> Position {
        match self {
            Widget::TextInput(w) => w.pos(),
            Widget::Button(w) => w.pos(),
            Widget::Title(w) => w.pos(),
            Widget::Messages(w) => w.pos(),
            Widget::ContactItem(w) => w.pos(),
            Widget::Contacts(w) => w.pos(),
        }
    }

    pub fn size(&self) -> Size {
        match self {
            Widget::TextInput(w) => w.size(),
            Widget::Button(w) => w.size(),
            Widget::Title(w) => w.size(),
            Widget::Messages(w) => w.size(),
            Widget::ContactItem(w) => w.size(),
            Widget::Contacts(w) => w.size(),
        }
    }

    /// Bounding box used for click hit-testing.
    pub fn rect(&self) -> Rect {
        bounds(self.pos(), self.size())
    }

    pub fn handle_click(&mut self, at: Position, state: &mut ChatState) -> Option<Action> {
        match self {
            Widget::Button(w) => w.handle_click(),
            Widget::Contacts(w) => w.handle_click(at, state),
            Widget::TextInput(_)
            | Widget::Title(_)
            | Widget::Messages(_)
            | Widget::ContactItem(_) => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &mut ChatState) -> Option<Action> {
        match self {
            Widget::TextInput(w) => w.handle_key(key, state),
            Widget::Contacts(w) => w.handle_key(key, state),
            Widget::Button(_) | Widget::Title(_) | Widget::Messages(_) | Widget::ContactItem(_) => {
                None
            }
        }
    }

    pub fn draw(&mut self, frame: &mut Frame<'_>, state: &ChatState, is_active: bool) {
        match self {
            Widget::TextInput(w) => w.draw(frame, state, is_active),
            Widget::Button(w) => w.draw(frame, is_active),
            Widget::Title(w) => w.draw(frame),
            Widget::Messages(w) => w.draw(frame, state),
            Widget::ContactItem(w) => w.draw(frame),
            Widget::Contacts(w) => w.draw(frame, state, is_active),
        }
    }
}

macro_rules! impl_from_widget {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Widget {
            fn from(widget: $ty) -> Self {
                Widget::$variant(widget)
            }
        })*
    };
}

impl_from_widget! {
    TextInput => TextInput,
    Button => Button,
    ScreenTitle => Title,
    MessagesList => Messages,
    ContactItem => ContactItem,
    Contacts => Contacts,
}

pub(crate) fn bounds(pos: Position, size: Size) -> Rect {
    Rect::new(pos.x, pos.y, size.width, size.height)
}

/// The on-screen part of `rect`, or `None` if it lies entirely off-frame.
pub(crate) fn visible(frame: &Frame<'_>, rect: Rect) -> Option<Rect> {
    let area = rect.intersection(frame.area());
    (!area.is_empty()).then_some(area)
}
