use ratatui::layout::{Position, Size};

use super::{SCREEN_WIDTH, Screen};
use crate::action::Action;
use crate::state::Field;
use crate::widgets::{Button, ScreenTitle, TextInput};

const FORM_WIDTH: u16 = 40;

/// Login and password form with a submit button.
pub fn build() -> Screen {
    let center = SCREEN_WIDTH / 2;
    let left = center - FORM_WIDTH / 2;

    let mut screen = Screen::new();
    screen.add_widget(ScreenTitle::new(Position::new(center, 2), "Sign Up"));
    screen.add_widget(TextInput::new(
        Position::new(left, 6),
        Size::new(FORM_WIDTH, 3),
        "Login",
        Field::Login,
    ));
    screen.add_widget(
        TextInput::new(
            Position::new(left, 10),
            Size::new(FORM_WIDTH, 3),
            "Password",
            Field::Password,
        )
        .masked(),
    );
    screen.add_widget(Button::new(
        Position::new(center - 6, 14),
        Size::new(12, 3),
        "Submit",
        Action::Signup,
    ));
    screen
}
