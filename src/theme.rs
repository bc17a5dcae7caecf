//! Colours shared by all widgets.

use ratatui::style::{Color, Modifier, Style};

/// Raw RGB palette.
pub mod palette {
    pub const OUTLINE: (u8, u8, u8) = (150, 150, 150);
    pub const OUTLINE_ACTIVE: (u8, u8, u8) = (90, 140, 220);
    pub const TEXT: (u8, u8, u8) = (50, 50, 50);
    pub const TITLE: (u8, u8, u8) = (0, 0, 0);
    pub const AUTHOR: (u8, u8, u8) = (227, 0, 102);
    pub const TIMESTAMP: (u8, u8, u8) = (80, 80, 80);
    pub const LABEL: (u8, u8, u8) = (150, 150, 150);
    pub const PANEL: (u8, u8, u8) = (235, 235, 235);
    pub const HINT: (u8, u8, u8) = (215, 225, 245);
}

pub mod tui_palette {
    use super::*;

    // Convenience: convert palette tuple to ratatui Color.
    const fn rgb(c: (u8, u8, u8)) -> Color {
        Color::Rgb(c.0, c.1, c.2)
    }

    pub const OUTLINE: Color = rgb(palette::OUTLINE);
    pub const OUTLINE_ACTIVE: Color = rgb(palette::OUTLINE_ACTIVE);
    pub const TEXT: Color = rgb(palette::TEXT);
    pub const TITLE: Color = rgb(palette::TITLE);
    pub const AUTHOR: Color = rgb(palette::AUTHOR);
    pub const TIMESTAMP: Color = rgb(palette::TIMESTAMP);
    pub const LABEL: Color = rgb(palette::LABEL);
    pub const PANEL: Color = rgb(palette::PANEL);
    pub const HINT: Color = rgb(palette::HINT);

    pub fn outline(active: bool) -> Style {
        if active {
            Style::default().fg(OUTLINE_ACTIVE)
        } else {
            Style::default().fg(OUTLINE)
        }
    }

    pub fn title() -> Style {
        Style::default().fg(TITLE).add_modifier(Modifier::BOLD)
    }

    pub fn author() -> Style {
        Style::default().fg(AUTHOR).add_modifier(Modifier::BOLD)
    }
}
