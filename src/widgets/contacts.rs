use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};

use super::{TextInput, bounds, visible};
use crate::action::Action;
use crate::state::{ChatState, Field};
use crate::theme::tui_palette as tp;

const TITLE: &str = "Contacts";
const CLOSE_LABEL: &str = "[x]";
/// First row of the contact list / hint dropdown, relative to the panel top.
const LIST_OFFSET: u16 = 5;

/// One line in the contact list.
pub struct ContactItem {
    pos: Position,
    size: Size,
    login: String,
}

impl ContactItem {
    pub fn new(pos: Position, width: u16, login: impl Into<String>) -> Self {
        Self {
            pos,
            size: Size::new(width, 1),
            login: login.into(),
        }
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let Some(area) = visible(frame, bounds(self.pos, self.size)) else {
            return;
        };
        let line = Line::styled(format!("• {}", self.login), Style::default().fg(tp::TEXT));
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Collapsible contacts panel with a search box and a hint dropdown.
///
/// Collapsed it is a small titled box; any click expands it. Expanded it
/// shows a close button, the contact list and the search input. Hints from
/// the last search are listed under the search box while it has focus, and
/// clicking one adds that login as a contact.
pub struct Contacts {
    pos: Position,
    size: Size,
    hidden_size: Size,
    shown_size: Size,
    hidden: bool,
    search_active: bool,
    search: TextInput,
    items: Vec<ContactItem>,
    /// Logins the current `items` were built from.
    listed: Vec<String>,
}

impl Contacts {
    pub fn new(pos: Position, hidden_size: Size, shown_size: Size) -> Self {
        let search = TextInput::new(
            Position::new(pos.x.saturating_add(1), pos.y.saturating_add(2)),
            Size::new(shown_size.width.saturating_sub(2), 3),
            "Search",
            Field::SearchInput,
        )
        .on_enter(Action::SearchContacts);

        Self {
            pos,
            size: hidden_size,
            hidden_size,
            shown_size,
            hidden: true,
            search_active: false,
            search,
            items: Vec::new(),
            listed: Vec::new(),
        }
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn search_is_active(&self) -> bool {
        self.search_active
    }

    pub fn items(&self) -> &[ContactItem] {
        &self.items
    }

    pub fn close_rect(&self) -> Rect {
        let width = CLOSE_LABEL.len() as u16;
        let x = self.pos.x.saturating_add(self.shown_size.width.saturating_sub(width + 2));
        Rect::new(x, self.pos.y.saturating_add(1), width, 1)
    }

    pub fn search_rect(&self) -> Rect {
        bounds(self.search.pos(), self.search.size())
    }

    /// Row `index` of the contact list / hint dropdown.
    fn list_row(&self, index: usize) -> Option<Rect> {
        let offset = u16::try_from(index).ok()?.checked_add(LIST_OFFSET)?;
        let y = self.pos.y.checked_add(offset)?;
        // Stay above the bottom border.
        if y >= self.pos.y.saturating_add(self.size.height.saturating_sub(1)) {
            return None;
        }
        Some(Rect::new(
            self.pos.x.saturating_add(1),
            y,
            self.size.width.saturating_sub(2),
            1,
        ))
    }

    fn hint_at(&self, at: Position, hints: &[String]) -> Option<String> {
        hints
            .iter()
            .enumerate()
            .find(|(index, _)| self.list_row(*index).is_some_and(|row| row.contains(at)))
            .map(|(_, hint)| hint.clone())
    }

    /// Rebuild the contact lines when the stored contact list changed.
    fn sync_items(&mut self, contacts: &[String]) {
        if self.listed == contacts {
            return;
        }
        let x = self.pos.x.saturating_add(2);
        let width = self.shown_size.width.saturating_sub(4);
        let first = self.pos.y.saturating_add(LIST_OFFSET);
        self.items = contacts
            .iter()
            .enumerate()
            .map(|(index, login)| {
                let y = first.saturating_add(u16::try_from(index).unwrap_or(u16::MAX));
                ContactItem::new(Position::new(x, y), width, login.as_str())
            })
            .collect();
        self.listed = contacts.to_vec();
    }

    pub fn handle_click(&mut self, at: Position, state: &mut ChatState) -> Option<Action> {
        if self.hidden {
            self.hidden = false;
            self.size = self.shown_size;
            self.sync_items(&state.contacts);
            return Some(Action::RefreshContacts);
        }

        if self.close_rect().contains(at) {
            self.hidden = true;
            self.size = self.hidden_size;
            self.search_active = false;
            return None;
        }

        if self.search_rect().contains(at) {
            self.search_active = true;
            return None;
        }

        let picked = if self.search_active {
            self.hint_at(at, &state.contact_hints)
        } else {
            None
        };
        self.search_active = false;
        picked.map(Action::AddFriend)
    }

    /// Keys reach the search box only while the panel is expanded.
    pub fn handle_key(&mut self, key: KeyEvent, state: &mut ChatState) -> Option<Action> {
        if self.hidden {
            return None;
        }
        self.search.handle_key(key, state)
    }

    pub fn draw(&mut self, frame: &mut Frame<'_>, state: &ChatState, is_active: bool) {
        let Some(area) = visible(frame, bounds(self.pos, self.size)) else {
            return;
        };

        if self.hidden {
            let block = Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(tp::outline(is_active));
            frame.render_widget(Paragraph::new(Line::styled(TITLE, tp::title())).block(block), area);
            return;
        }

        self.sync_items(&state.contacts);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(tp::outline(is_active))
            .style(Style::default().bg(tp::PANEL));
        frame.render_widget(block, area);

        let header = Rect::new(
            self.pos.x.saturating_add(2),
            self.pos.y.saturating_add(1),
            self.size.width.saturating_sub(4),
            1,
        );
        if let Some(header) = visible(frame, header) {
            frame.render_widget(Paragraph::new(Line::styled(TITLE, tp::title())), header);
        }
        if let Some(close) = visible(frame, self.close_rect()) {
            frame.render_widget(Paragraph::new(Line::styled(CLOSE_LABEL, tp::author())), close);
        }

        self.search.draw(frame, state, self.search_active);

        for (index, item) in self.items.iter().enumerate() {
            if self.list_row(index).is_none() {
                break;
            }
            item.draw(frame);
        }

        if self.search_active {
            for (index, hint) in state.contact_hints.iter().enumerate() {
                let Some(row) = self.list_row(index).and_then(|row| visible(frame, row)) else {
                    break;
                };
                let line = Line::from(Span::styled(
                    format!(" + {hint}"),
                    Style::default().fg(tp::TEXT).bg(tp::HINT),
                ));
                frame.render_widget(
                    Paragraph::new(line).style(Style::default().bg(tp::HINT)),
                    row,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::render_rows;
    use crossterm::event::{KeyCode, KeyModifiers};

    const HIDDEN: Size = Size::new(14, 3);
    const SHOWN: Size = Size::new(26, 16);

    fn panel() -> Contacts {
        Contacts::new(Position::new(0, 0), HIDDEN, SHOWN)
    }

    fn center(rect: Rect) -> Position {
        Position::new(rect.x + rect.width / 2, rect.y + rect.height / 2)
    }

    #[test]
    fn starts_hidden_at_hidden_size() {
        let panel = panel();
        assert!(panel.is_hidden());
        assert_eq!(panel.size(), HIDDEN);
        assert!(!panel.search_is_active());
    }

    #[test]
    fn click_expands_then_close_collapses() {
        let mut panel = panel();
        let mut state = ChatState::default();

        let action = panel.handle_click(Position::new(3, 1), &mut state);
        assert_eq!(action, Some(Action::RefreshContacts));
        assert!(!panel.is_hidden());
        assert_eq!(panel.size(), SHOWN);

        panel.handle_click(center(panel.search_rect()), &mut state);
        assert!(panel.search_is_active());

        let action = panel.handle_click(center(panel.close_rect()), &mut state);
        assert_eq!(action, None);
        assert!(panel.is_hidden());
        assert_eq!(panel.size(), HIDDEN);
        assert!(!panel.search_is_active());
    }

    #[test]
    fn click_elsewhere_drops_search_focus() {
        let mut panel = panel();
        let mut state = ChatState::default();
        panel.handle_click(Position::new(1, 1), &mut state);
        panel.handle_click(center(panel.search_rect()), &mut state);
        assert!(panel.search_is_active());

        let action = panel.handle_click(Position::new(5, 14), &mut state);
        assert_eq!(action, None);
        assert!(!panel.search_is_active());
        assert!(!panel.is_hidden());
    }

    #[test]
    fn clicking_a_hint_adds_that_contact() {
        let mut panel = panel();
        let mut state = ChatState {
            contact_hints: vec!["bob".into(), "bobby".into()],
            ..Default::default()
        };
        panel.handle_click(Position::new(1, 1), &mut state);
        panel.handle_click(center(panel.search_rect()), &mut state);

        let second_hint = Position::new(4, LIST_OFFSET + 1);
        let action = panel.handle_click(second_hint, &mut state);
        assert_eq!(action, Some(Action::AddFriend("bobby".into())));
        assert!(!panel.search_is_active());
    }

    #[test]
    fn hints_are_not_clickable_without_search_focus() {
        let mut panel = panel();
        let mut state = ChatState {
            contact_hints: vec!["bob".into()],
            ..Default::default()
        };
        panel.handle_click(Position::new(1, 1), &mut state);
        assert_eq!(panel.handle_click(Position::new(4, LIST_OFFSET), &mut state), None);
    }

    #[test]
    fn keys_go_to_the_search_input() {
        let mut panel = panel();
        let mut state = ChatState::default();
        panel.handle_click(Position::new(1, 1), &mut state);
        for c in "bo".chars() {
            panel.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), &mut state);
        }
        assert_eq!(state.search_input, "bo");
        assert_eq!(state.current_message, "");

        let action = panel.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &mut state);
        assert_eq!(action, Some(Action::SearchContacts));
    }

    #[test]
    fn collapsed_panel_ignores_keys() {
        let mut panel = panel();
        let mut state = ChatState::default();
        panel.handle_click(Position::new(1, 1), &mut state);
        panel.handle_click(center(panel.close_rect()), &mut state);
        assert!(panel.is_hidden());

        let action = panel.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE), &mut state);
        assert_eq!(action, None);
        let action = panel.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &mut state);
        assert_eq!(action, None);
        assert_eq!(state.search_input, "");
    }

    #[test]
    fn items_follow_stored_contacts() {
        let mut panel = panel();
        let mut state = ChatState {
            contacts: vec!["bob".into(), "carol".into()],
            ..Default::default()
        };
        panel.handle_click(Position::new(1, 1), &mut state);
        let logins: Vec<&str> = panel.items().iter().map(ContactItem::login).collect();
        assert_eq!(logins, vec!["bob", "carol"]);

        state.contacts.push("dave".into());
        let rows = render_rows(30, 20, |frame| panel.draw(frame, &state, true));
        assert_eq!(panel.items().len(), 3);
        assert!(rows.iter().any(|row| row.contains("• dave")));
    }

    #[test]
    fn hidden_panel_draws_only_its_title() {
        let mut panel = panel();
        let state = ChatState {
            contacts: vec!["bob".into()],
            ..Default::default()
        };
        let rows = render_rows(30, 20, |frame| panel.draw(frame, &state, false));
        assert!(rows[1].contains(TITLE));
        assert!(rows.iter().all(|row| !row.contains("bob")));
    }

    #[test]
    fn dropdown_shows_hints_only_while_searching() {
        let mut panel = panel();
        let mut state = ChatState {
            contact_hints: vec!["erin".into()],
            ..Default::default()
        };
        panel.handle_click(Position::new(1, 1), &mut state);

        let rows = render_rows(30, 20, |frame| panel.draw(frame, &state, true));
        assert!(rows.iter().all(|row| !row.contains("erin")));

        panel.handle_click(center(panel.search_rect()), &mut state);
        let rows = render_rows(30, 20, |frame| panel.draw(frame, &state, true));
        assert!(rows[usize::from(LIST_OFFSET)].contains("+ erin"));
    }
}
