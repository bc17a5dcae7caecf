use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Position};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::action::Action;
use crate::config::Config;
use crate::screens::{Screen, messenger, signup};
use crate::state::ChatState;
use crate::store::Store;

pub const SIGNUP_SCREEN: usize = 0;
pub const MESSENGER_SCREEN: usize = 1;

pub struct App {
    store: Store,
    screens: Vec<Screen>,
    active_screen: usize,
    frame_budget: Duration,
    should_quit: bool,
}

impl App {
    pub fn new(store: Store, config: &Config) -> Self {
        Self {
            store,
            screens: vec![signup::build(), messenger::build()],
            active_screen: SIGNUP_SCREEN,
            frame_budget: config.frame_budget(),
            should_quit: false,
        }
    }

    pub fn active_screen(&self) -> usize {
        self.active_screen
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Move to the messenger once authorized. There is no way back.
    pub fn sync_active_screen(&mut self) {
        if self.active_screen != MESSENGER_SCREEN && self.store.is_authorized() {
            info!("switching to messenger screen");
            self.active_screen = MESSENGER_SCREEN;
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        let action = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if is_quit(&key) {
                    Some(Action::Quit)
                } else {
                    self.route(|screen, state| screen.handle_key(key, state))
                }
            }
            Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                let at = Position::new(mouse.column, mouse.row);
                self.route(|screen, state| screen.handle_click(at, state))
            }
            _ => None,
        };

        if let Some(action) = action {
            self.dispatch(action);
        }
    }

    /// Run `f` on the active screen with the state locked. The lock is
    /// released before the returned action is dispatched.
    fn route(
        &mut self,
        f: impl FnOnce(&mut Screen, &mut ChatState) -> Option<Action>,
    ) -> Option<Action> {
        let screen = self.screens.get_mut(self.active_screen)?;
        let mut state = self.store.lock();
        f(screen, &mut *state)
    }

    pub fn dispatch(&mut self, action: Action) {
        debug!(%action, "dispatching");
        match action {
            Action::Signup => {
                if let Err(e) = self.store.signup() {
                    error!("signup failed: {e:#}");
                }
            }
            Action::SendMessage => {
                if let Err(e) = self.store.send_message() {
                    error!("could not queue message: {e:#}");
                }
            }
            Action::RefreshContacts => self.store.get_contacts(),
            Action::SearchContacts => self.store.search_contacts(),
            Action::AddFriend(login) => self.store.add_friend(&login),
            Action::Quit => self.should_quit = true,
        }
    }

    pub fn draw(&mut self, frame: &mut Frame<'_>) {
        let Some(screen) = self.screens.get_mut(self.active_screen) else {
            return;
        };
        let state = self.store.lock();
        screen.draw(frame, &state);
    }

    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Run the app
        let res = self.run_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        res
    }

    fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        while !self.should_quit {
            let started = Instant::now();
            self.sync_active_screen();

            while event::poll(Duration::ZERO)? {
                self.handle_event(event::read()?);
                if self.should_quit {
                    return Ok(());
                }
            }

            terminal.draw(|frame| self.draw(frame))?;

            // Wait out the rest of the frame, waking early for input.
            let remaining = self.frame_budget.saturating_sub(started.elapsed());
            event::poll(remaining)?;
        }
        Ok(())
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
}

/// Best-effort terminal restore for the panic hook.
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, FakeConnector, render_rows};
    use crossterm::event::{MouseButton, MouseEvent};
    use std::sync::Arc;

    fn app_with(backend: FakeBackend) -> (App, Store) {
        let store = Store::new(Arc::new(backend), Arc::new(FakeConnector::default()));
        (App::new(store.clone(), &Config::default()), store)
    }

    fn click(x: u16, y: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)));
        }
    }

    #[test]
    fn starts_on_signup_screen() {
        let (app, _) = app_with(FakeBackend::default());
        assert_eq!(app.active_screen(), SIGNUP_SCREEN);
        assert!(!app.should_quit());
    }

    #[test]
    fn ctrl_c_and_ctrl_q_quit() {
        for c in ['c', 'q'] {
            let (mut app, _) = app_with(FakeBackend::default());
            app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)));
            assert!(app.should_quit());
        }
    }

    #[test]
    fn plain_q_is_just_a_character() {
        let (mut app, store) = app_with(FakeBackend::default());
        app.handle_event(click(30, 7));
        type_text(&mut app, "q");
        assert!(!app.should_quit());
        assert_eq!(store.lock().login, "q");
    }

    #[test]
    fn signup_flow_switches_to_messenger() {
        let (mut app, store) = app_with(FakeBackend::default());
        app.handle_event(click(30, 7));
        type_text(&mut app, "alice");
        app.handle_event(click(30, 11));
        type_text(&mut app, "pw");
        app.handle_event(click(40, 15));

        assert!(store.is_authorized());
        assert_eq!(app.active_screen(), SIGNUP_SCREEN);
        app.sync_active_screen();
        assert_eq!(app.active_screen(), MESSENGER_SCREEN);
    }

    #[test]
    fn failed_signup_stays_on_signup() {
        let (mut app, store) = app_with(FakeBackend {
            fail_login: true,
            ..Default::default()
        });
        app.dispatch(Action::Signup);
        app.sync_active_screen();
        assert!(!store.is_authorized());
        assert_eq!(app.active_screen(), SIGNUP_SCREEN);
    }

    #[test]
    fn messenger_screen_is_never_left() {
        let (mut app, store) = app_with(FakeBackend::default());
        app.dispatch(Action::Signup);
        app.sync_active_screen();
        store.lock().is_authorized = false;
        app.sync_active_screen();
        assert_eq!(app.active_screen(), MESSENGER_SCREEN);
    }

    #[test]
    fn enter_in_message_box_queues_a_message() {
        let (mut app, store) = app_with(FakeBackend::default());
        store.lock().login = "alice".into();
        app.dispatch(Action::Signup);
        app.sync_active_screen();

        app.handle_event(click(40, 32));
        type_text(&mut app, "hi");
        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));

        let state = store.lock();
        assert_eq!(state.current_message, "");
        assert_eq!(state.queue.len(), 1);
    }

    #[test]
    fn key_release_is_ignored() {
        let (mut app, store) = app_with(FakeBackend::default());
        app.handle_event(click(30, 7));
        let mut release = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        app.handle_event(Event::Key(release));
        assert_eq!(store.lock().login, "");
    }

    #[test]
    fn draws_the_active_screen() {
        let (mut app, _) = app_with(FakeBackend::default());
        let rows = render_rows(80, 36, |frame| app.draw(frame));
        assert!(rows[2].contains("Sign Up"));

        app.dispatch(Action::Signup);
        app.sync_active_screen();
        let rows = render_rows(80, 36, |frame| app.draw(frame));
        assert!(rows[1].contains("Messenger"));
        assert!(rows[2].contains("Contacts"));
    }
}
