//! Shared state store and the operations that move data between the UI,
//! the backend and the broker.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::backend::BackendApi;
use crate::broker::{Broker, BrokerConnector};
use crate::message::ChatMessage;
use crate::session::{self, SavedSession};
use crate::state::ChatState;

/// Cloneable handle to the shared [`ChatState`].
///
/// Network calls are always made without holding the state lock, so the sync
/// loops keep running while the UI thread waits on the backend.
#[derive(Clone)]
pub struct Store {
    state: Arc<Mutex<ChatState>>,
    backend: Arc<dyn BackendApi>,
    connector: Arc<dyn BrokerConnector>,
    session_file: Option<PathBuf>,
}

impl Store {
    pub fn new(backend: Arc<dyn BackendApi>, connector: Arc<dyn BrokerConnector>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ChatState::default())),
            backend,
            connector,
            session_file: None,
        }
    }

    /// Persist the session token here after a successful signup.
    pub fn with_session_file(mut self, path: PathBuf) -> Self {
        self.session_file = Some(path);
        self
    }

    pub fn lock(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_authorized(&self) -> bool {
        self.lock().is_authorized
    }

    /// Register, log in, and join the broadcast channel.
    ///
    /// Any failure aborts the sequence. Fields set before the failing step
    /// (the token, for instance) are left in place.
    pub fn signup(&self) -> Result<()> {
        let (login, password) = {
            let state = self.lock();
            (state.login.clone(), state.password.clone())
        };
        info!(login = %login, "signing up");

        self.backend
            .signup(&login, &password)
            .context("Signup request failed")?;
        let token = self
            .backend
            .login(&login, &password)
            .context("Login request failed")?;
        self.lock().token = Some(token.clone());

        self.open_broadcast(&token)?;
        self.persist_session(&token, &login);
        info!(login = %login, "authorized");
        Ok(())
    }

    /// Pick up a token saved by an earlier run.
    ///
    /// Returns `Ok(false)` when the backend no longer accepts the token.
    pub fn resume_session(&self, saved: &SavedSession) -> Result<bool> {
        let valid = self
            .backend
            .validate_token(&saved.token)
            .context("Token validation failed")?;
        if !valid {
            info!("saved session token was rejected");
            return Ok(false);
        }

        {
            let mut state = self.lock();
            state.token = Some(saved.token.clone());
            if state.login.is_empty() {
                state.login = saved.login.clone();
            }
        }
        self.open_broadcast(&saved.token)?;
        info!(login = %saved.login, "resumed saved session");
        Ok(true)
    }

    fn open_broadcast(&self, token: &str) -> Result<()> {
        let endpoint = self
            .backend
            .broadcast_url(token)
            .context("Broadcast endpoint lookup failed")?;
        let broker = self.connector.connect(&endpoint).with_context(|| {
            format!("Failed to connect to broker at {}:{}", endpoint.host, endpoint.port)
        })?;

        let mut state = self.lock();
        state.broker = Some(broker);
        state.broadcast_channel = Some(endpoint.channel_name);
        state.is_authorized = true;
        Ok(())
    }

    fn persist_session(&self, token: &str, login: &str) {
        let Some(path) = &self.session_file else {
            return;
        };
        let saved = SavedSession {
            token: token.to_string(),
            login: login.to_string(),
        };
        if let Err(e) = session::save(path, &saved) {
            warn!(error = %e, "could not persist session");
        }
    }

    pub fn send_message(&self) -> Result<()> {
        self.send_message_at(Local::now())
    }

    /// Queue the current message stamped with `at` and clear the input.
    /// Does nothing when the input is empty.
    pub fn send_message_at(&self, at: DateTime<Local>) -> Result<()> {
        let mut state = self.lock();
        if state.current_message.is_empty() {
            return Ok(());
        }
        let message = ChatMessage::new(state.login.clone(), state.current_message.clone(), at);
        state.queue.push_back(message.encode()?);
        state.current_message.clear();
        debug!(queued = state.queue.len(), "message queued");
        Ok(())
    }

    fn token(&self) -> String {
        self.lock().token.clone().unwrap_or_default()
    }

    /// Reload contacts. Failures are logged and the old list is kept.
    pub fn get_contacts(&self) {
        match self.backend.contacts(&self.token()) {
            Ok(contacts) => self.lock().contacts = contacts,
            Err(e) => warn!(error = %e, "could not load contacts"),
        }
    }

    /// Look up contacts matching `term`. Failures are logged and the old
    /// hints are kept.
    pub fn get_contact_hints(&self, term: &str) {
        match self.backend.search(&self.token(), term) {
            Ok(hints) => self.lock().contact_hints = hints,
            Err(e) => warn!(error = %e, term, "contact search failed"),
        }
    }

    /// Search with whatever is typed in the contacts search box.
    pub fn search_contacts(&self) {
        let term = self.lock().search_input.clone();
        self.get_contact_hints(&term);
    }

    pub fn add_friend(&self, login: &str) {
        if let Err(e) = self.backend.add_contact(&self.token(), login) {
            warn!(error = %e, login, "could not add contact");
        }
        self.get_contacts();
    }

    /// Broker and channel, once both are known.
    pub fn broker_handle(&self) -> Option<(Arc<dyn Broker>, String)> {
        let state = self.lock();
        let broker = state.broker.clone()?;
        let channel = state.broadcast_channel.clone()?;
        Some((broker, channel))
    }

    pub fn pop_outgoing(&self) -> Option<Vec<u8>> {
        self.lock().queue.pop_front()
    }

    /// Put a payload back at the head of the queue after a failed publish.
    pub fn requeue_front(&self, payload: Vec<u8>) {
        self.lock().queue.push_front(payload);
    }

    pub fn push_message(&self, message: ChatMessage) {
        self.lock().messages.push(message);
    }
}
