//! In-memory backend and broker doubles for unit tests, plus a helper for
//! rendering widgets into a plain-text grid.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use ratatui::backend::TestBackend;
use ratatui::{Frame, Terminal};

use crate::backend::{BackendApi, BackendError, BroadcastEndpoint};
use crate::broker::{Broker, BrokerConnector, Subscription};

fn rejected(path: &str) -> BackendError {
    BackendError::Status {
        path: path.to_string(),
        status: 500,
        body: String::new(),
    }
}

#[derive(Default)]
pub struct FakeBackend {
    pub fail_login: bool,
    pub fail_broadcast: bool,
    pub fail_contacts: bool,
    pub reject_tokens: bool,
    pub contacts: Vec<String>,
    pub hints: Vec<String>,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl BackendApi for FakeBackend {
    fn signup(&self, login: &str, password: &str) -> Result<(), BackendError> {
        self.record(format!("signup {login} {password}"));
        Ok(())
    }

    fn login(&self, login: &str, password: &str) -> Result<String, BackendError> {
        self.record(format!("login {login} {password}"));
        if self.fail_login {
            return Err(rejected("/login"));
        }
        Ok(format!("token-{login}"))
    }

    fn broadcast_url(&self, token: &str) -> Result<BroadcastEndpoint, BackendError> {
        self.record(format!("broadcast_url {token}"));
        if self.fail_broadcast {
            return Err(rejected("/broadcast_url"));
        }
        Ok(BroadcastEndpoint {
            host: "127.0.0.1".into(),
            port: 6379,
            channel_name: "general".into(),
        })
    }

    fn contacts(&self, token: &str) -> Result<Vec<String>, BackendError> {
        self.record(format!("contacts {token}"));
        if self.fail_contacts {
            return Err(rejected("/contacts"));
        }
        Ok(self.contacts.clone())
    }

    fn search(&self, token: &str, term: &str) -> Result<Vec<String>, BackendError> {
        self.record(format!("search {token} {term}"));
        Ok(self.hints.clone())
    }

    fn add_contact(&self, token: &str, login: &str) -> Result<(), BackendError> {
        self.record(format!("add_contact {token} {login}"));
        Ok(())
    }

    fn validate_token(&self, token: &str) -> Result<bool, BackendError> {
        self.record(format!("validate_token {token}"));
        Ok(!self.reject_tokens)
    }
}

/// Records every publish; subscriptions replay `inbox`.
#[derive(Default)]
pub struct RecordingBroker {
    pub published: Mutex<Vec<(String, Vec<u8>)>>,
    pub inbox: Arc<Mutex<VecDeque<Vec<u8>>>>,
    pub fail_publish: bool,
}

impl RecordingBroker {
    pub fn published_payloads(&self) -> Vec<Vec<u8>> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    pub fn deliver(&self, payload: &[u8]) {
        self.inbox.lock().unwrap().push_back(payload.to_vec());
    }
}

impl Broker for RecordingBroker {
    fn publish(&self, channel: &str, payload: &[u8]) -> Result<()> {
        if self.fail_publish {
            return Err(anyhow!("broker unavailable"));
        }
        self.published
            .lock()
            .unwrap()
            .push((channel.to_string(), payload.to_vec()));
        Ok(())
    }

    fn subscribe(&self, _channel: &str) -> Result<Box<dyn Subscription>> {
        Ok(Box::new(InboxSubscription {
            inbox: Arc::clone(&self.inbox),
        }))
    }
}

pub struct InboxSubscription {
    pub inbox: Arc<Mutex<VecDeque<Vec<u8>>>>,
}

impl Subscription for InboxSubscription {
    fn try_next(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.inbox.lock().unwrap().pop_front())
    }
}

#[derive(Default)]
pub struct FakeConnector {
    connections: AtomicUsize,
}

impl FakeConnector {
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

impl BrokerConnector for FakeConnector {
    fn connect(&self, _endpoint: &BroadcastEndpoint) -> Result<Arc<dyn Broker>> {
        self.connections.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(RecordingBroker::default()))
    }
}

/// Draw onto a `width` x `height` test terminal and return each row as text.
pub fn render_rows(width: u16, height: u16, draw: impl FnOnce(&mut Frame<'_>)) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(draw).unwrap();
    let buffer = terminal.backend().buffer();
    (0..height)
        .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect())
        .collect()
}
