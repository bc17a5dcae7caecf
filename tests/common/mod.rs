//! Shared fixtures: an in-process backend and a loopback broker that fans
//! every publish out to all open subscriptions.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use relaychat::backend::{BackendApi, BackendError, BroadcastEndpoint};
use relaychat::broker::{Broker, BrokerConnector, Subscription};
use relaychat::store::Store;

pub const CHANNEL: &str = "general";

/// Accepts every login; tokens are `token-<login>`.
#[derive(Default)]
pub struct StubBackend {
    pub directory: Vec<String>,
    pub contacts: Mutex<Vec<String>>,
    pub valid_tokens: Vec<String>,
}

impl BackendApi for StubBackend {
    fn signup(&self, _login: &str, _password: &str) -> Result<(), BackendError> {
        Ok(())
    }

    fn login(&self, login: &str, _password: &str) -> Result<String, BackendError> {
        Ok(format!("token-{login}"))
    }

    fn broadcast_url(&self, _token: &str) -> Result<BroadcastEndpoint, BackendError> {
        Ok(BroadcastEndpoint {
            host: "127.0.0.1".into(),
            port: 6379,
            channel_name: CHANNEL.into(),
        })
    }

    fn contacts(&self, _token: &str) -> Result<Vec<String>, BackendError> {
        Ok(self.contacts.lock().unwrap().clone())
    }

    fn search(&self, _token: &str, term: &str) -> Result<Vec<String>, BackendError> {
        Ok(self
            .directory
            .iter()
            .filter(|login| login.starts_with(term))
            .cloned()
            .collect())
    }

    fn add_contact(&self, _token: &str, login: &str) -> Result<(), BackendError> {
        self.contacts.lock().unwrap().push(login.to_string());
        Ok(())
    }

    fn validate_token(&self, token: &str) -> Result<bool, BackendError> {
        Ok(self.valid_tokens.iter().any(|t| t == token))
    }
}

type Inbox = Arc<Mutex<VecDeque<Vec<u8>>>>;

#[derive(Default)]
pub struct LoopbackBroker {
    subscribers: Mutex<Vec<(String, Inbox)>>,
}

impl Broker for LoopbackBroker {
    fn publish(&self, channel: &str, payload: &[u8]) -> Result<()> {
        for (subscribed, inbox) in self.subscribers.lock().unwrap().iter() {
            if subscribed == channel {
                inbox.lock().unwrap().push_back(payload.to_vec());
            }
        }
        Ok(())
    }

    fn subscribe(&self, channel: &str) -> Result<Box<dyn Subscription>> {
        let inbox = Inbox::default();
        self.subscribers
            .lock()
            .unwrap()
            .push((channel.to_string(), Arc::clone(&inbox)));
        Ok(Box::new(LoopbackSubscription { inbox }))
    }
}

struct LoopbackSubscription {
    inbox: Inbox,
}

impl Subscription for LoopbackSubscription {
    fn try_next(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.inbox.lock().unwrap().pop_front())
    }
}

/// Hands every client the same broker.
pub struct LoopbackConnector(pub Arc<LoopbackBroker>);

impl BrokerConnector for LoopbackConnector {
    fn connect(&self, _endpoint: &BroadcastEndpoint) -> Result<Arc<dyn Broker>> {
        Ok(self.0.clone())
    }
}

pub fn client(backend: Arc<StubBackend>, broker: &Arc<LoopbackBroker>) -> Store {
    Store::new(backend, Arc::new(LoopbackConnector(Arc::clone(broker))))
}

/// Poll `check` until it holds or `timeout` passes.
pub fn eventually(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    check()
}
