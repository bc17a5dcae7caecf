//! Background loops that move messages between the store and the broker.
//!
//! The sender drains the outgoing queue; the receiver appends whatever the
//! subscription delivers to the history. Both stop as soon as the shutdown
//! channel is closed, even mid-wait.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use tracing::{debug, info, warn};

use crate::broker::Subscription;
use crate::message::ChatMessage;
use crate::store::Store;

/// Closing side of the shutdown channel. Dropping it also signals shutdown.
pub struct ShutdownHandle {
    tx: Option<Sender<()>>,
}

impl ShutdownHandle {
    pub fn trigger(&mut self) {
        self.tx.take();
    }
}

/// Observing side of the shutdown channel.
#[derive(Clone)]
pub struct ShutdownSignal {
    rx: Receiver<()>,
}

impl ShutdownSignal {
    pub fn is_requested(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Sleep for up to `timeout`. Returns `true` if shutdown was requested.
    pub fn wait(&self, timeout: Duration) -> bool {
        matches!(self.rx.recv_timeout(timeout), Err(RecvTimeoutError::Disconnected))
    }
}

pub fn shutdown_channel() -> (ShutdownHandle, ShutdownSignal) {
    let (tx, rx) = crossbeam_channel::bounded(0);
    (ShutdownHandle { tx: Some(tx) }, ShutdownSignal { rx })
}

#[derive(Debug, Clone)]
pub struct SyncTiming {
    /// Wait between attempts while no broker is connected.
    pub connect_retry: Duration,
    /// Wait between subscription drains.
    pub receive_poll: Duration,
    /// Wait when connected but the queue is empty.
    pub sender_idle: Duration,
}

impl Default for SyncTiming {
    fn default() -> Self {
        Self {
            connect_retry: Duration::from_secs(1),
            receive_poll: Duration::from_secs(1),
            sender_idle: Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    NotConnected,
    Idle,
    Published,
    /// Publish failed; the payload went back to the head of the queue.
    Failed,
}

/// One sender iteration: publish the oldest queued payload, if any.
pub fn send_next(store: &Store) -> SendOutcome {
    let Some((broker, channel)) = store.broker_handle() else {
        return SendOutcome::NotConnected;
    };
    let Some(payload) = store.pop_outgoing() else {
        return SendOutcome::Idle;
    };
    match broker.publish(&channel, &payload) {
        Ok(()) => SendOutcome::Published,
        Err(e) => {
            warn!(error = %e, "publish failed, message re-queued");
            store.requeue_front(payload);
            SendOutcome::Failed
        }
    }
}

pub fn run_sender(store: &Store, shutdown: &ShutdownSignal, timing: &SyncTiming) {
    info!("sender loop started");
    while !shutdown.is_requested() {
        let pause = match send_next(store) {
            SendOutcome::Published => continue,
            SendOutcome::Idle => timing.sender_idle,
            SendOutcome::NotConnected | SendOutcome::Failed => timing.connect_retry,
        };
        if shutdown.wait(pause) {
            break;
        }
    }
    info!("sender loop stopped");
}

/// Append every payload currently buffered on `subscription` to the history.
///
/// Returns how many messages were appended. Undecodable payloads are logged
/// and skipped.
pub fn drain_subscription(store: &Store, subscription: &mut dyn Subscription) -> Result<usize> {
    let mut received = 0;
    while let Some(payload) = subscription.try_next()? {
        match ChatMessage::decode(&payload) {
            Ok(message) => {
                store.push_message(message);
                received += 1;
            }
            Err(e) => warn!(error = %e, bytes = payload.len(), "dropping undecodable payload"),
        }
    }
    Ok(received)
}

pub fn run_receiver(store: &Store, shutdown: &ShutdownSignal, timing: &SyncTiming) {
    info!("receiver loop started");
    'session: while !shutdown.is_requested() {
        let (broker, channel) = loop {
            if let Some(handle) = store.broker_handle() {
                break handle;
            }
            if shutdown.wait(timing.connect_retry) {
                break 'session;
            }
        };

        let mut subscription = match broker.subscribe(&channel) {
            Ok(subscription) => subscription,
            Err(e) => {
                warn!(error = %e, channel = %channel, "subscribe failed");
                if shutdown.wait(timing.connect_retry) {
                    break;
                }
                continue;
            }
        };
        info!(channel = %channel, "subscribed to broadcast channel");

        loop {
            match drain_subscription(store, subscription.as_mut()) {
                Ok(0) => {}
                Ok(received) => debug!(received, "received messages"),
                Err(e) => {
                    warn!(error = %e, "subscription lost, resubscribing");
                    break;
                }
            }
            if shutdown.wait(timing.receive_poll) {
                break 'session;
            }
        }

        if shutdown.wait(timing.connect_retry) {
            break;
        }
    }
    info!("receiver loop stopped");
}

/// The running sender and receiver threads.
pub struct SyncWorkers {
    shutdown: ShutdownHandle,
    handles: Vec<JoinHandle<()>>,
}

impl SyncWorkers {
    pub fn spawn(store: &Store, timing: SyncTiming) -> Result<Self> {
        let (shutdown, signal) = shutdown_channel();
        let mut handles = Vec::with_capacity(2);

        {
            let store = store.clone();
            let signal = signal.clone();
            let timing = timing.clone();
            let handle = thread::Builder::new()
                .name("message-sender".into())
                .spawn(move || run_sender(&store, &signal, &timing))
                .context("Failed to spawn sender thread")?;
            handles.push(handle);
        }
        {
            let store = store.clone();
            let handle = thread::Builder::new()
                .name("message-receiver".into())
                .spawn(move || run_receiver(&store, &signal, &timing))
                .context("Failed to spawn receiver thread")?;
            handles.push(handle);
        }

        Ok(Self { shutdown, handles })
    }

    /// Signal both loops and wait for them to finish.
    pub fn stop(mut self) {
        self.shutdown.trigger();
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                warn!("sync worker panicked");
            }
        }
    }
}
