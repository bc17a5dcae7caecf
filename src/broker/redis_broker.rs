use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use crossbeam_channel::{Receiver, TryRecvError};
use tracing::{debug, warn};

use super::{Broker, BrokerConnector, Subscription};
use crate::backend::BroadcastEndpoint;

/// How long the subscriber thread blocks on a read before re-checking
/// whether its subscription was dropped.
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Connects to the Redis server named by the backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct RedisConnector;

impl BrokerConnector for RedisConnector {
    fn connect(&self, endpoint: &BroadcastEndpoint) -> Result<Arc<dyn Broker>> {
        let broker = RedisBroker::open(&endpoint.host, endpoint.port)?;
        Ok(Arc::new(broker))
    }
}

/// Redis PUBLISH/SUBSCRIBE broker.
///
/// The publishing connection is opened lazily and dropped after a failed
/// publish so the next attempt reconnects.
pub struct RedisBroker {
    client: redis::Client,
    publisher: Mutex<Option<redis::Connection>>,
}

impl RedisBroker {
    pub fn open(host: &str, port: u16) -> Result<Self> {
        let url = format!("redis://{host}:{port}/");
        let client = redis::Client::open(url.as_str())
            .with_context(|| format!("Invalid broker address {url}"))?;
        Ok(Self {
            client,
            publisher: Mutex::new(None),
        })
    }
}

impl Broker for RedisBroker {
    fn publish(&self, channel: &str, payload: &[u8]) -> Result<()> {
        let mut guard = self.publisher.lock().unwrap_or_else(PoisonError::into_inner);
        let mut conn = match guard.take() {
            Some(conn) => conn,
            None => self
                .client
                .get_connection()
                .context("Failed to connect to broker")?,
        };

        let receivers: i64 = redis::cmd("PUBLISH")
            .arg(channel)
            .arg(payload)
            .query(&mut conn)
            .context("Broker publish failed")?;
        *guard = Some(conn);

        debug!(channel, receivers, "published message");
        Ok(())
    }

    fn subscribe(&self, channel: &str) -> Result<Box<dyn Subscription>> {
        let mut conn = self
            .client
            .get_connection()
            .context("Failed to open subscriber connection")?;

        let (tx, rx) = crossbeam_channel::unbounded::<Vec<u8>>();
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<redis::RedisResult<()>>(1);
        let closed = Arc::new(AtomicBool::new(false));
        let reader_closed = Arc::clone(&closed);
        let channel_name = channel.to_string();

        thread::Builder::new()
            .name("redis-subscriber".into())
            .spawn(move || {
                let mut pubsub = conn.as_pubsub();
                let setup = pubsub
                    .subscribe(&channel_name)
                    .and_then(|_| pubsub.set_read_timeout(Some(READ_TIMEOUT)));
                let subscribed = setup.is_ok();
                let _ = ready_tx.send(setup);
                if !subscribed {
                    return;
                }

                while !reader_closed.load(Ordering::Relaxed) {
                    match pubsub.get_message() {
                        Ok(msg) => {
                            if tx.send(msg.get_payload_bytes().to_vec()).is_err() {
                                break;
                            }
                        }
                        Err(e) if e.is_timeout() => continue,
                        Err(e) => {
                            warn!(error = %e, channel = %channel_name, "subscription read failed");
                            break;
                        }
                    }
                }
                debug!(channel = %channel_name, "subscriber thread exiting");
            })
            .context("Failed to spawn subscriber thread")?;

        ready_rx
            .recv()
            .context("Subscriber thread exited during setup")?
            .with_context(|| format!("Failed to subscribe to {channel}"))?;

        Ok(Box::new(RedisSubscription { rx, closed }))
    }
}

struct RedisSubscription {
    rx: Receiver<Vec<u8>>,
    closed: Arc<AtomicBool>,
}

impl Subscription for RedisSubscription {
    fn try_next(&mut self) -> Result<Option<Vec<u8>>> {
        match self.rx.try_recv() {
            Ok(payload) => Ok(Some(payload)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(anyhow!("Broker subscription closed")),
        }
    }
}

impl Drop for RedisSubscription {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::Relaxed);
    }
}
