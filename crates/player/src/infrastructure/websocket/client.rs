//! WebSocket client using tokio-tungstenite
//!
//! One [`TransportManager`] owns the single logical channel to the server.
//! Every lifecycle decision is delegated to [`TransportCore`]; this file only
//! drives the socket, the heartbeat and the reconnect sleep.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use url::Url;

use tableau_shared::{decode_server, encode_client, ClientMessage, ServerMessage};

use super::core::TransportCore;
use super::shared::{endpoint_url, frame_preview, TransportConfig};
use crate::infrastructure::messaging::{ConnectionState, ConnectionStateObserver, EventBus};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long an intentional close waits for the close frame to go out.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Owner of the connection to the game server.
///
/// Cheap to clone; all clones drive the same connection.
#[derive(Clone)]
pub struct TransportManager {
    inner: Arc<Inner>,
}

struct Inner {
    origin: Url,
    config: TransportConfig,
    link: Mutex<Link>,
    state_tx: watch::Sender<ConnectionState>,
    events: EventBus,
}

/// Everything that changes together when a lifecycle starts or ends.
struct Link {
    core: TransportCore,
    cancel: Option<CancellationToken>,
    outbound: Option<mpsc::UnboundedSender<String>>,
}

impl TransportManager {
    /// Create a disconnected transport for the page at `origin`.
    pub fn new(origin: Url, config: TransportConfig) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        let core = TransportCore::new(&config);
        Self {
            inner: Arc::new(Inner {
                origin,
                config,
                link: Mutex::new(Link {
                    core,
                    cancel: None,
                    outbound: None,
                }),
                state_tx,
                events: EventBus::new(),
            }),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state_tx.borrow()
    }

    pub fn observe(&self) -> ConnectionStateObserver {
        ConnectionStateObserver::new(self.inner.state_tx.subscribe())
    }

    /// Ordered stream of decoded inbound messages.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<ServerMessage> {
        let rx = self.inner.events.subscribe();
        tracing::debug!(
            subscribers = self.inner.events.subscriber_count(),
            "Inbound stream subscribed"
        );
        rx
    }

    /// Open the channel at `path` on the page origin.
    ///
    /// Any existing socket and pending reconnect are torn down first. A path
    /// that does not form a valid endpoint is logged and leaves the transport
    /// disconnected. Must be called from within a tokio runtime.
    pub fn connect(&self, path: &str) {
        let endpoint = endpoint_url(&self.inner.origin, path);

        let mut link = self.inner.lock();
        if let Some(cancel) = link.cancel.take() {
            cancel.cancel();
        }
        link.outbound = None;
        link.core.disconnect();
        self.inner.publish(&link.core);
        let epoch = link.core.connect();

        let url = match endpoint {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(error = %e, path = %path, "Cannot build websocket endpoint");
                link.core.construction_failed(epoch);
                self.inner.publish(&link.core);
                return;
            }
        };

        self.inner.publish(&link.core);
        let cancel = CancellationToken::new();
        link.cancel = Some(cancel.clone());
        drop(link);

        tracing::info!(url = %url, epoch, "Connecting");
        tokio::spawn(run_link(Arc::clone(&self.inner), url, epoch, cancel));
    }

    /// Close the channel on purpose. No reconnect follows; safe to repeat.
    pub fn disconnect(&self) {
        let mut link = self.inner.lock();
        if let Some(cancel) = link.cancel.take() {
            cancel.cancel();
            tracing::info!("Disconnecting");
        }
        link.outbound = None;
        link.core.disconnect();
        self.inner.publish(&link.core);
    }

    /// Write one message if connected; otherwise it is dropped.
    pub fn send(&self, message: ClientMessage) {
        let link = self.inner.lock();
        let outbound = match (&link.outbound, link.core.can_send()) {
            (Some(outbound), true) => outbound,
            _ => {
                tracing::debug!(
                    kind = message.type_name(),
                    state = %link.core.state(),
                    "Not connected; dropping outbound message"
                );
                return;
            }
        };

        match encode_client(&message) {
            Ok(frame) => {
                if outbound.send(frame).is_err() {
                    tracing::debug!(kind = message.type_name(), "Link closed before send");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, kind = message.type_name(), "Failed to encode message")
            }
        }
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Link> {
        self.link.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, core: &TransportCore) {
        let next = core.state();
        let previous = self.state_tx.send_replace(next);
        if previous != next {
            tracing::debug!(from = %previous, to = %next, "Connection state changed");
        }
    }

    fn opened(&self, epoch: u64, outbound: mpsc::UnboundedSender<String>) -> bool {
        let mut link = self.lock();
        if !link.core.on_open(epoch) {
            return false;
        }
        link.outbound = Some(outbound);
        self.publish(&link.core);
        true
    }

    fn closed(&self, epoch: u64) -> Option<Duration> {
        let mut link = self.lock();
        if !link.core.is_current(epoch) {
            return None;
        }
        link.outbound = None;
        let delay = link.core.on_close(epoch);
        self.publish(&link.core);
        delay
    }

    fn reconnect_due(&self, epoch: u64) -> bool {
        let mut link = self.lock();
        let due = link.core.on_reconnect_due(epoch);
        if due {
            self.publish(&link.core);
        }
        due
    }

    fn deliver(&self, epoch: u64, text: &str) {
        if !self.lock().core.is_current(epoch) {
            return;
        }
        match decode_server(text) {
            Ok(message) => {
                tracing::debug!(kind = message.type_name(), "Inbound message");
                self.events.dispatch(message);
            }
            Err(e) => {
                tracing::warn!(error = %e, frame = frame_preview(text), "Dropping malformed frame");
            }
        }
    }
}

/// Open, pump and reopen the socket until the lifecycle is cancelled.
async fn run_link(inner: Arc<Inner>, url: Url, epoch: u64, cancel: CancellationToken) {
    loop {
        let attempt = tokio::select! {
            _ = cancel.cancelled() => return,
            attempt = connect_async(url.as_str()) => attempt,
        };

        match attempt {
            Ok((socket, _)) => {
                let (tx, rx) = mpsc::unbounded_channel();
                if !inner.opened(epoch, tx) {
                    return;
                }
                tracing::info!(url = %url, "Connected");
                pump(&inner, epoch, socket, rx, &cancel).await;
                if cancel.is_cancelled() {
                    return;
                }
            }
            Err(e) => tracing::warn!(error = %e, url = %url, "Failed to connect"),
        }

        let Some(delay) = inner.closed(epoch) else {
            return;
        };
        tracing::info!(delay_ms = delay.as_millis() as u64, "Connection lost, reconnecting");

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
        if !inner.reconnect_due(epoch) {
            return;
        }
    }
}

/// Move frames both ways until the socket ends or the lifecycle is cancelled.
async fn pump(
    inner: &Inner,
    epoch: u64,
    socket: Socket,
    mut outbound: mpsc::UnboundedReceiver<String>,
    cancel: &CancellationToken,
) {
    let (mut write, mut read) = socket.split();

    let period = inner.config.heartbeat_interval;
    let mut heartbeat = tokio::time::interval_at(Instant::now() + period, period);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = tokio::time::timeout(CLOSE_TIMEOUT, write.send(Message::Close(None))).await;
                return;
            }
            _ = heartbeat.tick() => {
                let frame = match encode_client(&ClientMessage::heartbeat()) {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to encode heartbeat");
                        continue;
                    }
                };
                if let Err(e) = write.send(Message::Text(frame)).await {
                    tracing::warn!(error = %e, "Heartbeat send failed");
                    return;
                }
            }
            Some(frame) = outbound.recv() => {
                if let Err(e) = write.send(Message::Text(frame)).await {
                    tracing::warn!(error = %e, "Send failed");
                    return;
                }
            }
            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => inner.deliver(epoch, &text),
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(?frame, "Server closed connection");
                    return;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "WebSocket error");
                    return;
                }
                None => return,
            },
        }
    }
}
