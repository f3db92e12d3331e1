use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use super::state::{ConnectionState, StreamEvent};
use crate::config::ClientConfig;
use crate::traits::StatsStream;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Events buffered between the socket task and the consumer.
const EVENT_BUFFER: usize = 64;

/// Backoff before reconnect attempt `attempt` (1-based): 1s, 2s, 4s, 8s, ...
/// capped at `max_backoff_secs`.
pub fn backoff_delay(attempt: u8, max_backoff_secs: u64) -> Duration {
    let exponent = u32::from(attempt.saturating_sub(1));
    let secs = 1u64
        .checked_shl(exponent)
        .unwrap_or(u64::MAX)
        .min(max_backoff_secs);
    Duration::from_secs(secs)
}

/// WebSocket client for the stats stream.
///
/// The socket lives in a background task started by [`StatsClient::spawn`];
/// this handle only reads events and state.
pub struct StatsClient {
    /// Transport events, in arrival order
    events_rx: mpsc::Receiver<StreamEvent>,
    /// Watch receiver for connection state changes
    state_rx: watch::Receiver<ConnectionState>,
    /// Set to true to stop the background task
    shutdown_tx: watch::Sender<bool>,
}

impl StatsClient {
    /// Start connecting in the background.
    ///
    /// Never fails here: a refused connection shows up as
    /// [`StreamEvent::Errored`] followed by reconnect attempts, if enabled.
    pub fn spawn(config: ClientConfig) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let reporter = Reporter {
            events_tx,
            state_tx,
        };
        tokio::spawn(run_connection_loop(config, reporter, shutdown_rx));

        Self {
            events_rx,
            state_rx,
            shutdown_tx,
        }
    }

    /// Check if currently connected
    pub fn is_connected(&self) -> bool {
        self.state_rx.borrow().is_live()
    }

    /// Get the current connection state
    pub fn connection_state(&self) -> ConnectionState {
        self.state_rx.borrow().clone()
    }

    /// Subscribe to connection state changes
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Receive the next transport event
    pub async fn recv(&mut self) -> Option<StreamEvent> {
        self.events_rx.recv().await
    }

    /// Close the socket and stop reconnecting
    pub fn shutdown(&self) {
        if !*self.shutdown_tx.borrow() {
            info!("Shutting down stats client");
        }
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for StatsClient {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

#[async_trait]
impl StatsStream for StatsClient {
    async fn next_event(&mut self) -> Option<StreamEvent> {
        self.recv().await
    }

    fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state_receiver()
    }

    fn shutdown(&self) {
        StatsClient::shutdown(self)
    }
}

/// Publishes events and the state they imply.
struct Reporter {
    events_tx: mpsc::Sender<StreamEvent>,
    state_tx: watch::Sender<ConnectionState>,
}

impl Reporter {
    /// Returns false once nobody is listening for events anymore.
    async fn emit(&self, event: StreamEvent) -> bool {
        if let Some(state) = event.resulting_state() {
            let _ = self.state_tx.send(state);
        }
        self.events_tx.send(event).await.is_ok()
    }
}

/// Why a connected socket stopped being read.
enum PumpExit {
    Shutdown,
    ConsumerGone,
    Closed,
    Errored(String),
}

/// Run the main connection loop with reconnection logic
async fn run_connection_loop(
    config: ClientConfig,
    reporter: Reporter,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut attempt: u8 = 0;

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let connected = tokio::select! {
            result = connect_async(config.url.as_str()) => result,
            _ = shutdown_rx.changed() => break,
        };

        match connected {
            Ok((ws, _response)) => {
                info!("Connected to stats stream at {}", config.url);
                attempt = 0;
                if !reporter.emit(StreamEvent::Opened).await {
                    break;
                }

                let keep_going = match pump(ws, &reporter, &mut shutdown_rx).await {
                    PumpExit::Shutdown | PumpExit::ConsumerGone => false,
                    PumpExit::Closed => reporter.emit(StreamEvent::Closed).await,
                    PumpExit::Errored(msg) => reporter.emit(StreamEvent::Errored(msg)).await,
                };
                if !keep_going {
                    break;
                }
            }
            Err(e) => {
                warn!("Failed to connect to {}: {}", config.url, e);
                if !reporter.emit(StreamEvent::Errored(e.to_string())).await {
                    break;
                }
            }
        }

        if attempt >= config.max_retries {
            if config.reconnect_enabled() {
                error!(
                    "Failed to reconnect after {} attempts, giving up",
                    config.max_retries
                );
            } else {
                debug!("Reconnect disabled, staying disconnected");
            }
            break;
        }

        attempt += 1;
        let delay = backoff_delay(attempt, config.max_backoff_secs);
        info!(
            "Reconnection attempt {} of {}, waiting {}s",
            attempt,
            config.max_retries,
            delay.as_secs()
        );
        if !reporter.emit(StreamEvent::Reconnecting { attempt }).await {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown_rx.changed() => break,
        }
    }

    if *shutdown_rx.borrow() {
        let _ = reporter.state_tx.send(ConnectionState::Closed);
    }
    info!("Stats connection loop ended");
}

/// Forward frames from one open socket until it ends.
async fn pump(
    ws: WsStream,
    reporter: &Reporter,
    shutdown_rx: &mut watch::Receiver<bool>,
) -> PumpExit {
    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                debug!("Shutdown signal received, closing connection");
                let _ = sink.close().await;
                return PumpExit::Shutdown;
            }
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if !reporter.emit(StreamEvent::Message(text)).await {
                            warn!("Event channel closed, shutting down");
                            let _ = sink.close().await;
                            return PumpExit::ConsumerGone;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        debug!("Received ping, sending pong");
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Received close frame from server");
                        return PumpExit::Closed;
                    }
                    Some(Ok(_)) => {
                        // Binary, Pong and raw frames carry no samples
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        return PumpExit::Errored(e.to_string());
                    }
                    None => {
                        info!("WebSocket stream ended");
                        return PumpExit::Closed;
                    }
                }
            }
        }
    }
}
