//! HTTP and WebSocket surface of the stats server.
//!
//! Routes:
//! - `GET /ws/stats`: WebSocket stream, one JSON sample on connect and one
//!   per broadcast tick afterwards
//! - `GET /api/network/current`: one sample, no streaming
//! - `GET /api/stats`: headline figures
//! - `GET /api/health`: subscriber and tick counters

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info, warn};

use super::broadcaster::{BroadcastTimer, BroadcasterHandle};
use super::registry::SubscriptionRegistry;
use crate::adapters::ChannelSubscriber;
use crate::config::ServerConfig;
use crate::error::{CitrateError, CitrateResult};
use crate::models::default_headline_stats;
use crate::sampler::SharedSampler;

/// State shared with every handler.
#[derive(Clone)]
struct ServerState {
    registry: SubscriptionRegistry,
    ticks: Arc<AtomicU64>,
    tick_interval_ms: u64,
    subscriber_buffer: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    subscribers: usize,
    ticks: u64,
    tick_interval_ms: u64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// A bound, running stats server.
pub struct RunningServer {
    local_addr: SocketAddr,
    registry: SubscriptionRegistry,
    broadcaster: BroadcasterHandle,
    shutdown_tx: oneshot::Sender<()>,
    server_task: JoinHandle<()>,
}

impl RunningServer {
    /// Address actually bound (useful when binding port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    /// Completed broadcast ticks.
    pub fn ticks(&self) -> u64 {
        self.broadcaster.ticks()
    }

    /// Stop broadcasting, drop every subscriber and stop accepting
    /// connections.
    pub async fn shutdown(self) {
        info!("Shutting down stats server");
        self.broadcaster.shutdown().await;
        self.registry.clear();
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.server_task.await {
            if !e.is_cancelled() {
                error!("Stats server task failed: {}", e);
            }
        }
    }
}

fn router(state: ServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws/stats", get(websocket_handler))
        .route("/api/network/current", get(current_handler))
        .route("/api/stats", get(headline_handler))
        .route("/api/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

/// Bind and start the server with a fresh synthetic sampler.
pub async fn start_server_on(config: ServerConfig) -> CitrateResult<RunningServer> {
    start_server_with_sampler(config, SharedSampler::default()).await
}

/// Bind and start the server drawing from `sampler`.
pub async fn start_server_with_sampler(
    config: ServerConfig,
    sampler: SharedSampler,
) -> CitrateResult<RunningServer> {
    config.validate()?;

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| CitrateError::network(config.addr.to_string(), e.to_string()))?;
    let local_addr = listener.local_addr()?;

    let registry = SubscriptionRegistry::new(sampler);
    let broadcaster = BroadcastTimer::new(config.tick_interval).spawn(registry.clone());

    let state = ServerState {
        registry: registry.clone(),
        ticks: broadcaster.tick_counter(),
        tick_interval_ms: config.tick_interval.as_millis() as u64,
        subscriber_buffer: config.subscriber_buffer,
    };
    let app = router(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server_task = tokio::spawn(async move {
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await;
        if let Err(e) = result {
            error!("Stats server error: {}", e);
        }
    });

    info!("Stats server listening on http://{}", local_addr);
    info!("Stats stream at ws://{}/ws/stats", local_addr);

    Ok(RunningServer {
        local_addr,
        registry,
        broadcaster,
        shutdown_tx,
        server_task,
    })
}

/// Run the server until Ctrl-C.
pub async fn serve(config: ServerConfig) -> CitrateResult<()> {
    let server = start_server_on(config).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
    }

    server.shutdown().await;
    Ok(())
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<ServerState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one WebSocket connection until either side ends.
async fn handle_socket(socket: WebSocket, state: ServerState) {
    let (mut sender, mut receiver) = socket.split();

    let (subscriber, mut samples) = ChannelSubscriber::channel(state.subscriber_buffer);
    // the initial sample is queued before the send task starts
    let registration = state.registry.subscribe(subscriber);
    let id = registration.id();

    let mut send_task = tokio::spawn(async move {
        while let Some(sample) = samples.recv().await {
            match serde_json::to_string(sample.as_ref()) {
                Ok(json) => {
                    if sender.send(Message::Text(json)).await.is_err() {
                        // Client disconnected
                        return;
                    }
                }
                Err(e) => {
                    warn!("Failed to serialize sample: {}", e);
                }
            }
        }
        // dropped by the registry, server is shutting down
        let _ = sender.send(Message::Close(None)).await;
    });

    // Inbound data is ignored; only close and errors matter
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) | Err(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    drop(registration);
    debug!(subscriber = %id, "WebSocket connection finished");
}

async fn current_handler(State(state): State<ServerState>) -> Response {
    match state.registry.sampler().try_sample() {
        Some(sample) => Json(sample).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Failed to fetch network stats".to_string(),
            }),
        )
            .into_response(),
    }
}

async fn headline_handler() -> impl IntoResponse {
    Json(default_headline_stats())
}

async fn health_handler(State(state): State<ServerState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        subscribers: state.registry.len(),
        ticks: state.ticks.load(Ordering::Relaxed),
        tick_interval_ms: state.tick_interval_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_uses_camel_case() {
        let json = serde_json::to_value(HealthResponse {
            status: "ok",
            subscribers: 2,
            ticks: 7,
            tick_interval_ms: 2000,
        })
        .expect("serialize");
        assert_eq!(json["tickIntervalMs"], 2000);
        assert_eq!(json["subscribers"], 2);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected_before_binding() {
        let config = ServerConfig::new()
            .with_addr("127.0.0.1:0".parse().expect("addr"))
            .with_tick_interval(std::time::Duration::ZERO);
        let result = start_server_on(config).await;
        assert!(matches!(result, Err(CitrateError::Config { .. })));
    }

    #[tokio::test]
    async fn test_binds_ephemeral_port_and_shuts_down() {
        let config = ServerConfig::new().with_addr("127.0.0.1:0".parse().expect("addr"));
        let server = start_server_on(config).await.expect("server");
        assert_ne!(server.local_addr().port(), 0);
        assert!(server.registry().is_empty());
        server.shutdown().await;
    }
}
