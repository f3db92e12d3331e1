//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use citrate::config::ServerConfig;
use citrate::models::NetworkSample;
use citrate::server::{start_server_on, RunningServer};
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

pub type TestSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Start a server on an ephemeral local port.
pub async fn start_test_server(tick: Duration) -> RunningServer {
    let config = ServerConfig::new()
        .with_addr("127.0.0.1:0".parse().unwrap())
        .with_tick_interval(tick);
    start_server_on(config).await.expect("Failed to start server")
}

/// Start a server on a specific address, e.g. to restart on a known port.
pub async fn start_test_server_at(addr: SocketAddr, tick: Duration) -> RunningServer {
    let config = ServerConfig::new().with_addr(addr).with_tick_interval(tick);
    start_server_on(config).await.expect("Failed to restart server")
}

pub fn ws_url(addr: SocketAddr) -> String {
    format!("ws://{}/ws/stats", addr)
}

pub fn http_url(addr: SocketAddr, path: &str) -> String {
    format!("http://{}{}", addr, path)
}

pub async fn connect(addr: SocketAddr) -> TestSocket {
    let (ws, _response) = connect_async(ws_url(addr))
        .await
        .expect("Failed to connect");
    ws
}

/// Next sample on the socket, skipping control frames.
pub async fn next_sample(ws: &mut TestSocket, wait: Duration) -> Option<NetworkSample> {
    let deadline = tokio::time::Instant::now() + wait;
    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        let msg = timeout(remaining, ws.next()).await.ok()??;
        match msg {
            Ok(Message::Text(text)) => {
                return Some(serde_json::from_str(&text).expect("valid sample JSON"))
            }
            Ok(Message::Close(_)) | Err(_) => return None,
            Ok(_) => continue,
        }
    }
}

/// Count samples arriving within `window`.
pub async fn count_samples(ws: &mut TestSocket, window: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + window;
    let mut count = 0;
    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            return count;
        }
        match next_sample(ws, remaining).await {
            Some(_) => count += 1,
            None => return count,
        }
    }
}

/// Poll until the registry holds `expected` subscribers.
pub async fn wait_for_subscribers(server: &RunningServer, expected: usize) -> bool {
    for _ in 0..100 {
        if server.registry().len() == expected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

pub fn assert_in_range(sample: &NetworkSample) {
    assert!(
        (8_000..12_000).contains(&sample.tps),
        "tps {} out of range",
        sample.tps
    );
    assert!(
        sample.finality >= 10.0 && sample.finality < 14.0,
        "finality {} out of range",
        sample.finality
    );
    assert_eq!(sample.uptime, 99.99);
}
