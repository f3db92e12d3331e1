//! Connection state machine and transport events.

use std::fmt;

/// Connection state of the stats stream.
///
/// `Connecting -> Open -> {Closed, Errored}`, with `Reconnecting` between a
/// drop and the next successful `Open` when reconnect is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Reconnecting { attempt: u8 },
    Closed,
    Errored(String),
}

impl ConnectionState {
    /// True only while samples can arrive.
    pub fn is_live(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }

    /// Short label for the UI indicator.
    pub fn label(&self) -> String {
        match self {
            ConnectionState::Connecting => "CONNECTING".to_string(),
            ConnectionState::Open => "LIVE".to_string(),
            ConnectionState::Reconnecting { attempt } => format!("RECONNECTING ({})", attempt),
            ConnectionState::Closed => "DISCONNECTED".to_string(),
            ConnectionState::Errored(_) => "ERROR".to_string(),
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Errored(msg) => write!(f, "ERROR: {}", msg),
            other => write!(f, "{}", other.label()),
        }
    }
}

/// Something that happened on the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// The socket is open and samples may follow.
    Opened,
    /// A text frame, not yet parsed.
    Message(String),
    /// A reconnect attempt is about to start.
    Reconnecting { attempt: u8 },
    /// The server closed the connection or the stream ended.
    Closed,
    /// The connection failed.
    Errored(String),
}

impl StreamEvent {
    /// The connection state this event moves the stream into, if any.
    pub fn resulting_state(&self) -> Option<ConnectionState> {
        match self {
            StreamEvent::Opened => Some(ConnectionState::Open),
            StreamEvent::Message(_) => None,
            StreamEvent::Reconnecting { attempt } => {
                Some(ConnectionState::Reconnecting { attempt: *attempt })
            }
            StreamEvent::Closed => Some(ConnectionState::Closed),
            StreamEvent::Errored(msg) => Some(ConnectionState::Errored(msg.clone())),
        }
    }
}
