//! Transport abstraction — a message-framed text channel.
//!
//! Concrete implementations:
//! - WebSocket client (ESP-IDF `esp_websocket_client`)
//! - In-memory simulation for host runs
//!
//! The control loop is generic over [`TextTransport`], so swapping the
//! transport requires zero changes to the loop or the codec.

use crate::error::TransportError;

/// Longest inbound text frame kept verbatim. Longer payloads are truncated,
/// which can never turn them into a valid command.
pub const MAX_INBOUND_LEN: usize = 128;

/// Received text payload.
pub type InboundFrame = heapless::String<MAX_INBOUND_LEN>;

/// Something the transport observed since the last poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The session came up (initially or after a transport-level reconnect).
    Connected,
    /// The session dropped.
    Disconnected,
    /// A text frame arrived.
    Text(InboundFrame),
}

impl TransportEvent {
    /// Wrap a received payload, truncating at [`MAX_INBOUND_LEN`] bytes on a
    /// char boundary.
    pub fn text(payload: &str) -> Self {
        let mut frame = InboundFrame::new();
        for ch in payload.chars() {
            if frame.push(ch).is_err() {
                break;
            }
        }
        Self::Text(frame)
    }
}

/// Message-framed text channel to the remote controller.
pub trait TextTransport {
    /// Start a session to `ws://host:port/path`. Returns once the attempt is
    /// under way; completion shows up as [`TransportEvent::Connected`].
    fn connect(&mut self, host: &str, port: u16, path: &str) -> Result<(), TransportError>;

    /// Whether the session is currently up.
    fn is_connected(&self) -> bool;

    /// Send one text frame.
    fn send_text(&mut self, payload: &str) -> Result<(), TransportError>;

    /// Next pending event, if any. Never blocks.
    fn poll_event(&mut self) -> Option<TransportEvent>;
}
