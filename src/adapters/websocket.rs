//! WebSocket client adapter.
//!
//! Implements [`TextTransport`] on top of a client that reports through a
//! callback running on its own task. The callback only pushes
//! [`TransportEvent`]s into an [`EventQueue`]; the control loop pops them
//! in [`poll_event`](TextTransport::poll_event).
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_websocket_client` via
//!   `esp_idf_svc::ws::client`. The client reconnects on its own; every
//!   successful (re)connect shows up as a `Connected` event.
//! - **all other targets**: in-memory simulation. `connect` succeeds at
//!   once and sent frames are kept for inspection.

use core::fmt::Write;

#[cfg(target_os = "espidf")]
use log::warn;

use crate::error::TransportError;
use crate::events::{self, EventQueue};
use crate::protocol::codec::MAX_OUTBOUND_LEN;
use crate::protocol::transport::{TextTransport, TransportEvent};

#[cfg(target_os = "espidf")]
use esp_idf_svc::io::EspIOError;
#[cfg(target_os = "espidf")]
use esp_idf_svc::ws::client::{
    EspWebSocketClient, EspWebSocketClientConfig, FrameType, WebSocketEvent, WebSocketEventType,
};

/// Longest `ws://host:port/path` accepted.
pub const MAX_URI_LEN: usize = 128;

/// Send timeout handed to the client.
#[cfg(target_os = "espidf")]
const SEND_TIMEOUT: core::time::Duration = core::time::Duration::from_secs(10);

pub fn build_uri(host: &str, port: u16, path: &str) -> Result<heapless::String<MAX_URI_LEN>, TransportError> {
    let mut uri = heapless::String::new();
    write!(uri, "ws://{}:{}{}", host, port, path).map_err(|_| TransportError::TooLong)?;
    Ok(uri)
}

pub struct WsTransport {
    queue: &'static EventQueue,
    #[cfg(target_os = "espidf")]
    client: Option<EspWebSocketClient<'static>>,
    #[cfg(not(target_os = "espidf"))]
    sim_connected: bool,
    /// Simulation: every frame accepted by `send_text`, oldest first.
    #[cfg(not(target_os = "espidf"))]
    pub sim_sent: Vec<heapless::String<MAX_OUTBOUND_LEN>>,
}

impl WsTransport {
    pub fn new(queue: &'static EventQueue) -> Self {
        Self {
            queue,
            #[cfg(target_os = "espidf")]
            client: None,
            #[cfg(not(target_os = "espidf"))]
            sim_connected: false,
            #[cfg(not(target_os = "espidf"))]
            sim_sent: Vec::new(),
        }
    }

    /// Simulation: deliver a text frame as if the controller sent it.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_receive(&mut self, payload: &str) -> bool {
        events::push_event(self.queue, TransportEvent::text(payload))
    }

    /// Simulation: drop the session.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_drop(&mut self) {
        self.sim_connected = false;
        events::push_event(self.queue, TransportEvent::Disconnected);
    }
}

#[cfg(target_os = "espidf")]
fn on_ws_event(queue: &EventQueue, event: &Result<WebSocketEvent<'_>, EspIOError>) {
    let ev = match event {
        Ok(ev) => ev,
        Err(e) => {
            warn!("WS: client error: {:?}", e);
            return;
        }
    };
    let mapped = match ev.event_type {
        WebSocketEventType::Connected => TransportEvent::Connected,
        WebSocketEventType::Disconnected => TransportEvent::Disconnected,
        WebSocketEventType::Text(text) => TransportEvent::text(text),
        _ => return,
    };
    if !events::push_event(queue, mapped) {
        warn!("WS: event queue full, event dropped");
    }
}

impl TextTransport for WsTransport {
    #[cfg(target_os = "espidf")]
    fn connect(&mut self, host: &str, port: u16, path: &str) -> Result<(), TransportError> {
        let uri = build_uri(host, port, path)?;
        let queue = self.queue;
        let client = EspWebSocketClient::new(
            &uri,
            &EspWebSocketClientConfig::default(),
            SEND_TIMEOUT,
            move |event: &Result<WebSocketEvent, EspIOError>| on_ws_event(queue, event),
        )
        .map_err(|e| {
            warn!("WS: client start failed: {:?}", e);
            TransportError::ConnectFailed
        })?;
        self.client = Some(client);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn connect(&mut self, host: &str, port: u16, path: &str) -> Result<(), TransportError> {
        let uri = build_uri(host, port, path)?;
        log::debug!("WS(sim): connected to {}", uri);
        self.sim_connected = true;
        events::push_event(self.queue, TransportEvent::Connected);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn is_connected(&self) -> bool {
        self.client.as_ref().is_some_and(|c| c.is_connected())
    }

    #[cfg(not(target_os = "espidf"))]
    fn is_connected(&self) -> bool {
        self.sim_connected
    }

    #[cfg(target_os = "espidf")]
    fn send_text(&mut self, payload: &str) -> Result<(), TransportError> {
        let client = self.client.as_mut().ok_or(TransportError::NotConnected)?;
        if !client.is_connected() {
            return Err(TransportError::NotConnected);
        }
        client
            .send(FrameType::Text(false), payload.as_bytes())
            .map_err(|_| TransportError::SendFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn send_text(&mut self, payload: &str) -> Result<(), TransportError> {
        if !self.sim_connected {
            return Err(TransportError::NotConnected);
        }
        let mut frame = heapless::String::new();
        frame.push_str(payload).map_err(|_| TransportError::TooLong)?;
        log::debug!("WS(sim): -> {}", payload);
        self.sim_sent.push(frame);
        Ok(())
    }

    fn poll_event(&mut self) -> Option<TransportEvent> {
        events::pop_event(self.queue)
    }
}
