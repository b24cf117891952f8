//! Inbound transport event queue.
//!
//! The socket client reports connection changes and text frames from its
//! own task; the control loop consumes them synchronously at the start of
//! each iteration. A bounded `embassy-sync` channel sits in between so the
//! loop stays the only writer of device state.
//!
//! ```text
//! ┌──────────────────┐  TransportEvent  ┌──────────────┐
//! │ WS client task   │─────────────────▶│  Main Loop   │
//! │ (callback)       │   (bounded, 8)   │  (consumer)  │
//! └──────────────────┘                  └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::protocol::transport::TransportEvent;

/// Maximum number of pending events. Text frames beyond this are dropped.
pub const EVENT_QUEUE_CAP: usize = 8;

/// Queue type shared by a transport producer and the control loop.
pub type EventQueue = Channel<CriticalSectionRawMutex, TransportEvent, EVENT_QUEUE_CAP>;

/// The queue the on-target WebSocket client feeds.
pub static TRANSPORT_EVENTS: EventQueue = EventQueue::new();

/// Push an event. Returns `false` if the queue is full (event dropped).
pub fn push_event(queue: &EventQueue, event: TransportEvent) -> bool {
    queue.try_send(event).is_ok()
}

/// Pop the next event, FIFO. `None` when empty.
pub fn pop_event(queue: &EventQueue) -> Option<TransportEvent> {
    queue.try_receive().ok()
}
