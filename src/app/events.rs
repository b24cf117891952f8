//! Outbound application events.
//!
//! The [`PurifierService`](super::service::PurifierService) emits these
//! through the [`EventSink`](super::ports::EventSink) port. The log adapter
//! turns them into serial lines.

use crate::error::{SensorError, TransportError};
use crate::protocol::codec::OutboundFrame;
use crate::protocol::transport::InboundFrame;

use super::state::{DeviceState, SensorKind, SensorSample};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the boot state).
    Started(DeviceState),

    /// The socket session opened.
    LinkUp,

    /// The socket session dropped.
    LinkDown,

    /// A text frame arrived from the controller.
    Received(InboundFrame),

    /// A frame was handed to the transport.
    Sent(OutboundFrame),

    /// The transport refused a frame; it is not retried.
    SendFailed(TransportError),

    /// A reading differed from the stored value and was committed.
    ReadingChanged(SensorSample),

    /// A sensor started failing. Reported once per fault, not per poll.
    SensorFault { kind: SensorKind, error: SensorError },

    /// A previously failing sensor produced a good reading.
    SensorRecovered(SensorKind),

    /// A fan command changed the mode or the manual switch.
    FanModeChanged { auto: bool, on: bool },
}
