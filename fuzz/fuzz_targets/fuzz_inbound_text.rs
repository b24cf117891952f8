//! Fuzz target: inbound controller text
//!
//! Wraps arbitrary bytes as a received text frame and runs it through the
//! command decoder and the service. Nothing may panic, only the five
//! command words may decode, and only `request` may produce traffic.
//!
//! cargo fuzz run fuzz_inbound_text

#![no_main]

use embedded_hal::delay::DelayNs;
use libfuzzer_sys::fuzz_target;
use purifier::app::events::AppEvent;
use purifier::app::ports::EventSink;
use purifier::app::service::PurifierService;
use purifier::config::SystemConfig;
use purifier::error::TransportError;
use purifier::protocol::codec::Command;
use purifier::protocol::transport::{TextTransport, TransportEvent, MAX_INBOUND_LEN};

struct Link {
    sent: usize,
}

impl TextTransport for Link {
    fn connect(&mut self, _: &str, _: u16, _: &str) -> Result<(), TransportError> {
        Ok(())
    }
    fn is_connected(&self) -> bool {
        true
    }
    fn send_text(&mut self, _: &str) -> Result<(), TransportError> {
        self.sent += 1;
        Ok(())
    }
    fn poll_event(&mut self) -> Option<TransportEvent> {
        None
    }
}

struct NoDelay;
impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _: u32) {}
}

struct Discard;
impl EventSink for Discard {
    fn emit(&mut self, _: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let event = TransportEvent::text(&text);
    let TransportEvent::Text(frame) = &event else {
        panic!("text() must yield a Text event");
    };
    assert!(frame.len() <= MAX_INBOUND_LEN);

    let decoded = Command::decode(frame);
    if let Some(cmd) = decoded {
        assert_eq!(cmd.as_str(), frame.as_str(), "decode must be exact-match");
    }

    let mut svc = PurifierService::new(&SystemConfig::default(), "auth:arduino");
    let mut link = Link { sent: 0 };
    svc.handle_event(event, &mut link, &mut NoDelay, &mut Discard);

    let expected = if decoded == Some(Command::Request) { 5 } else { 0 };
    assert_eq!(link.sent, expected);
});
