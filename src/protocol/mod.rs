//! Controller link: text codec and transport abstraction.
//!
//! ```text
//! ┌────────────────┐   ┌───────────┐   ┌──────────────────┐
//! │ TextTransport  │──▶│  Command  │──▶│ PurifierService  │
//! │ (WebSocket)    │   │  decode   │   │ (state, outputs) │
//! │                │◀──│  Encoder  │◀──│                  │
//! └────────────────┘   └───────────┘   └──────────────────┘
//! ```

pub mod codec;
pub mod transport;
