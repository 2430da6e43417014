//! Supervised, auto-reconnecting session for networked character LCDs.
//!
//! This is the "just works" layer. A [`DisplaySession`] owns one display:
//! a background supervisor keeps the TCP connection alive, replays the
//! device configuration after every reconnect and drains inbound keypad
//! bytes into a lock-free queue, while the session holder drives the
//! display through unconditional setters.
//!
//! Setters never fail and never block on the network state: they always
//! record the caller's intent in the device configuration and only put a
//! frame on the wire when the link happens to be up. Transport failures
//! collapse the link and are healed by the supervisor's retry cycle.

pub mod error;
pub mod keys;
pub mod session;

mod shared;
mod supervisor;

pub use error::{Result, SessionError};
pub use keys::{key_queue, KeyConsumer, KeyProducer, KEY_QUEUE_CAPACITY};
pub use session::{DisplaySession, SessionConfig, DEFAULT_TARGET, DRIVER_NAME, USAGE_TEXT};
