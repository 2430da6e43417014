//! Resilient TCP driver for networked character LCDs.
//!
//! lcdlink keeps a display connection alive in the background, replays
//! the device configuration after every reconnect and buffers keypad
//! input from the same socket.
//!
//! # Crate Structure
//!
//! - [`transport`] — TCP link layer (dial, bounded poll, split handles)
//! - [`proto`] — Binary command protocol and replayable device state
//! - [`session`] — Supervised [`session::DisplaySession`] API

/// Re-export transport types.
pub mod transport {
    pub use lcdlink_transport::*;
}

/// Re-export protocol types.
pub mod proto {
    pub use lcdlink_proto::*;
}

/// Re-export session types.
pub mod session {
    pub use lcdlink_session::*;
}
