//! Binary command protocol for networked character LCD devices.
//!
//! Outbound messages are tiny command frames:
//!
//! ```text
//! ┌────────────┬─────────┬─────────┬──────────────────┐
//! │ Magic (2B) │ LEN (1B)│ CMD (1B)│ Payload           │
//! │ 0x6E 0x77  │         │         │ (LEN - 1 bytes)   │
//! │ "nw"       │         │         │                   │
//! └────────────┴─────────┴─────────┴──────────────────┘
//! ```
//!
//! The inbound direction carries raw keypad codes, one byte per key
//! event, with no framing at all.
//!
//! [`DeviceConfig`] holds the state that must be replayed to the device
//! after every reconnection.

pub mod codec;
pub mod command;
pub mod device;
pub mod error;

pub use codec::{decode_frame, encode_frame, Frame, HEADER_SIZE, MAGIC, MAX_PAYLOAD};
pub use command::Command;
pub use device::{custom_char_slot, DeviceConfig, GLYPH_COUNT, GLYPH_ROWS};
pub use error::{FrameError, Result};
