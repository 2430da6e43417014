/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame header contains an invalid magic number.
    #[error("invalid frame magic (expected 0x6E77 \"nw\")")]
    InvalidMagic,

    /// The payload exceeds the protocol's frame size bound.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The length field does not cover the command byte.
    #[error("frame length field is zero")]
    EmptyFrame,

    /// The command byte is not a known command code.
    #[error("unknown command code 0x{0:02X}")]
    UnknownCommand(u8),
}

pub type Result<T> = std::result::Result<T, FrameError>;
