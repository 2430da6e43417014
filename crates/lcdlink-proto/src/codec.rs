use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::command::Command;
use crate::error::{FrameError, Result};

/// Frame header: magic (2) + length (1) = 3 bytes.
pub const HEADER_SIZE: usize = 3;

/// Magic bytes: "nw" (0x6E 0x77).
pub const MAGIC: [u8; 2] = [0x6E, 0x77];

/// Maximum payload per frame. The length field covers the command byte
/// plus payload and must fit in one byte.
pub const MAX_PAYLOAD: usize = 253;

/// A decoded command frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The command this frame carries.
    pub command: Command,
    /// The command payload (everything after the command byte).
    pub payload: Bytes,
}

impl Frame {
    /// The total wire size of this frame (header + command + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + 1 + self.payload.len()
    }
}

/// Encode a command frame into the wire format.
///
/// The length field is `payload.len() + 1`: it covers the command byte
/// and the payload, not the header.
pub fn encode_frame(command: Command, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    dst.reserve(HEADER_SIZE + 1 + payload.len());
    dst.put_slice(&MAGIC);
    dst.put_u8((payload.len() + 1) as u8);
    dst.put_u8(command.code());
    dst.put_slice(payload);
    Ok(())
}

/// Decode one command frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer. Used by tests
/// and device-side tooling; the driver itself only encodes.
pub fn decode_frame(src: &mut BytesMut) -> Result<Option<Frame>> {
    if src.len() < HEADER_SIZE {
        return Ok(None); // Need more data
    }

    if src[0..2] != MAGIC {
        return Err(FrameError::InvalidMagic);
    }

    let len = src[2] as usize;
    if len == 0 {
        return Err(FrameError::EmptyFrame);
    }
    if src.len() < HEADER_SIZE + len {
        return Ok(None); // Need more data
    }

    let command = Command::from_code(src[3]).ok_or(FrameError::UnknownCommand(src[3]))?;

    src.advance(HEADER_SIZE + 1);
    let payload = src.split_to(len - 1).freeze();

    Ok(Some(Frame { command, payload }))
}
