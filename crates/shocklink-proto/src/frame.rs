use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::action::WireAction;
use crate::device::DeviceIndex;
use crate::error::{FrameError, Result};

/// Frame header: action code (1) + payload length (1) = 2 bytes.
pub const HEADER_SIZE: usize = 2;

/// Maximum payload size the one-byte length field can describe.
pub const MAX_PAYLOAD: usize = u8::MAX as usize;

/// Payload length of a stimulation command frame.
pub const COMMAND_PAYLOAD_LEN: usize = 4;

/// A decoded wire frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The raw action-code byte. Kept raw so that frames carrying codes this
    /// build does not know about can still be drained and logged.
    pub code: u8,
    /// The frame payload.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(code: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            code,
            payload: payload.into(),
        }
    }

    /// Interpret the code byte, if it names a known operation.
    pub fn action(&self) -> Option<WireAction> {
        WireAction::from_code(self.code)
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌───────────┬─────────────┬──────────────────┐
/// │ Code (1B) │ Length (1B) │ Payload           │
/// │           │             │ (Length bytes)    │
/// └───────────┴─────────────┴──────────────────┘
/// ```
pub fn encode_frame(code: u8, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u8(code);
    dst.put_u8(payload.len() as u8);
    dst.put_slice(payload);
    Ok(())
}

/// Decode a frame from a buffer.
///
/// Returns `None` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer. Decoding itself
/// cannot fail: any code byte is representable and the length byte bounds
/// the payload at 255 bytes.
pub fn decode_frame(src: &mut BytesMut) -> Option<Frame> {
    if src.len() < HEADER_SIZE {
        return None; // Need more data
    }

    let code = src[0];
    let payload_len = src[1] as usize;

    let total = HEADER_SIZE + payload_len;
    if src.len() < total {
        return None; // Need more data
    }

    src.advance(HEADER_SIZE);
    let payload = src.split_to(payload_len).freeze();

    Some(Frame { code, payload })
}

/// Build a stimulation command payload.
///
/// Layout: `[index, power, duration_hi, duration_lo]` — the 16-bit duration
/// in milliseconds is split big-endian across the last two bytes.
pub fn command_payload(index: DeviceIndex, power: u8, duration_ms: u16) -> [u8; 4] {
    [
        index.get(),
        power,
        (duration_ms >> 8) as u8,
        (duration_ms & 0xFF) as u8,
    ]
}
