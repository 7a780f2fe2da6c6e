//! Wire vocabulary and frame codec for the shocklink receiver protocols.
//!
//! Every serial message is a frame: a leading action-code byte, a length
//! byte, and exactly `length` payload bytes. The layout is entirely
//! positional — no delimiters, no resynchronization. The protocol stays in
//! sync because every request is followed by exactly one matching
//! acknowledgement before the next request is written.

pub mod action;
pub mod device;
pub mod error;
pub mod frame;

pub use action::{Action, WireAction};
pub use device::{DeviceIndex, ReceiverKind};
pub use error::{FrameError, Result};
pub use frame::{
    command_payload, decode_frame, encode_frame, Frame, COMMAND_PAYLOAD_LEN, HEADER_SIZE,
    MAX_PAYLOAD,
};
