//! Bit-level RF remote encoding and SDR handoff for shocklink receivers.
//!
//! The receiver accepts a 24-bit command word: sync fields from the paired
//! transmitter code, a 6-bit intensity, button bits, a 5-bit parity
//! checksum and a beep flag. [`codec`] builds that word and expands it into
//! the physical symbol stream (preamble plus per-bit filler); [`RfReceiver`]
//! repeats it to cover the requested duration and hands the result to the
//! [`SdrSender`] collaborator, which owns the actual radio.
//!
//! Everything up to the handoff is pure — no shared state, safe to call
//! from any thread.

pub mod codec;
pub mod config;
pub mod error;
pub mod receiver;
pub mod sender;

pub use config::{Button, TransmitterCode};
pub use error::{ConfigError, Result, RfError};
pub use receiver::RfReceiver;
pub use sender::{Modulation, SdrSender, TransmitRequest};
