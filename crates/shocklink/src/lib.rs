//! Command layer for remote-controlled stimulation receivers.
//!
//! shocklink translates an abstract command — action kind, power level,
//! duration — into the wire protocol of the receiver that has to carry it
//! out:
//!
//! - Arduino-backed receivers hang off a serial link running the companion
//!   firmware; frames are exchanged strictly request/acknowledge.
//! - RF receivers are driven indirectly: a bit-exact command word is
//!   expanded into a symbol stream and handed to an SDR transmitter.
//!
//! # Crate Structure
//!
//! - [`proto`] — Wire vocabulary (action codes, receiver kinds) and the
//!   positional frame codec
//! - [`serial`] — The serialized request/acknowledge link, device
//!   registration and Arduino-side dispatch
//! - [`rf`] — Bit-level RF command encoding and the SDR handoff boundary

/// Re-export wire vocabulary and frame codec types.
pub mod proto {
    pub use shocklink_proto::*;
}

/// Re-export serial link types.
pub mod serial {
    pub use shocklink_serial::*;
}

/// Re-export RF encoding types.
pub mod rf {
    pub use shocklink_rf::*;
}
