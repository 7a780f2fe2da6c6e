//! Framed request/acknowledge link to Arduino-backed stimulation receivers.
//!
//! The companion firmware speaks a strictly sequential protocol: the host
//! writes one frame, then drains responses until the matching
//! acknowledgement arrives. Debug and error frames may be interleaved
//! before the acknowledgement; they are logged and discarded. A single
//! lock guards the whole write-then-drain cycle, because interleaving two
//! callers' traffic would desynchronize the framing.

pub mod error;
pub mod link;
pub mod receiver;
pub mod registry;

pub use error::{Result, SerialError};
pub use link::{ArduinoLink, LinkConfig, SerialStream};
pub use receiver::ArduinoReceiver;
pub use registry::DeviceRegistry;
