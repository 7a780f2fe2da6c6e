use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical receiver family, as encoded in the ADD frame's type byte.
///
/// The meaning of the three argument bytes that follow depends on the kind:
/// a Petainer carries its two sender-code bytes and a channel, an
/// optocoupler carries the beep/vibrate/shock pin numbers, and the
/// beep-modifier variant carries the modifier pin and the button pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ReceiverKind {
    Petainer = 0,
    Optocoupler = 1,
    OptocouplerBeepModifier = 2,
}

impl ReceiverKind {
    /// The type byte transmitted in the ADD payload.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Handle for a registered receiver, assigned locally at registration time.
///
/// Indices are handed out in strict registration order starting at 0 and are
/// never reused within a boot session. A reboot invalidates all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceIndex(u8);

impl DeviceIndex {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for DeviceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
