use std::fmt;

use serde::{Deserialize, Serialize};

/// Abstract stimulation vocabulary exposed to callers.
///
/// Receiver dispatch translates these into one or more wire operations;
/// `BeepShock` in particular is split into a beep and a shock with a fixed
/// pause in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Light,
    Beep,
    Vibrate,
    Shock,
    BeepShock,
}

/// Wire-level operation codes understood by the companion firmware.
///
/// A superset of [`Action`]: stimulation codes plus device lifecycle
/// (`Boot`/`Booted`/`Add`) and diagnostic/acknowledgement codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireAction {
    Light = 10,
    Beep = 11,
    Vibrate = 12,
    Shock = 13,
    BeepShock = 99,

    Boot = 100,
    Booted = 101,
    Add = 102,

    Acknowledge = 200,
    Ping = 201,
    Pong = 202,

    Debug = 253,
    Error = 254,
    Crash = 255,
}

impl WireAction {
    /// The numeric code transmitted on the wire.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire byte, if it names a known operation.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            10 => Some(Self::Light),
            11 => Some(Self::Beep),
            12 => Some(Self::Vibrate),
            13 => Some(Self::Shock),
            99 => Some(Self::BeepShock),
            100 => Some(Self::Boot),
            101 => Some(Self::Booted),
            102 => Some(Self::Add),
            200 => Some(Self::Acknowledge),
            201 => Some(Self::Ping),
            202 => Some(Self::Pong),
            253 => Some(Self::Debug),
            254 => Some(Self::Error),
            255 => Some(Self::Crash),
            _ => None,
        }
    }
}

impl From<Action> for WireAction {
    fn from(action: Action) -> Self {
        match action {
            Action::Light => Self::Light,
            Action::Beep => Self::Beep,
            Action::Vibrate => Self::Vibrate,
            Action::Shock => Self::Shock,
            Action::BeepShock => Self::BeepShock,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Light => "light",
            Self::Beep => "beep",
            Self::Vibrate => "vibrate",
            Self::Shock => "shock",
            Self::BeepShock => "beepshock",
        };
        f.write_str(name)
    }
}

impl fmt::Display for WireAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}({})", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_match_firmware_values() {
        assert_eq!(WireAction::Light.code(), 10);
        assert_eq!(WireAction::Beep.code(), 11);
        assert_eq!(WireAction::Vibrate.code(), 12);
        assert_eq!(WireAction::Shock.code(), 13);
        assert_eq!(WireAction::BeepShock.code(), 99);
        assert_eq!(WireAction::Boot.code(), 100);
        assert_eq!(WireAction::Booted.code(), 101);
        assert_eq!(WireAction::Add.code(), 102);
        assert_eq!(WireAction::Acknowledge.code(), 200);
        assert_eq!(WireAction::Ping.code(), 201);
        assert_eq!(WireAction::Pong.code(), 202);
        assert_eq!(WireAction::Debug.code(), 253);
        assert_eq!(WireAction::Error.code(), 254);
        assert_eq!(WireAction::Crash.code(), 255);
    }

    #[test]
    fn from_code_roundtrips_every_known_code() {
        let all = [
            WireAction::Light,
            WireAction::Beep,
            WireAction::Vibrate,
            WireAction::Shock,
            WireAction::BeepShock,
            WireAction::Boot,
            WireAction::Booted,
            WireAction::Add,
            WireAction::Acknowledge,
            WireAction::Ping,
            WireAction::Pong,
            WireAction::Debug,
            WireAction::Error,
            WireAction::Crash,
        ];
        for action in all {
            assert_eq!(WireAction::from_code(action.code()), Some(action));
        }
    }

    #[test]
    fn from_code_rejects_unknown_codes() {
        assert_eq!(WireAction::from_code(0), None);
        assert_eq!(WireAction::from_code(14), None);
        assert_eq!(WireAction::from_code(199), None);
    }

    #[test]
    fn abstract_to_wire_mapping_is_total() {
        let mapping = [
            (Action::Light, WireAction::Light),
            (Action::Beep, WireAction::Beep),
            (Action::Vibrate, WireAction::Vibrate),
            (Action::Shock, WireAction::Shock),
            (Action::BeepShock, WireAction::BeepShock),
        ];
        for (action, wire) in mapping {
            assert_eq!(WireAction::from(action), wire);
        }
    }
}
