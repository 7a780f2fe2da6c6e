use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The fixed 9-bit identity a receiver is paired to, as a binary string.
///
/// Split on the wire into a 2-bit prefix and a 7-bit suffix with the
/// command fields in between.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransmitterCode(String);

impl TransmitterCode {
    /// Validate and wrap a transmitter code.
    pub fn new(code: impl Into<String>) -> Result<Self, ConfigError> {
        let code = code.into();
        if code.len() != 9 || !code.bytes().all(|b| b == b'0' || b == b'1') {
            return Err(ConfigError::InvalidCode { code });
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first two code bits; they open the command word.
    pub fn prefix(&self) -> &str {
        &self.0[..2]
    }

    /// The remaining seven code bits; they close the pre-checksum segment.
    pub fn suffix(&self) -> &str {
        &self.0[2..]
    }
}

impl TryFrom<String> for TransmitterCode {
    type Error = ConfigError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

impl From<TransmitterCode> for String {
    fn from(code: TransmitterCode) -> Self {
        code.0
    }
}

impl fmt::Display for TransmitterCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote-control button index, `0..=7`.
///
/// Each button selects a fixed bit triplet in the command word; receivers
/// are paired to one button of their transmitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Button(u8);

impl Button {
    pub fn new(button: u8) -> Result<Self, ConfigError> {
        if button > 7 {
            return Err(ConfigError::InvalidButton { button });
        }
        Ok(Self(button))
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Button {
    type Error = ConfigError;

    fn try_from(button: u8) -> Result<Self, Self::Error> {
        Self::new(button)
    }
}

impl From<Button> for u8 {
    fn from(button: Button) -> Self {
        button.0
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
