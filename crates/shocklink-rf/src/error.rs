/// Invalid receiver configuration, rejected before any transmission.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The transmitter code must match `^[01]{9}$`.
    #[error(
        "invalid transmitter code {code:?}: expected exactly 9 characters, each '0' or '1'"
    )]
    InvalidCode { code: String },

    /// The button index must be in `0..=7`.
    #[error("invalid button {button}: expected a whole number between 0 and 7 inclusive")]
    InvalidButton { button: u8 },
}

/// Errors that can occur when issuing an RF command.
#[derive(Debug, thiserror::Error)]
pub enum RfError {
    /// Receiver configuration was rejected.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The SDR collaborator failed to transmit.
    #[error("transmission failed: {0}")]
    Transmit(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RfError>;
