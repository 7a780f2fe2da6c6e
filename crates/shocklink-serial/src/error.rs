use std::time::Duration;

use shocklink_proto::WireAction;

/// Errors that can occur on the serial link.
#[derive(Debug, thiserror::Error)]
pub enum SerialError {
    /// Failed to open the serial port.
    #[error("failed to open serial port {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },

    /// A serial port control operation failed.
    #[error("serial port error: {0}")]
    Port(#[from] serialport::Error),

    /// An I/O error occurred on the stream.
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame encoding failed.
    #[error("frame error: {0}")]
    Frame(#[from] shocklink_proto::FrameError),

    /// The expected response frame did not arrive in time.
    #[error("timed out after {elapsed:?} waiting for {waiting_for}")]
    AckTimeout {
        waiting_for: WireAction,
        elapsed: Duration,
    },

    /// The stream reached EOF mid-session.
    #[error("serial connection closed by remote")]
    Disconnected,

    /// A previous operation panicked while holding the link lock.
    #[error("serial link lock poisoned")]
    Poisoned,

    /// All 256 device indices of this boot session are taken.
    #[error("device registry full (256 receivers registered)")]
    RegistryFull,

    /// The receiver was never registered on this link.
    #[error("receiver not registered; call register() after boot")]
    NotRegistered,
}

pub type Result<T> = std::result::Result<T, SerialError>;
