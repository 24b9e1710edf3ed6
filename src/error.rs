use thiserror::Error;
use tokio::time::error::Elapsed;

/// Possible errors for the package.
#[derive(Error, Debug)]
pub enum RconError {
    /// The connection could not be opened, is not open, or broke mid-packet.
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    /// Returned if you can't remember the password.
    #[error("authentication failed - invalid password")]
    Authentication,
    /// A command exchange failed after the connection was established.
    #[error(transparent)]
    Command(#[from] CommandError),
    /// Returned by [`ClientBuilder`](crate::config::ClientBuilder) for missing
    /// or out-of-range settings.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// Returned by command factories for arguments that can never be sent,
    /// before anything touches the network.
    #[error("invalid argument: {0}")]
    Validation(String),
}

/// Coarse classification of an [`RconError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Authentication,
    Command,
    Configuration,
    Validation,
}

impl RconError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RconError::Connection(_) => ErrorKind::Connection,
            RconError::Authentication => ErrorKind::Authentication,
            RconError::Command(_) => ErrorKind::Command,
            RconError::Configuration(_) => ErrorKind::Configuration,
            RconError::Validation(_) => ErrorKind::Validation,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Returned if the host is down, behind a firewall, or does not resolve.
    #[error("failed to connect to {addr}")]
    Unreachable {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("timed out connecting to {addr}")]
    ConnectTimeout { addr: String },
    #[error("not connected to rcon server")]
    NotConnected,
    /// The stream was torn down while a caller was waiting for its turn.
    #[error("network stream is not available")]
    StreamUnavailable,
    #[error("failed to read packet size")]
    IncompleteSize,
    #[error("connection closed while reading packet")]
    ClosedWhileReading,
    /// The authentication exchange broke down before the server answered.
    #[error("handshake with host failed")]
    Handshake(#[source] TransportError),
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("response id mismatch (expected {expected}, got {actual})")]
    IdMismatch { expected: i32, actual: i32 },
    #[error("failed to execute command")]
    Failed(#[source] TransportError),
}

/// Lower-level failures of a single exchange. Never returned on their own,
/// always as the source of a [`ConnectionError`] or [`CommandError`].
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("cannot send packet to host")]
    Send(#[source] std::io::Error),
    #[error("cannot receive packet from host")]
    Receive(#[source] std::io::Error),
    /// Returned if the server did not respond in time.
    #[error("timeout")]
    Timeout(#[from] Elapsed),
    #[error(transparent)]
    Packet(#[from] PacketError),
}

#[derive(Error, Debug)]
pub enum PacketError {
    #[error("packet body contains a NUL byte")]
    EmbeddedNul,
    /// Returned if the header is mangled in some way.
    #[error("packet size {0} is smaller than the packet header")]
    InvalidLength(i32),
    #[error("packet truncated (expected {expected} bytes, got {actual})")]
    Truncated { expected: usize, actual: usize },
}
