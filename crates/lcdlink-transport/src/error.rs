use std::net::SocketAddrV4;

/// Errors that can occur on the TCP link to a display.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to connect to the display.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: SocketAddrV4,
        source: std::io::Error,
    },

    /// The readability poll failed.
    #[error("poll failed: {0}")]
    Poll(std::io::Error),

    /// An I/O error occurred on the link.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The display closed the connection.
    #[error("connection closed by display")]
    Closed,
}

pub type Result<T> = std::result::Result<T, TransportError>;
