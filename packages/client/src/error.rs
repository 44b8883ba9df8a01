//! Error types for the countdown client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The server answered 409: another viewer holds this `client_id`
    #[error("client id '{0}' is already connected")]
    ClientIdInUse(String),

    /// The WebSocket handshake did not complete
    #[error("could not connect to {url}: {reason}")]
    Unreachable { url: String, reason: String },

    /// An established session ended without the user quitting
    #[error("connection to the server was lost")]
    ConnectionLost,

    /// A text frame that is not a valid `state` message
    #[error("undecodable state frame: {0}")]
    InvalidStateFrame(String),
}
