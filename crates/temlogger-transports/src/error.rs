use thiserror::Error;

/// Errors raised while constructing a transport handler.
///
/// These surface from logger resolution; they are never raised by an
/// everyday logging call.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A required endpoint setting was empty
    #[error("Missing endpoint configuration: {0}")]
    MissingEndpoint(&'static str),

    /// The port setting is not a valid TCP port
    #[error("Invalid port {port:?}: {source}")]
    InvalidPort {
        /// The offending value
        port: String,
        /// Parse failure
        source: std::num::ParseIntError,
    },

    /// The host name did not resolve to any address
    #[error("Could not resolve {0}")]
    Resolve(String),

    /// Connecting to the endpoint failed
    #[error("Connection to {addr} failed: {source}")]
    Connect {
        /// Endpoint that was dialed
        addr: String,
        /// Underlying socket error
        source: std::io::Error,
    },

    /// Unsupported logstash protocol version
    #[error("Unsupported logstash protocol version: {0}")]
    UnsupportedVersion(u8),

    /// No cloud project id could be discovered
    #[error("No cloud project configured (set GOOGLE_CLOUD_PROJECT)")]
    MissingProject,

    /// Generic I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for transport construction
pub type Result<T> = std::result::Result<T, TransportError>;
