use thiserror::Error;

pub use temlogger_transports::TransportError;

/// Errors raised while resolving a logger
#[derive(Debug, Error)]
pub enum Error {
    /// Building the provider's transport handler failed
    #[error("Failed to build {provider} transport: {source}")]
    Transport {
        /// Provider being bound
        provider: crate::Provider,
        /// Underlying construction failure
        source: TransportError,
    },
}

/// Result type for logger resolution
pub type Result<T> = std::result::Result<T, Error>;
