use thiserror::Error;

/// Error raised by a [`Handler`](crate::Handler) while emitting a record.
///
/// The logger never propagates these to the logging call site; they are
/// reported through `tracing` and the record is dropped.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Writing to the underlying sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The formatted record could not be serialized
    #[error("Record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The transport has no usable connection
    #[error("Transport disconnected: {0}")]
    Disconnected(String),
}
