//! Transport construction seam
//!
//! The resolver never builds handlers itself. It asks a [`TransportFactory`],
//! which lets tests substitute in-memory handlers for real sockets.

use crate::provider::{LogstashSettings, StackdriverSettings};
use std::sync::Arc;
use temlogger_core::{Handler, RecordFormatter};
use temlogger_transports::{CloudLoggingClient, LogstashHandler, LogstashVersion, TransportError};

/// Builds the handler for each non-default provider.
pub trait TransportFactory: Send + Sync {
    /// Build a logstash handler shaping records with `formatter`
    fn logstash_handler(
        &self,
        settings: &LogstashSettings,
        formatter: Arc<dyn RecordFormatter>,
    ) -> Result<Arc<dyn Handler>, TransportError>;

    /// Build a cloud logging handler shaping records with `formatter`
    fn stackdriver_handler(
        &self,
        settings: &StackdriverSettings,
        formatter: Arc<dyn RecordFormatter>,
    ) -> Result<Arc<dyn Handler>, TransportError>;
}

/// Real transports: logstash protocol v1 over TCP, cloud client from the
/// environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTransports;

impl TransportFactory for DefaultTransports {
    fn logstash_handler(
        &self,
        settings: &LogstashSettings,
        formatter: Arc<dyn RecordFormatter>,
    ) -> Result<Arc<dyn Handler>, TransportError> {
        let handler = LogstashHandler::connect(&settings.host, &settings.port, LogstashVersion::V1)?
            .with_formatter(formatter);
        Ok(Arc::new(handler))
    }

    fn stackdriver_handler(
        &self,
        _settings: &StackdriverSettings,
        formatter: Arc<dyn RecordFormatter>,
    ) -> Result<Arc<dyn Handler>, TransportError> {
        let client = CloudLoggingClient::from_env()?;
        Ok(Arc::new(client.default_handler().with_formatter(formatter)))
    }
}
