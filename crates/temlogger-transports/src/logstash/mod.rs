//! Logstash TCP shipping
//!
//! [`LogstashHandler`] writes one JSON document per line to a logstash
//! `tcp` input configured with the `json_lines` codec.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use temlogger_core::{LogstashFormatter, Logger};
//! use temlogger_transports::{LogstashHandler, LogstashVersion};
//!
//! let handler = LogstashHandler::connect("logs.internal", "5959", LogstashVersion::V1)?
//!     .with_formatter(Arc::new(LogstashFormatter::new("production")));
//!
//! let logger = Logger::new("api");
//! logger.add_handler(Arc::new(handler));
//! # Ok::<(), temlogger_transports::TransportError>(())
//! ```

mod native;

pub use native::NativeFormatter;

use crate::error::{Result, TransportError};
use std::io::Write;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use temlogger_core::{Handler, HandlerError, LogEvent, RecordFormatter};

/// Logstash event protocol version
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LogstashVersion {
    /// Legacy `@fields` event layout
    V0,
    /// Flat event layout with `@version: "1"`
    #[default]
    V1,
}

impl TryFrom<u8> for LogstashVersion {
    type Error = TransportError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(LogstashVersion::V0),
            1 => Ok(LogstashVersion::V1),
            other => Err(TransportError::UnsupportedVersion(other)),
        }
    }
}

/// First reconnect delay after a failed dial
const RETRY_START: Duration = Duration::from_secs(1);
/// Upper bound on the reconnect delay
const RETRY_MAX: Duration = Duration::from_secs(30);

#[derive(Default)]
struct Connection {
    stream: Option<TcpStream>,
    failed_dials: u32,
    retry_at: Option<Instant>,
}

impl Connection {
    /// Delay before the next dial: doubles per consecutive failure, capped
    fn backoff(&self) -> Duration {
        let exponent = self.failed_dials.saturating_sub(1).min(16);
        RETRY_START.saturating_mul(1 << exponent).min(RETRY_MAX)
    }

    fn in_backoff(&self, now: Instant) -> bool {
        self.retry_at.is_some_and(|at| now < at)
    }
}

/// Handler shipping records to logstash over TCP.
///
/// The connection is opened by [`LogstashHandler::connect`], so an
/// unreachable or malformed endpoint fails construction. A write failure
/// drops the connection and the next record dials again; the failed record
/// itself is not resent. When that dial fails too, further dials wait out an
/// exponential backoff (1s doubling up to 30s) and records arriving in the
/// meantime are rejected with [`HandlerError::Disconnected`] without touching
/// the network.
pub struct LogstashHandler {
    addr: String,
    version: LogstashVersion,
    connect_timeout: Duration,
    formatter: Arc<dyn RecordFormatter>,
    connection: Mutex<Connection>,
}

impl LogstashHandler {
    /// Connect timeout used by [`LogstashHandler::connect`]
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Connect to `host:port`.
    ///
    /// `port` is taken as a string, the way it arrives from configuration.
    pub fn connect(host: &str, port: &str, version: LogstashVersion) -> Result<Self> {
        Self::connect_with_timeout(host, port, version, Self::DEFAULT_CONNECT_TIMEOUT)
    }

    /// [`LogstashHandler::connect`] with an explicit connect timeout
    pub fn connect_with_timeout(
        host: &str,
        port: &str,
        version: LogstashVersion,
        connect_timeout: Duration,
    ) -> Result<Self> {
        if host.is_empty() {
            return Err(TransportError::MissingEndpoint("host"));
        }

        let port: u16 = port.parse().map_err(|source| TransportError::InvalidPort {
            port: port.to_string(),
            source,
        })?;

        let addr = format!("{}:{}", host, port);
        let stream = dial(&addr, connect_timeout)?;
        tracing::debug!(%addr, ?version, "connected to logstash");

        Ok(Self {
            addr,
            version,
            connect_timeout,
            formatter: Arc::new(NativeFormatter::new(version)),
            connection: Mutex::new(Connection {
                stream: Some(stream),
                ..Connection::default()
            }),
        })
    }

    /// Shape records with `formatter` instead of the native event layout
    pub fn with_formatter(mut self, formatter: Arc<dyn RecordFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// The `host:port` this handler ships to
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Protocol version
    pub fn version(&self) -> LogstashVersion {
        self.version
    }

    /// Whether a connection is currently open
    pub fn is_connected(&self) -> bool {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stream
            .is_some()
    }
}

impl Handler for LogstashHandler {
    fn emit(&self, event: &LogEvent) -> std::result::Result<(), HandlerError> {
        let record = self.formatter.format(event);
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');

        let mut conn = self
            .connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if conn.stream.is_none() {
            let now = Instant::now();
            if conn.in_backoff(now) {
                return Err(HandlerError::Disconnected(format!(
                    "{} (waiting to reconnect)",
                    self.addr
                )));
            }

            match dial(&self.addr, self.connect_timeout) {
                Ok(stream) => {
                    tracing::debug!(addr = %self.addr, "reconnected to logstash");
                    *conn = Connection {
                        stream: Some(stream),
                        ..Connection::default()
                    };
                }
                Err(e) => {
                    conn.failed_dials = conn.failed_dials.saturating_add(1);
                    conn.retry_at = Some(now + conn.backoff());
                    return Err(HandlerError::Disconnected(e.to_string()));
                }
            }
        }

        let Some(stream) = conn.stream.as_mut() else {
            return Err(HandlerError::Disconnected(self.addr.clone()));
        };

        if let Err(e) = stream.write_all(&line) {
            conn.stream = None;
            return Err(HandlerError::Io(e));
        }

        Ok(())
    }

    fn flush(&self) -> std::result::Result<(), HandlerError> {
        if let Some(stream) = self
            .connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stream
            .as_mut()
        {
            stream.flush()?;
        }
        Ok(())
    }
}

fn dial(addr: &str, timeout: Duration) -> Result<TcpStream> {
    let candidates = addr
        .to_socket_addrs()
        .map_err(|e| TransportError::Resolve(format!("{}: {}", addr, e)))?;

    let mut last_error = None;
    for candidate in candidates {
        match TcpStream::connect_timeout(&candidate, timeout) {
            Ok(stream) => {
                let _ = stream.set_nodelay(true);
                return Ok(stream);
            }
            Err(e) => last_error = Some(e),
        }
    }

    match last_error {
        Some(source) => Err(TransportError::Connect {
            addr: addr.to_string(),
            source,
        }),
        None => Err(TransportError::Resolve(addr.to_string())),
    }
}
