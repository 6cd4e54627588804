//! In-memory transports for tests
//!
//! Only available with the `test-utils` feature.

use crate::provider::{LogstashSettings, Provider, StackdriverSettings};
use crate::transport::TransportFactory;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use temlogger_core::{CaptureHandler, Handler, Logger, RecordFormatter};
use temlogger_transports::TransportError;

#[derive(Default)]
struct State {
    fail_with: Option<Provider>,
    watched: Option<Arc<Logger>>,
    handlers_at_build: Vec<usize>,
    built: Vec<(Provider, CaptureHandler)>,
    logstash_settings: Vec<LogstashSettings>,
    stackdriver_settings: Vec<StackdriverSettings>,
}

/// [`TransportFactory`] building [`CaptureHandler`]s.
///
/// Counts constructions per provider, can be primed to fail, and records how
/// many handlers a watched logger held at each construction.
///
/// ```rust,ignore
/// let transports = Arc::new(RecordingTransports::new());
/// let manager = LoggerManager::with_transports(config, transports.clone());
/// manager.get_logger("api")?;
/// assert_eq!(transports.built(Provider::Logstash), 1);
/// ```
#[derive(Default)]
pub struct RecordingTransports {
    logstash_builds: AtomicUsize,
    stackdriver_builds: AtomicUsize,
    state: Mutex<State>,
}

impl RecordingTransports {
    /// Factory that builds successfully until primed with [`fail`](Self::fail)
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every later construction for `provider` fail with a connect error
    pub fn fail(&self, provider: Provider) {
        self.state().fail_with = Some(provider);
    }

    /// Stop failing constructions
    pub fn succeed(&self) {
        self.state().fail_with = None;
    }

    /// Record the handler count of `logger` at each construction
    pub fn watch(&self, logger: Arc<Logger>) {
        self.state().watched = Some(logger);
    }

    /// Handler counts of the watched logger, one per construction
    pub fn handlers_at_build(&self) -> Vec<usize> {
        self.state().handlers_at_build.clone()
    }

    /// Number of handlers built for `provider`, failed attempts included
    pub fn built(&self, provider: Provider) -> usize {
        match provider {
            Provider::Default => 0,
            Provider::Logstash => self.logstash_builds.load(Ordering::SeqCst),
            Provider::Stackdriver => self.stackdriver_builds.load(Ordering::SeqCst),
        }
    }

    /// Handlers built so far, oldest first
    pub fn handlers(&self) -> Vec<(Provider, CaptureHandler)> {
        self.state().built.clone()
    }

    /// The most recently built handler
    pub fn last_handler(&self) -> Option<CaptureHandler> {
        self.state().built.last().map(|(_, handler)| handler.clone())
    }

    /// Settings passed to each logstash construction
    pub fn logstash_settings(&self) -> Vec<LogstashSettings> {
        self.state().logstash_settings.clone()
    }

    /// Settings passed to each cloud logging construction
    pub fn stackdriver_settings(&self) -> Vec<StackdriverSettings> {
        self.state().stackdriver_settings.clone()
    }

    fn build(
        &self,
        provider: Provider,
        formatter: Arc<dyn RecordFormatter>,
    ) -> Result<Arc<dyn Handler>, TransportError> {
        let mut state = self.state();
        let count = state.watched.as_ref().map(|logger| logger.handlers().len());
        if let Some(count) = count {
            state.handlers_at_build.push(count);
        }

        if state.fail_with == Some(provider) {
            return Err(TransportError::Connect {
                addr: format!("{provider}.invalid:0"),
                source: std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "primed failure",
                ),
            });
        }

        let handler = CaptureHandler::with_formatter(formatter);
        state.built.push((provider, handler.clone()));
        Ok(Arc::new(handler))
    }
}

impl TransportFactory for RecordingTransports {
    fn logstash_handler(
        &self,
        settings: &LogstashSettings,
        formatter: Arc<dyn RecordFormatter>,
    ) -> Result<Arc<dyn Handler>, TransportError> {
        self.logstash_builds.fetch_add(1, Ordering::SeqCst);
        self.state().logstash_settings.push(settings.clone());
        self.build(Provider::Logstash, formatter)
    }

    fn stackdriver_handler(
        &self,
        settings: &StackdriverSettings,
        formatter: Arc<dyn RecordFormatter>,
    ) -> Result<Arc<dyn Handler>, TransportError> {
        self.stackdriver_builds.fetch_add(1, Ordering::SeqCst);
        self.state().stackdriver_settings.push(settings.clone());
        self.build(Provider::Stackdriver, formatter)
    }
}
