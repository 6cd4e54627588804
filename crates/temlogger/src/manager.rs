//! Logger resolution and provider binding

use crate::config::LoggingConfig;
use crate::error::{Error, Result};
use crate::provider::{Provider, ProviderPlan};
use crate::transport::{DefaultTransports, TransportFactory};
use dashmap::DashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use temlogger_core::{Level, Logger, LoggerRegistry, LogstashFormatter, StackdriverFormatter};

type Binding = Arc<Mutex<Option<Provider>>>;

/// Resolves named loggers bound to the configured provider.
///
/// Each name has its own binding slot recording the provider its logger is
/// currently bound to. Resolution holds that slot's lock for the whole
/// check-and-rebind sequence, so concurrent callers for one name never
/// build two handlers or leave a logger with two.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use temlogger::{LoggerManager, LoggingConfig, Provider};
///
/// let config = Arc::new(LoggingConfig::new());
/// config.set_provider("default");
///
/// let manager = LoggerManager::new(config);
/// let logger = manager.get_logger("worker")?;
/// logger.info("started");
///
/// assert_eq!(manager.bound_provider("worker"), Some(Provider::Default));
/// # Ok::<(), temlogger::Error>(())
/// ```
pub struct LoggerManager {
    config: Arc<LoggingConfig>,
    registry: Arc<LoggerRegistry>,
    transports: Arc<dyn TransportFactory>,
    bindings: DashMap<String, Binding>,
}

impl LoggerManager {
    /// Manager with its own registry and the real transports
    pub fn new(config: Arc<LoggingConfig>) -> Self {
        Self::with_transports(config, Arc::new(DefaultTransports))
    }

    /// Manager with its own registry and `transports`
    pub fn with_transports(config: Arc<LoggingConfig>, transports: Arc<dyn TransportFactory>) -> Self {
        Self::with_parts(config, Arc::new(LoggerRegistry::new()), transports)
    }

    /// Manager over an existing registry
    pub fn with_parts(
        config: Arc<LoggingConfig>,
        registry: Arc<LoggerRegistry>,
        transports: Arc<dyn TransportFactory>,
    ) -> Self {
        Self {
            config,
            registry,
            transports,
            bindings: DashMap::new(),
        }
    }

    /// The configuration resolution reads from
    pub fn config(&self) -> &LoggingConfig {
        &self.config
    }

    /// The registry loggers are created in
    pub fn registry(&self) -> &Arc<LoggerRegistry> {
        &self.registry
    }

    /// Provider the logger for `name` is currently bound to
    pub fn bound_provider(&self, name: &str) -> Option<Provider> {
        let binding = self.bindings.get(name)?.clone();
        let provider = *binding.lock().unwrap_or_else(PoisonError::into_inner);
        provider
    }

    fn binding(&self, name: &str) -> Binding {
        if let Some(binding) = self.bindings.get(name) {
            return binding.clone();
        }
        self.bindings.entry(name.to_string()).or_default().clone()
    }

    /// Return the logger for `name`, bound to the configured provider.
    ///
    /// A logger already bound to that provider is returned untouched.
    /// Otherwise its handlers are detached and the provider's handler is
    /// built and attached. Unknown provider strings bind the default provider.
    ///
    /// # Errors
    ///
    /// Fails when the provider's handler cannot be built. The logger is then
    /// left unbound with no handlers, and the next call tries again.
    pub fn get_logger(&self, name: &str) -> Result<Arc<Logger>> {
        let desired = Provider::parse(&self.config.provider());
        let logger = self.registry.get_or_create(name);

        let binding = self.binding(name);
        let mut bound = binding.lock().unwrap_or_else(PoisonError::into_inner);
        if *bound == Some(desired) {
            return Ok(logger);
        }

        let previous = *bound;
        tracing::debug!(logger = name, from = ?previous, to = %desired, "rebinding logger");
        *bound = None;
        logger.clear_handlers();

        match ProviderPlan::resolve(desired, &self.config) {
            ProviderPlan::Default => {}
            ProviderPlan::Logstash(settings) => {
                let formatter = Arc::new(LogstashFormatter::new(settings.environment.clone()));
                let handler = self
                    .transports
                    .logstash_handler(&settings, formatter)
                    .map_err(|source| Error::Transport {
                        provider: desired,
                        source,
                    })?;
                logger.add_handler(handler);
            }
            ProviderPlan::Stackdriver(settings) => {
                let formatter = Arc::new(StackdriverFormatter::new(settings.environment.clone()));
                let handler = self
                    .transports
                    .stackdriver_handler(&settings, formatter)
                    .map_err(|source| Error::Transport {
                        provider: desired,
                        source,
                    })?;
                logger.add_handler(handler);
            }
        }

        logger.set_level(Level::Info);
        *bound = Some(desired);
        Ok(logger)
    }
}

impl fmt::Debug for LoggerManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerManager")
            .field("config", &self.config)
            .field("loggers", &self.registry.len())
            .field("bindings", &self.bindings.len())
            .finish()
    }
}
