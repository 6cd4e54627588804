//! Named loggers

use crate::{ExceptionInfo, Handler, Level, LogEvent};
use serde_json::{Map, Value};
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// A named logger with a minimum level and zero or more handlers.
///
/// Loggers are shared as `Arc<Logger>` and reconfigured in place, so every
/// holder of a logger observes handler changes made by the resolver.
pub struct Logger {
    name: String,
    level: AtomicU8,
    handlers: RwLock<Vec<Arc<dyn Handler>>>,
}

impl Logger {
    /// Create a logger with no handlers at [`Level::Warning`]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: AtomicU8::new(Level::Warning.value()),
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// The logger's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current minimum level
    pub fn level(&self) -> Level {
        Level::from_value(self.level.load(Ordering::Acquire)).unwrap_or(Level::Warning)
    }

    /// Set the minimum level
    pub fn set_level(&self, level: Level) {
        self.level.store(level.value(), Ordering::Release);
    }

    /// Whether an event at `level` would be dispatched
    pub fn is_enabled_for(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Attach a handler
    pub fn add_handler(&self, handler: Arc<dyn Handler>) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }

    /// Detach every handler
    pub fn clear_handlers(&self) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Snapshot of the attached handlers
    pub fn handlers(&self) -> Vec<Arc<dyn Handler>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether any handler is attached
    pub fn has_handlers(&self) -> bool {
        !self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Start building an event at `level`; the call site is captured here.
    #[track_caller]
    pub fn at(&self, level: Level) -> EventBuilder<'_> {
        EventBuilder {
            logger: self,
            level,
            location: Location::caller(),
            extra: Map::new(),
            exception: None,
        }
    }

    /// Log at [`Level::Debug`]
    #[track_caller]
    pub fn debug(&self, msg: impl Into<String>) {
        self.at(Level::Debug).log(msg);
    }

    /// Log at [`Level::Info`]
    #[track_caller]
    pub fn info(&self, msg: impl Into<String>) {
        self.at(Level::Info).log(msg);
    }

    /// Log at [`Level::Warning`]
    #[track_caller]
    pub fn warning(&self, msg: impl Into<String>) {
        self.at(Level::Warning).log(msg);
    }

    /// Log at [`Level::Error`]
    #[track_caller]
    pub fn error(&self, msg: impl Into<String>) {
        self.at(Level::Error).log(msg);
    }

    /// Log at [`Level::Critical`]
    #[track_caller]
    pub fn critical(&self, msg: impl Into<String>) {
        self.at(Level::Critical).log(msg);
    }

    /// Log at [`Level::Error`] with the error attached as exception info
    #[track_caller]
    pub fn exception<E>(&self, msg: impl Into<String>, err: &E)
    where
        E: StdError + ?Sized,
    {
        self.at(Level::Error).exception(err).log(msg);
    }

    /// Dispatch a fully built event.
    ///
    /// Handler failures are reported through `tracing` and swallowed. With no
    /// handler attached the event goes to the process `tracing` subscriber.
    pub fn log_event(&self, event: LogEvent) {
        if !self.is_enabled_for(event.level) {
            return;
        }

        let handlers = self.handlers();
        if handlers.is_empty() {
            forward_to_tracing(&event);
            return;
        }

        for handler in handlers {
            if let Err(error) = handler.emit(&event) {
                tracing::warn!(logger = %self.name, %error, "handler failed to emit record");
            }
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("handlers", &self.handlers().len())
            .finish()
    }
}

/// Builder returned by [`Logger::at`].
#[must_use = "the event is only emitted by `log`"]
pub struct EventBuilder<'a> {
    logger: &'a Logger,
    level: Level,
    location: &'static Location<'static>,
    extra: Map<String, Value>,
    exception: Option<ExceptionInfo>,
}

impl<'a> EventBuilder<'a> {
    /// Add one extra attribute
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Add several extra attributes
    pub fn fields<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in fields {
            self.extra.insert(key.into(), value.into());
        }
        self
    }

    /// Attach an error as exception info
    pub fn exception<E>(mut self, err: &E) -> Self
    where
        E: StdError + ?Sized,
    {
        self.exception = Some(ExceptionInfo::from_error(err));
        self
    }

    /// Emit the event with `msg`
    pub fn log(self, msg: impl Into<String>) {
        if !self.logger.is_enabled_for(self.level) {
            return;
        }

        let mut event = LogEvent::new(self.logger.name.clone(), self.level, msg)
            .with_location(self.location.file(), self.location.line());
        event.extra = self.extra;
        event.exception = self.exception;

        self.logger.log_event(event);
    }
}

struct Extra<'a>(&'a Map<String, Value>);

impl fmt::Display for Extra<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

fn forward_to_tracing(event: &LogEvent) {
    let extra = Extra(&event.extra);
    let exception = event
        .exception
        .as_ref()
        .map(|e| e.traceback.as_str())
        .unwrap_or_default();

    match event.level {
        Level::Debug => tracing::debug!(
            logger = %event.name, path = %event.pathname, line = event.lineno,
            extra = %extra, exception, "{}", event.message
        ),
        Level::Info => tracing::info!(
            logger = %event.name, path = %event.pathname, line = event.lineno,
            extra = %extra, exception, "{}", event.message
        ),
        Level::Warning => tracing::warn!(
            logger = %event.name, path = %event.pathname, line = event.lineno,
            extra = %extra, exception, "{}", event.message
        ),
        Level::Error | Level::Critical => tracing::error!(
            logger = %event.name, path = %event.pathname, line = event.lineno,
            extra = %extra, exception, "{}", event.message
        ),
    }
}
