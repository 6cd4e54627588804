//! Name to logger map

use crate::Logger;
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

/// Holds at most one [`Logger`] per name.
///
/// Asking twice for the same name yields the same `Arc<Logger>`, so
/// reconfiguration done through one handle is visible through all of them.
#[derive(Debug, Default)]
pub struct LoggerRegistry {
    loggers: DashMap<String, Arc<Logger>>,
}

impl LoggerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> Arc<LoggerRegistry> {
        static GLOBAL: OnceLock<Arc<LoggerRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(Arc::default).clone()
    }

    /// Fetch the logger for `name`, creating it on first use
    pub fn get_or_create(&self, name: &str) -> Arc<Logger> {
        if let Some(logger) = self.loggers.get(name) {
            return logger.clone();
        }

        self.loggers
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Logger::new(name)))
            .clone()
    }

    /// Fetch an existing logger
    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.get(name).map(|logger| logger.clone())
    }

    /// Whether a logger exists for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.loggers.contains_key(name)
    }

    /// Names of all known loggers, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of known loggers
    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    /// Whether no logger has been created
    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }
}
