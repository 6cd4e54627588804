//! Logging configuration with environment fallback.
//!
//! Every setting has an explicit value, set programmatically, and an implicit
//! fallback read from the process environment whenever the explicit value is
//! empty:
//!
//! | setting | variable |
//! |---|---|
//! | provider | `LOGGING_PROVIDER` |
//! | endpoint host | `LOGGING_URL` |
//! | endpoint port | `LOGGING_PORT` |
//! | environment | `LOGGING_ENVIRONMENT` |
//!
//! # Example
//!
//! ```rust
//! use temlogger::LoggingConfig;
//!
//! let config = LoggingConfig::new();
//! config.set_provider("Logstash");
//! config.set_url("logs.internal");
//! config.set_port("5959");
//!
//! assert_eq!(config.provider(), "logstash");
//! ```

use serde::Deserialize;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Environment fallback values, read fresh on every lookup
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnvFallback {
    logging_provider: String,
    logging_url: String,
    logging_port: String,
    logging_environment: String,
}

/// Process environment minus entries that are not valid unicode
fn unicode_vars() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os().filter_map(|(key, value)| {
        Some((key.into_string().ok()?, value.into_string().ok()?))
    })
}

impl EnvFallback {
    fn read() -> Self {
        match envy::from_iter::<_, EnvFallback>(unicode_vars()) {
            Ok(env) => env,
            Err(e) => {
                tracing::warn!(error = %e, "could not read logging environment variables");
                Self::default()
            }
        }
    }
}

#[derive(Debug, Default, Clone)]
struct Overrides {
    provider: String,
    url: String,
    port: String,
    environment: String,
}

/// Desired provider and connection parameters.
///
/// Getters never fail: an explicit value wins when non-empty, otherwise the
/// environment variable is used, otherwise the empty string. Setters perform
/// no validation.
#[derive(Debug, Default)]
pub struct LoggingConfig {
    overrides: RwLock<Overrides>,
}

impl LoggingConfig {
    /// Empty configuration; every getter falls back to the environment
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Overrides> {
        self.overrides.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Overrides> {
        self.overrides.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve(explicit: &str, fallback: impl FnOnce(EnvFallback) -> String) -> String {
        if explicit.is_empty() {
            fallback(EnvFallback::read())
        } else {
            explicit.to_string()
        }
    }

    /// Desired provider, lower-cased
    pub fn provider(&self) -> String {
        Self::resolve(&self.read().provider, |env| env.logging_provider).to_lowercase()
    }

    /// Set the provider. Any string is accepted.
    pub fn set_provider(&self, provider: impl Into<String>) {
        self.write().provider = provider.into();
    }

    /// Log shipping endpoint host
    pub fn url(&self) -> String {
        Self::resolve(&self.read().url, |env| env.logging_url)
    }

    /// Set the endpoint host
    pub fn set_url(&self, url: impl Into<String>) {
        self.write().url = url.into();
    }

    /// Log shipping endpoint port, unparsed
    pub fn port(&self) -> String {
        Self::resolve(&self.read().port, |env| env.logging_port)
    }

    /// Set the endpoint port
    pub fn set_port(&self, port: impl Into<String>) {
        self.write().port = port.into();
    }

    /// Deployment environment tag
    pub fn environment(&self) -> String {
        Self::resolve(&self.read().environment, |env| env.logging_environment)
    }

    /// Set the environment tag
    pub fn set_environment(&self, environment: impl Into<String>) {
        self.write().environment = environment.into();
    }

    /// Forget every explicit value
    pub fn clear(&self) {
        *self.write() = Overrides::default();
    }
}

/// Load environment variables from a `.env` file in the current directory.
///
/// Existing variables are not overridden and a missing file is not an error.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Load environment variables from a specific file.
pub fn load_dotenv_from<P: AsRef<std::path::Path>>(path: P) {
    let _ = dotenvy::from_path(path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serial_test::serial;

    const VARS: [&str; 4] = [
        "LOGGING_PROVIDER",
        "LOGGING_URL",
        "LOGGING_PORT",
        "LOGGING_ENVIRONMENT",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_empty_without_env() {
        clear_env();
        let config = LoggingConfig::new();
        assert_eq!(config.provider(), "");
        assert_eq!(config.url(), "");
        assert_eq!(config.port(), "");
        assert_eq!(config.environment(), "");
    }

    #[test]
    #[serial]
    fn test_environment_fallback_and_override() {
        clear_env();
        std::env::set_var("LOGGING_ENVIRONMENT", "prod");
        let config = LoggingConfig::new();
        assert_eq!(config.environment(), "prod");

        config.set_environment("staging");
        assert_eq!(config.environment(), "staging");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_provider_is_lowercased() {
        clear_env();
        let config = LoggingConfig::new();
        config.set_provider("StackDriver");
        assert_eq!(config.provider(), "stackdriver");

        config.clear();
        std::env::set_var("LOGGING_PROVIDER", "LOGSTASH");
        assert_eq!(config.provider(), "logstash");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_other_settings_keep_case() {
        clear_env();
        let config = LoggingConfig::new();
        config.set_url("Logs.Internal");
        config.set_environment("QA");
        assert_eq!(config.url(), "Logs.Internal");
        assert_eq!(config.environment(), "QA");
    }

    #[test]
    #[serial]
    fn test_clear_falls_back_to_env() {
        clear_env();
        std::env::set_var("LOGGING_PROVIDER", "logstash");
        std::env::set_var("LOGGING_URL", "env-host");
        std::env::set_var("LOGGING_PORT", "5000");
        std::env::set_var("LOGGING_ENVIRONMENT", "env");

        let config = LoggingConfig::new();
        config.set_provider("stackdriver");
        config.set_url("explicit-host");
        config.set_port("6000");
        config.set_environment("explicit");
        assert_eq!(config.url(), "explicit-host");

        config.clear();
        assert_eq!(config.provider(), "logstash");
        assert_eq!(config.url(), "env-host");
        assert_eq!(config.port(), "5000");
        assert_eq!(config.environment(), "env");

        clear_env();
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_non_unicode_variable_is_ignored() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        clear_env();
        std::env::set_var("TEMLOGGER_NOT_UTF8", OsString::from_vec(vec![0x66, 0xff, 0x6f]));
        std::env::set_var("LOGGING_ENVIRONMENT", "prod");

        let config = LoggingConfig::new();
        assert_eq!(config.environment(), "prod");
        assert_eq!(config.provider(), "");
        config.set_url("explicit");
        assert_eq!(config.url(), "explicit");

        std::env::remove_var("TEMLOGGER_NOT_UTF8");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_explicit_value_falls_back() {
        clear_env();
        std::env::set_var("LOGGING_PORT", "5959");
        let config = LoggingConfig::new();
        config.set_port("");
        assert_eq!(config.port(), "5959");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_dotenv_does_not_override() {
        clear_env();
        std::env::set_var("LOGGING_URL", "from-env");
        let path = std::env::temp_dir().join(format!("temlogger-{}.env", std::process::id()));
        std::fs::write(&path, "LOGGING_URL=from-file\nLOGGING_PORT=7000\n").unwrap();

        load_dotenv_from(&path);
        let config = LoggingConfig::new();
        assert_eq!(config.url(), "from-env");
        assert_eq!(config.port(), "7000");

        std::fs::remove_file(path).unwrap();
        clear_env();
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_explicit_non_empty_wins(value in "[a-zA-Z0-9.-]{1,24}") {
            let config = LoggingConfig::new();
            config.set_url(value.clone());
            config.set_environment(value.clone());
            config.set_provider(value.clone());
            prop_assert_eq!(config.url(), value.clone());
            prop_assert_eq!(config.environment(), value.clone());
            prop_assert_eq!(config.provider(), value.to_lowercase());
        }
    }
}
