//! Provider identity and per-provider construction parameters

use crate::config::LoggingConfig;
use std::fmt;

/// Transport a logger is bound to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Provider {
    /// The process `tracing` subscriber, no external handler
    #[default]
    Default,
    /// Logstash TCP shipping
    Logstash,
    /// Cloud logging structured output
    Stackdriver,
}

impl Provider {
    /// Map a provider string to a provider.
    ///
    /// Matching is case-insensitive. Unknown or empty strings map to
    /// [`Provider::Default`]; surrounding whitespace is not trimmed.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "logstash" => Provider::Logstash,
            "stackdriver" => Provider::Stackdriver,
            _ => Provider::Default,
        }
    }

    /// Canonical lower-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Default => "default",
            Provider::Logstash => "logstash",
            Provider::Stackdriver => "stackdriver",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for building a logstash handler
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogstashSettings {
    /// Endpoint host
    pub host: String,
    /// Endpoint port, unparsed
    pub port: String,
    /// Deployment environment tag
    pub environment: String,
}

/// Parameters for building a cloud logging handler
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackdriverSettings {
    /// Deployment environment tag
    pub environment: String,
}

/// A provider together with everything needed to build its transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderPlan {
    /// Nothing to build
    Default,
    /// Logstash handler parameters
    Logstash(LogstashSettings),
    /// Cloud logging handler parameters
    Stackdriver(StackdriverSettings),
}

impl ProviderPlan {
    /// Read the plan for `provider` from `config`
    pub fn resolve(provider: Provider, config: &LoggingConfig) -> Self {
        match provider {
            Provider::Default => ProviderPlan::Default,
            Provider::Logstash => ProviderPlan::Logstash(LogstashSettings {
                host: config.url(),
                port: config.port(),
                environment: config.environment(),
            }),
            Provider::Stackdriver => ProviderPlan::Stackdriver(StackdriverSettings {
                environment: config.environment(),
            }),
        }
    }

    /// The provider this plan builds
    pub fn provider(&self) -> Provider {
        match self {
            ProviderPlan::Default => Provider::Default,
            ProviderPlan::Logstash(_) => Provider::Logstash,
            ProviderPlan::Stackdriver(_) => Provider::Stackdriver,
        }
    }
}
