#![forbid(unsafe_code)]

//! Optional subscriber installation.
//!
//! Libraries in this workspace only emit `tracing` events; binaries opt in
//! to output by calling [`init`] once at startup.
//!
//! | Variable              | Meaning                                        |
//! |-----------------------|------------------------------------------------|
//! | `TILECAST_LOG`        | `EnvFilter` directives, default `warn`         |
//! | `TILECAST_LOG_FORMAT` | `json` for one JSON object per line            |

use tracing_subscriber::EnvFilter;

use crate::Error;

pub const ENV_LOG: &str = "TILECAST_LOG";
pub const ENV_LOG_FORMAT: &str = "TILECAST_LOG_FORMAT";

/// How to install the subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string, e.g. `tilecast_scene=debug`.
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(filter) = get_env(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            config.filter = filter;
        }
        config.json = get_env(ENV_LOG_FORMAT)
            .map(|v| v.trim().eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        config
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    #[must_use]
    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

/// Install a global stderr subscriber. Fails if the filter does not parse or
/// a global subscriber is already set.
pub fn init(config: &LoggingConfig) -> Result<(), Error> {
    let filter = EnvFilter::try_new(&config.filter)
        .map_err(|err| Error::Logging(format!("invalid filter {:?}: {err}", config.filter)))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| Error::Logging(err.to_string()))
}

/// [`init`] with [`LoggingConfig::from_env`].
pub fn init_from_env() -> Result<(), Error> {
    init(&LoggingConfig::from_env())
}
