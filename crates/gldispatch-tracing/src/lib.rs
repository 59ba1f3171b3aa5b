//! Tracing setup shared by the gldispatch generators, runtime tests and
//! benchmarks.
//!
//! Library crates only emit events through `tracing`; executables and test
//! harnesses pick a [`TracingConfig`] and install it once with
//! [`init_global_tracing`].

pub mod phase;

use std::env;
pub use tracing::{debug, error, info, trace, warn};

use tracing::Subscriber;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as tracing_fmt, EnvFilter, Registry};

pub use phase::PhaseSpan;

pub const PROFILE_ENV: &str = "GLDISPATCH_TRACING_PROFILE";
pub const DIRECTIVES_ENV: &str = "GLDISPATCH_TRACING_DIRECTIVES";
pub const FORMAT_ENV: &str = "GLDISPATCH_TRACING_FORMAT";

#[derive(Clone, Debug)]
pub struct TracingConfig {
    /// Filter directives such as `gldispatch_core=debug,info`. Falls back to
    /// `RUST_LOG`, then to `default_directive`.
    pub directives: Option<String>,
    pub default_directive: String,
    pub include_targets: bool,
    pub ansi: bool,
    pub span_events: FmtSpan,
    pub output: TracingOutput,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::for_local()
    }
}

impl TracingConfig {
    /// Pretty, coloured output for a terminal.
    pub fn for_local() -> Self {
        Self {
            directives: None,
            default_directive: "info".to_string(),
            include_targets: true,
            ansi: true,
            span_events: FmtSpan::NONE,
            output: TracingOutput::Pretty,
        }
    }

    /// JSON without colour codes, for collected build logs.
    pub fn for_ci() -> Self {
        Self {
            directives: None,
            default_directive: "info".to_string(),
            include_targets: true,
            ansi: false,
            span_events: FmtSpan::CLOSE,
            output: TracingOutput::Json,
        }
    }

    /// Build a configuration from `GLDISPATCH_TRACING_PROFILE` (`local` or
    /// `ci`), `GLDISPATCH_TRACING_DIRECTIVES` and `GLDISPATCH_TRACING_FORMAT`
    /// (`pretty`, `compact` or `json`).
    pub fn from_env() -> Self {
        let profile = env::var(PROFILE_ENV)
            .unwrap_or_else(|_| "local".to_string())
            .to_ascii_lowercase();

        let mut config = match profile.as_str() {
            "ci" => Self::for_ci(),
            _ => Self::for_local(),
        };

        if let Ok(directives) = env::var(DIRECTIVES_ENV) {
            if !directives.trim().is_empty() {
                config.directives = Some(directives);
            }
        }

        if let Ok(format) = env::var(FORMAT_ENV) {
            if let Some(parsed) = TracingOutput::from_env_value(&format) {
                config.output = parsed;
                if config.output == TracingOutput::Json {
                    config.ansi = false;
                }
            }
        }

        config
    }

    fn resolve_filter(&self) -> Result<EnvFilter, TracingSetupError> {
        match &self.directives {
            Some(directives) => {
                EnvFilter::try_new(directives).map_err(|err| TracingSetupError::InvalidFilter(err.to_string()))
            }
            None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_directive))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TracingSetupError {
    #[error("invalid tracing directive: {0}")]
    InvalidFilter(String),

    /// Usually a subscriber is already installed.
    #[error("failed to install global tracing subscriber: {0}")]
    SubscriberInit(#[from] tracing_subscriber::util::TryInitError),
}

/// Build a subscriber for `config` without installing it.
pub fn build_subscriber(config: &TracingConfig) -> Result<impl Subscriber + Send + Sync, TracingSetupError> {
    let filter = config.resolve_filter()?;
    Ok(Registry::default().with(format_layer(config)).with(filter))
}

fn format_layer(config: &TracingConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    let layer = tracing_fmt::layer()
        .with_target(config.include_targets)
        .with_span_events(config.span_events.clone());
    match config.output {
        TracingOutput::Compact => Box::new(layer.compact().with_ansi(config.ansi)),
        TracingOutput::Pretty => Box::new(layer.pretty().with_ansi(config.ansi)),
        TracingOutput::Json => Box::new(layer.json().with_ansi(false)),
    }
}

/// Install the configured subscriber as the process-wide default.
pub fn init_global_tracing(config: &TracingConfig) -> Result<(), TracingSetupError> {
    build_subscriber(config)?.try_init()?;
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingOutput {
    Compact,
    Pretty,
    Json,
}

impl TracingOutput {
    fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn reset_env() {
        for key in [PROFILE_ENV, DIRECTIVES_ENV, FORMAT_ENV, "RUST_LOG"] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_rejects_invalid_directive() {
        reset_env();
        let config = TracingConfig {
            directives: Some("=::invalid".to_string()),
            ..TracingConfig::default()
        };
        assert!(matches!(build_subscriber(&config), Err(TracingSetupError::InvalidFilter(_))));
    }

    #[test]
    #[serial]
    fn test_builds_with_defaults() {
        reset_env();
        assert!(build_subscriber(&TracingConfig::default()).is_ok());
        assert!(build_subscriber(&TracingConfig::for_ci()).is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_profile_and_format() {
        reset_env();
        env::set_var(PROFILE_ENV, "ci");
        env::set_var(FORMAT_ENV, "compact");
        env::set_var(DIRECTIVES_ENV, "gldispatch_core=debug");

        let config = TracingConfig::from_env();
        assert_eq!(config.directives.as_deref(), Some("gldispatch_core=debug"));
        assert!(!config.ansi);
        assert_eq!(config.output, TracingOutput::Compact);
        reset_env();
    }

    #[test]
    #[serial]
    fn test_json_format_disables_ansi() {
        reset_env();
        env::set_var(FORMAT_ENV, "JSON");
        let config = TracingConfig::from_env();
        assert_eq!(config.output, TracingOutput::Json);
        assert!(!config.ansi);

        env::set_var(FORMAT_ENV, "fancy");
        assert_eq!(TracingConfig::from_env().output, TracingOutput::Pretty);
        reset_env();
    }
}
