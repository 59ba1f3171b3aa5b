//! Generator configuration
//!
//! Presets mirror the two ways the dispatch header is built: a debug flavour
//! with one named no-op per slot and a release flavour that shares a single
//! generic no-op. [`GeneratorConfig::from_env`] layers environment overrides
//! on top of a preset.

use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Capacity of the dynamic region reserved for runtime-registered functions.
pub const DEFAULT_NUM_DYNAMIC: usize = 4096;

/// Targets whose export list must match the full interface exactly.
pub const DEFAULT_BASE_TARGETS: &[&str] = &["gl", "gldispatch"];

/// How the no-op fallback array is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoopMode {
    /// One warning stub per static slot, named after its function.
    Diagnostic,
    /// A single shared generic no-op in every slot.
    Generic,
}

impl FromStr for NoopMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "diagnostic" | "debug" => Ok(NoopMode::Diagnostic),
            "generic" | "release" => Ok(NoopMode::Generic),
            other => Err(format!("unknown no-op mode: {other}")),
        }
    }
}

impl fmt::Display for NoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoopMode::Diagnostic => write!(f, "diagnostic"),
            NoopMode::Generic => write!(f, "generic"),
        }
    }
}

/// Generation-time constants shared with the runtime table allocator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Number of dynamic slots appended after the static region.
    pub num_dynamic: usize,
    pub noop_mode: NoopMode,
    /// Targets checked for full-list equality and slot numbering.
    pub base_targets: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::for_debug()
        } else {
            Self::for_release()
        }
    }
}

impl GeneratorConfig {
    pub fn for_debug() -> Self {
        Self {
            num_dynamic: DEFAULT_NUM_DYNAMIC,
            noop_mode: NoopMode::Diagnostic,
            base_targets: DEFAULT_BASE_TARGETS.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn for_release() -> Self {
        Self {
            noop_mode: NoopMode::Generic,
            ..Self::for_debug()
        }
    }

    /// Build a configuration using environment hints.
    ///
    /// # Environment Variables
    ///
    /// - `GLDISPATCH_PROFILE` - `debug` or `release` preset (default follows the build)
    /// - `GLDISPATCH_NUM_DYNAMIC` - dynamic region capacity
    /// - `GLDISPATCH_NOOP_MODE` - `diagnostic` or `generic`
    /// - `GLDISPATCH_BASE_TARGETS` - comma-separated base target names
    pub fn from_env() -> Self {
        let mut config = match env::var("GLDISPATCH_PROFILE")
            .map(|profile| profile.to_ascii_lowercase())
            .as_deref()
        {
            Ok("debug") => Self::for_debug(),
            Ok("release") => Self::for_release(),
            _ => Self::default(),
        };

        if let Ok(value) = env::var("GLDISPATCH_NUM_DYNAMIC") {
            match value.trim().parse::<usize>() {
                Ok(num_dynamic) => config.num_dynamic = num_dynamic,
                Err(err) => warn!(value = %value, error = %err, "ignoring GLDISPATCH_NUM_DYNAMIC"),
            }
        }

        if let Ok(value) = env::var("GLDISPATCH_NOOP_MODE") {
            match value.parse::<NoopMode>() {
                Ok(mode) => config.noop_mode = mode,
                Err(err) => warn!(value = %value, error = %err, "ignoring GLDISPATCH_NOOP_MODE"),
            }
        }

        if let Ok(value) = env::var("GLDISPATCH_BASE_TARGETS") {
            let targets = value
                .split(',')
                .map(str::trim)
                .filter(|target| !target.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>();
            if !targets.is_empty() {
                config.base_targets = targets;
            }
        }

        config
    }

    pub fn with_num_dynamic(mut self, num_dynamic: usize) -> Self {
        self.num_dynamic = num_dynamic;
        self
    }

    pub fn with_noop_mode(mut self, noop_mode: NoopMode) -> Self {
        self.noop_mode = noop_mode;
        self
    }

    pub fn is_base_target(&self, target: &str) -> bool {
        self.base_targets.iter().any(|base| base == target)
    }
}
