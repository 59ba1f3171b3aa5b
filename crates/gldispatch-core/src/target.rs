//! Target selection

use crate::config::GeneratorConfig;
use crate::descriptor::FunctionDescriptor;
use std::collections::BTreeSet;
use std::fmt;

/// A named export set ("this build exports only these names").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Target(String);

impl Target {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Base targets must export the complete interface in canonical order.
    pub fn is_base(&self, config: &GeneratorConfig) -> bool {
        config.is_base_target(&self.0)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Filter `all` down to `names`, keeping canonical order.
pub fn select<'a>(all: &'a [FunctionDescriptor], names: &BTreeSet<String>) -> Vec<&'a FunctionDescriptor> {
    all.iter().filter(|func| names.contains(&func.name)).collect()
}
