//! Lazy trampoline planning
//!
//! Lazily resolved functions have no table slot. Each one gets a private
//! pointer cell that is filled by a name lookup; functions in the eager
//! subset are looked up once during module initialisation, the rest on first
//! call under a per-function lock.

use crate::default_value::{DefaultValue, DefaultValuePolicy};
use crate::descriptor::FunctionDescriptor;
use crate::error::Result;
use std::collections::BTreeSet;
use tracing::debug;

/// Functions libGLX always exports and resolves at load time.
pub const GLX_EAGER_FUNCTIONS: &[&str] = &[
    "glXChooseVisual",
    "glXCopyContext",
    "glXCreateContext",
    "glXCreateGLXPixmap",
    "glXDestroyContext",
    "glXDestroyGLXPixmap",
    "glXGetConfig",
    "glXIsDirect",
    "glXMakeCurrent",
    "glXSwapBuffers",
    "glXUseXFont",
    "glXWaitGL",
    "glXWaitX",
    "glXQueryServerString",
    "glXGetClientString",
    "glXQueryExtensionsString",
    "glXChooseFBConfig",
    "glXCreateNewContext",
    "glXCreatePbuffer",
    "glXCreatePixmap",
    "glXCreateWindow",
    "glXDestroyPbuffer",
    "glXDestroyPixmap",
    "glXDestroyWindow",
    "glXGetFBConfigAttrib",
    "glXGetFBConfigs",
    "glXGetSelectedEvent",
    "glXGetVisualFromFBConfig",
    "glXMakeContextCurrent",
    "glXQueryContext",
    "glXQueryDrawable",
    "glXSelectEvent",
    "glXGetCurrentContext",
    "glXGetCurrentDrawable",
    "glXGetCurrentReadDrawable",
    "glXGetProcAddress",
    "glXGetProcAddressARB",
    "glXQueryExtension",
    "glXQueryVersion",
];

/// Functions that need typedefs (DMbuffer, video source) headers may lack.
pub const GLX_SKIPPED_FUNCTIONS: &[&str] = &[
    "glXAssociateDMPbufferSGIX",
    "glXCreateGLXVideoSourceSGIX",
    "glXDestroyGLXVideoSourceSGIX",
];

/// When a trampoline's pointer is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Once, by the module initialisation routine
    Eager,
    /// On first call, guarded by a dedicated lock
    Lazy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrampolinePolicy {
    pub eager: BTreeSet<String>,
    pub skip: BTreeSet<String>,
    pub defaults: DefaultValuePolicy,
}

impl TrampolinePolicy {
    pub fn glx() -> Self {
        Self {
            eager: GLX_EAGER_FUNCTIONS.iter().map(|name| name.to_string()).collect(),
            skip: GLX_SKIPPED_FUNCTIONS.iter().map(|name| name.to_string()).collect(),
            defaults: DefaultValuePolicy::glx(),
        }
    }

    pub fn resolution_of(&self, name: &str) -> Resolution {
        if self.eager.contains(name) {
            Resolution::Eager
        } else {
            Resolution::Lazy
        }
    }
}

/// One planned trampoline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrampolineSpec {
    pub function: FunctionDescriptor,
    pub resolution: Resolution,
    pub default: DefaultValue,
}

impl TrampolineSpec {
    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Lazy trampolines need their own resolution lock.
    pub fn needs_lock(&self) -> bool {
        self.resolution == Resolution::Lazy
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrampolinePlan {
    pub trampolines: Vec<TrampolineSpec>,
}

impl TrampolinePlan {
    /// Plan trampolines for `functions`, dropping deny-listed names first.
    pub fn build(functions: &[FunctionDescriptor], policy: &TrampolinePolicy) -> Result<Self> {
        let mut trampolines = Vec::with_capacity(functions.len());
        let mut skipped = 0usize;
        for func in functions {
            if policy.skip.contains(&func.name) {
                skipped += 1;
                continue;
            }
            trampolines.push(TrampolineSpec {
                function: func.clone(),
                resolution: policy.resolution_of(&func.name),
                default: policy.defaults.default_for(func)?,
            });
        }

        let plan = Self { trampolines };
        debug!(
            trampolines = plan.trampolines.len(),
            eager = plan.eager().count(),
            skipped,
            "lazy trampolines planned"
        );
        Ok(plan)
    }

    /// Trampolines resolved by the initialisation routine.
    pub fn eager(&self) -> impl Iterator<Item = &TrampolineSpec> {
        self.trampolines
            .iter()
            .filter(|spec| spec.resolution == Resolution::Eager)
    }

    pub fn get(&self, name: &str) -> Option<&TrampolineSpec> {
        self.trampolines.iter().find(|spec| spec.name() == name)
    }

    pub fn len(&self) -> usize {
        self.trampolines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trampolines.is_empty()
    }
}
