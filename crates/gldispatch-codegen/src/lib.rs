//! gldispatch code generator
//!
//! Turns checked layouts and trampoline plans from `gldispatch-core` into the
//! C sources consumed by the dispatch library: the `MAPI_TMP_*` header and
//! the lazily resolving GLX wrapper.

pub mod glx_wrapper;
pub mod mapi_header;

pub use glx_wrapper::GlxWrapperEmitter;
pub use mapi_header::MapiHeaderEmitter;

use gldispatch_core::{
    DescriptorSet, FunctionDescriptor, GenerationError, GeneratorConfig, Result, TableLayout, Target,
    TrampolinePlan, TrampolinePolicy,
};
use gldispatch_tracing::{debug, info, PhaseSpan};
use std::path::Path;

/// Lay out `target` and emit its header.
///
/// Consistency failures are returned before any text is produced.
pub fn generate_mapi_header(set: &DescriptorSet, target: &Target, config: &GeneratorConfig) -> Result<String> {
    let layout = {
        let _phase = PhaseSpan::new("layout");
        TableLayout::build(set, target, config)?
    };
    let _phase = PhaseSpan::new("emit_mapi_header");
    let code = MapiHeaderEmitter::new().emit(&layout);
    info!(
        interface = %target,
        functions = layout.functions.len(),
        bytes = code.len(),
        "generated dispatch header"
    );
    Ok(code)
}

/// Plan and emit the lazy wrapper for `functions`.
pub fn generate_glx_wrapper(functions: &[FunctionDescriptor], policy: &TrampolinePolicy) -> Result<String> {
    let plan = {
        let _phase = PhaseSpan::new("plan");
        TrampolinePlan::build(functions, policy)?
    };
    let _phase = PhaseSpan::new("emit_glx_wrapper");
    let code = GlxWrapperEmitter::new().emit(&plan);
    info!(
        trampolines = plan.len(),
        eager = plan.eager().count(),
        bytes = code.len(),
        "generated lazy wrapper"
    );
    Ok(code)
}

/// Write generated text to `path`.
pub fn write_output(path: impl AsRef<Path>, code: &str) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, code).map_err(|source| GenerationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("wrote {} bytes to {}", code.len(), path.display());
    Ok(())
}
