//! Lazy GLX wrapper emission

use gldispatch_core::{Resolution, TrampolinePlan, TrampolineSpec};

const INCLUDES: &str = r#"/* This file is automatically generated. Do not modify. */
#include <X11/Xlib.h>
#include <GL/glx.h>
#include "compiler.h"
#include "libgl.h"
#include "glvnd_pthread.h"

"#;

const LOAD_MACRO: &str = "#define LOAD_GLX_FUNC(name) __glXGLLoadGLXFunction(#name, (__GLXextFuncPtr *) &__real_##name, &__mutex_##name)\n\n";

/// Writes one resolve-once trampoline per planned function plus the
/// routine that resolves the eager subset.
pub struct GlxWrapperEmitter;

impl Default for GlxWrapperEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl GlxWrapperEmitter {
    pub fn new() -> Self {
        Self
    }

    pub fn emit(&self, plan: &TrampolinePlan) -> String {
        let mut code = String::new();
        code.push_str(INCLUDES);
        code.push_str(LOAD_MACRO);
        for spec in &plan.trampolines {
            code.push_str(&self.emit_trampoline(spec));
        }
        code.push('\n');
        code.push_str(&self.emit_init(plan));
        code
    }

    pub fn emit_trampoline(&self, spec: &TrampolineSpec) -> String {
        let func = &spec.function;
        let name = &func.name;
        let rt = func.return_type();
        let args = func.declared_args();

        let mut code = String::new();
        code.push_str(&format!("typedef {} (*fn_{}_ptr)({});\n", rt, name, args));
        code.push_str(&format!("static fn_{}_ptr __real_{};\n", name, name));
        if spec.needs_lock() {
            code.push_str(&format!(
                "static glvnd_mutex_t __mutex_{} = GLVND_MUTEX_INITIALIZER;\n",
                name
            ));
        }
        code.push_str(&format!("PUBLIC {} {}({})\n", rt, name, args));
        code.push_str("{\n");
        match spec.resolution {
            Resolution::Lazy => code.push_str(&format!(
                "    fn_{}_ptr _real = (fn_{}_ptr) LOAD_GLX_FUNC({});\n",
                name, name, name
            )),
            Resolution::Eager => code.push_str(&format!("    fn_{}_ptr _real = __real_{};\n", name, name)),
        }
        code.push_str("    if(_real != NULL) {\n");
        if func.has_return() {
            code.push_str(&format!("        return _real({});\n", func.call_args()));
            code.push_str("    } else {\n");
            code.push_str(&format!("        return {};\n", spec.default));
        } else {
            code.push_str(&format!("        _real({});\n", func.call_args()));
        }
        code.push_str("    }\n");
        code.push_str("}\n\n");
        code
    }

    /// The initialisation routine; it takes no lock.
    pub fn emit_init(&self, plan: &TrampolinePlan) -> String {
        let mut code = String::new();
        code.push_str("void __glXWrapperInit(void)\n");
        code.push_str("{\n");
        for spec in plan.eager() {
            code.push_str(&format!(
                "    __glXGLLoadGLXFunction(\"{}\", (__GLXextFuncPtr *) &__real_{}, NULL);\n",
                spec.name(),
                spec.name()
            ));
        }
        code.push_str("}\n");
        code
    }
}
