//! Static dispatch header emission
//!
//! Produces the header that the dispatch library includes several times,
//! each time defining one `MAPI_TMP_*` macro to pull in the section it needs.

use gldispatch_core::{FunctionDescriptor, NoopEntry, NoopMode, TableLayout};

const PREAMBLE: &str = r#"/* This file is automatically generated. Do not modify. */

#ifndef _GLAPI_TMP_H_
#define _GLAPI_TMP_H_
typedef int GLclampx;
typedef void (APIENTRY  *GLDEBUGPROCKHR)(GLenum source,GLenum type,GLuint id,GLenum severity,GLsizei length,const GLchar *message,const void *userParam);
#endif /* _GLAPI_TMP_H_ */
"#;

pub struct MapiHeaderEmitter;

impl Default for MapiHeaderEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl MapiHeaderEmitter {
    pub fn new() -> Self {
        Self
    }

    /// Emit the whole header for a checked layout.
    pub fn emit(&self, layout: &TableLayout) -> String {
        let mut code = String::new();
        code.push_str(PREAMBLE);
        code.push('\n');
        for section in [
            self.emit_defines(layout),
            self.emit_table(layout),
            self.emit_noop_array(layout),
            self.emit_public_stubs(layout),
            self.emit_public_entries(layout),
            self.emit_stub_asm(layout),
        ] {
            code.push_str(&section);
            code.push('\n');
        }
        code
    }

    /// Forward declarations of every exported function.
    pub fn emit_defines(&self, layout: &TableLayout) -> String {
        let mut code = String::new();
        code.push_str("#ifdef MAPI_TMP_DEFINES\n");
        code.push_str("#define GL_GLEXT_PROTOTYPES\n");
        code.push_str("#include \"GL/gl.h\"\n");
        code.push_str("#include \"GL/glext.h\"\n\n");
        for func in &layout.functions {
            code.push_str(&format!(
                "GLAPI {} APIENTRY {}({});\n",
                func.return_type(),
                func.name,
                func.declared_args()
            ));
        }
        code.push_str("#undef MAPI_TMP_DEFINES\n");
        code.push_str("#endif /* MAPI_TMP_DEFINES */\n");
        code
    }

    /// Static and dynamic table capacity.
    pub fn emit_table(&self, layout: &TableLayout) -> String {
        let mut code = String::new();
        code.push_str("#ifdef MAPI_TMP_TABLE\n");
        code.push_str(&format!("#define MAPI_TABLE_NUM_STATIC {}\n", layout.num_static));
        code.push_str(&format!("#define MAPI_TABLE_NUM_DYNAMIC {}\n", layout.num_dynamic));
        code.push_str("#undef MAPI_TMP_TABLE\n");
        code.push_str("#endif /* MAPI_TMP_TABLE */\n");
        code
    }

    /// The no-op fallback array.
    ///
    /// Diagnostic layouts get the named array under `DEBUG` and the generic
    /// one otherwise; generic layouts only get the generic array.
    pub fn emit_noop_array(&self, layout: &TableLayout) -> String {
        let mut code = String::new();
        code.push_str("#ifdef MAPI_TMP_NOOP_ARRAY\n");
        match layout.noop_mode {
            NoopMode::Diagnostic => {
                code.push_str("#ifdef DEBUG\n\n");
                for func in layout.functions.iter().filter(|func| func.slot.is_some()) {
                    code.push_str(&emit_noop_function(func));
                }
                code.push_str(&emit_noop_table(&layout.noop_entries));
                code.push_str("#else /* DEBUG */\n\n");
                code.push_str(&emit_noop_table(&vec![NoopEntry::Generic; layout.table_len()]));
                code.push_str("#endif /* DEBUG */\n");
            }
            NoopMode::Generic => {
                code.push_str(&emit_noop_table(&layout.noop_entries));
            }
        }
        code.push_str("#undef MAPI_TMP_NOOP_ARRAY\n");
        code.push_str("#endif /* MAPI_TMP_NOOP_ARRAY */\n");
        code
    }

    /// Name/slot metadata with unresolved address placeholders.
    pub fn emit_public_stubs(&self, layout: &TableLayout) -> String {
        let mut code = String::new();
        code.push_str("#ifdef MAPI_TMP_PUBLIC_STUBS\n");
        code.push_str("static const struct mapi_stub public_stubs[] = {\n");
        for stub in &layout.stubs {
            code.push_str(&format!("   {{ \"{}\", {}, NULL }},\n", stub.name, stub.slot));
        }
        code.push_str("};\n");
        code.push_str("#undef MAPI_TMP_PUBLIC_STUBS\n");
        code.push_str("#endif /* MAPI_TMP_PUBLIC_STUBS */\n");
        code
    }

    /// Compiled public stubs calling through the current table.
    pub fn emit_public_entries(&self, layout: &TableLayout) -> String {
        let mut code = String::new();
        code.push_str("#ifdef MAPI_TMP_PUBLIC_ENTRIES\n");
        for func in &layout.functions {
            let Some(slot) = func.slot else { continue };
            let ret = if func.has_return() { "return " } else { "" };
            let rt = func.return_type();
            let args = func.declared_args();
            code.push_str(&format!("GLAPI {} APIENTRY {}({})\n", rt, func.name, args));
            code.push_str("{\n");
            code.push_str("   const struct _glapi_table *_tbl = entry_current_get();\n");
            code.push_str(&format!("   mapi_func _func = ((const mapi_func *) _tbl)[{}];\n", slot));
            code.push_str(&format!(
                "   {}(({} (APIENTRY *)({})) _func)({});\n",
                ret,
                rt,
                args,
                func.call_args()
            ));
            code.push_str("}\n\n");
        }
        code.push('\n');
        code.push_str("static const mapi_func public_entries[] = {\n");
        for func in &layout.functions {
            code.push_str(&format!("   (mapi_func) {},\n", func.name));
        }
        code.push_str("};\n");
        code.push_str("#undef MAPI_TMP_PUBLIC_ENTRIES\n");
        code.push_str("#endif /* MAPI_TMP_PUBLIC_ENTRIES */\n");
        code
    }

    /// One named, slot-parameterised assembly trampoline per function.
    pub fn emit_stub_asm(&self, layout: &TableLayout) -> String {
        let mut code = String::new();
        code.push_str("#ifdef MAPI_TMP_STUB_ASM_GCC\n");
        code.push_str("__asm__(\n");
        for stub in &layout.stubs {
            code.push_str(&format!("STUB_ASM_ENTRY(\"{}\")\"\\n\"\n", stub.name));
            code.push_str(&format!("\"\\t\"STUB_ASM_CODE(\"{}\")\"\\n\"\n\n", stub.slot));
        }
        code.push_str(");\n");
        code.push_str("#undef MAPI_TMP_STUB_ASM_GCC\n");
        code.push_str("#endif /* MAPI_TMP_STUB_ASM_GCC */\n");
        code
    }
}

fn emit_noop_function(func: &FunctionDescriptor) -> String {
    let mut code = String::new();
    let rt = func.return_type();
    code.push_str(&format!(
        "static {} APIENTRY noop{}({})\n",
        rt,
        func.base_name,
        func.declared_args()
    ));
    code.push_str("{\n");
    if !func.args.is_empty() {
        code.push_str("  ");
        for arg in &func.args {
            code.push_str(&format!(" (void) {};", arg.name));
        }
        code.push('\n');
    }
    code.push_str(&format!("   noop_warn(\"{}\");\n", func.name));
    if func.has_return() {
        code.push_str(&format!("   return ({}) 0;\n", rt));
    }
    code.push_str("}\n\n");
    code
}

fn emit_noop_table(entries: &[NoopEntry]) -> String {
    let mut code = String::new();
    code.push_str("const mapi_func table_noop_array[] = {\n");
    let lines: Vec<String> = entries
        .iter()
        .map(|entry| match entry {
            NoopEntry::Named { base_name, .. } => format!("   (mapi_func) noop{}", base_name),
            NoopEntry::Generic => "   (mapi_func) noop_generic".to_string(),
        })
        .collect();
    code.push_str(&lines.join(",\n"));
    if !lines.is_empty() {
        code.push('\n');
    }
    code.push_str("};\n\n");
    code
}
