//! End-to-end generation from interface documents

use gldispatch_codegen::{generate_glx_wrapper, generate_mapi_header, write_output};
use gldispatch_core::{
    ConsistencyError, DescriptorSet, GenerationError, GeneratorConfig, InterfaceDocument, Target, TrampolinePolicy,
};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn gl_set() -> DescriptorSet {
    let doc = InterfaceDocument::from_path(fixture("gl.json")).unwrap();
    DescriptorSet::from_documents([doc]).unwrap()
}

fn glx_set() -> DescriptorSet {
    let doc = InterfaceDocument::from_path(fixture("glx.json")).unwrap();
    DescriptorSet::from_documents([doc]).unwrap()
}

#[test]
fn test_base_target_header() {
    let config = GeneratorConfig::for_debug().with_num_dynamic(16);
    let code = generate_mapi_header(&gl_set(), &Target::from("gldispatch"), &config).unwrap();

    assert!(code.contains("#define MAPI_TABLE_NUM_STATIC 4\n"));
    assert!(code.contains("#define MAPI_TABLE_NUM_DYNAMIC 16\n"));
    assert!(code.contains("GLAPI const GLubyte * APIENTRY glGetString(GLenum name);\n"));
    assert!(code.contains("   { \"glNewList\", 0, NULL },\n"));
    assert!(code.contains("   { \"glGetString\", 3, NULL },\n"));
    assert!(code.contains("static GLboolean APIENTRY noopIsList(GLuint list)\n"));
    assert!(code.contains("   return (const GLubyte *) 0;\n"));
    assert!(code.contains("STUB_ASM_CODE(\"3\")"));
}

#[test]
fn test_subset_target_keeps_full_table() {
    let config = GeneratorConfig::for_debug().with_num_dynamic(2);
    let code = generate_mapi_header(&gl_set(), &Target::from("opengl"), &config).unwrap();

    assert!(code.contains("#define MAPI_TABLE_NUM_STATIC 4\n"));
    assert!(code.contains("   { \"glIsList\", 2, NULL },\n   { \"glGetString\", 3, NULL },\n};"));
    assert!(!code.contains("glNewList"));
    // Unexported slots fall back to the generic no-op.
    assert!(code.contains(
        "   (mapi_func) noop_generic,\n   (mapi_func) noop_generic,\n   (mapi_func) noopIsList,\n   (mapi_func) noopGetString,\n"
    ));
}

#[test]
fn test_base_target_drift_emits_nothing() {
    let mut set = gl_set();
    set.set_exports("gldispatch", ["glNewList", "glEndList", "glGetString"]);
    let result = generate_mapi_header(&set, &Target::from("gldispatch"), &GeneratorConfig::for_release());
    assert!(matches!(
        result,
        Err(GenerationError::Consistency(ConsistencyError::FilteredLengthMismatch { filtered: 3, total: 4, .. }))
    ));
}

#[test]
fn test_unknown_target() {
    let result = generate_mapi_header(&gl_set(), &Target::from("gles9"), &GeneratorConfig::for_release());
    assert!(matches!(result, Err(GenerationError::UnknownTarget(name)) if name == "gles9"));
}

#[test]
fn test_glx_wrapper() {
    let code = generate_glx_wrapper(glx_set().functions(), &TrampolinePolicy::glx()).unwrap();

    assert!(!code.contains("glXCreateGLXVideoSourceSGIX"));
    assert!(code.contains("static fn_glXGetCurrentContext_ptr __real_glXGetCurrentContext;\n"));
    assert!(!code.contains("__mutex_glXGetCurrentContext ="));
    assert!(code.contains("static glvnd_mutex_t __mutex_glXSwapIntervalSGI = GLVND_MUTEX_INITIALIZER;\n"));
    assert!(code.contains("        return False;\n"));
    assert!(code.contains("        return None;\n"));
    assert!(code.contains("PUBLIC __GLXextFuncPtr glXGetProcAddressARB(const GLubyte *procName)\n"));

    let init = &code[code.find("void __glXWrapperInit(void)").unwrap()..];
    assert_eq!(init.matches("__glXGLLoadGLXFunction(").count(), 3);
    assert!(!init.contains("glXSwapIntervalSGI"));
}

#[test]
fn test_unknown_glx_type_emits_nothing() {
    let json = r#"{ "functions": [ { "name": "glXGetMysteryHandle", "return_type": "GLXMystery" } ] }"#;
    let doc = InterfaceDocument::from_json_str(json).unwrap();
    let set = DescriptorSet::from_documents([doc]).unwrap();
    let result = generate_glx_wrapper(set.functions(), &TrampolinePolicy::glx());
    assert!(matches!(result, Err(GenerationError::UnknownType(err)) if err.type_name == "GLXMystery"));
}

#[test]
fn test_write_output() {
    let path = std::env::temp_dir().join(format!("gldispatch_codegen_{}.h", std::process::id()));
    write_output(&path, "/* header */\n").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "/* header */\n");
    std::fs::remove_file(&path).unwrap();

    let missing = PathBuf::from("/nonexistent/dir/out.h");
    assert!(matches!(write_output(&missing, ""), Err(GenerationError::Io { .. })));
}
