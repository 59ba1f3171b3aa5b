//! Function descriptors
//!
//! A [`FunctionDescriptor`] is one exported entry point as supplied by the
//! interface documents. Descriptors carry C type names verbatim; nothing here
//! interprets them beyond the `void` and pointer checks the generators need.

use serde::{Deserialize, Serialize};

/// API prefixes stripped when deriving a descriptor's base name.
const API_PREFIXES: &[&str] = &["glX", "egl", "gl"];

/// One parameter of an entry point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argument {
    /// C type, e.g. `const GLchar *`
    #[serde(rename = "type")]
    pub ty: String,
    /// Parameter name
    pub name: String,
}

impl Argument {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }

    /// Render the parameter the way a C prototype spells it.
    pub fn declaration(&self) -> String {
        let ty = self.ty.trim();
        if ty.ends_with('*') {
            format!("{}{}", ty, self.name)
        } else {
            format!("{} {}", ty, self.name)
        }
    }
}

/// One exported API entry point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    /// Exported symbol name, unique within a generation run
    pub name: String,
    /// C return type (`void` for none)
    pub return_type: String,
    /// Name without the API prefix; derived from `name` when empty
    #[serde(default)]
    pub base_name: String,
    /// Ordered parameter list
    #[serde(default)]
    pub args: Vec<Argument>,
    /// Static dispatch slot; `None` for lazily resolved functions
    #[serde(default)]
    pub slot: Option<u32>,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        let name = name.into();
        let base_name = strip_api_prefix(&name).to_string();
        Self {
            name,
            return_type: return_type.into(),
            base_name,
            args: Vec::new(),
            slot: None,
        }
    }

    pub fn with_slot(mut self, slot: u32) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn with_arg(mut self, ty: impl Into<String>, name: impl Into<String>) -> Self {
        self.args.push(Argument::new(ty, name));
        self
    }

    /// Fill in the derived base name if the document left it out.
    pub(crate) fn normalize(mut self) -> Self {
        if self.base_name.is_empty() {
            self.base_name = strip_api_prefix(&self.name).to_string();
        }
        self
    }

    /// Trimmed return type.
    pub fn return_type(&self) -> &str {
        self.return_type.trim()
    }

    pub fn has_return(&self) -> bool {
        self.return_type() != "void"
    }

    pub fn returns_pointer(&self) -> bool {
        self.return_type().ends_with('*')
    }

    /// Comma-separated parameter declarations, `void` for an empty list.
    pub fn declared_args(&self) -> String {
        if self.args.is_empty() {
            return "void".to_string();
        }
        self.args.iter().map(Argument::declaration).collect::<Vec<_>>().join(", ")
    }

    /// Comma-separated argument names for forwarding a call.
    pub fn call_args(&self) -> String {
        self.args.iter().map(|arg| arg.name.as_str()).collect::<Vec<_>>().join(", ")
    }
}

/// Strip the first matching API prefix from `name`.
pub fn strip_api_prefix(name: &str) -> &str {
    API_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix).filter(|rest| !rest.is_empty()))
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_declaration() {
        assert_eq!(Argument::new("GLenum", "mode").declaration(), "GLenum mode");
        assert_eq!(
            Argument::new("const GLchar *", "name").declaration(),
            "const GLchar *name"
        );
    }

    #[test]
    fn test_base_name() {
        assert_eq!(FunctionDescriptor::new("glBegin", "void").base_name, "Begin");
        assert_eq!(FunctionDescriptor::new("glXSwapBuffers", "void").base_name, "SwapBuffers");
        assert_eq!(FunctionDescriptor::new("Foo", "void").base_name, "Foo");
        assert_eq!(FunctionDescriptor::new("gl", "void").base_name, "gl");
    }

    #[test]
    fn test_argument_lists() {
        let func = FunctionDescriptor::new("glVertex2f", "void")
            .with_arg("GLfloat", "x")
            .with_arg("GLfloat", "y");
        assert_eq!(func.declared_args(), "GLfloat x, GLfloat y");
        assert_eq!(func.call_args(), "x, y");
        assert!(!func.has_return());

        let empty = FunctionDescriptor::new("glGetError", "GLenum");
        assert_eq!(empty.declared_args(), "void");
        assert_eq!(empty.call_args(), "");
        assert!(empty.has_return());
    }

    #[test]
    fn test_deserialize_defaults() {
        let func: FunctionDescriptor =
            serde_json::from_str(r#"{"name": "glFinish", "return_type": "void"}"#).unwrap();
        let func = func.normalize();
        assert_eq!(func.base_name, "Finish");
        assert_eq!(func.slot, None);
        assert!(func.args.is_empty());
    }
}
