//! Default return values for unresolved lazy trampolines
//!
//! When the active implementation does not provide a symbol, the trampoline
//! returns a fixed sentinel chosen from the function's return type. The
//! mapping is exhaustive: a handle-like typedef that is not listed is a
//! generation error, never a guess.

use crate::descriptor::FunctionDescriptor;
use crate::error::UnknownTypeError;
use std::collections::BTreeSet;
use std::fmt;

/// Sentinel returned when resolution failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultValue {
    /// Function returns nothing
    Void,
    /// Pointer or opaque pointer typedef
    Null,
    /// XID-style handle typedef
    NoneHandle,
    /// The interface's boolean type
    False,
    /// Any other scalar
    Zero,
}

impl DefaultValue {
    /// C spelling of the sentinel.
    pub const fn c_literal(self) -> &'static str {
        match self {
            DefaultValue::Void => "",
            DefaultValue::Null => "NULL",
            DefaultValue::NoneHandle => "None",
            DefaultValue::False => "False",
            DefaultValue::Zero => "0",
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_literal())
    }
}

/// Return-type categories and the prefix reserved for handle typedefs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultValuePolicy {
    pub pointer_types: BTreeSet<String>,
    pub handle_types: BTreeSet<String>,
    pub bool_type: String,
    pub reserved_prefix: String,
}

impl DefaultValuePolicy {
    /// The GLX return-type table.
    pub fn glx() -> Self {
        let set = |names: &[&str]| -> BTreeSet<String> { names.iter().map(|name| name.to_string()).collect() };
        Self {
            pointer_types: set(&["__GLXextFuncPtr", "GLXFBConfig", "GLXFBConfigSGIX", "GLXContext"]),
            handle_types: set(&[
                "GLXContextID",
                "GLXWindow",
                "GLXPbuffer",
                "GLXPixmap",
                "GLXDrawable",
                "GLXFBConfigID",
                "GLXPbufferSGIX",
                "GLXVideoSourceSGIX",
            ]),
            bool_type: "Bool".to_string(),
            reserved_prefix: "GLX".to_string(),
        }
    }

    pub fn default_for(&self, func: &FunctionDescriptor) -> Result<DefaultValue, UnknownTypeError> {
        if !func.has_return() {
            return Ok(DefaultValue::Void);
        }
        let rt = func.return_type();
        if rt.ends_with('*') || self.pointer_types.contains(rt) {
            Ok(DefaultValue::Null)
        } else if self.handle_types.contains(rt) {
            Ok(DefaultValue::NoneHandle)
        } else if rt == self.bool_type {
            Ok(DefaultValue::False)
        } else if rt.starts_with(&self.reserved_prefix) {
            Err(UnknownTypeError {
                function: func.name.clone(),
                type_name: rt.to_string(),
            })
        } else {
            Ok(DefaultValue::Zero)
        }
    }
}

impl Default for DefaultValuePolicy {
    fn default() -> Self {
        Self::glx()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_of(rt: &str) -> Result<DefaultValue, UnknownTypeError> {
        DefaultValuePolicy::glx().default_for(&FunctionDescriptor::new("glXTest", rt))
    }

    #[test]
    fn test_categories() {
        assert_eq!(default_of("void"), Ok(DefaultValue::Void));
        assert_eq!(default_of("const char *"), Ok(DefaultValue::Null));
        assert_eq!(default_of("XVisualInfo *"), Ok(DefaultValue::Null));
        assert_eq!(default_of("GLXContext"), Ok(DefaultValue::Null));
        assert_eq!(default_of("__GLXextFuncPtr"), Ok(DefaultValue::Null));
        assert_eq!(default_of("GLXPixmap"), Ok(DefaultValue::NoneHandle));
        assert_eq!(default_of("GLXVideoSourceSGIX"), Ok(DefaultValue::NoneHandle));
        assert_eq!(default_of("Bool"), Ok(DefaultValue::False));
        assert_eq!(default_of("int"), Ok(DefaultValue::Zero));
        assert_eq!(default_of("unsigned int"), Ok(DefaultValue::Zero));
    }

    #[test]
    fn test_pointer_marker_wins_over_prefix() {
        assert_eq!(default_of("GLXFBConfig *"), Ok(DefaultValue::Null));
    }

    #[test]
    fn test_unknown_typedef() {
        let err = default_of("GLXHyperpipeNetworkSGIX").unwrap_err();
        assert_eq!(err.type_name, "GLXHyperpipeNetworkSGIX");
        assert_eq!(err.function, "glXTest");
    }

    #[test]
    fn test_c_literals() {
        assert_eq!(DefaultValue::Null.to_string(), "NULL");
        assert_eq!(DefaultValue::NoneHandle.to_string(), "None");
        assert_eq!(DefaultValue::False.to_string(), "False");
        assert_eq!(DefaultValue::Zero.to_string(), "0");
    }
}
