//! # gldispatch-core
//!
//! Pure model behind the GL dispatch generators. Descriptor lists come in,
//! fully checked table layouts and trampoline plans come out; nothing here
//! formats C or touches process state.
//!
//! ## Static dispatch
//!
//! Every statically dispatched function owns a fixed slot. For the base
//! targets the exported list must equal the full interface and each slot must
//! equal its position, otherwise [`TableLayout::build`] refuses to produce a
//! layout.
//!
//! ```
//! use gldispatch_core::{DescriptorSet, FunctionDescriptor, GeneratorConfig, TableLayout, Target};
//!
//! let set = DescriptorSet::from_functions(
//!     vec![
//!         FunctionDescriptor::new("Foo", "void").with_slot(0),
//!         FunctionDescriptor::new("Bar", "int").with_slot(1),
//!     ],
//!     &["gl"],
//! );
//! let layout = TableLayout::build(&set, &Target::from("gl"), &GeneratorConfig::for_release()).unwrap();
//! assert_eq!(layout.num_static, 2);
//! assert_eq!(layout.noop_entries.len(), layout.num_static + layout.num_dynamic);
//! assert_eq!(layout.slot_of("Bar"), Some(1));
//! ```
//!
//! ## Lazy trampolines
//!
//! [`TrampolinePlan::build`] drops deny-listed names, marks the eager subset
//! and picks each function's default return value.

pub mod config;
pub mod default_value;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod layout;
pub mod target;
pub mod trampoline;

pub use config::{GeneratorConfig, NoopMode, DEFAULT_BASE_TARGETS, DEFAULT_NUM_DYNAMIC};
pub use default_value::{DefaultValue, DefaultValuePolicy};
pub use descriptor::{strip_api_prefix, Argument, FunctionDescriptor};
pub use document::{DescriptorSet, InterfaceDocument};
pub use error::{ConsistencyError, GenerationError, Result, UnknownTypeError};
pub use layout::{check_base_target, validate_slots, NoopEntry, PublicStub, TableLayout};
pub use target::Target;
pub use trampoline::{
    Resolution, TrampolinePlan, TrampolinePolicy, TrampolineSpec, GLX_EAGER_FUNCTIONS, GLX_SKIPPED_FUNCTIONS,
};
