//! # gldispatch-runtime
//!
//! In-process side of the dispatch protocol.
//!
//! - [`DispatchTable`]: `num_static + num_dynamic` slots, each pre-bound to a
//!   no-op so an unbound call warns and returns a default.
//! - [`DispatchState`]: the installed table plus the dynamic slot registry;
//!   stubs load the table through it without taking a lock.
//! - [`LazySymbol`]: a resolve-once cell. At most one name lookup per process
//!   lifetime, found or not.
//! - [`dispatch_interface!`] and [`lazy_trampolines!`] declare typed stubs on
//!   top of those pieces.

pub mod entry;
pub mod error;
pub mod lazy;
#[macro_use]
pub mod macros;
pub mod noop;
pub mod state;
pub mod symbol;
pub mod table;

pub use entry::{EntryPtr, NoopReturn, StubInfo};
pub use error::{Result, RuntimeError};
pub use gldispatch_core::NoopMode;
pub use lazy::LazySymbol;
pub use noop::{noop_generic, noop_warn};
pub use state::DispatchState;
pub use symbol::{FnSymbolSource, LibrarySymbolSource, MapSymbolSource, SymbolSource};
pub use table::{DispatchTable, DynamicSlots};
