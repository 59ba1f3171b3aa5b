//! Declaration macros for dispatch interfaces
//!
//! These macros are the compiled counterpart of the generated C artifacts:
//! [`dispatch_interface!`] produces slot-indexed stubs over a
//! [`DispatchState`](crate::DispatchState), and [`lazy_trampolines!`]
//! produces resolve-once trampolines over a
//! [`SymbolSource`](crate::SymbolSource).

/// Declare a statically dispatched interface.
///
/// Each function is listed with its fixed slot. The declaration order must
/// match the slot numbering; this is checked at compile time.
///
/// ```
/// use gldispatch_runtime::{dispatch_interface, NoopMode};
/// use std::os::raw::c_int;
///
/// dispatch_interface! {
///     pub mod demo {
///         fn Foo() = 0;
///         fn Bar(x: c_int) -> c_int = 1;
///     }
/// }
///
/// fn main() {
///     let state = demo::new_state(NoopMode::Diagnostic, 4).unwrap();
///     assert_eq!(demo::NUM_STATIC, 2);
///     // Nothing is bound yet, so the no-op answers.
///     assert_eq!(unsafe { demo::Bar(&state, 3) }, 0);
/// }
/// ```
#[macro_export]
macro_rules! dispatch_interface {
    (
        $(#[$meta:meta])*
        $vis:vis mod $module:ident {
            $(
                fn $name:ident ( $( $arg:ident : $ty:ty ),* $(,)? ) $( -> $ret:ty )? = $slot:literal ;
            )*
        }
    ) => {
        $(#[$meta])*
        #[allow(non_snake_case, dead_code, unused_imports, unused_unsafe, clippy::missing_safety_doc)]
        $vis mod $module {
            use super::*;

            /// Name/slot metadata in slot order.
            pub const STUBS: &[$crate::StubInfo] = &[
                $( $crate::StubInfo { name: stringify!($name), slot: $slot }, )*
            ];

            pub const NUM_STATIC: usize = STUBS.len();

            const _: () = {
                let mut index = 0;
                while index < STUBS.len() {
                    assert!(STUBS[index].slot == index, "dispatch slots must follow declaration order");
                    index += 1;
                }
            };

            /// Per-function no-ops that warn with the function's name.
            pub mod noop {
                use super::*;

                $(
                    pub extern "C" fn $name( $( $arg : $ty ),* ) $( -> $ret )? {
                        $( let _ = $arg; )*
                        $crate::noop::noop_warn(stringify!($name));
                        $crate::__noop_return!($( $ret )?)
                    }
                )*
            }

            /// Typed no-ops reported under the shared generic name.
            pub mod generic {
                use super::*;

                $(
                    pub extern "C" fn $name( $( $arg : $ty ),* ) $( -> $ret )? {
                        $( let _ = $arg; )*
                        $crate::noop::noop_warn($crate::noop::GENERIC_NOOP_NAME);
                        $crate::__noop_return!($( $ret )?)
                    }
                )*
            }

            /// No-op array covering the static and dynamic regions.
            ///
            /// Static slots always get a no-op with the function's own
            /// signature; only the dynamic region uses the untyped generic one.
            pub fn noop_array(mode: $crate::NoopMode, num_dynamic: usize) -> ::std::vec::Vec<$crate::EntryPtr> {
                let untyped = $crate::EntryPtr::from_raw($crate::noop::noop_generic as *const ());
                let mut noops = ::std::vec![untyped; NUM_STATIC + num_dynamic];
                match mode {
                    $crate::NoopMode::Diagnostic => {
                        $( noops[$slot] = $crate::EntryPtr::from_raw(noop::$name as *const ()); )*
                    }
                    $crate::NoopMode::Generic => {
                        $( noops[$slot] = $crate::EntryPtr::from_raw(generic::$name as *const ()); )*
                    }
                }
                noops
            }

            pub fn new_state(mode: $crate::NoopMode, num_dynamic: usize) -> $crate::Result<$crate::DispatchState> {
                $crate::DispatchState::new(STUBS, NUM_STATIC, noop_array(mode, num_dynamic))
            }

            /// A fresh table for `state` filled from `source`.
            pub fn bind(
                state: &$crate::DispatchState,
                source: &dyn $crate::SymbolSource,
            ) -> $crate::Result<$crate::DispatchTable> {
                let table = state.new_table();
                state.bind(&table, source)?;
                Ok(table)
            }

            $(
                /// Call through the installed table.
                ///
                /// # Safety
                ///
                /// The bound implementation must have exactly this signature.
                pub unsafe fn $name(state: &$crate::DispatchState, $( $arg : $ty ),* ) $( -> $ret )? {
                    match state.current_entry($slot) {
                        Ok(entry) => {
                            let func = unsafe {
                                ::std::mem::transmute::<*const (), extern "C" fn( $( $ty ),* ) $( -> $ret )?>(
                                    entry.as_ptr(),
                                )
                            };
                            func( $( $arg ),* )
                        }
                        Err(_) => noop::$name( $( $arg ),* ),
                    }
                }
            )*
        }
    };
}

/// Declare a lazily resolved surface.
///
/// `eager` functions are resolved by `init()` and read directly afterwards;
/// `lazy` functions are resolved on first call, exactly once even under
/// contention. An unresolved function returns its [`NoopReturn`](crate::NoopReturn)
/// default.
///
/// ```
/// use gldispatch_runtime::{lazy_trampolines, MapSymbolSource};
/// use std::os::raw::{c_int, c_void};
/// use std::sync::Arc;
///
/// lazy_trampolines! {
///     pub struct Wrapper {
///         eager fn glXGetCurrentContext() -> *mut c_void;
///         lazy fn glXSwapIntervalSGI(interval: c_int) -> c_int;
///     }
/// }
///
/// let wrapper = Wrapper::new(Arc::new(MapSymbolSource::new()));
/// wrapper.init();
/// assert!(unsafe { wrapper.glXGetCurrentContext() }.is_null());
/// assert_eq!(unsafe { wrapper.glXSwapIntervalSGI(1) }, 0);
/// ```
#[macro_export]
macro_rules! lazy_trampolines {
    (
        $(#[$meta:meta])*
        $vis:vis struct $wrapper:ident {
            $(
                $kind:ident fn $name:ident ( $( $arg:ident : $ty:ty ),* $(,)? ) $( -> $ret:ty )? ;
            )*
        }
    ) => {
        $(#[$meta])*
        #[allow(non_snake_case)]
        $vis struct $wrapper {
            source: ::std::sync::Arc<dyn $crate::SymbolSource>,
            $( $name: $crate::LazySymbol, )*
        }

        #[allow(non_snake_case, dead_code, unused_unsafe, clippy::missing_safety_doc)]
        impl $wrapper {
            pub fn new(source: ::std::sync::Arc<dyn $crate::SymbolSource>) -> Self {
                Self {
                    source,
                    $( $name: $crate::LazySymbol::new(stringify!($name)), )*
                }
            }

            /// Resolve the eager subset. Returns how many were found.
            pub fn init(&self) -> usize {
                let mut found = 0;
                $(
                    if $crate::__is_eager!($kind) && self.$name.resolve(&*self.source).is_some() {
                        found += 1;
                    }
                )*
                found
            }

            pub fn eager_names() -> ::std::vec::Vec<&'static str> {
                let mut names = ::std::vec::Vec::new();
                $(
                    if $crate::__is_eager!($kind) {
                        names.push(stringify!($name));
                    }
                )*
                names
            }

            /// Every cell, in declaration order.
            pub fn symbols(&self) -> ::std::vec::Vec<&$crate::LazySymbol> {
                ::std::vec![ $( &self.$name ),* ]
            }

            $(
                /// # Safety
                ///
                /// The resolved implementation must have exactly this signature.
                pub unsafe fn $name(&self, $( $arg : $ty ),* ) $( -> $ret )? {
                    match $crate::__trampoline_entry!($kind, self.$name, self.source) {
                        Some(entry) => {
                            let func = unsafe {
                                ::std::mem::transmute::<*const (), extern "C" fn( $( $ty ),* ) $( -> $ret )?>(
                                    entry.as_ptr(),
                                )
                            };
                            func( $( $arg ),* )
                        }
                        None => $crate::__noop_return!($( $ret )?),
                    }
                }
            )*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __noop_return {
    () => {
        ()
    };
    ($ret:ty) => {
        <$ret as $crate::NoopReturn>::noop_return()
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __is_eager {
    (eager) => {
        true
    };
    (lazy) => {
        false
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __trampoline_entry {
    (eager, $cell:expr, $source:expr) => {
        $cell.get()
    };
    (lazy, $cell:expr, $source:expr) => {
        $cell.resolve(&*$source)
    };
}
