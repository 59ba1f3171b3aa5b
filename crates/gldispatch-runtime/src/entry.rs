//! Opaque entry pointers and default return values

/// An opaque function pointer stored in a dispatch slot or lazy cell.
///
/// The pointee's real signature is only known to the stub that calls it,
/// which casts it back before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntryPtr(*const ());

// SAFETY: entry pointers address immutable code, never data.
unsafe impl Send for EntryPtr {}
unsafe impl Sync for EntryPtr {}

impl EntryPtr {
    pub const fn from_raw(ptr: *const ()) -> Self {
        Self(ptr)
    }

    pub const fn as_ptr(self) -> *const () {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

/// Name/slot metadata for one public entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StubInfo {
    pub name: &'static str,
    pub slot: usize,
}

/// Value handed back when no implementation is bound.
///
/// Pointers yield null, booleans `false`, every other scalar zero. XID
/// handles and `Bool` are plain integers on the Rust side, so their `None`
/// and `False` sentinels are zero as well.
pub trait NoopReturn {
    fn noop_return() -> Self;
}

impl NoopReturn for () {
    fn noop_return() -> Self {}
}

impl NoopReturn for bool {
    fn noop_return() -> Self {
        false
    }
}

macro_rules! impl_noop_return_zero {
    ($($ty:ty),* $(,)?) => {
        $(
            impl NoopReturn for $ty {
                fn noop_return() -> Self {
                    0 as $ty
                }
            }
        )*
    };
}

impl_noop_return_zero!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T> NoopReturn for *const T {
    fn noop_return() -> Self {
        std::ptr::null()
    }
}

impl<T> NoopReturn for *mut T {
    fn noop_return() -> Self {
        std::ptr::null_mut()
    }
}

impl<T> NoopReturn for Option<T> {
    fn noop_return() -> Self {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::raw::{c_char, c_int, c_ulong};

    #[test]
    fn test_noop_returns() {
        assert_eq!(<c_int as NoopReturn>::noop_return(), 0);
        assert_eq!(<c_ulong as NoopReturn>::noop_return(), 0);
        assert_eq!(<f32 as NoopReturn>::noop_return(), 0.0);
        assert!(!<bool as NoopReturn>::noop_return());
        assert!(<*const c_char as NoopReturn>::noop_return().is_null());
        assert!(<*mut u8 as NoopReturn>::noop_return().is_null());
        assert!(<Option<extern "C" fn()> as NoopReturn>::noop_return().is_none());
    }

    #[test]
    fn test_entry_ptr() {
        extern "C" fn target() {}
        let entry = EntryPtr::from_raw(target as *const ());
        assert!(!entry.is_null());
        assert!(EntryPtr::from_raw(std::ptr::null()).is_null());
    }
}
