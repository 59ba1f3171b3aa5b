//! Resolve-once symbol cells
//!
//! A [`LazySymbol`] starts unresolved and is settled by exactly one lookup,
//! either during initialisation (eager functions) or on first call. The
//! outcome, found or not found, is kept for the life of the process.

use crate::entry::EntryPtr;
use crate::symbol::SymbolSource;
use std::sync::OnceLock;
use tracing::{debug, warn};

pub struct LazySymbol {
    name: &'static str,
    cell: OnceLock<Option<EntryPtr>>,
}

impl LazySymbol {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            cell: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Resolve against `source` unless already settled.
    ///
    /// Concurrent first callers block until the single lookup finishes and
    /// then all observe its result.
    pub fn resolve(&self, source: &dyn SymbolSource) -> Option<EntryPtr> {
        *self.cell.get_or_init(|| {
            let found = source.lookup(self.name);
            match found {
                Some(entry) => debug!(function = self.name, address = ?entry.as_ptr(), "resolved lazy symbol"),
                None => warn!(
                    function = self.name,
                    "implementation does not provide symbol, calls will return a default value"
                ),
            }
            found
        })
    }

    /// Current pointer without attempting resolution.
    pub fn get(&self) -> Option<EntryPtr> {
        self.cell.get().copied().flatten()
    }

    /// Whether a lookup has happened, successful or not.
    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl std::fmt::Debug for LazySymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazySymbol")
            .field("name", &self.name)
            .field("state", &self.cell.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{FnSymbolSource, MapSymbolSource};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    extern "C" fn real() -> i32 {
        1
    }

    #[test]
    fn test_resolution_is_monotonic() {
        let symbol = LazySymbol::new("glXFoo");
        assert!(!symbol.is_resolved());
        assert_eq!(symbol.get(), None);

        let entry = EntryPtr::from_raw(real as *const ());
        let source = MapSymbolSource::new().with("glXFoo", entry);
        assert_eq!(symbol.resolve(&source), Some(entry));
        assert!(symbol.is_resolved());

        // A later source cannot change the settled pointer.
        assert_eq!(symbol.resolve(&MapSymbolSource::new()), Some(entry));
        assert_eq!(symbol.get(), Some(entry));
    }

    #[test]
    fn test_failure_is_settled() {
        let lookups = AtomicUsize::new(0);
        let source = FnSymbolSource::new(|_: &str| {
            lookups.fetch_add(1, Ordering::SeqCst);
            None
        });
        let symbol = LazySymbol::new("glXMissing");
        for _ in 0..5 {
            assert_eq!(symbol.resolve(&source), None);
        }
        assert!(symbol.is_resolved());
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_first_use_looks_up_once() {
        let lookups = AtomicUsize::new(0);
        let entry = EntryPtr::from_raw(real as *const ());
        let source = FnSymbolSource::new(|_: &str| {
            lookups.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(5));
            Some(entry)
        });
        let symbol = LazySymbol::new("glXRace");
        let barrier = Barrier::new(16);

        std::thread::scope(|scope| {
            for _ in 0..16 {
                scope.spawn(|| {
                    barrier.wait();
                    assert_eq!(symbol.resolve(&source), Some(entry));
                });
            }
        });

        assert_eq!(lookups.load(Ordering::SeqCst), 1);
    }
}
