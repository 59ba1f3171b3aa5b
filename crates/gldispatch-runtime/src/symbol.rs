//! Symbol sources
//!
//! A [`SymbolSource`] answers "what is the address of `name` in the active
//! implementation". Lazy trampolines and table binding both go through it.

use crate::entry::EntryPtr;
use crate::error::{Result, RuntimeError};
use libloading::Library;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Name-based lookup against an implementation.
pub trait SymbolSource: Send + Sync {
    fn lookup(&self, name: &str) -> Option<EntryPtr>;
}

/// A source backed by a closure, e.g. a vendor's `getProcAddress`.
pub struct FnSymbolSource<F> {
    lookup: F,
}

impl<F> FnSymbolSource<F>
where
    F: Fn(&str) -> Option<EntryPtr> + Send + Sync,
{
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }
}

impl<F> SymbolSource for FnSymbolSource<F>
where
    F: Fn(&str) -> Option<EntryPtr> + Send + Sync,
{
    fn lookup(&self, name: &str) -> Option<EntryPtr> {
        (self.lookup)(name).filter(|entry| !entry.is_null())
    }
}

/// A fixed name -> pointer map.
#[derive(Debug, Default, Clone)]
pub struct MapSymbolSource {
    symbols: HashMap<String, EntryPtr>,
}

impl MapSymbolSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, entry: EntryPtr) -> Self {
        self.insert(name, entry);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: EntryPtr) {
        self.symbols.insert(name.into(), entry);
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl SymbolSource for MapSymbolSource {
    fn lookup(&self, name: &str) -> Option<EntryPtr> {
        self.symbols.get(name).copied().filter(|entry| !entry.is_null())
    }
}

/// A vendor implementation loaded from a shared library.
pub struct LibrarySymbolSource {
    library: Library,
    path: PathBuf,
    prefix: String,
}

impl LibrarySymbolSource {
    /// Load the library at `path`.
    ///
    /// # Safety
    ///
    /// Loading a library runs its initialisers; the caller must trust it.
    pub unsafe fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let library = Library::new(path).map_err(|source| RuntimeError::LibraryLoad {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("✅ Loaded implementation library: {}", path.display());
        Ok(Self {
            library,
            path: path.to_path_buf(),
            prefix: String::new(),
        })
    }

    /// Look up `<prefix><name>` instead of `<name>`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SymbolSource for LibrarySymbolSource {
    fn lookup(&self, name: &str) -> Option<EntryPtr> {
        let symbol_name = format!("{}{}", self.prefix, name);
        // SAFETY: the symbol is only read as an address; callers cast it to
        // the signature recorded for `name` before calling.
        let found = unsafe { self.library.get::<unsafe extern "C" fn()>(symbol_name.as_bytes()) };
        match found {
            Ok(symbol) => Some(EntryPtr::from_raw(*symbol as *const ())),
            Err(err) => {
                trace!(symbol = %symbol_name, library = %self.path.display(), error = %err, "symbol not found");
                None
            }
        }
    }
}
