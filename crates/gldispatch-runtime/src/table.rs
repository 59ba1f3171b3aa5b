//! Dispatch tables
//!
//! A table is a flat array of `num_static + num_dynamic` entry pointers. The
//! static region is laid out at generation time; the dynamic region is handed
//! out at runtime to functions only known by name.

use crate::entry::EntryPtr;
use crate::error::{Result, RuntimeError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicPtr, Ordering};
use std::sync::Arc;
use tracing::debug;

/// One implementation's jump table.
pub struct DispatchTable {
    num_static: usize,
    entries: Box<[AtomicPtr<()>]>,
    noops: Arc<[EntryPtr]>,
}

impl DispatchTable {
    /// Create a table with every slot bound to its no-op.
    ///
    /// `noops` must cover at least the static region.
    pub fn from_noops(noops: Arc<[EntryPtr]>, num_static: usize) -> Result<Self> {
        if noops.len() < num_static {
            return Err(RuntimeError::TableSizeMismatch {
                expected: num_static,
                actual: noops.len(),
            });
        }
        Ok(Self::filled(noops, num_static))
    }

    /// Caller guarantees `noops.len() >= num_static`.
    pub(crate) fn filled(noops: Arc<[EntryPtr]>, num_static: usize) -> Self {
        let entries = noops
            .iter()
            .map(|noop| AtomicPtr::new(noop.as_ptr() as *mut ()))
            .collect();
        Self {
            num_static,
            entries,
            noops,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn num_static(&self) -> usize {
        self.num_static
    }

    pub fn num_dynamic(&self) -> usize {
        self.entries.len() - self.num_static
    }

    pub fn entry(&self, slot: usize) -> Result<EntryPtr> {
        let cell = self.cell(slot)?;
        Ok(EntryPtr::from_raw(cell.load(Ordering::Acquire)))
    }

    /// Bind `slot` to an implementation. A null pointer restores the no-op.
    pub fn set_entry(&self, slot: usize, entry: EntryPtr) -> Result<()> {
        let cell = self.cell(slot)?;
        let entry = if entry.is_null() { self.noops[slot] } else { entry };
        cell.store(entry.as_ptr() as *mut (), Ordering::Release);
        Ok(())
    }

    pub fn reset_entry(&self, slot: usize) -> Result<()> {
        self.set_entry(slot, EntryPtr::from_raw(std::ptr::null()))
    }

    /// Whether `slot` still points at its no-op.
    pub fn is_bound(&self, slot: usize) -> Result<bool> {
        Ok(self.entry(slot)? != self.noops[slot])
    }

    fn cell(&self, slot: usize) -> Result<&AtomicPtr<()>> {
        self.entries.get(slot).ok_or(RuntimeError::SlotOutOfRange {
            slot,
            len: self.entries.len(),
        })
    }
}

impl std::fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchTable")
            .field("num_static", &self.num_static)
            .field("num_dynamic", &self.num_dynamic())
            .finish()
    }
}

/// Name -> slot registry for the dynamic region.
#[derive(Debug)]
pub struct DynamicSlots {
    base: usize,
    capacity: usize,
    names: Mutex<Vec<String>>,
}

impl DynamicSlots {
    pub fn new(base: usize, capacity: usize) -> Self {
        Self {
            base,
            capacity,
            names: Mutex::new(Vec::new()),
        }
    }

    /// Slot for `name`, assigning the next free one on first registration.
    pub fn register(&self, name: &str) -> Result<usize> {
        let mut names = self.names.lock();
        if let Some(index) = names.iter().position(|known| known == name) {
            return Ok(self.base + index);
        }
        if names.len() >= self.capacity {
            return Err(RuntimeError::DynamicTableFull {
                name: name.to_string(),
                capacity: self.capacity,
            });
        }
        names.push(name.to_string());
        let slot = self.base + names.len() - 1;
        debug!(function = name, slot, "assigned dynamic dispatch slot");
        Ok(slot)
    }

    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.names
            .lock()
            .iter()
            .position(|known| known == name)
            .map(|index| self.base + index)
    }

    /// Registered names with their slots, in assignment order.
    pub fn entries(&self) -> Vec<(String, usize)> {
        self.names
            .lock()
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), self.base + index))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
