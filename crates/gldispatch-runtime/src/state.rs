//! Dispatch state
//!
//! [`DispatchState`] owns what generated stubs need at call time: the no-op
//! table, the table currently installed, and the dynamic slot registry.
//! Initialisation order:
//!
//! 1. slot layout and dynamic capacity are fixed when the interface is declared,
//! 2. [`DispatchState::new`] builds the no-op table and installs it as current,
//! 3. implementations build tables with [`DispatchState::new_table`], bind them
//!    with [`DispatchState::bind`] and switch with [`DispatchState::install`].
//!
//! The installed table lives in an [`ArcSwap`]: stubs load it without
//! locking, and `install`/`reset` swap it atomically.

use crate::entry::{EntryPtr, StubInfo};
use crate::error::{Result, RuntimeError};
use crate::symbol::SymbolSource;
use crate::table::{DispatchTable, DynamicSlots};
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{debug, info};

pub struct DispatchState {
    stubs: &'static [StubInfo],
    noops: Arc<[EntryPtr]>,
    noop_table: Arc<DispatchTable>,
    current: ArcSwap<DispatchTable>,
    dynamic: DynamicSlots,
}

impl DispatchState {
    /// `noops` covers the static region first, then the dynamic region.
    pub fn new(stubs: &'static [StubInfo], num_static: usize, noops: Vec<EntryPtr>) -> Result<Self> {
        let noops: Arc<[EntryPtr]> = noops.into();
        let noop_table = Arc::new(DispatchTable::from_noops(Arc::clone(&noops), num_static)?);
        let num_dynamic = noop_table.num_dynamic();
        debug!(
            exported = stubs.len(),
            num_static, num_dynamic, "dispatch state initialised with no-op table"
        );
        Ok(Self {
            stubs,
            noops,
            current: ArcSwap::new(Arc::clone(&noop_table)),
            noop_table,
            dynamic: DynamicSlots::new(num_static, num_dynamic),
        })
    }

    pub fn stubs(&self) -> &'static [StubInfo] {
        self.stubs
    }

    pub fn noop_table(&self) -> &Arc<DispatchTable> {
        &self.noop_table
    }

    pub fn table_len(&self) -> usize {
        self.noops.len()
    }

    /// A fresh table with every slot bound to its no-op.
    pub fn new_table(&self) -> DispatchTable {
        DispatchTable::filled(Arc::clone(&self.noops), self.noop_table.num_static())
    }

    /// Make `table` the one stubs call through.
    pub fn install(&self, table: Arc<DispatchTable>) -> Result<()> {
        if table.len() != self.table_len() || table.num_static() != self.noop_table.num_static() {
            return Err(RuntimeError::TableSizeMismatch {
                expected: self.table_len(),
                actual: table.len(),
            });
        }
        self.current.store(table);
        debug!("installed dispatch table");
        Ok(())
    }

    /// Go back to the no-op table.
    pub fn reset(&self) {
        self.current.store(Arc::clone(&self.noop_table));
    }

    pub fn current(&self) -> Arc<DispatchTable> {
        self.current.load_full()
    }

    /// Entry in `slot` of the installed table. Never blocks.
    pub fn current_entry(&self, slot: usize) -> Result<EntryPtr> {
        self.current.load().entry(slot)
    }

    /// Static or already-registered dynamic slot of `name`.
    pub fn slot_of(&self, name: &str) -> Option<usize> {
        self.stubs
            .iter()
            .find(|stub| stub.name == name)
            .map(|stub| stub.slot)
            .or_else(|| self.dynamic.lookup(name))
    }

    /// Slot of `name`, assigning a dynamic one if it is not a static function.
    pub fn register_dynamic(&self, name: &str) -> Result<usize> {
        match self.stubs.iter().find(|stub| stub.name == name) {
            Some(stub) => Ok(stub.slot),
            None => self.dynamic.register(name),
        }
    }

    pub fn dynamic(&self) -> &DynamicSlots {
        &self.dynamic
    }

    /// Fill `table` from `source` for every static and registered dynamic
    /// function. Returns how many slots were bound.
    pub fn bind(&self, table: &DispatchTable, source: &dyn SymbolSource) -> Result<usize> {
        let mut bound = 0;
        let statics = self.stubs.iter().map(|stub| (stub.name.to_string(), stub.slot));
        for (name, slot) in statics.chain(self.dynamic.entries()) {
            if let Some(entry) = source.lookup(&name) {
                table.set_entry(slot, entry)?;
                bound += 1;
            }
        }
        info!(bound, total = self.stubs.len() + self.dynamic.len(), "bound dispatch table");
        Ok(bound)
    }
}

impl std::fmt::Debug for DispatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchState")
            .field("exported", &self.stubs.len())
            .field("table_len", &self.table_len())
            .field("dynamic", &self.dynamic)
            .finish()
    }
}
