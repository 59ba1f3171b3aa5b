//! Static dispatch table layout
//!
//! Every statically dispatched function owns one slot in a flat table of
//! `num_static + num_dynamic` entries. Stubs and assembly trampolines embed
//! their slot index, so the numbering is checked here before anything is
//! emitted: a later interface version may append slots but never renumber.

use crate::config::{GeneratorConfig, NoopMode};
use crate::descriptor::FunctionDescriptor;
use crate::document::DescriptorSet;
use crate::error::{ConsistencyError, Result};
use crate::target::{self, Target};
use std::collections::HashMap;
use tracing::debug;

/// One entry of the no-op fallback array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoopEntry {
    /// Warning stub dedicated to one function
    Named { function: String, base_name: String },
    /// The shared generic no-op
    Generic,
}

/// Name/slot metadata for one public entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicStub {
    pub name: String,
    pub slot: u32,
}

/// Fully determined table layout for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub target: Target,
    pub num_static: usize,
    pub num_dynamic: usize,
    pub noop_mode: NoopMode,
    /// Exported functions in canonical order
    pub functions: Vec<FunctionDescriptor>,
    /// Indexed by slot, `num_static + num_dynamic` long
    pub noop_entries: Vec<NoopEntry>,
    pub stubs: Vec<PublicStub>,
}

impl TableLayout {
    /// Lay out the dispatch table for `target`.
    ///
    /// Fails without producing a layout when a base target's export list
    /// drifts from the full interface or the slot numbering is broken.
    pub fn build(set: &DescriptorSet, target: &Target, config: &GeneratorConfig) -> Result<Self> {
        let all = set.functions();
        let names = set.export_names(target.name())?;
        let selected = target::select(all, names);

        if target.is_base(config) {
            check_base_target(target, &selected, all)?;
        }
        validate_slots(all)?;

        let num_static = all.len();
        let num_dynamic = config.num_dynamic;

        let mut noop_entries = vec![NoopEntry::Generic; num_static + num_dynamic];
        if config.noop_mode == NoopMode::Diagnostic {
            for func in &selected {
                if let Some(slot) = func.slot {
                    noop_entries[slot as usize] = NoopEntry::Named {
                        function: func.name.clone(),
                        base_name: func.base_name.clone(),
                    };
                }
            }
        }

        let stubs = selected
            .iter()
            .filter_map(|func| {
                func.slot.map(|slot| PublicStub {
                    name: func.name.clone(),
                    slot,
                })
            })
            .collect();

        debug!(
            interface = %target,
            exported = selected.len(),
            num_static,
            num_dynamic,
            noop_mode = %config.noop_mode,
            "dispatch table laid out"
        );

        Ok(Self {
            target: target.clone(),
            num_static,
            num_dynamic,
            noop_mode: config.noop_mode,
            functions: selected.into_iter().cloned().collect(),
            noop_entries,
            stubs,
        })
    }

    /// Total number of table entries.
    pub fn table_len(&self) -> usize {
        self.num_static + self.num_dynamic
    }

    /// Slot of an exported function.
    pub fn slot_of(&self, name: &str) -> Option<u32> {
        self.stubs.iter().find(|stub| stub.name == name).map(|stub| stub.slot)
    }
}

/// The filtered export list of a base target must be the full list, with
/// every function's slot equal to its position.
pub fn check_base_target(
    target: &Target,
    filtered: &[&FunctionDescriptor],
    all: &[FunctionDescriptor],
) -> std::result::Result<(), ConsistencyError> {
    if filtered.len() != all.len() {
        return Err(ConsistencyError::FilteredLengthMismatch {
            target: target.name().to_string(),
            filtered: filtered.len(),
            total: all.len(),
        });
    }
    for (index, (found, expected)) in filtered.iter().zip(all).enumerate() {
        if *found != expected {
            return Err(ConsistencyError::FilteredOrderMismatch {
                target: target.name().to_string(),
                index,
                expected: expected.name.clone(),
                found: found.name.clone(),
            });
        }
        if found.slot != Some(index as u32) {
            return Err(ConsistencyError::SlotMismatch {
                target: target.name().to_string(),
                name: found.name.clone(),
                index,
                slot: found.slot,
            });
        }
    }
    Ok(())
}

/// Every function has a slot, the slots are unique, and they cover `[0, N)`.
pub fn validate_slots(functions: &[FunctionDescriptor]) -> std::result::Result<(), ConsistencyError> {
    let mut owners: HashMap<u32, &str> = HashMap::with_capacity(functions.len());
    for func in functions {
        let slot = func.slot.ok_or_else(|| ConsistencyError::MissingSlot {
            name: func.name.clone(),
        })?;
        if let Some(first) = owners.insert(slot, &func.name) {
            return Err(ConsistencyError::DuplicateSlot {
                slot,
                first: first.to_string(),
                second: func.name.clone(),
            });
        }
    }
    // N unique slots all below N cannot leave a hole.
    let count = functions.len();
    if let Some(missing) = (0..count as u32).find(|slot| !owners.contains_key(slot)) {
        return Err(ConsistencyError::SlotGap { missing, count });
    }
    Ok(())
}
