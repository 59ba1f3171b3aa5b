//! No-op fallbacks for unbound dispatch slots
//!
//! Every table starts out filled with no-ops so that calling an unbound slot
//! warns and returns a default instead of jumping through garbage.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{trace, warn};

/// Name reported by the shared generic no-op.
pub const GENERIC_NOOP_NAME: &str = "<generic>";

static WARNED: LazyLock<Mutex<HashSet<String>>> = LazyLock::new(|| Mutex::new(HashSet::new()));

/// Report a call to an unbound entry point. Warns once per name.
pub fn noop_warn(name: &str) {
    let first = WARNED.lock().insert(name.to_string());
    if first {
        warn!(function = name, "call to entry point with no implementation bound");
    } else {
        trace!(function = name, "no-op called");
    }
}

/// Names that have hit a no-op so far.
pub fn warned_functions() -> Vec<String> {
    let mut names: Vec<String> = WARNED.lock().iter().cloned().collect();
    names.sort();
    names
}

/// The untyped no-op for dynamic slots, whose signatures are unknown.
///
/// It takes no arguments and zeroes the integer return register only, so it
/// is never placed in a static slot; those get a typed no-op.
pub extern "C" fn noop_generic() -> usize {
    noop_warn(GENERIC_NOOP_NAME);
    0
}
