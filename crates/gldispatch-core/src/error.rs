//! Error types for dispatch generation
//!
//! Every error here is fatal to a generation run: callers abort and emit
//! nothing rather than write a table whose numbering may have drifted.

use std::path::PathBuf;
use thiserror::Error;

/// The export list or the slot numbering disagrees with the interface ABI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("function {name} has no slot but is statically dispatched")]
    MissingSlot { name: String },

    #[error("slot {slot} is assigned to both {first} and {second}")]
    DuplicateSlot { slot: u32, first: String, second: String },

    #[error("slot numbering has a gap: slot {missing} is unassigned ({count} functions)")]
    SlotGap { missing: u32, count: usize },

    #[error("function {name} appears more than once")]
    DuplicateName { name: String },

    #[error("function {name} is described differently by two documents")]
    ConflictingDescriptor { name: String },

    #[error("base target {target} exports {filtered} of {total} functions")]
    FilteredLengthMismatch {
        target: String,
        filtered: usize,
        total: usize,
    },

    #[error("base target {target}: position {index} holds {found}, expected {expected}")]
    FilteredOrderMismatch {
        target: String,
        index: usize,
        expected: String,
        found: String,
    },

    #[error("base target {target}: {name} has slot {slot:?} at position {index}")]
    SlotMismatch {
        target: String,
        name: String,
        index: usize,
        slot: Option<u32>,
    },
}

/// A return type has no entry in the default-value mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown handle typedef {type_name:?} returned by {function}")]
pub struct UnknownTypeError {
    pub function: String,
    pub type_name: String,
}

/// Top-level generation error.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to read interface document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("unknown target: {0}")]
    UnknownTarget(String),

    #[error("inconsistent interface: {0}")]
    Consistency(#[from] ConsistencyError),

    #[error("default value mapping failed: {0}")]
    UnknownType(#[from] UnknownTypeError),
}

pub type Result<T> = std::result::Result<T, GenerationError>;
