//! Error types for runtime dispatch

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("slot {slot} is outside the dispatch table ({len} entries)")]
    SlotOutOfRange { slot: usize, len: usize },

    #[error("dynamic region is full ({capacity} slots), cannot register {name}")]
    DynamicTableFull { name: String, capacity: usize },

    #[error("table has {actual} entries, the interface needs {expected}")]
    TableSizeMismatch { expected: usize, actual: usize },

    #[error("failed to load implementation library {path}: {source}")]
    LibraryLoad {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
