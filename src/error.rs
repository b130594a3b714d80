//! Error taxonomy
//!
//! Nothing in this engine is fatal: load paths fall back to defaults and
//! report a notice, save paths keep the in-memory edits and return one of
//! the errors below.

use crate::store::StoreError;

/// Failures surfaced by the settings façade.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The batched save failed; in-memory edits are retained.
    #[error("failed to save {resource}: {source}")]
    SaveFailed {
        resource: String,
        #[source]
        source: StoreError,
    },

    /// A write-through of the tuning document failed; the in-memory change
    /// is kept and persisted state may diverge until the next write.
    #[error("write-through of {resource} failed: {source}")]
    WriteThroughFailed {
        resource: String,
        #[source]
        source: StoreError,
    },

    #[error("no source with id {0}")]
    UnknownSource(u32),

    #[error("reorder list must name every source exactly once")]
    InvalidReorder,

    #[error("no image mapping entry named {0:?}")]
    MappingEntryMissing(String),

    #[error("image mapping entry {0:?} already exists")]
    MappingEntryExists(String),
}

/// User-visible recoverable notice: a load fell back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadNotice {
    pub resource: String,
    pub reason: String,
}

impl std::fmt::Display for LoadNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "could not load {}: {}; defaults restored",
            self.resource, self.reason
        )
    }
}
