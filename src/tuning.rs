//! Source-tuning document
//!
//! Cross-cutting selection behavior for review badges, persisted as its own
//! resource with write-through semantics: every field change is saved
//! immediately as a whole document, independent of the batched main
//! settings. Deserialization is tolerant: fields missing from an older
//! persisted document fill from the defaults.

use serde::{Deserialize, Serialize};

/// How badge sources are picked when more are enabled than fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Take the highest-priority enabled sources.
    Priority,
    /// Pick at random among enabled sources.
    Random,
}

/// The persisted source-tuning document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceTuning {
    /// Maximum badges composed onto one poster.
    pub max_badges: u32,
    pub selection_mode: SelectionMode,
    /// Render percentage scores only, dropping 0-10 scales.
    pub percentage_only: bool,
    /// Group related sources (e.g. both Rotten Tomatoes feeds) as one slot.
    pub group_related: bool,
    /// Restrict anime-conditioned sources to anime libraries.
    pub anime_only: bool,
}

impl Default for SourceTuning {
    fn default() -> Self {
        Self {
            max_badges: 3,
            selection_mode: SelectionMode::Priority,
            percentage_only: false,
            group_related: false,
            anime_only: true,
        }
    }
}
