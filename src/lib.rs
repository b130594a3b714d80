//! badgesmith - settings synchronization engine for media poster badges
//!
//! Reconciles the two representations of a badge configuration domain (a
//! normalized list of named, orderable, toggleable sources and a flat
//! persisted settings document) while tolerating partial or missing
//! persisted data, and dispatches mutations through two persistence
//! policies (batched save vs. immediate write-through).

pub mod catalog;
pub mod error;
pub mod keys;
pub mod merge;
pub mod mock;
pub mod policy;
pub mod session;
pub mod status;
pub mod store;
pub mod sync;
pub mod tuning;

pub use catalog::{Domain, Source};
pub use error::{LoadNotice, SettingsError};
pub use merge::{merge_with_defaults, MergeOutcome, MergeWarning};
pub use mock::MockStore;
pub use session::{LoadReport, SettingsSession};
pub use status::JobStatus;
pub use store::{document_digest, FileStore, SettingsStore, StoreError};
pub use tuning::{SelectionMode, SourceTuning};
