//! Persistence policy dispatcher
//!
//! Decides, per mutated resource, whether a change is staged for the next
//! explicit save or written through immediately.

use crate::catalog::{Domain, SOURCE_TUNING_RESOURCE};

/// A persisted resource the engine mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// The main settings document of a domain (flat bag included).
    MainSettings(Domain),
    /// The source-tuning document.
    SourceTuning,
}

impl ResourceKind {
    pub fn resource_name(&self) -> &'static str {
        match self {
            ResourceKind::MainSettings(domain) => domain.resource_name(),
            ResourceKind::SourceTuning => SOURCE_TUNING_RESOURCE,
        }
    }
}

/// How mutations of a resource reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistencePolicy {
    /// Stage in memory; one explicit save writes the whole document.
    Batched,
    /// Every mutation writes the whole document immediately.
    WriteThrough,
}

/// Policy for a resource.
pub fn policy_for(resource: &ResourceKind) -> PersistencePolicy {
    match resource {
        ResourceKind::MainSettings(_) => PersistencePolicy::Batched,
        ResourceKind::SourceTuning => PersistencePolicy::WriteThrough,
    }
}
