//! Settings façade
//!
//! One `SettingsSession` per editing session. It owns both representations
//! of the configuration (source list and flat document) plus the tuning
//! document, and routes every mutation through the reconciler and the
//! persistence policy dispatcher. Loads never fail: any collaborator or
//! parse problem falls back to the default catalog and is reported as a
//! notice for the UI layer to surface.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::{self, Domain, Source, IMAGE_BADGES_SECTION, IMAGE_MAPPING_KEY};
use crate::error::{LoadNotice, SettingsError};
use crate::merge;
use crate::policy::{self, PersistencePolicy, ResourceKind};
use crate::status::JobStatus;
use crate::store::{self, SettingsStore, StoreError};
use crate::sync;
use crate::tuning::{SelectionMode, SourceTuning};

/// Outcome summary of a [`SettingsSession::load`].
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// SHA-256 digest of the canonicalized published document.
    pub digest: String,
    /// Set when the main document load fell back to defaults.
    pub notice: Option<LoadNotice>,
    /// Set when the tuning document load fell back to defaults.
    pub tuning_notice: Option<LoadNotice>,
    pub loaded_at: DateTime<Utc>,
}

impl LoadReport {
    /// True when both documents loaded cleanly.
    pub fn is_clean(&self) -> bool {
        self.notice.is_none() && self.tuning_notice.is_none()
    }
}

/// Per-editing-session settings engine for one domain.
pub struct SettingsSession<S: SettingsStore> {
    store: S,
    domain: Domain,
    session_id: Uuid,
    sources: Vec<Source>,
    bag: Value,
    tuning: SourceTuning,
    dirty: bool,
    published_digest: Option<String>,
    last_saved_at: Option<DateTime<Utc>>,
}

impl<S: SettingsStore> SettingsSession<S> {
    /// Create a session seeded from the default catalog. Call
    /// [`load`](Self::load) to overwrite the seed with persisted state.
    pub fn new(store: S, domain: Domain) -> Self {
        Self {
            store,
            domain,
            session_id: Uuid::new_v4(),
            sources: catalog::default_sources(domain),
            bag: catalog::defaults(domain),
            tuning: SourceTuning::default(),
            dirty: false,
            published_digest: None,
            last_saved_at: None,
        }
    }

    /// Fetch, merge and publish both documents. Never fails: collaborator
    /// and parse problems fall back to defaults and are reported in the
    /// returned [`LoadReport`]. A re-issued load discards session edits;
    /// the later response wins.
    pub fn load(&mut self) -> LoadReport {
        let resource = self.domain.resource_name();

        let (partial, mut notice) = match self.store.get(resource) {
            Ok(partial) => (partial, None),
            Err(err) => {
                warn!(session = %self.session_id, resource, error = %err, "load failed, using defaults");
                (
                    None,
                    Some(LoadNotice {
                        resource: resource.to_string(),
                        reason: err.to_string(),
                    }),
                )
            }
        };

        let outcome = merge::merge_with_defaults(partial, self.domain);
        if let Some(warning) = outcome.warning {
            notice = Some(LoadNotice {
                resource: resource.to_string(),
                reason: warning.to_string(),
            });
        }

        // The session's sources always restart from the catalog baseline;
        // an absent enable key therefore preserves the catalog default.
        let baseline = catalog::default_sources(self.domain);
        self.sources = sync::sync_from_bag(&baseline, &outcome.document);
        self.bag = outcome.document;
        self.dirty = false;

        let digest = store::document_digest(&self.bag);
        self.published_digest = Some(digest.clone());

        let tuning_notice = self.load_tuning();
        debug!(session = %self.session_id, resource, %digest, "published settings documents");

        LoadReport {
            digest,
            notice,
            tuning_notice,
            loaded_at: Utc::now(),
        }
    }

    fn load_tuning(&mut self) -> Option<LoadNotice> {
        let resource = catalog::SOURCE_TUNING_RESOURCE;
        let fallback = |reason: String| {
            warn!(resource, %reason, "tuning load failed, using defaults");
            Some(LoadNotice {
                resource: resource.to_string(),
                reason,
            })
        };

        match self.store.get(resource) {
            Ok(None) => {
                self.tuning = SourceTuning::default();
                None
            }
            Ok(Some(document)) => match serde_json::from_value::<SourceTuning>(document) {
                Ok(tuning) => {
                    self.tuning = tuning;
                    None
                }
                Err(err) => {
                    self.tuning = SourceTuning::default();
                    fallback(err.to_string())
                }
            },
            Err(err) => {
                self.tuning = SourceTuning::default();
                fallback(err.to_string())
            }
        }
    }

    /// Rebuild the flat document from the source list and write it as one
    /// atomic whole. On success the in-memory document becomes exactly what
    /// was written; on failure every in-memory edit is retained.
    pub fn save(&mut self) -> Result<(), SettingsError> {
        let resource = self.domain.resource_name();
        let rebuilt = sync::sync_to_bag(&self.sources, self.bag.clone());

        match self.store.put(resource, &rebuilt) {
            Ok(()) => {
                self.bag = rebuilt;
                self.dirty = false;
                self.published_digest = Some(store::document_digest(&self.bag));
                self.last_saved_at = Some(Utc::now());
                info!(session = %self.session_id, resource, "saved settings document");
                Ok(())
            }
            Err(err) => {
                warn!(session = %self.session_id, resource, error = %err, "save failed, edits retained");
                Err(SettingsError::SaveFailed {
                    resource: resource.to_string(),
                    source: err,
                })
            }
        }
    }

    /// Set one field of one section. Unknown sections are created, since the
    /// document format passes arbitrary fields through.
    pub fn update_field(&mut self, section: &str, key: &str, value: Value) -> Result<(), SettingsError> {
        let root = self.bag_object_mut();
        let slot = root
            .entry(section.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match slot {
            Value::Object(fields) => {
                fields.insert(key.to_string(), value);
            }
            other => {
                let mut fields = Map::new();
                fields.insert(key.to_string(), value);
                *other = Value::Object(fields);
            }
        }
        self.commit(ResourceKind::MainSettings(self.domain))
    }

    /// Toggle one source and write just its enable key into the document:
    /// a localized update. `priorityOrder` is untouched.
    pub fn toggle_source(&mut self, id: u32, enabled: bool) -> Result<(), SettingsError> {
        let source = self
            .sources
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SettingsError::UnknownSource(id))?;
        source.enabled = enabled;
        let source = source.clone();
        sync::write_enable_key(&source, &mut self.bag);
        self.commit(ResourceKind::MainSettings(self.domain))
    }

    /// Replace the source order. `ordered_ids` must name every current
    /// source exactly once; priorities are renumbered to the 1-based list
    /// position and the document's `priorityOrder` is rebuilt in full.
    pub fn reorder_sources(&mut self, ordered_ids: &[u32]) -> Result<(), SettingsError> {
        if ordered_ids.len() != self.sources.len() {
            return Err(SettingsError::InvalidReorder);
        }
        let mut seen = std::collections::HashSet::new();
        let mut reordered = Vec::with_capacity(ordered_ids.len());
        for id in ordered_ids {
            if !seen.insert(*id) {
                return Err(SettingsError::InvalidReorder);
            }
            let source = self
                .sources
                .iter()
                .find(|s| s.id == *id)
                .ok_or(SettingsError::UnknownSource(*id))?;
            reordered.push(source.clone());
        }
        sync::renumber(&mut reordered);
        self.sources = reordered;
        self.bag = sync::sync_to_bag(&self.sources, std::mem::take(&mut self.bag));
        self.commit(ResourceKind::MainSettings(self.domain))
    }

    /// Insert or replace an image mapping entry.
    pub fn add_mapping_entry(&mut self, key: &str, image: &str) -> Result<(), SettingsError> {
        self.image_mapping_mut()
            .insert(key.to_string(), Value::String(image.to_string()));
        self.commit(ResourceKind::MainSettings(self.domain))
    }

    /// Remove an image mapping entry.
    pub fn remove_mapping_entry(&mut self, key: &str) -> Result<(), SettingsError> {
        self.image_mapping_mut()
            .remove(key)
            .ok_or_else(|| SettingsError::MappingEntryMissing(key.to_string()))?;
        self.commit(ResourceKind::MainSettings(self.domain))
    }

    /// Rename an image mapping entry, keeping its value. Renaming onto an
    /// existing entry is rejected rather than silently overwriting.
    pub fn rename_mapping_entry(&mut self, old: &str, new: &str) -> Result<(), SettingsError> {
        if old == new {
            return Ok(());
        }
        let mapping = self.image_mapping_mut();
        if mapping.contains_key(new) {
            return Err(SettingsError::MappingEntryExists(new.to_string()));
        }
        let value = mapping
            .remove(old)
            .ok_or_else(|| SettingsError::MappingEntryMissing(old.to_string()))?;
        mapping.insert(new.to_string(), value);
        self.commit(ResourceKind::MainSettings(self.domain))
    }

    pub fn set_max_badges(&mut self, max_badges: u32) -> Result<(), SettingsError> {
        self.tuning.max_badges = max_badges;
        self.commit(ResourceKind::SourceTuning)
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) -> Result<(), SettingsError> {
        self.tuning.selection_mode = mode;
        self.commit(ResourceKind::SourceTuning)
    }

    pub fn set_percentage_only(&mut self, percentage_only: bool) -> Result<(), SettingsError> {
        self.tuning.percentage_only = percentage_only;
        self.commit(ResourceKind::SourceTuning)
    }

    pub fn set_group_related(&mut self, group_related: bool) -> Result<(), SettingsError> {
        self.tuning.group_related = group_related;
        self.commit(ResourceKind::SourceTuning)
    }

    pub fn set_anime_only(&mut self, anime_only: bool) -> Result<(), SettingsError> {
        self.tuning.anime_only = anime_only;
        self.commit(ResourceKind::SourceTuning)
    }

    /// React to an external badge-job status event. A succeeded job may
    /// have rewritten persisted settings server-side, so reload.
    pub fn on_job_status(&mut self, status: JobStatus) -> Option<LoadReport> {
        match status {
            JobStatus::Succeeded => Some(self.load()),
            JobStatus::Running | JobStatus::Failed => None,
        }
    }

    // === accessors ===

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn bag(&self) -> &Value {
        &self.bag
    }

    pub fn tuning(&self) -> &SourceTuning {
        &self.tuning
    }

    /// True when staged edits have not been saved yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    /// Digest of the last loaded or saved document, once one exists.
    pub fn published_digest(&self) -> Option<&str> {
        self.published_digest.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // === internals ===

    /// Route a completed mutation through the persistence policy of its
    /// resource.
    fn commit(&mut self, kind: ResourceKind) -> Result<(), SettingsError> {
        match policy::policy_for(&kind) {
            PersistencePolicy::Batched => {
                self.dirty = true;
                Ok(())
            }
            PersistencePolicy::WriteThrough => match kind {
                ResourceKind::SourceTuning => self.write_through_tuning(),
                ResourceKind::MainSettings(_) => self.save(),
            },
        }
    }

    /// Write the whole tuning document immediately. A failure keeps the
    /// in-memory change; persisted state diverges until the next write.
    fn write_through_tuning(&mut self) -> Result<(), SettingsError> {
        let resource = catalog::SOURCE_TUNING_RESOURCE;
        let document =
            serde_json::to_value(&self.tuning).map_err(|err| SettingsError::WriteThroughFailed {
                resource: resource.to_string(),
                source: StoreError::Json(err),
            })?;
        self.store.put(resource, &document).map_err(|err| {
            warn!(session = %self.session_id, resource, error = %err, "write-through failed, in-memory change kept");
            SettingsError::WriteThroughFailed {
                resource: resource.to_string(),
                source: err,
            }
        })
    }

    fn bag_object_mut(&mut self) -> &mut Map<String, Value> {
        if !self.bag.is_object() {
            self.bag = Value::Object(Map::new());
        }
        match &mut self.bag {
            Value::Object(map) => map,
            _ => unreachable!("bag was just made an object"),
        }
    }

    fn image_mapping_mut(&mut self) -> &mut Map<String, Value> {
        let root = self.bag_object_mut();
        let section = root
            .entry(IMAGE_BADGES_SECTION.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !section.is_object() {
            *section = Value::Object(Map::new());
        }
        let fields = match section {
            Value::Object(fields) => fields,
            _ => unreachable!("section was just made an object"),
        };
        let mapping = fields
            .entry(IMAGE_MAPPING_KEY.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !mapping.is_object() {
            *mapping = Value::Object(Map::new());
        }
        match mapping {
            Value::Object(map) => map,
            _ => unreachable!("mapping was just made an object"),
        }
    }
}
