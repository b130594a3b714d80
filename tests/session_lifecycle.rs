//! Session lifecycle tests
//!
//! Load/save behavior of the façade against the in-memory and the
//! directory-backed store: fallback to defaults, retained edits on save
//! failure, republish-what-was-written, and job-status reloads.

use badgesmith::{catalog, sync};
use badgesmith::{Domain, FileStore, JobStatus, MockStore, SettingsSession};
use serde_json::json;

const REVIEW_RESOURCE: &str = "badge_settings_review";

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_from_empty_store_publishes_defaults() {
    let mut session = SettingsSession::new(MockStore::new(), Domain::Review);
    let report = session.load();

    assert!(report.is_clean());
    assert_eq!(session.bag(), &catalog::defaults(Domain::Review));
    assert_eq!(
        session.sources(),
        catalog::default_sources(Domain::Review).as_slice()
    );
    assert!(!session.is_dirty());
}

#[test]
fn test_load_failure_falls_back_to_defaults_with_notice() {
    let store = MockStore::new().with_document(REVIEW_RESOURCE, json!({ "enable_imdb": false }));
    store.fail_next_get(REVIEW_RESOURCE, "connection refused");

    let mut session = SettingsSession::new(store, Domain::Review);
    let report = session.load();

    let notice = report.notice.expect("expected a load notice");
    assert_eq!(notice.resource, REVIEW_RESOURCE);
    assert!(notice.reason.contains("connection refused"));
    // Fully initialized from defaults, not partially loaded.
    assert_eq!(session.bag(), &catalog::defaults(Domain::Review));

    // The injected failure was one-shot: a later load wins.
    let report = session.load();
    assert!(report.notice.is_none());
    assert_eq!(session.bag()["enable_imdb"], json!(false));
}

#[test]
fn test_load_malformed_document_falls_back_with_notice() {
    let store = MockStore::new().with_document(REVIEW_RESOURCE, json!(["not", "an", "object"]));
    let mut session = SettingsSession::new(store, Domain::Review);
    let report = session.load();

    let notice = report.notice.expect("expected a load notice");
    assert!(notice.reason.contains("array"));
    assert_eq!(session.bag(), &catalog::defaults(Domain::Review));
}

#[test]
fn test_reload_discards_session_edits() {
    let mut session = SettingsSession::new(MockStore::new(), Domain::Review);
    session.load();
    session.toggle_source(1, false).unwrap();
    assert!(session.is_dirty());

    session.load();
    assert!(!session.is_dirty());
    let imdb = session.sources().iter().find(|s| s.id == 1).unwrap();
    assert!(imdb.enabled, "unsaved edit must be discarded by reload");
}

#[test]
fn test_load_reports_digest() {
    let mut session = SettingsSession::new(MockStore::new(), Domain::Review);
    let report = session.load();
    assert_eq!(report.digest.len(), 64);
    assert_eq!(session.published_digest(), Some(report.digest.as_str()));
}

// =============================================================================
// Saving
// =============================================================================

#[test]
fn test_save_writes_full_document_and_republishes_it() {
    let mut session = SettingsSession::new(MockStore::new(), Domain::Review);
    session.load();
    session.toggle_source(5, true).unwrap(); // TMDb
    session
        .update_field("Background", "background_opacity", json!(25))
        .unwrap();

    session.save().unwrap();

    let written = session.store().document(REVIEW_RESOURCE).unwrap();
    assert_eq!(written["enable_tmdb"], json!(true));
    assert_eq!(written["Background"]["background_opacity"], json!(25));
    // The in-memory bag is exactly what was written.
    assert_eq!(session.bag(), &written);
    assert!(!session.is_dirty());
    assert!(session.last_saved_at().is_some());
    assert_eq!(session.store().write_count(REVIEW_RESOURCE), 1);
}

#[test]
fn test_batched_edits_reach_store_only_on_save() {
    let mut session = SettingsSession::new(MockStore::new(), Domain::Review);
    session.load();

    session.toggle_source(1, false).unwrap();
    session.toggle_source(6, true).unwrap();
    let ids: Vec<u32> = session.sources().iter().rev().map(|s| s.id).collect();
    session.reorder_sources(&ids).unwrap();
    session.add_mapping_entry("Custom", "custom.png").unwrap();
    assert_eq!(session.store().write_count(REVIEW_RESOURCE), 0);

    session.save().unwrap();
    assert_eq!(session.store().write_count(REVIEW_RESOURCE), 1);

    let written = session.store().document(REVIEW_RESOURCE).unwrap();
    assert_eq!(written["enable_imdb"], json!(false));
    assert_eq!(written["enable_trakt"], json!(true));
    assert_eq!(
        written["ImageBadges"]["image_mapping"]["Custom"],
        json!("custom.png")
    );
    let order = written[sync::PRIORITY_ORDER_KEY].as_array().unwrap();
    assert_eq!(order[0], json!("anidb"));
}

#[test]
fn test_save_failure_retains_edits() {
    let mut session = SettingsSession::new(MockStore::new(), Domain::Review);
    session.load();
    session.toggle_source(1, false).unwrap();

    session.store().fail_next_put(REVIEW_RESOURCE, "boom");
    let err = session.save().expect_err("save should fail");
    assert!(err.to_string().contains(REVIEW_RESOURCE));

    // Edits survive, nothing was persisted, dirty flag stays up.
    assert_eq!(session.bag()["enable_imdb"], json!(false));
    assert!(session.is_dirty());
    assert!(session.last_saved_at().is_none());
    assert!(session.store().document(REVIEW_RESOURCE).is_none());

    // A retry after the transient failure succeeds.
    session.save().unwrap();
    let written = session.store().document(REVIEW_RESOURCE).unwrap();
    assert_eq!(written["enable_imdb"], json!(false));
}

// =============================================================================
// Mapping entries
// =============================================================================

#[test]
fn test_mapping_entry_edits_round_trip_through_save() {
    let mut session = SettingsSession::new(MockStore::new(), Domain::Review);
    session.load();

    session.rename_mapping_entry("IMDb", "IMDb TV").unwrap();
    session.remove_mapping_entry("AniDB").unwrap();
    session.add_mapping_entry("Rogerebert", "ebert.png").unwrap();
    session.save().unwrap();

    let mapping = &session.store().document(REVIEW_RESOURCE).unwrap()["ImageBadges"]["image_mapping"];
    assert!(mapping.get("IMDb").is_none());
    assert_eq!(mapping["IMDb TV"], json!("imdb.png"));
    assert!(mapping.get("AniDB").is_none());
    assert_eq!(mapping["Rogerebert"], json!("ebert.png"));
}

// =============================================================================
// Job status events
// =============================================================================

#[test]
fn test_succeeded_job_triggers_reload() {
    let mut session = SettingsSession::new(MockStore::new(), Domain::Review);
    session.load();
    session.toggle_source(1, false).unwrap();

    // Simulate the server rewriting settings while the job ran.
    session
        .store()
        .seed(REVIEW_RESOURCE, json!({ "enable_metacritic": false }));

    assert!(session.on_job_status(JobStatus::Running).is_none());
    assert!(session.on_job_status(JobStatus::Failed).is_none());

    let report = session.on_job_status(JobStatus::Succeeded).expect("reload");
    assert!(report.is_clean());
    assert_eq!(session.bag()["enable_metacritic"], json!(false));
    let imdb = session.sources().iter().find(|s| s.id == 1).unwrap();
    assert!(imdb.enabled, "reload discards the unsaved toggle");
}

// =============================================================================
// Directory-backed store
// =============================================================================

#[test]
fn test_file_store_end_to_end() {
    let dir = tempfile::tempdir().unwrap();

    let mut session = SettingsSession::new(FileStore::new(dir.path()), Domain::Resolution);
    let report = session.load();
    assert!(report.is_clean());

    session.toggle_source(5, true).unwrap(); // 720p
    session.save().unwrap();

    // A fresh session sees the persisted state.
    let mut next = SettingsSession::new(FileStore::new(dir.path()), Domain::Resolution);
    next.load();
    let badge_720p = next.sources().iter().find(|s| s.name == "720p").unwrap();
    assert!(badge_720p.enabled);
}

#[test]
fn test_file_store_malformed_document_surfaces_notice() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("badge_settings_review.json"),
        "{ definitely not json",
    )
    .unwrap();

    let mut session = SettingsSession::new(FileStore::new(dir.path()), Domain::Review);
    let report = session.load();

    assert!(report.notice.is_some());
    assert_eq!(session.bag(), &catalog::defaults(Domain::Review));
}
