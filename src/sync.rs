//! Source list ⇄ flat document reconciler
//!
//! Keeps the two representations of a badge configuration consistent: the
//! normalized source list (numeric `priority` is the single source of truth
//! for ordering) and the flat persisted document (enable keys plus the
//! derived `priorityOrder` view). Both directions are total and are a fixed
//! point once the representations already agree.

use serde_json::{Map, Value};

use crate::catalog::Source;
use crate::keys;

/// Document key of the ordered lookup-key sequence.
pub const PRIORITY_ORDER_KEY: &str = "priorityOrder";

/// Lookup keys of `sources` sorted ascending by priority, ties broken by
/// list order.
pub fn priority_order_keys(sources: &[Source]) -> Vec<String> {
    let mut ordered: Vec<&Source> = sources.iter().collect();
    ordered.sort_by_key(|s| s.priority);
    ordered.iter().map(|s| keys::lookup_key(&s.name)).collect()
}

/// Load direction: apply the document's enable flags and ordering to the
/// source list.
///
/// An absent enable key preserves the source's current flag; absence means
/// "not yet persisted", not "disabled". A source missing from
/// `priorityOrder` keeps its current priority; a position is never invented.
/// The output has the same length and identity order as the input; only
/// `enabled`, `priority` and `display_order` change.
pub fn sync_from_bag(sources: &[Source], bag: &Value) -> Vec<Source> {
    let order: Vec<&str> = bag
        .get(PRIORITY_ORDER_KEY)
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    sources
        .iter()
        .map(|source| {
            let mut updated = source.clone();
            if let Some(enabled) = bag.get(keys::enable_key(&source.name)).and_then(Value::as_bool) {
                updated.enabled = enabled;
            }
            let lookup = keys::lookup_key(&source.name);
            if let Some(index) = order.iter().position(|key| *key == lookup) {
                updated.priority = index as u32 + 1;
                updated.display_order = updated.priority;
            }
            updated
        })
        .collect()
}

/// Save direction: write every enable key and rebuild `priorityOrder` from
/// scratch. All other document fields pass through unmodified.
pub fn sync_to_bag(sources: &[Source], bag: Value) -> Value {
    let mut bag = match bag {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };
    if let Value::Object(map) = &mut bag {
        for source in sources {
            map.insert(keys::enable_key(&source.name), Value::Bool(source.enabled));
        }
        map.insert(
            PRIORITY_ORDER_KEY.to_string(),
            Value::Array(
                priority_order_keys(sources)
                    .into_iter()
                    .map(Value::String)
                    .collect(),
            ),
        );
    }
    bag
}

/// Localized single-key write used by source toggles: updates exactly one
/// enable key and never touches `priorityOrder`.
pub fn write_enable_key(source: &Source, bag: &mut Value) {
    if let Value::Object(map) = bag {
        map.insert(keys::enable_key(&source.name), Value::Bool(source.enabled));
    }
}

/// Renumber `priority`/`display_order` to the 1-based list position.
pub fn renumber(sources: &mut [Source]) {
    for (index, source) in sources.iter_mut().enumerate() {
        source.priority = index as u32 + 1;
        source.display_order = source.priority;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, Domain};
    use serde_json::json;

    #[test]
    fn test_scenario_absent_enable_key_is_preserved() {
        let sources = catalog::default_sources(Domain::Review);
        let bag = json!({
            "enable_myanimelist": true,
            "priorityOrder": ["myanimelist", "imdb"]
        });

        let synced = sync_from_bag(&sources, &bag);

        let mal = synced.iter().find(|s| s.name == "MyAnimeList").unwrap();
        assert!(mal.enabled);
        assert_eq!(mal.priority, 1);

        let imdb = synced.iter().find(|s| s.name == "IMDb").unwrap();
        assert_eq!(imdb.priority, 2);
        // Enable key absent from the document: flag stays at its prior value.
        assert!(imdb.enabled);
    }

    #[test]
    fn test_source_absent_from_order_keeps_priority() {
        let sources = catalog::default_sources(Domain::Review);
        let bag = json!({ "priorityOrder": ["myanimelist", "imdb"] });

        let synced = sync_from_bag(&sources, &bag);
        let trakt = synced.iter().find(|s| s.name == "Trakt").unwrap();
        assert_eq!(trakt.priority, 6);
        assert_eq!(trakt.display_order, 6);
    }

    #[test]
    fn test_non_boolean_enable_value_is_ignored() {
        let sources = catalog::default_sources(Domain::Review);
        let bag = json!({ "enable_imdb": "yes" });

        let synced = sync_from_bag(&sources, &bag);
        let imdb = synced.iter().find(|s| s.name == "IMDb").unwrap();
        assert!(imdb.enabled);
    }

    #[test]
    fn test_sync_from_bag_keeps_length_and_order() {
        let sources = catalog::default_sources(Domain::Review);
        let synced = sync_from_bag(&sources, &json!({}));
        assert_eq!(synced.len(), sources.len());
        let ids: Vec<u32> = synced.iter().map(|s| s.id).collect();
        let expected: Vec<u32> = sources.iter().map(|s| s.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_sync_to_bag_rebuilds_order_from_scratch() {
        let mut sources = catalog::default_sources(Domain::Review);
        sources.reverse();
        renumber(&mut sources);

        let bag = json!({ "priorityOrder": ["stale", "entries"], "Text": { "font-size": 60 } });
        let rebuilt = sync_to_bag(&sources, bag);

        let order: Vec<&str> = rebuilt[PRIORITY_ORDER_KEY]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(order[0], "anidb");
        assert_eq!(order.last().copied(), Some("imdb"));
        assert_eq!(order.len(), sources.len());
        // Untouched fields pass through.
        assert_eq!(rebuilt["Text"]["font-size"], json!(60));
    }

    #[test]
    fn test_stable_tie_break_on_equal_priority() {
        let mut sources = catalog::default_sources(Domain::Review);
        for source in sources.iter_mut() {
            source.priority = 1;
        }
        let order = priority_order_keys(&sources);
        assert_eq!(order[0], "imdb");
        assert_eq!(order[1], "rt_critics");
    }

    #[test]
    fn test_round_trip_is_fixed_point() {
        // A consistent pair: the document was produced by sync_to_bag.
        let sources = catalog::default_sources(Domain::Review);
        let bag = sync_to_bag(&sources, catalog::defaults(Domain::Review));

        let synced = sync_from_bag(&sources, &bag);
        let round_tripped = sync_to_bag(&synced, bag.clone());

        assert_eq!(round_tripped[PRIORITY_ORDER_KEY], bag[PRIORITY_ORDER_KEY]);
        for source in &sources {
            let key = keys::enable_key(&source.name);
            assert_eq!(round_tripped[&key], bag[&key]);
        }
    }

    #[test]
    fn test_write_enable_key_is_local() {
        let sources = catalog::default_sources(Domain::Review);
        let mut bag = sync_to_bag(&sources, catalog::defaults(Domain::Review));
        let before_order = bag[PRIORITY_ORDER_KEY].clone();

        let mut imdb = sources[0].clone();
        imdb.enabled = false;
        write_enable_key(&imdb, &mut bag);

        assert_eq!(bag["enable_imdb"], json!(false));
        assert_eq!(bag[PRIORITY_ORDER_KEY], before_order);
        assert_eq!(bag["enable_rt_critics"], json!(true));
    }

    #[test]
    fn test_renumber() {
        let mut sources = catalog::default_sources(Domain::Review);
        sources.swap(0, 8);
        renumber(&mut sources);
        assert_eq!(sources[0].priority, 1);
        assert_eq!(sources[0].display_order, 1);
        assert_eq!(sources[8].priority, 9);
        assert_eq!(sources[8].name, "IMDb");
    }
}
