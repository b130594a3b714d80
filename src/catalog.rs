//! Default configuration catalog
//!
//! The versioned baseline for every settings domain: the full source list
//! with initial enabled/priority values, and the visual defaults document.
//! Every accessor returns a fresh deep-independent copy, so callers may
//! mutate their copy freely.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::keys;
use crate::sync;

/// Schema version stamped into every defaults document.
pub const SCHEMA_VERSION: u32 = 2;

/// Resource name of the write-through source-tuning document.
pub const SOURCE_TUNING_RESOURCE: &str = "review_source_tuning";

/// Top-level section holding image badge configuration.
pub const IMAGE_BADGES_SECTION: &str = "ImageBadges";

/// Key of the image-to-label mapping inside [`IMAGE_BADGES_SECTION`].
pub const IMAGE_MAPPING_KEY: &str = "image_mapping";

/// A settings domain: one independently persisted badge configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Review badges (rating/award providers).
    Review,
    /// Resolution badges (video format variants).
    Resolution,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Review => "review",
            Domain::Resolution => "resolution",
        }
    }

    /// Name of the persisted main-settings resource for this domain.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Domain::Review => "badge_settings_review",
            Domain::Resolution => "badge_settings_resolution",
        }
    }

    pub fn parse(value: &str) -> Option<Domain> {
        match value.trim().to_ascii_lowercase().as_str() {
            "review" => Some(Domain::Review),
            "resolution" => Some(Domain::Resolution),
            _ => None,
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One configurable badge source (rating provider or format variant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Stable identity, assigned at catalog definition time.
    pub id: u32,
    /// Display name, unique within the catalog.
    pub name: String,
    /// Whether this source is considered during badge composition.
    pub enabled: bool,
    /// 1 = highest.
    pub priority: u32,
    /// Mirrors `priority`; kept for UI-ordering compatibility.
    pub display_order: u32,
    /// Cap on badge variants this source may contribute.
    pub max_variants: u32,
    /// Optional structured predicate, opaque to the reconciler.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Value>,
}

fn source(id: u32, name: &str, enabled: bool, priority: u32, max_variants: u32) -> Source {
    Source {
        id,
        name: name.to_string(),
        enabled,
        priority,
        display_order: priority,
        max_variants,
        conditions: None,
    }
}

fn anime_source(id: u32, name: &str, enabled: bool, priority: u32, max_variants: u32) -> Source {
    Source {
        conditions: Some(json!({ "media_type": "anime" })),
        ..source(id, name, enabled, priority, max_variants)
    }
}

/// Full source list for a domain, fresh copy per call.
pub fn default_sources(domain: Domain) -> Vec<Source> {
    match domain {
        Domain::Review => vec![
            source(1, "IMDb", true, 1, 1),
            source(2, "Rotten Tomatoes Critics", true, 2, 3),
            source(3, "Rotten Tomatoes Audience", false, 3, 2),
            source(4, "Metacritic", true, 4, 2),
            source(5, "TMDb", false, 5, 1),
            source(6, "Trakt", false, 6, 1),
            source(7, "Letterboxd", false, 7, 1),
            anime_source(8, "MyAnimeList", false, 8, 1),
            anime_source(9, "AniDB", false, 9, 1),
        ],
        Domain::Resolution => vec![
            source(1, "4K Dolby Vision", true, 1, 1),
            source(2, "4K HDR10+", true, 2, 1),
            source(3, "4K", true, 3, 1),
            source(4, "1080p", true, 4, 1),
            source(5, "720p", false, 5, 1),
            source(6, "Dolby Vision", true, 6, 1),
            source(7, "HDR10+", true, 7, 1),
        ],
    }
}

/// Defaults document for a domain, fresh copy per call.
///
/// Enable keys and `priorityOrder` are derived from [`default_sources`], so
/// the two representations agree by construction.
pub fn defaults(domain: Domain) -> Value {
    let sources = default_sources(domain);
    let mut document = visual_defaults(domain);
    if let Value::Object(map) = &mut document {
        map.insert("schema_version".to_string(), json!(SCHEMA_VERSION));
        for src in &sources {
            map.insert(keys::enable_key(&src.name), Value::Bool(src.enabled));
        }
        map.insert(
            sync::PRIORITY_ORDER_KEY.to_string(),
            Value::Array(
                sync::priority_order_keys(&sources)
                    .into_iter()
                    .map(Value::String)
                    .collect(),
            ),
        );
    }
    document
}

// Field naming inside the visual sections intentionally mixes snake_case and
// kebab-case; legacy documents were persisted that way.
fn visual_defaults(domain: Domain) -> Value {
    match domain {
        Domain::Review => json!({
            "General": {
                "general_badge_size": 100,
                "general_edge_padding": 30,
                "general_badge_position": "bottom-left",
                "general_text_padding": 20,
                "use_dynamic_sizing": true
            },
            "Text": {
                "font": "AvenirNextLTProBold.otf",
                "fallback_font": "DejaVuSans.ttf",
                "font-size": 60,
                "text-color": "#FFFFFF",
                "horizontal-alignment": "center"
            },
            "Background": {
                "background-color": "#2C2C2C",
                "background_opacity": 60,
                "background-radius": 10
            },
            "Border": {
                "border-color": "#000000",
                "border_width": 1,
                "border-radius": 10
            },
            "Shadow": {
                "shadow_enable": false,
                "shadow_blur": 8,
                "shadow_offset_x": 2,
                "shadow_offset_y": 2
            },
            "ImageBadges": {
                "enable_image_badges": true,
                "image_padding": 10,
                "image_mapping": {
                    "IMDb": "imdb.png",
                    "Rotten Tomatoes Critics": "rt_critics_fresh.png",
                    "Rotten Tomatoes Audience": "rt_audience_upright.png",
                    "Metacritic": "metacritic.png",
                    "TMDb": "tmdb.png",
                    "Trakt": "trakt.png",
                    "Letterboxd": "letterboxd.png",
                    "MyAnimeList": "myanimelist.png",
                    "AniDB": "anidb.png"
                }
            }
        }),
        Domain::Resolution => json!({
            "General": {
                "general_badge_size": 85,
                "general_edge_padding": 30,
                "general_badge_position": "top-left",
                "general_text_padding": 15,
                "use_dynamic_sizing": false
            },
            "Text": {
                "font": "AvenirNextLTProBold.otf",
                "fallback_font": "DejaVuSans.ttf",
                "font-size": 45,
                "text-color": "#FFFFFF",
                "horizontal-alignment": "center"
            },
            "Background": {
                "background-color": "#000000",
                "background_opacity": 40,
                "background-radius": 10
            },
            "Border": {
                "border-color": "#000000",
                "border_width": 0,
                "border-radius": 10
            },
            "Shadow": {
                "shadow_enable": false,
                "shadow_blur": 6,
                "shadow_offset_x": 2,
                "shadow_offset_y": 2
            },
            "ImageBadges": {
                "enable_image_badges": true,
                "image_padding": 10,
                "image_mapping": {
                    "4K Dolby Vision": "4k-dolbyvision.png",
                    "4K HDR10+": "4k-hdr10plus.png",
                    "4K": "4k.png",
                    "1080p": "1080p.png",
                    "720p": "720p.png",
                    "Dolby Vision": "dolbyvision.png",
                    "HDR10+": "hdr10plus.png"
                }
            }
        }),
    }
}
