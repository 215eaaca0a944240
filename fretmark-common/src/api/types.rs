//! Canonical request/response payload types
//!
//! Wire field names are camelCase to match the server's JSON. All
//! analysis fields are optional or defaulted so a partially-present
//! payload decodes cleanly (the caller skips whatever is absent).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Probe response from `POST /tabinfo`
///
/// Canonical shape nests the track map under `tracks` and echoes the
/// title/artist parsed from the tab file so the upload form can be
/// prefilled. Older servers returned the bare track map; that shape is
/// accepted and lifted into the canonical one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TabInfoWire")]
pub struct TabInfo {
    /// Track id (as sent back in the `tracks` upload field) to display name
    pub tracks: BTreeMap<String, String>,
    pub title: Option<String>,
    pub artist: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TabInfoWire {
    Nested {
        tracks: BTreeMap<String, String>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        artist: Option<String>,
    },
    Flat(BTreeMap<String, String>),
}

impl From<TabInfoWire> for TabInfo {
    fn from(wire: TabInfoWire) -> Self {
        match wire {
            TabInfoWire::Nested {
                tracks,
                title,
                artist,
            } => TabInfo {
                tracks,
                title,
                artist,
            },
            TabInfoWire::Flat(tracks) => TabInfo {
                tracks,
                title: None,
                artist: None,
            },
        }
    }
}

/// Per-track analysis from `GET /tracks/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackAnalysis {
    /// Detected key as a pitch class in [0, 11]
    pub key: Option<u8>,
    pub is_major: Option<bool>,
    pub scale: Option<ScaleInfo>,
    /// Open-string pitch classes, low string first
    pub tuning: Option<Vec<u8>>,
    /// Per-glyph interval classes precomputed server-side (older
    /// contract); `None` entries are rests or ties
    pub intervals: Option<Vec<Option<u8>>>,
    /// Sparse map of sequential measure index to chord-form matches.
    /// JSON object keys arrive as decimal strings.
    #[serde(rename = "measureInfo")]
    pub measures: BTreeMap<usize, Vec<FormMatch>>,
    /// Interval class to occurrence tally, feeds the frequency chart
    #[serde(rename = "notes")]
    pub note_stats: Option<BTreeMap<u8, NoteStat>>,
}

/// Scale detected for a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleInfo {
    pub name: String,
    /// Root pitch class in [0, 11]
    pub key: u8,
}

/// One chord-form match aligned to a measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormMatch {
    /// Stable identifier of the form shape; repeated shapes across the
    /// piece share this id
    pub form_id: String,
    #[serde(default)]
    pub measure_id: Option<u64>,
    #[serde(default)]
    pub image: Option<FormImage>,
}

/// Popup image for a form match, either inline PNG bytes or a link to
/// a server-rendered SVG
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormImage {
    /// Base64-encoded PNG bytes
    Png { png: String },
    /// URL of an SVG shape diagram
    SvgLink { svg: String },
}

/// Occurrence tally for one interval class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteStat {
    /// Interval label, e.g. `"b3"`
    pub name: String,
    pub count: u32,
}
