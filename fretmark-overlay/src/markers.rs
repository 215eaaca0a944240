//! Note circle markers over fret-number glyphs
//!
//! Each fret glyph gets a circle centered just right of the number,
//! keyed by its interval class. A marker with no interval (rest, tie,
//! unmapped string) is emitted but renders hidden, keeping marker and
//! glyph lists index-aligned.

use crate::interval::interval_class;
use crate::view::{parse_fret, string_index_for_y, GlyphText};
use serde::{Deserialize, Serialize};

/// Circle radius used by the original overlay
pub const MARKER_RADIUS: f32 = 8.0;

/// Horizontal advance per half glyph character
const GLYPH_CHAR_WIDTH: f32 = 3.0;

/// Vertical layout of tablature strings within a staff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringLayout {
    /// Per-string glyph baseline y, indexed like the tuning (low string first)
    pub string_ys: Vec<f32>,
    /// Maximum |y - string_y| still attributed to a string
    pub tolerance: f32,
}

impl StringLayout {
    pub fn new(string_ys: Vec<f32>, tolerance: f32) -> Self {
        Self {
            string_ys,
            tolerance,
        }
    }

    /// String index for a glyph's vertical position
    pub fn string_for(&self, y: f32) -> Option<usize> {
        string_index_for_y(y, &self.string_ys, self.tolerance)
    }
}

/// One circle marker ready to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteMarker {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    /// Interval class in [0, 11]; `None` renders hidden
    pub interval: Option<u8>,
}

/// Compute markers locally from tuning and key.
///
/// A glyph whose label has no digits, or whose y maps to no string,
/// gets a hidden marker rather than none at all.
pub fn note_markers(
    glyphs: &[GlyphText],
    layout: &StringLayout,
    tuning: &[u8],
    key: u8,
) -> Vec<NoteMarker> {
    glyphs
        .iter()
        .map(|glyph| {
            let interval = parse_fret(&glyph.text).and_then(|fret| {
                let string = layout.string_for(glyph.y)?;
                interval_class(tuning, string, fret, key)
            });
            marker_for(glyph, interval)
        })
        .collect()
}

/// Build markers from a server-computed per-glyph interval array (the
/// older contract). Glyphs past the end of the array are hidden.
pub fn markers_from_intervals(glyphs: &[GlyphText], intervals: &[Option<u8>]) -> Vec<NoteMarker> {
    glyphs
        .iter()
        .enumerate()
        .map(|(i, glyph)| marker_for(glyph, intervals.get(i).copied().flatten()))
        .collect()
}

fn marker_for(glyph: &GlyphText, interval: Option<u8>) -> NoteMarker {
    // Center the circle past the glyph text, half a character per digit
    let advance = (glyph.text.len() as f32 / 2.0 + 1.0) * GLYPH_CHAR_WIDTH;
    NoteMarker {
        cx: glyph.x + advance,
        cy: glyph.y,
        radius: MARKER_RADIUS,
        interval,
    }
}

/// Caller-supplied interval-to-color table.
///
/// `None` entries and intervals beyond the table render hidden, which
/// is how a palette shows only chord tones or only scale tones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorTable {
    colors: Vec<Option<String>>,
}

impl ColorTable {
    pub fn new(colors: Vec<Option<String>>) -> Self {
        Self { colors }
    }

    /// Color for a marker's interval; `None` means hidden
    pub fn color_for(&self, interval: Option<u8>) -> Option<&str> {
        let interval = interval?;
        self.colors.get(interval as usize)?.as_deref()
    }
}
