//! Typed view model over the notation renderer's output
//!
//! The renderer emits one SVG per staff ("system"): a handful of
//! thin rects for the staff lines, wide rects for measure backgrounds,
//! a block of rects for the tablature grid, and a text glyph per fret
//! number. The raw geometry is captured once into [`RenderedStaff`]
//! values at the rendering boundary; [`TabView::from_render`] distills
//! those into measure spans and a staff origin. Overlay logic never
//! touches renderer structures again, which is what keeps it testable.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Rects at most this wide are staff/grid lines, not measure spans
const MEASURE_MIN_WIDTH: f32 = 20.0;

/// Number of leading staff-line rects before the tablature block can start
const STAFF_LINE_RECTS: usize = 6;

/// A fret-number text glyph as rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphText {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// A raw rectangle element as rendered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectEl {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Raw per-staff render output, elements in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderedStaff {
    pub texts: Vec<GlyphText>,
    pub rects: Vec<RectEl>,
}

/// Horizontal span of one rendered measure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasureSpan {
    pub x: f32,
    pub width: f32,
}

/// Distilled view of one staff: its measure spans in left-to-right
/// order and the y offset of the tablature block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffView {
    pub origin_y: f32,
    pub measures: Vec<MeasureSpan>,
}

impl StaffView {
    /// Distill a staff's rects into measure spans.
    ///
    /// Walks rects in document order remembering the first x. Once
    /// past the staff-line rects, a rect starting back at that x is
    /// the tablature block: measure positions are already known at
    /// that point, so only its vertical offset is kept. Wide rects
    /// seen before then are measure spans, deduplicated by x (a later
    /// rect at the same x wins) and ordered ascending.
    ///
    /// Returns `None` when no tablature block is found; callers skip
    /// such staves.
    pub fn from_staff(staff: &RenderedStaff) -> Option<StaffView> {
        let mut start: Option<f32> = None;
        let mut origin_y: Option<f32> = None;
        let mut spans: Vec<MeasureSpan> = Vec::new();

        for (j, rect) in staff.rects.iter().enumerate() {
            let start_x = *start.get_or_insert(rect.x);
            if j > STAFF_LINE_RECTS && rect.x == start_x {
                origin_y = Some(rect.y);
                break;
            }
            if rect.width > MEASURE_MIN_WIDTH {
                match spans.iter_mut().find(|span| span.x == rect.x) {
                    Some(span) => span.width = rect.width,
                    None => spans.push(MeasureSpan {
                        x: rect.x,
                        width: rect.width,
                    }),
                }
            }
        }

        let origin_y = origin_y?;
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
        Some(StaffView {
            origin_y,
            measures: spans,
        })
    }
}

/// Distilled view of the whole rendered piece
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabView {
    /// Staves in document order; staves without a tablature block are dropped
    pub staves: Vec<StaffView>,
    /// Fret glyphs across all staves, in document order
    pub glyphs: Vec<GlyphText>,
}

impl TabView {
    /// Build the view model once from the renderer's output
    pub fn from_render(staves: &[RenderedStaff]) -> TabView {
        let mut views = Vec::new();
        for (i, staff) in staves.iter().enumerate() {
            match StaffView::from_staff(staff) {
                Some(view) => views.push(view),
                None => tracing::debug!("Staff {} has no tablature block, skipping", i),
            }
        }
        let glyphs = staves
            .iter()
            .flat_map(|staff| staff.texts.iter().cloned())
            .collect();
        TabView {
            staves: views,
            glyphs,
        }
    }

    /// Total number of measure spans across all staves
    pub fn measure_count(&self) -> usize {
        self.staves.iter().map(|s| s.measures.len()).sum()
    }
}

/// Parse a fret number from a glyph label.
///
/// Annotation characters (bends, hammer-on markers and the like) are
/// stripped; a label with no digits at all is a rest or tie and yields
/// `None`.
pub fn parse_fret(label: &str) -> Option<u32> {
    let digits: String = label.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Match a glyph's vertical position against known per-string y
/// coordinates, nearest wins. `None` when nothing is within
/// `tolerance` of `y`.
pub fn string_index_for_y(y: f32, string_ys: &[f32], tolerance: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &string_y) in string_ys.iter().enumerate() {
        let distance = (y - string_y).abs();
        if distance <= tolerance && best.map_or(true, |(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, width: f32, height: f32) -> RectEl {
        RectEl {
            x,
            y,
            width,
            height,
        }
    }

    /// A staff shaped like the renderer's output: measure-background
    /// rects first, then narrow barline/staff furniture, then the
    /// tablature block starting back at the first rect's x.
    fn staff_with_measures(measure_xs: &[(f32, f32)]) -> RenderedStaff {
        let mut rects = Vec::new();
        for &(x, width) in measure_xs {
            rects.push(rect(x, 20.0, width, 54.0));
        }
        for i in 0..7 {
            rects.push(rect(300.0 + i as f32, 20.0, 2.0, 54.0));
        }
        // Tablature block repeats the first rect's x
        let start_x = measure_xs.first().map(|&(x, _)| x).unwrap_or(10.0);
        rects.push(rect(start_x, 130.0, 2.0, 1.0));
        RenderedStaff {
            texts: vec![],
            rects,
        }
    }

    #[test]
    fn test_staff_extraction_finds_measures_and_origin() {
        let staff = staff_with_measures(&[(10.0, 120.0), (130.0, 96.0)]);
        let view = StaffView::from_staff(&staff).unwrap();
        assert_eq!(view.origin_y, 130.0);
        assert_eq!(view.measures.len(), 2);
        assert_eq!(view.measures[0].x, 10.0);
        assert_eq!(view.measures[0].width, 120.0);
        assert_eq!(view.measures[1].x, 130.0);
    }

    #[test]
    fn test_narrow_rects_are_not_measures() {
        let staff = staff_with_measures(&[(10.0, 19.0), (130.0, 96.0)]);
        let view = StaffView::from_staff(&staff).unwrap();
        assert_eq!(view.measures.len(), 1);
        assert_eq!(view.measures[0].x, 130.0);
    }

    #[test]
    fn test_duplicate_x_keeps_later_width() {
        let staff = staff_with_measures(&[(10.0, 80.0), (10.0, 100.0)]);
        let view = StaffView::from_staff(&staff).unwrap();
        assert_eq!(view.measures.len(), 1);
        assert_eq!(view.measures[0].width, 100.0);
    }

    #[test]
    fn test_measures_sorted_by_x() {
        let staff = staff_with_measures(&[(220.0, 60.0), (40.0, 90.0), (130.0, 85.0)]);
        let view = StaffView::from_staff(&staff).unwrap();
        let xs: Vec<f32> = view.measures.iter().map(|m| m.x).collect();
        assert_eq!(xs, vec![40.0, 130.0, 220.0]);
    }

    #[test]
    fn test_staff_without_tab_block_is_skipped() {
        // Only staff lines and measure rects, x never repeats
        let mut rects = Vec::new();
        for i in 0..7 {
            rects.push(rect(10.0 + i as f32, 20.0, 2.0, 1.0));
        }
        rects.push(rect(50.0, 20.0, 100.0, 54.0));
        let staff = RenderedStaff {
            texts: vec![],
            rects,
        };
        assert_eq!(StaffView::from_staff(&staff), None);

        let view = TabView::from_render(&[staff]);
        assert!(view.staves.is_empty());
    }

    #[test]
    fn test_tab_view_flattens_glyphs_in_order() {
        let mut first = staff_with_measures(&[(10.0, 120.0)]);
        first.texts.push(GlyphText {
            x: 1.0,
            y: 2.0,
            text: "5".into(),
        });
        let mut second = staff_with_measures(&[(10.0, 120.0)]);
        second.texts.push(GlyphText {
            x: 3.0,
            y: 4.0,
            text: "7".into(),
        });
        let view = TabView::from_render(&[first, second]);
        assert_eq!(view.staves.len(), 2);
        assert_eq!(view.measure_count(), 2);
        let labels: Vec<&str> = view.glyphs.iter().map(|g| g.text.as_str()).collect();
        assert_eq!(labels, vec!["5", "7"]);
    }

    #[test]
    fn test_parse_fret_plain_and_annotated() {
        assert_eq!(parse_fret("0"), Some(0));
        assert_eq!(parse_fret("12"), Some(12));
        // Annotation characters are stripped
        assert_eq!(parse_fret("12b"), Some(12));
        assert_eq!(parse_fret("(7)"), Some(7));
    }

    #[test]
    fn test_parse_fret_rest_or_tie() {
        assert_eq!(parse_fret(""), None);
        assert_eq!(parse_fret("~"), None);
        assert_eq!(parse_fret("x"), None);
    }

    #[test]
    fn test_string_index_nearest_within_tolerance() {
        let ys = [10.0, 19.0, 28.0, 37.0, 46.0, 55.0];
        assert_eq!(string_index_for_y(10.5, &ys, 3.0), Some(0));
        assert_eq!(string_index_for_y(29.0, &ys, 3.0), Some(2));
        // Exactly between two strings resolves to the nearer-first
        assert_eq!(string_index_for_y(56.0, &ys, 3.0), Some(5));
        // Outside every string's tolerance band
        assert_eq!(string_index_for_y(80.0, &ys, 3.0), None);
    }
}
