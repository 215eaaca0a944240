//! Chord-form badge alignment over measure spans
//!
//! The analysis server reports, per sequential measure index, which
//! chord-form shapes match that measure. Each matched measure's
//! horizontal span is divided evenly among its matches and a badge bar
//! is placed above the tablature block; hovering a badge reveals a
//! popup image of the form shape centered on the measure.

use fretmark_common::api::{FormImage, FormMatch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::view::StaffView;

/// Badge bar height
pub const FORM_BAR_HEIGHT: f32 = 12.0;
/// Popup shape image size
pub const FORM_SHAPE_WIDTH: f32 = 150.0;
pub const FORM_SHAPE_HEIGHT: f32 = 175.0;

/// Badge bar sits this far above the tablature block
const BAR_RAISE: f32 = 30.0;
/// Popup image bottom edge sits this far above the tablature block
const SHAPE_RAISE: f32 = 35.0;

/// Alignment policy knobs
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayOptions {
    /// Draw an empty full-width bar over measures with no matches
    /// instead of skipping them
    pub placeholder_bars: bool,
}

/// One badge rectangle to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormBadge {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Style class index shared by every badge of the same form shape;
    /// `None` for placeholder bars
    pub style_index: Option<usize>,
    /// Links the badge to its hover popup; `None` for placeholder bars
    pub popup_id: Option<usize>,
}

/// Hover popup image for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormPopup {
    pub id: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub image: Option<FormImage>,
}

/// Aligned overlay ready to draw
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormOverlay {
    pub badges: Vec<FormBadge>,
    pub popups: Vec<FormPopup>,
    /// Form ids in first-seen order; a badge's `style_index` indexes
    /// into this list, so repeated shapes share a visual style
    pub styles: Vec<String>,
}

/// Align form matches to rendered measure spans.
///
/// Measures are numbered sequentially across staves in document
/// order. A measure with n matches gets n equal-width badges
/// partitioning its span exactly; an unmatched measure gets nothing,
/// or one placeholder bar per [`OverlayOptions::placeholder_bars`].
/// Iteration over the sparse match map is by ascending measure index
/// and match order is preserved, so identical inputs give identical
/// output.
pub fn align_form_badges(
    staves: &[StaffView],
    matches: &BTreeMap<usize, Vec<FormMatch>>,
    options: &OverlayOptions,
) -> FormOverlay {
    let mut overlay = FormOverlay::default();
    let mut measure_index = 0usize;
    let mut popup_id = 0usize;

    for staff in staves {
        let bar_y = staff.origin_y - BAR_RAISE;
        let shape_y = staff.origin_y - SHAPE_RAISE - FORM_SHAPE_HEIGHT;
        for span in &staff.measures {
            let measure_matches = matches
                .get(&measure_index)
                .map(Vec::as_slice)
                .unwrap_or_default();
            if measure_matches.is_empty() {
                if options.placeholder_bars {
                    overlay.badges.push(FormBadge {
                        x: span.x,
                        y: bar_y,
                        width: span.width,
                        height: FORM_BAR_HEIGHT,
                        style_index: None,
                        popup_id: None,
                    });
                }
                measure_index += 1;
                continue;
            }

            let badge_width = span.width / measure_matches.len() as f32;
            // All popups of a measure share one x, centered on the span
            let shape_x = span.x + span.width / 2.0 - FORM_SHAPE_WIDTH / 2.0;
            for (j, form_match) in measure_matches.iter().enumerate() {
                let style_index = intern_style(&mut overlay.styles, &form_match.form_id);
                overlay.badges.push(FormBadge {
                    x: span.x + j as f32 * badge_width,
                    y: bar_y,
                    width: badge_width,
                    height: FORM_BAR_HEIGHT,
                    style_index: Some(style_index),
                    popup_id: Some(popup_id),
                });
                overlay.popups.push(FormPopup {
                    id: popup_id,
                    x: shape_x,
                    y: shape_y,
                    width: FORM_SHAPE_WIDTH,
                    height: FORM_SHAPE_HEIGHT,
                    image: form_match.image.clone(),
                });
                popup_id += 1;
            }
            measure_index += 1;
        }
    }

    tracing::debug!(
        measures = measure_index,
        badges = overlay.badges.len(),
        forms = overlay.styles.len(),
        "Aligned form overlay"
    );
    overlay
}

/// Stable small-integer index per form shape, first-seen order
fn intern_style(styles: &mut Vec<String>, form_id: &str) -> usize {
    match styles.iter().position(|id| id == form_id) {
        Some(index) => index,
        None => {
            styles.push(form_id.to_string());
            styles.len() - 1
        }
    }
}
