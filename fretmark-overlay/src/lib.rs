//! # Fretmark Overlay Engine
//!
//! Pure analysis-overlay computation for rendered guitar tablature.
//! The notation renderer's output is captured once as a typed view
//! model ([`view::TabView`]); everything downstream works on that
//! model and produces plain geometry:
//! - [`interval`] - pitch-class interval of a fretted note relative
//!   to the song key
//! - [`markers`] - colored note circles over fret-number glyphs
//! - [`forms`] - chord-form badges aligned to measure spans, with
//!   hover popups
//! - [`chart`] - interval-frequency slices for the summary chart
//!
//! No I/O, no global state: given the same view model and analysis
//! payload, every function returns identical output.

pub mod chart;
pub mod forms;
pub mod interval;
pub mod markers;
pub mod view;

pub use chart::ChartSlice;
pub use forms::{align_form_badges, FormBadge, FormOverlay, FormPopup, OverlayOptions};
pub use interval::interval_class;
pub use markers::{note_markers, ColorTable, NoteMarker, StringLayout};
pub use view::{GlyphText, MeasureSpan, RectEl, RenderedStaff, StaffView, TabView};
