//! Shared API payload types for the analysis server
//!
//! The server contract changed shape over time (flat track maps, then
//! nested objects; bare interval arrays, then richer note objects).
//! This module pins one canonical contract and decodes older shapes
//! into it where that can be done unambiguously. Consumers treat every
//! analysis field as optional: a missing field skips the corresponding
//! overlay feature instead of failing the render.

pub mod types;

pub use types::{FormImage, FormMatch, NoteStat, ScaleInfo, TabInfo, TrackAnalysis};
