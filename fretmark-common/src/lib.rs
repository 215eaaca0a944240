//! # Fretmark Common Library
//!
//! Shared code for the Fretmark workspace including:
//! - Error types used across crates
//! - API request/response payload types for the analysis server
//! - Configuration loading (server URL resolution)
//! - Music-theory constants (pitch classes, intervals, tunings, scales)

pub mod api;
pub mod config;
pub mod error;
pub mod music;

pub use error::{Error, Result};
