//! # Fretmark Client Library
//!
//! Client-side glue for the tab-analysis workflow:
//! - [`client`] - HTTP client for the analysis server (upload, probe,
//!   per-track analysis, song removal)
//! - [`session`] - upload/analysis session state machine with one
//!   request slot per track, so overlapping requests are rejected
//!   instead of racing
//! - [`chrome`] - transport-control and track-mixer view over the
//!   third-party player's control surface

pub mod chrome;
pub mod client;
pub mod session;

pub use chrome::{ControlsView, PlayerControl, PlayerEvent, PlayerState, TransportChrome};
pub use client::AnalysisClient;
pub use session::{Session, SessionPhase};
