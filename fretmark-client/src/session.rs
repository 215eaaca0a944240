//! Upload/analysis session state machine
//!
//! The original flow chained callbacks (upload, reload, re-render,
//! re-attach listeners) with nothing stopping a second click from
//! firing a request while one was already in flight. This replaces
//! that with an explicit machine:
//!
//! ```text
//! Idle -> ProbePending -> Ready -> AnalyzePending -> Idle
//!           (failure returns to Idle; analyze failure to Ready)
//! ```
//!
//! plus one request slot per track for analysis fetches, so a repeat
//! request for a track with a fetch already in flight is rejected
//! instead of racing the first.

use fretmark_common::api::TabInfo;
use fretmark_common::{Error, Result};
use std::collections::BTreeSet;

/// Phase of the upload/analysis flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing uploaded yet (or analysis complete and page reloaded)
    Idle,
    /// Metadata probe in flight
    ProbePending,
    /// Track list known, awaiting selection and analysis
    Ready,
    /// Full analysis upload in flight
    AnalyzePending,
}

/// Client-side session state; purely synchronous, the caller drives it
/// around its network calls.
#[derive(Debug)]
pub struct Session {
    phase: SessionPhase,
    tab_info: Option<TabInfo>,
    selected: BTreeSet<String>,
    fetches_in_flight: BTreeSet<u64>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            tab_info: None,
            selected: BTreeSet::new(),
            fetches_in_flight: BTreeSet::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Track list from the last successful probe
    pub fn tab_info(&self) -> Option<&TabInfo> {
        self.tab_info.as_ref()
    }

    pub fn selected_tracks(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Start a metadata probe. Allowed from Idle or Ready (picking a
    /// new file discards the previous track list).
    pub fn begin_probe(&mut self) -> Result<()> {
        match self.phase {
            SessionPhase::Idle | SessionPhase::Ready => {
                self.phase = SessionPhase::ProbePending;
                self.tab_info = None;
                self.selected.clear();
                Ok(())
            }
            phase => Err(Error::InvalidState(format!(
                "cannot start probe during {:?}",
                phase
            ))),
        }
    }

    pub fn probe_succeeded(&mut self, info: TabInfo) -> Result<()> {
        self.expect_phase(SessionPhase::ProbePending, "probe completion")?;
        tracing::debug!(tracks = info.tracks.len(), "Probe complete");
        self.tab_info = Some(info);
        self.phase = SessionPhase::Ready;
        Ok(())
    }

    pub fn probe_failed(&mut self) {
        if self.phase == SessionPhase::ProbePending {
            self.phase = SessionPhase::Idle;
        }
    }

    /// Mark a track for analysis; the id must come from the probe's
    /// track list.
    pub fn select_track(&mut self, track_id: &str) -> Result<()> {
        self.expect_phase(SessionPhase::Ready, "track selection")?;
        let known = self
            .tab_info
            .as_ref()
            .map(|info| info.tracks.contains_key(track_id))
            .unwrap_or(false);
        if !known {
            return Err(Error::UnsupportedTrackState(format!(
                "track {} is not in the probed track list",
                track_id
            )));
        }
        self.selected.insert(track_id.to_string());
        Ok(())
    }

    pub fn deselect_track(&mut self, track_id: &str) {
        self.selected.remove(track_id);
    }

    /// Start the full analysis upload; requires at least one selected
    /// track. Returns the ids to send.
    pub fn begin_analyze(&mut self) -> Result<Vec<String>> {
        self.expect_phase(SessionPhase::Ready, "analysis upload")?;
        if self.selected.is_empty() {
            return Err(Error::InvalidState(
                "no tracks selected for analysis".to_string(),
            ));
        }
        self.phase = SessionPhase::AnalyzePending;
        Ok(self.selected.iter().cloned().collect())
    }

    /// Analysis accepted; the server now owns the state and the page
    /// reloads, so the session returns to Idle.
    pub fn analyze_finished(&mut self) {
        if self.phase == SessionPhase::AnalyzePending {
            self.phase = SessionPhase::Idle;
            self.tab_info = None;
            self.selected.clear();
        }
    }

    /// Analysis upload failed; selection is kept for a retry.
    pub fn analyze_failed(&mut self) {
        if self.phase == SessionPhase::AnalyzePending {
            self.phase = SessionPhase::Ready;
        }
    }

    /// Claim the request slot for a per-track analysis fetch.
    pub fn begin_track_fetch(&mut self, track_id: u64) -> Result<()> {
        if !self.fetches_in_flight.insert(track_id) {
            return Err(Error::UnsupportedTrackState(format!(
                "analysis fetch already in flight for track {}",
                track_id
            )));
        }
        Ok(())
    }

    /// Release the request slot, whatever the fetch's outcome.
    pub fn track_fetch_finished(&mut self, track_id: u64) {
        self.fetches_in_flight.remove(&track_id);
    }

    pub fn track_fetch_in_flight(&self, track_id: u64) -> bool {
        self.fetches_in_flight.contains(&track_id)
    }

    fn expect_phase(&self, expected: SessionPhase, operation: &str) -> Result<()> {
        if self.phase != expected {
            return Err(Error::InvalidState(format!(
                "{} requires {:?}, session is {:?}",
                operation, expected, self.phase
            )));
        }
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn probe_info() -> TabInfo {
        let mut tracks = BTreeMap::new();
        tracks.insert("0".to_string(), "Lead Guitar".to_string());
        tracks.insert("2".to_string(), "Rhythm Guitar".to_string());
        TabInfo {
            tracks,
            title: Some("Song".to_string()),
            artist: None,
        }
    }

    #[test]
    fn test_happy_path_probe_select_analyze() {
        let mut session = Session::new();
        assert_eq!(session.phase(), SessionPhase::Idle);

        session.begin_probe().unwrap();
        assert_eq!(session.phase(), SessionPhase::ProbePending);

        session.probe_succeeded(probe_info()).unwrap();
        assert_eq!(session.phase(), SessionPhase::Ready);

        session.select_track("0").unwrap();
        session.select_track("2").unwrap();
        let tracks = session.begin_analyze().unwrap();
        assert_eq!(tracks, vec!["0".to_string(), "2".to_string()]);
        assert_eq!(session.phase(), SessionPhase::AnalyzePending);

        session.analyze_finished();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.tab_info().is_none());
    }

    #[test]
    fn test_double_probe_is_rejected() {
        let mut session = Session::new();
        session.begin_probe().unwrap();
        let err = session.begin_probe().unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn test_probe_failure_returns_to_idle() {
        let mut session = Session::new();
        session.begin_probe().unwrap();
        session.probe_failed();
        assert_eq!(session.phase(), SessionPhase::Idle);
        // And a new probe can start
        session.begin_probe().unwrap();
    }

    #[test]
    fn test_analyze_requires_selection() {
        let mut session = Session::new();
        session.begin_probe().unwrap();
        session.probe_succeeded(probe_info()).unwrap();
        let err = session.begin_analyze().unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn test_unknown_track_selection_is_rejected() {
        let mut session = Session::new();
        session.begin_probe().unwrap();
        session.probe_succeeded(probe_info()).unwrap();
        let err = session.select_track("7").unwrap_err();
        assert!(matches!(err, Error::UnsupportedTrackState(_)));
    }

    #[test]
    fn test_analyze_failure_keeps_selection_for_retry() {
        let mut session = Session::new();
        session.begin_probe().unwrap();
        session.probe_succeeded(probe_info()).unwrap();
        session.select_track("0").unwrap();
        session.begin_analyze().unwrap();

        session.analyze_failed();
        assert_eq!(session.phase(), SessionPhase::Ready);
        let tracks = session.begin_analyze().unwrap();
        assert_eq!(tracks, vec!["0".to_string()]);
    }

    #[test]
    fn test_track_fetch_slot_rejects_overlap() {
        let mut session = Session::new();
        session.begin_track_fetch(5).unwrap();
        assert!(session.track_fetch_in_flight(5));

        // Second request for the same track while one is in flight
        let err = session.begin_track_fetch(5).unwrap_err();
        assert!(matches!(err, Error::UnsupportedTrackState(_)));

        // A different track is unaffected
        session.begin_track_fetch(6).unwrap();

        session.track_fetch_finished(5);
        assert!(!session.track_fetch_in_flight(5));
        session.begin_track_fetch(5).unwrap();
    }

    #[test]
    fn test_new_probe_discards_previous_track_list() {
        let mut session = Session::new();
        session.begin_probe().unwrap();
        session.probe_succeeded(probe_info()).unwrap();
        session.select_track("0").unwrap();

        session.begin_probe().unwrap();
        assert!(session.tab_info().is_none());
        assert_eq!(session.selected_tracks().count(), 0);
    }
}
