//! Player chrome: transport controls and track mixer
//!
//! A view over the third-party player/renderer's control surface. The
//! chrome owns no playback state of its own: user intent is forwarded
//! to [`PlayerControl`] and the rendered view is folded from the
//! [`PlayerEvent`]s the player reports back.

/// Playback state as the player reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Stopped,
    Playing,
}

/// Score layout modes the renderer supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Page,
    Horizontal,
}

/// One track as reported by the player when a score loads
#[derive(Debug, Clone, PartialEq)]
pub struct TrackInfo {
    pub index: usize,
    pub name: String,
    /// Playback volume on the player's 0..=16 scale
    pub volume: u8,
}

/// Lifecycle events emitted by the player/renderer
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Score parsed; carries the full track list
    Loaded { tracks: Vec<TrackInfo> },
    /// Notation (re)painted; carries the indices currently shown
    Rendered { visible_tracks: Vec<usize> },
    /// Audio backend ready, controls may be enabled
    PlayerReady,
    PlayerStateChanged(PlayerState),
    /// Sound font download progress
    SoundFontLoad { loaded: u64, total: u64 },
    SoundFontLoaded,
}

/// The player's control surface. Implemented by the bridge to the
/// actual player library; mocked in tests.
pub trait PlayerControl {
    fn play_pause(&mut self);
    fn stop(&mut self);
    fn set_loop(&mut self, enabled: bool);
    fn loop_enabled(&self) -> bool;
    fn metronome_volume(&self) -> f32;
    fn set_metronome_volume(&mut self, volume: f32);
    fn set_playback_speed(&mut self, speed: f32);
    fn set_track_volume(&mut self, track: usize, volume: u8);
    fn solo_track(&mut self, track: usize, solo: bool);
    fn mute_track(&mut self, track: usize, mute: bool);
    fn select_tracks(&mut self, tracks: &[usize]);
    fn set_layout(&mut self, layout: Layout);
}

/// One row of the track-mixer list
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRow {
    pub index: usize,
    pub name: String,
    pub volume: u8,
    pub visible: bool,
    pub solo: bool,
    pub mute: bool,
}

/// Everything the chrome needs to paint its widgets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlsView {
    /// Transport buttons stay disabled until the player is ready
    pub controls_enabled: bool,
    pub playing: bool,
    pub looping: bool,
    pub metronome_on: bool,
    /// Sound-font download percentage; `None` once loaded (progress
    /// bar hidden)
    pub sound_font_percent: Option<u8>,
    pub tracks: Vec<TrackRow>,
}

/// Transport/mixer chrome bound to a player control surface
pub struct TransportChrome<P: PlayerControl> {
    player: P,
    view: ControlsView,
}

impl<P: PlayerControl> TransportChrome<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            view: ControlsView {
                sound_font_percent: Some(0),
                ..ControlsView::default()
            },
        }
    }

    /// Current view; repainted by the caller after each event or intent
    pub fn view(&self) -> &ControlsView {
        &self.view
    }

    /// Fold a player lifecycle event into the view
    pub fn handle_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Loaded { tracks } => {
                self.view.tracks = tracks
                    .into_iter()
                    .map(|t| TrackRow {
                        index: t.index,
                        name: t.name,
                        volume: t.volume,
                        visible: false,
                        solo: false,
                        mute: false,
                    })
                    .collect();
            }
            PlayerEvent::Rendered { visible_tracks } => {
                for row in &mut self.view.tracks {
                    row.visible = visible_tracks.contains(&row.index);
                }
            }
            PlayerEvent::PlayerReady => {
                self.view.controls_enabled = true;
            }
            PlayerEvent::PlayerStateChanged(state) => {
                self.view.playing = state == PlayerState::Playing;
            }
            PlayerEvent::SoundFontLoad { loaded, total } => {
                let percent = if total == 0 {
                    0
                } else {
                    (loaded * 100 / total).min(100) as u8
                };
                self.view.sound_font_percent = Some(percent);
            }
            PlayerEvent::SoundFontLoaded => {
                self.view.sound_font_percent = None;
            }
        }
    }

    // User intents, forwarded to the control surface. Playback state
    // changes come back through PlayerStateChanged rather than being
    // assumed here.

    pub fn play_pause(&mut self) {
        self.player.play_pause();
    }

    pub fn stop(&mut self) {
        self.player.stop();
    }

    pub fn toggle_loop(&mut self) {
        let looping = !self.player.loop_enabled();
        self.player.set_loop(looping);
        self.view.looping = looping;
    }

    /// Metronome toggles between volume 0 and 1, as the original did
    pub fn toggle_metronome(&mut self) {
        if self.player.metronome_volume() == 0.0 {
            self.player.set_metronome_volume(1.0);
            self.view.metronome_on = true;
        } else {
            self.player.set_metronome_volume(0.0);
            self.view.metronome_on = false;
        }
    }

    pub fn set_playback_speed(&mut self, speed: f32) {
        self.player.set_playback_speed(speed);
    }

    /// Show a single track in the notation view; visibility flags are
    /// refreshed when the re-render reports back.
    pub fn show_track(&mut self, track: usize) {
        self.player.select_tracks(&[track]);
    }

    pub fn set_solo(&mut self, track: usize, solo: bool) {
        self.player.solo_track(track, solo);
        if let Some(row) = self.view.tracks.iter_mut().find(|r| r.index == track) {
            row.solo = solo;
        }
    }

    pub fn set_mute(&mut self, track: usize, mute: bool) {
        self.player.mute_track(track, mute);
        if let Some(row) = self.view.tracks.iter_mut().find(|r| r.index == track) {
            row.mute = mute;
        }
    }

    pub fn set_track_volume(&mut self, track: usize, volume: u8) {
        self.player.set_track_volume(track, volume);
        if let Some(row) = self.view.tracks.iter_mut().find(|r| r.index == track) {
            row.volume = volume;
        }
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.player.set_layout(layout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records forwarded calls and plays back minimal state
    #[derive(Default)]
    struct MockPlayer {
        calls: Vec<String>,
        looping: bool,
        metronome_volume: f32,
    }

    impl PlayerControl for MockPlayer {
        fn play_pause(&mut self) {
            self.calls.push("playPause".to_string());
        }
        fn stop(&mut self) {
            self.calls.push("stop".to_string());
        }
        fn set_loop(&mut self, enabled: bool) {
            self.looping = enabled;
            self.calls.push(format!("loop {}", enabled));
        }
        fn loop_enabled(&self) -> bool {
            self.looping
        }
        fn metronome_volume(&self) -> f32 {
            self.metronome_volume
        }
        fn set_metronome_volume(&mut self, volume: f32) {
            self.metronome_volume = volume;
            self.calls.push(format!("metronomeVolume {}", volume));
        }
        fn set_playback_speed(&mut self, speed: f32) {
            self.calls.push(format!("playbackSpeed {}", speed));
        }
        fn set_track_volume(&mut self, track: usize, volume: u8) {
            self.calls.push(format!("trackVolume {} {}", track, volume));
        }
        fn solo_track(&mut self, track: usize, solo: bool) {
            self.calls.push(format!("soloTrack {} {}", track, solo));
        }
        fn mute_track(&mut self, track: usize, mute: bool) {
            self.calls.push(format!("muteTrack {} {}", track, mute));
        }
        fn select_tracks(&mut self, tracks: &[usize]) {
            self.calls.push(format!("tracks {:?}", tracks));
        }
        fn set_layout(&mut self, layout: Layout) {
            self.calls.push(format!("layout {:?}", layout));
        }
    }

    fn loaded_event() -> PlayerEvent {
        PlayerEvent::Loaded {
            tracks: vec![
                TrackInfo {
                    index: 0,
                    name: "Lead".to_string(),
                    volume: 12,
                },
                TrackInfo {
                    index: 1,
                    name: "Bass".to_string(),
                    volume: 10,
                },
            ],
        }
    }

    #[test]
    fn test_controls_enable_on_player_ready() {
        let mut chrome = TransportChrome::new(MockPlayer::default());
        assert!(!chrome.view().controls_enabled);
        chrome.handle_event(PlayerEvent::PlayerReady);
        assert!(chrome.view().controls_enabled);
    }

    #[test]
    fn test_play_state_follows_player_events() {
        let mut chrome = TransportChrome::new(MockPlayer::default());
        chrome.play_pause();
        // Not playing until the player says so
        assert!(!chrome.view().playing);
        chrome.handle_event(PlayerEvent::PlayerStateChanged(PlayerState::Playing));
        assert!(chrome.view().playing);
        chrome.handle_event(PlayerEvent::PlayerStateChanged(PlayerState::Stopped));
        assert!(!chrome.view().playing);
        assert_eq!(chrome.player.calls, vec!["playPause"]);
    }

    #[test]
    fn test_loop_toggle_round_trip() {
        let mut chrome = TransportChrome::new(MockPlayer::default());
        chrome.toggle_loop();
        assert!(chrome.view().looping);
        chrome.toggle_loop();
        assert!(!chrome.view().looping);
        assert_eq!(chrome.player.calls, vec!["loop true", "loop false"]);
    }

    #[test]
    fn test_metronome_toggles_between_zero_and_one() {
        let mut chrome = TransportChrome::new(MockPlayer::default());
        chrome.toggle_metronome();
        assert!(chrome.view().metronome_on);
        assert_eq!(chrome.player.metronome_volume, 1.0);
        chrome.toggle_metronome();
        assert!(!chrome.view().metronome_on);
        assert_eq!(chrome.player.metronome_volume, 0.0);
    }

    #[test]
    fn test_sound_font_progress_percentage() {
        let mut chrome = TransportChrome::new(MockPlayer::default());
        chrome.handle_event(PlayerEvent::SoundFontLoad {
            loaded: 1,
            total: 3,
        });
        // Integer percentage, floored
        assert_eq!(chrome.view().sound_font_percent, Some(33));
        chrome.handle_event(PlayerEvent::SoundFontLoaded);
        assert_eq!(chrome.view().sound_font_percent, None);
    }

    #[test]
    fn test_sound_font_progress_never_exceeds_100() {
        let mut chrome = TransportChrome::new(MockPlayer::default());
        // A player reporting more loaded than total must not wrap the
        // percentage through the u8 cast
        chrome.handle_event(PlayerEvent::SoundFontLoad {
            loaded: 700,
            total: 100,
        });
        assert_eq!(chrome.view().sound_font_percent, Some(100));
        chrome.handle_event(PlayerEvent::SoundFontLoad {
            loaded: 5,
            total: 0,
        });
        assert_eq!(chrome.view().sound_font_percent, Some(0));
    }

    #[test]
    fn test_track_list_and_visibility() {
        let mut chrome = TransportChrome::new(MockPlayer::default());
        chrome.handle_event(loaded_event());
        assert_eq!(chrome.view().tracks.len(), 2);
        assert_eq!(chrome.view().tracks[0].volume, 12);
        assert!(!chrome.view().tracks[0].visible);

        chrome.handle_event(PlayerEvent::Rendered {
            visible_tracks: vec![1],
        });
        assert!(!chrome.view().tracks[0].visible);
        assert!(chrome.view().tracks[1].visible);
    }

    #[test]
    fn test_mixer_intents_update_rows_and_forward() {
        let mut chrome = TransportChrome::new(MockPlayer::default());
        chrome.handle_event(loaded_event());

        chrome.set_solo(0, true);
        chrome.set_mute(1, true);
        chrome.set_track_volume(1, 4);
        chrome.show_track(1);

        assert!(chrome.view().tracks[0].solo);
        assert!(chrome.view().tracks[1].mute);
        assert_eq!(chrome.view().tracks[1].volume, 4);
        assert_eq!(
            chrome.player.calls,
            vec![
                "soloTrack 0 true",
                "muteTrack 1 true",
                "trackVolume 1 4",
                "tracks [1]"
            ]
        );
    }
}
