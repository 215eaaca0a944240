//! Music-theory constants shared across the workspace
//!
//! Pitch classes are integers in [0, 11] with C = 0. Intervals are
//! pitch-class distances from a key, also in [0, 11].

use serde::{Deserialize, Serialize};

/// Number of pitch classes in an octave
pub const PITCH_CLASSES: u8 = 12;

/// Note names by pitch class (sharp spelling)
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Interval names by distance from the key, in semitones
pub const INTERVAL_NAMES: [&str; 12] = [
    "1", "b2", "2", "b3", "3", "4", "b5", "5", "b6", "6", "b7", "7",
];

/// Standard EADGBE tuning as open-string pitch classes, low string first
pub const STANDARD_TUNING: [u8; 6] = [4, 9, 2, 7, 11, 4];

/// Name for a pitch class, e.g. `note_name(4)` is `"E"`
pub fn note_name(pitch_class: u8) -> &'static str {
    NOTE_NAMES[(pitch_class % PITCH_CLASSES) as usize]
}

/// Name for an interval class, e.g. `interval_name(3)` is `"b3"`
pub fn interval_name(interval: u8) -> &'static str {
    INTERVAL_NAMES[(interval % PITCH_CLASSES) as usize]
}

/// Scales the analysis server reports matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
    MinorPentatonic,
    MajorPentatonic,
    MinorBlues,
    MajorBlues,
}

impl Scale {
    /// Whether this scale belongs to the major family
    pub fn is_major(self) -> bool {
        matches!(
            self,
            Scale::Ionian
                | Scale::Lydian
                | Scale::Mixolydian
                | Scale::MajorPentatonic
                | Scale::MajorBlues
        )
    }

    /// Preference order used by the server to break score ties; kept
    /// here so the client can present results in the same order.
    pub fn preference_order(major: bool) -> &'static [Scale] {
        if major {
            &[
                Scale::MajorPentatonic,
                Scale::Ionian,
                Scale::Lydian,
                Scale::Mixolydian,
                Scale::MajorBlues,
            ]
        } else {
            &[
                Scale::MinorPentatonic,
                Scale::Aeolian,
                Scale::Dorian,
                Scale::Phrygian,
                Scale::Locrian,
                Scale::MinorBlues,
            ]
        }
    }
}
