//! Interval-from-fretboard-position computation
//!
//! The one place actual music arithmetic happens: a fretted note's
//! pitch class is the open-string pitch class plus the fret number,
//! and its interval class is that pitch class relative to the song
//! key, collapsed to [0, 11].

/// Interval class of a fretted note relative to `key`.
///
/// `tuning` holds open-string pitch classes (mod 12), low string
/// first; `string_index` is a 0-based index into it. Returns `None`
/// for a string index outside the tuning.
///
/// The subtraction can go negative before normalization (e.g. open C
/// string against a B key), so the residue is taken with `rem_euclid`
/// rather than `%`.
pub fn interval_class(tuning: &[u8], string_index: usize, fret: u32, key: u8) -> Option<u8> {
    let open = *tuning.get(string_index)? as i32;
    let pitch_class = (open + fret as i32) % 12;
    Some((pitch_class - (key % 12) as i32).rem_euclid(12) as u8)
}
