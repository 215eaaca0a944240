//! Interval-frequency breakdown for the summary chart
//!
//! Produces plain slice data; the actual pie rendering belongs to
//! whatever charting layer consumes it.

use crate::markers::NoteMarker;
use fretmark_common::music::{interval_name, PITCH_CLASSES};
use fretmark_common::api::NoteStat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One chart slice; fractions across a chart sum to 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub interval: u8,
    pub label: String,
    pub count: u32,
    pub fraction: f64,
}

/// Tally locally computed markers into chart slices, ascending by
/// interval. Hidden markers (rests, ties) do not count.
pub fn interval_histogram(markers: &[NoteMarker]) -> Vec<ChartSlice> {
    histogram_from_intervals(markers.iter().map(|m| m.interval))
}

/// Tally bare interval classes (e.g. a server-computed per-glyph
/// array) into chart slices; `None` entries do not count.
pub fn histogram_from_intervals(
    intervals: impl Iterator<Item = Option<u8>>,
) -> Vec<ChartSlice> {
    let mut counts = [0u32; PITCH_CLASSES as usize];
    for interval in intervals.flatten() {
        if interval < PITCH_CLASSES {
            counts[interval as usize] += 1;
        }
    }
    slices_from_counts(
        counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(i, &count)| (i as u8, interval_name(i as u8).to_string(), count)),
    )
}

/// Build chart slices from the server's per-interval tally, keeping
/// the server's labels where present.
pub fn chart_from_stats(stats: &BTreeMap<u8, NoteStat>) -> Vec<ChartSlice> {
    slices_from_counts(stats.iter().filter(|(_, stat)| stat.count > 0).map(
        |(&interval, stat)| {
            let label = if stat.name.is_empty() {
                interval_name(interval).to_string()
            } else {
                stat.name.clone()
            };
            (interval, label, stat.count)
        },
    ))
}

fn slices_from_counts(counts: impl Iterator<Item = (u8, String, u32)>) -> Vec<ChartSlice> {
    let entries: Vec<(u8, String, u32)> = counts.collect();
    let total: u32 = entries.iter().map(|(_, _, count)| count).sum();
    if total == 0 {
        return Vec::new();
    }
    entries
        .into_iter()
        .map(|(interval, label, count)| ChartSlice {
            interval,
            label,
            count,
            fraction: count as f64 / total as f64,
        })
        .collect()
}
