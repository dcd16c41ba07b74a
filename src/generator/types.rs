//! Generator input and output types

use serde::{Deserialize, Serialize};

use super::fretboard::Tuning;

/// A note as reported by the MIDI parser, after sanitization.
///
/// # Fields
/// - `tick_on` / `tick_off`: onset and release in ticks, `tick_off > tick_on`
/// - `midi_note`: MIDI pitch 0-127
/// - `velocity`: normalized to 0.0-1.0
/// - `channel` / `track`: origin in the MIDI file, informational only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceNote {
    pub tick_on: i64,
    pub tick_off: i64,
    pub midi_note: u8,
    #[serde(default = "default_velocity")]
    pub velocity: f32,
    #[serde(default)]
    pub channel: u8,
    #[serde(default)]
    pub track: u16,
}

fn default_velocity() -> f32 {
    1.0
}

impl SourceNote {
    pub fn new(tick_on: i64, tick_off: i64, midi_note: u8) -> Self {
        Self {
            tick_on,
            tick_off,
            midi_note,
            velocity: 1.0,
            channel: 0,
            track: 0,
        }
    }

    pub fn duration_ticks(&self) -> i64 {
        self.tick_off - self.tick_on
    }
}

/// A playable note bound to a string, fret and finger.
///
/// # Fields
/// - `id`: unique within one generated sequence, assigned in emission order
/// - `tick`: onset of the cluster the note was chosen from
/// - `duration_ticks`: length of the chosen source note
/// - `string`: 1 (high E) to 6 (low E)
/// - `fret`: 0 = open string
/// - `finger`: 0 for open strings, otherwise 1 (index) to 4 (little)
/// - `expected_midi`: pitch actually sounded at `string`/`fret`
/// - `source_midi`: pitch of the source note it stands for; differs from
///   `expected_midi` when the note had to be moved to fit the profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetNote {
    pub id: u32,
    pub tick: i64,
    pub duration_ticks: i64,
    pub string: u8,
    pub fret: u8,
    pub finger: u8,
    pub expected_midi: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_midi: Option<u8>,
}

/// Which pitch stands for a cluster of simultaneous notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepresentativePolicy {
    /// The top voice, usually the melody
    #[default]
    Highest,
    /// The bass voice
    Lowest,
}

/// Generator settings that are not part of the difficulty profile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeneratorOptions {
    pub representative_policy: RepresentativePolicy,
    /// Notes starting within this many ticks of a cluster's first note join
    /// the cluster. Defaults to a 64th note (`ticks_per_quarter / 16`).
    pub cluster_window_ticks: Option<u32>,
    pub tuning: Tuning,
}

impl GeneratorOptions {
    pub fn with_policy(representative_policy: RepresentativePolicy) -> Self {
        Self {
            representative_policy,
            ..Self::default()
        }
    }
}
