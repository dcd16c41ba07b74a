//! # Chart Files
//!
//! A chart bundles everything one session needs in a single YAML document:
//! timing resolution, tempo changes, the difficulty to play at and the
//! source notes, as a MIDI parser would report them.
//!
//! ```yaml
//! title: Open Strings
//! ticks-per-quarter: 480
//! tempo:
//!   - { tick: 0, bpm: 120 }
//! difficulty: easy            # or `profile:` with an inline profile
//! notes:
//!   - { tick-on: 0, tick-off: 240, midi-note: 40 }
//!   - { tick-on: 960, tick-off: 1200, midi-note: 45, velocity: 0.8 }
//! ```
//!
//! Keys are kebab-case. Every key but `notes` is optional.

use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::FretError;
use crate::generator::SourceNote;
use crate::profile::{Difficulty, DifficultyProfile};
use crate::tempo::{TempoEvent, TempoMap};

fn default_ticks_per_quarter() -> u32 {
    480
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Chart {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_ticks_per_quarter")]
    pub ticks_per_quarter: u32,
    #[serde(default)]
    pub tempo: Vec<TempoEvent>,
    /// Preset name, ignored when `profile` is given
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub profile: Option<DifficultyProfile>,
    /// Ticks before a target at which gating starts; a sixteenth note if unset
    #[serde(default)]
    pub approach_threshold_ticks: Option<u32>,
    pub notes: Vec<SourceNote>,
}

impl Chart {
    pub fn from_yaml(content: &str) -> Result<Self, FretError> {
        let chart: Chart = serde_yaml::from_str(content)?;
        debug!(
            "Chart '{}' parsed: {} note(s), {} tempo event(s)",
            chart.title.as_deref().unwrap_or("untitled"),
            chart.notes.len(),
            chart.tempo.len()
        );
        Ok(chart)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FretError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| FretError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&content)
    }

    /// Notes ready for the generator.
    ///
    /// Drops notes with `tick_off <= tick_on`, clamps velocity to 0..=1 and
    /// sorts by onset then pitch.
    pub fn sanitized_notes(&self) -> Vec<SourceNote> {
        let mut notes: Vec<SourceNote> = self
            .notes
            .iter()
            .filter(|n| n.duration_ticks() > 0)
            .map(|n| SourceNote {
                velocity: if n.velocity.is_nan() { 0.0 } else { n.velocity.clamp(0.0, 1.0) },
                ..n.clone()
            })
            .collect();

        let dropped = self.notes.len() - notes.len();
        if dropped > 0 {
            warn!("Dropped {} note(s) without a positive duration", dropped);
        }

        notes.sort_by_key(|n| (n.tick_on, n.midi_note));
        notes
    }

    pub fn tempo_map(&self) -> Result<TempoMap, FretError> {
        TempoMap::from_tempo_events(self.ticks_per_quarter, &self.tempo)
    }

    /// The profile to play at: inline profile, else the named preset, else Medium.
    pub fn profile(&self) -> Result<DifficultyProfile, FretError> {
        if let Some(profile) = &self.profile {
            return Ok(profile.clone());
        }
        match &self.difficulty {
            Some(name) => Ok(name.parse::<Difficulty>()?.profile()),
            None => Ok(DifficultyProfile::medium()),
        }
    }

    pub fn approach_threshold_ticks(&self) -> u32 {
        self.approach_threshold_ticks.unwrap_or(self.ticks_per_quarter / 4)
    }
}
