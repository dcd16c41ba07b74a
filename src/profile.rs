//! # Difficulty Profiles
//!
//! A [`DifficultyProfile`] restricts which strings, frets and fingers the
//! generator may use, how far a note may be bent to fit those restrictions,
//! and how densely targets are laid out.
//!
//! ## Presets
//! | Preset | Strings | Frets | Tolerance | Polyphony | Pacing | Gating timeout |
//! |--------|---------|-------|-----------|-----------|--------|----------------|
//! | Easy   | 4 5 6   | 0-5   | 2         | 1         | 1.0 s  | 3.0 s          |
//! | Medium | 1-6     | 0-12  | 1         | 1         | 0.4 s  | 2.0 s          |
//! | Hard   | 1-6     | 0-19  | 0         | 2         | none   | 1.0 s          |
//!
//! ## YAML Form
//! Profiles read from configuration use kebab-case keys:
//!
//! ```rust
//! use fretgate::{DifficultyProfile, FretSet};
//!
//! let profile = DifficultyProfile::from_yaml(r#"
//! allowed-strings: [3, 2, 1]
//! allowed-frets: { list: [0, 2, 5] }
//! allowed-fingers: [0, 1, 2, 3]
//! pitch-tolerance-semitones: 1
//! pacing: { notes-per-minute: 90 }
//! "#)?;
//!
//! assert_eq!(profile.allowed_frets, FretSet::List(vec![0, 2, 5]));
//! assert_eq!(profile.max_simultaneous_notes, 1);
//! assert!(profile.prefer_open_strings);
//! # Ok::<(), fretgate::FretError>(())
//! ```
//!
//! Validation happens when a generator is built from the profile, so a
//! profile value may be assembled field by field first.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FretError;

/// Highest fret any profile may name.
pub const MAX_FRET: u8 = 24;

/// Number of strings on the instrument.
pub const STRING_COUNT: u8 = 6;

/// Highest finger number (1 = index .. 4 = little finger, 0 = open string).
pub const MAX_FINGER: u8 = 4;

/// Frets a profile allows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FretSet {
    /// Every fret from `min` to `max` inclusive
    Range { min: u8, max: u8 },
    /// An explicit, possibly non-contiguous list
    List(Vec<u8>),
}

impl FretSet {
    pub fn contains(&self, fret: u8) -> bool {
        match self {
            FretSet::Range { min, max } => (*min..=*max).contains(&fret),
            FretSet::List(frets) => frets.contains(&fret),
        }
    }

    /// Allowed frets in ascending order, without duplicates.
    pub fn frets(&self) -> Vec<u8> {
        match self {
            FretSet::Range { min, max } => (*min..=*max).collect(),
            FretSet::List(frets) => {
                let mut sorted = frets.clone();
                sorted.sort_unstable();
                sorted.dedup();
                sorted
            }
        }
    }
}

/// Pacing hint: how sparse the generated sequence should be.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pacing {
    SecondsPerNote(f64),
    NotesPerMinute(f64),
}

impl Pacing {
    /// Minimum gap between consecutive targets, in seconds.
    pub fn min_gap_seconds(&self) -> f64 {
        match *self {
            Pacing::SecondsPerNote(s) => s,
            Pacing::NotesPerMinute(n) => 60.0 / n,
        }
    }
}

/// Named presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = FretError;

    /// Case-insensitive preset name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(FretError::Config(format!("Unknown difficulty '{}'", s))),
        }
    }
}

impl Difficulty {
    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile::easy(),
            Difficulty::Medium => DifficultyProfile::medium(),
            Difficulty::Hard => DifficultyProfile::hard(),
        }
    }
}

fn default_max_simultaneous() -> u8 {
    1
}

fn default_prefer_open() -> bool {
    true
}

/// Playability constraints for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DifficultyProfile {
    /// Strings in preference order (1 = high E .. 6 = low E)
    pub allowed_strings: Vec<u8>,
    pub allowed_frets: FretSet,
    pub allowed_fingers: Vec<u8>,
    #[serde(default)]
    pub pitch_tolerance_semitones: u8,
    #[serde(default = "default_max_simultaneous")]
    pub max_simultaneous_notes: u8,
    #[serde(default)]
    pub pacing: Option<Pacing>,
    #[serde(default = "default_prefer_open")]
    pub prefer_open_strings: bool,
    #[serde(default)]
    pub gating_timeout_seconds: Option<f64>,
}

impl DifficultyProfile {
    pub fn easy() -> Self {
        Self {
            allowed_strings: vec![4, 5, 6],
            allowed_frets: FretSet::Range { min: 0, max: 5 },
            allowed_fingers: vec![0, 1, 2, 3, 4],
            pitch_tolerance_semitones: 2,
            max_simultaneous_notes: 1,
            pacing: Some(Pacing::SecondsPerNote(1.0)),
            prefer_open_strings: true,
            gating_timeout_seconds: Some(3.0),
        }
    }

    pub fn medium() -> Self {
        Self {
            allowed_strings: vec![1, 2, 3, 4, 5, 6],
            allowed_frets: FretSet::Range { min: 0, max: 12 },
            allowed_fingers: vec![0, 1, 2, 3, 4],
            pitch_tolerance_semitones: 1,
            max_simultaneous_notes: 1,
            pacing: Some(Pacing::SecondsPerNote(0.4)),
            prefer_open_strings: true,
            gating_timeout_seconds: Some(2.0),
        }
    }

    pub fn hard() -> Self {
        Self {
            allowed_strings: vec![1, 2, 3, 4, 5, 6],
            allowed_frets: FretSet::Range { min: 0, max: 19 },
            allowed_fingers: vec![0, 1, 2, 3, 4],
            pitch_tolerance_semitones: 0,
            max_simultaneous_notes: 2,
            pacing: None,
            prefer_open_strings: false,
            gating_timeout_seconds: Some(1.0),
        }
    }

    /// Parse a profile from YAML. The result is not yet validated.
    pub fn from_yaml(content: &str) -> Result<Self, FretError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Reject profiles that are out of range or can never yield a playable note.
    pub fn validate(&self) -> Result<(), FretError> {
        if self.allowed_strings.is_empty() {
            return Err(invalid("allowed_strings", "at least one string is required".to_string()));
        }
        for (i, &string) in self.allowed_strings.iter().enumerate() {
            if !(1..=STRING_COUNT).contains(&string) {
                return Err(invalid(
                    "allowed_strings",
                    format!("string {} is outside 1-{}", string, STRING_COUNT),
                ));
            }
            if self.allowed_strings[..i].contains(&string) {
                return Err(invalid(
                    "allowed_strings",
                    format!("string {} is listed twice", string),
                ));
            }
        }

        match &self.allowed_frets {
            FretSet::Range { min, max } => {
                if min > max {
                    return Err(invalid(
                        "allowed_frets",
                        format!("min fret {} is above max fret {}", min, max),
                    ));
                }
                if *max > MAX_FRET {
                    return Err(invalid(
                        "allowed_frets",
                        format!("fret {} is above {}", max, MAX_FRET),
                    ));
                }
            }
            FretSet::List(frets) => {
                if frets.is_empty() {
                    return Err(invalid("allowed_frets", "fret list is empty".to_string()));
                }
                if let Some(fret) = frets.iter().find(|&&f| f > MAX_FRET) {
                    return Err(invalid(
                        "allowed_frets",
                        format!("fret {} is above {}", fret, MAX_FRET),
                    ));
                }
            }
        }

        if self.allowed_fingers.is_empty() {
            return Err(invalid("allowed_fingers", "at least one finger is required".to_string()));
        }
        if let Some(finger) = self.allowed_fingers.iter().find(|&&f| f > MAX_FINGER) {
            return Err(invalid(
                "allowed_fingers",
                format!("finger {} is outside 0-{}", finger, MAX_FINGER),
            ));
        }
        // Only finger 0 means only open strings are playable
        if !self.has_fretting_finger() && !self.allowed_frets.contains(0) {
            return Err(invalid(
                "allowed_fingers",
                "only the open-string finger is allowed but fret 0 is not".to_string(),
            ));
        }

        if !(1..=2).contains(&self.max_simultaneous_notes) {
            return Err(invalid(
                "max_simultaneous_notes",
                format!("{} is not 1 or 2", self.max_simultaneous_notes),
            ));
        }

        if let Some(pacing) = self.pacing {
            let value = match pacing {
                Pacing::SecondsPerNote(v) | Pacing::NotesPerMinute(v) => v,
            };
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid("pacing", format!("{} must be a positive number", value)));
            }
        }

        if let Some(timeout) = self.gating_timeout_seconds {
            if !timeout.is_finite() || timeout <= 0.0 {
                return Err(invalid(
                    "gating_timeout_seconds",
                    format!("{} must be a positive number", timeout),
                ));
            }
        }

        Ok(())
    }

    /// Whether any finger other than the open-string marker is allowed.
    pub fn has_fretting_finger(&self) -> bool {
        self.allowed_fingers.iter().any(|&f| f >= 1)
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::medium()
    }
}

fn invalid(field: &'static str, message: String) -> FretError {
    FretError::Profile { field, message }
}
