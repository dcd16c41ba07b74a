//! Pitch-to-fretboard search
//!
//! Lists every (string, fret) position a profile permits and finds the ones
//! that sound a requested pitch, falling back to octave-equivalent and then
//! nearby pitches when the exact pitch is out of reach.

use crate::error::FretError;
use crate::profile::{DifficultyProfile, STRING_COUNT};

/// Open-string pitches, string 1 first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuning([u8; STRING_COUNT as usize]);

impl Tuning {
    /// E4 B3 G3 D3 A2 E2
    pub const STANDARD: Tuning = Tuning([64, 59, 55, 50, 45, 40]);

    /// `open[0]` is string 1 (highest), `open[5]` string 6 (lowest).
    pub fn new(open: [u8; STRING_COUNT as usize]) -> Self {
        Tuning(open)
    }

    /// Pitch of an open `string`, `None` outside 1-6.
    pub fn open_pitch(&self, string: u8) -> Option<u8> {
        let index = string.checked_sub(1)?;
        self.0.get(index as usize).copied()
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning::STANDARD
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub string: u8,
    pub fret: u8,
    pub pitch: u8,
}

/// How a pitch was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    /// Same pitch class, shifted by whole octaves
    Octave,
    /// Within the profile's semitone tolerance
    Nearest,
}

const MAX_OCTAVE_SHIFT: i32 = 10;

/// All playable positions of a profile, in ergonomic order.
#[derive(Debug, Clone)]
pub struct Fretboard {
    positions: Vec<Position>,
}

impl Fretboard {
    /// Positions are ordered by fret, then by the string's place in
    /// `allowed_strings`. Without `prefer_open_strings`, fretted positions
    /// come before open ones. Fretted positions are omitted entirely when the
    /// profile allows no fretting finger.
    ///
    /// # Errors
    /// [`FretError::Profile`] if the profile does not validate.
    pub fn new(profile: &DifficultyProfile, tuning: &Tuning) -> Result<Self, FretError> {
        profile.validate()?;
        let fretting = profile.has_fretting_finger();
        let mut positions = Vec::new();
        for fret in profile.allowed_frets.frets() {
            if fret > 0 && !fretting {
                continue;
            }
            for &string in &profile.allowed_strings {
                let Some(open) = tuning.open_pitch(string) else {
                    continue;
                };
                let pitch = open as u16 + fret as u16;
                if pitch > 127 {
                    continue;
                }
                positions.push(Position {
                    string,
                    fret,
                    pitch: pitch as u8,
                });
            }
        }
        if !profile.prefer_open_strings {
            positions.sort_by_key(|p| p.fret == 0);
        }
        Ok(Self { positions })
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Best-matching positions for `midi`, in ergonomic order.
    ///
    /// Exact matches always win. Octave-equivalent and nearest-pitch
    /// fallbacks are only considered with a non-zero tolerance; the nearest
    /// octave and the smallest semitone distance are tried first.
    pub fn candidates(&self, midi: u8, tolerance: u8) -> Option<(MatchKind, Vec<Position>)> {
        let exact = self.at_distance(midi, |d| d == 0);
        if !exact.is_empty() {
            return Some((MatchKind::Exact, exact));
        }
        if tolerance == 0 {
            return None;
        }

        for octaves in 1..=MAX_OCTAVE_SHIFT {
            let shifted = self.at_distance(midi, |d| d.abs() == 12 * octaves);
            if !shifted.is_empty() {
                return Some((MatchKind::Octave, shifted));
            }
        }

        for distance in 1..=tolerance as i32 {
            let near = self.at_distance(midi, |d| d.abs() == distance);
            if !near.is_empty() {
                return Some((MatchKind::Nearest, near));
            }
        }
        None
    }

    fn at_distance(&self, midi: u8, accept: impl Fn(i32) -> bool) -> Vec<Position> {
        self.positions
            .iter()
            .filter(|p| accept(p.pitch as i32 - midi as i32))
            .copied()
            .collect()
    }
}
