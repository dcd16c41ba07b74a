//! # Generator Module
//!
//! Turn a raw, possibly polyphonic note stream into a sequence of targets a
//! player can fret under a difficulty profile.
//!
//! ## Sub-modules
//! - `types` - SourceNote, TargetNote, GeneratorOptions
//! - `fretboard` - Tuning and the pitch-to-position search
//! - `engine` - Clustering, placement, finger assignment
//!
//! ## Placement Rules
//!
//! ### Matching
//! 1. An exact pitch on an allowed string/fret always wins
//! 2. With a non-zero tolerance, the same pitch class an octave (or more) away
//! 3. Then the nearest pitch within `pitch_tolerance_semitones`
//! 4. Otherwise the note is dropped
//!
//! ### Tie-break
//! Lower frets first, then the order of `allowed_strings`. Open strings
//! always use finger 0.
//!
//! ### Fingers
//! Fret 1 → index finger, fret 2 → middle, fret 3 → ring, fret 4 and up →
//! little finger, snapped to the nearest allowed finger. A target never
//! repeats the previous target's fret and finger when another allowed
//! placement exists. An open string repeats only when no other fret can
//! play the note.
//!
//! ## Example
//! ```rust
//! use fretgate::{
//!     generate_targets, DifficultyProfile, FretSet, GeneratorOptions, SourceNote, TempoMap,
//! };
//!
//! let mut profile = DifficultyProfile::medium();
//! profile.allowed_strings = vec![6];
//! profile.allowed_frets = FretSet::List(vec![0, 2, 5]);
//! profile.pacing = None;
//!
//! let tempo = TempoMap::constant(480, 120.0)?;
//! let notes = [SourceNote::new(0, 240, 42)];
//! let targets = generate_targets(&notes, &profile, &tempo, &GeneratorOptions::default())?;
//!
//! assert_eq!(targets[0].fret, 2);
//! assert_eq!(targets[0].finger, 2);
//! # Ok::<(), fretgate::FretError>(())
//! ```

mod engine;
mod fretboard;
mod types;

#[cfg(test)]
mod tests;

pub use engine::{generate_targets, TargetNoteGenerator};
pub use fretboard::{Fretboard, MatchKind, Position, Tuning};
pub use types::{GeneratorOptions, RepresentativePolicy, SourceNote, TargetNote};
