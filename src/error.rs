//! # Error Types
//!
//! This module defines the error type shared by every fretgate component.
//!
//! Only genuine configuration or input defects are errors. A note that cannot
//! be placed on the fretboard is dropped by the generator, and the runtime
//! state machine is total over its inputs, so neither produces a `FretError`.
//!
//! ## Error Types
//! - `Profile` - A difficulty profile that is contradictory or out of range
//! - `Tempo` - Malformed tempo input (zero PPQ, non-positive BPM, negative tick)
//! - `Config` - Unparseable chart/profile YAML or an unknown preset name
//! - `Io` - A chart file that could not be read
//!
//! ## Usage
//! ```rust
//! use fretgate::{DifficultyProfile, FretError, TargetNoteGenerator, GeneratorOptions};
//!
//! let mut profile = DifficultyProfile::medium();
//! profile.allowed_strings.clear();
//!
//! match TargetNoteGenerator::new(profile, GeneratorOptions::default()) {
//!     Err(FretError::Profile { field, .. }) => assert_eq!(field, "allowed_strings"),
//!     _ => panic!("empty string set must be rejected"),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FretError {
    /// Invalid difficulty profile.
    ///
    /// Raised when a generator is constructed from a profile that can never
    /// yield a playable note, or that names values outside the instrument.
    ///
    /// # Example
    /// ```
    /// # use fretgate::FretError;
    /// let err = FretError::Profile {
    ///     field: "allowed_frets",
    ///     message: "min fret 7 is above max fret 3".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid profile field `allowed_frets`: min fret 7 is above max fret 3"
    /// );
    /// ```
    #[error("Invalid profile field `{field}`: {message}")]
    Profile { field: &'static str, message: String },

    /// Malformed tempo input.
    #[error("Invalid tempo map: {0}")]
    Tempo(String),

    /// Chart or profile configuration that could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// File read failure.
    #[error("Could not read '{path}': {message}")]
    Io { path: String, message: String },
}

impl From<serde_yaml::Error> for FretError {
    fn from(err: serde_yaml::Error) -> Self {
        FretError::Config(err.to_string())
    }
}
