//! # Tempo Map
//!
//! Converts between symbolic tick positions and wall-clock seconds under a
//! piecewise-constant tempo.
//!
//! ## Segments
//! A map owns a tick-ordered list of [`TempoSegment`]s. The first segment
//! always starts at tick 0; each later segment starts where a tempo change
//! occurs and records the elapsed seconds at that point, accumulated with the
//! tempo of the segment before it.
//!
//! ## Conversion
//! - One quarter note lasts `60 / bpm` seconds, i.e. `microseconds_per_quarter / 1e6`
//! - `ticks_per_quarter` ticks make one quarter note
//! - Positions outside the mapped range extrapolate linearly from the nearest
//!   segment, so negative ticks give negative seconds. Callers clamp.
//!
//! ## Example
//! ```rust
//! use fretgate::{TempoEvent, TempoMap};
//!
//! // 120 BPM for the first bar, then 60 BPM
//! let map = TempoMap::from_tempo_events(480, &[
//!     TempoEvent { tick: 0, bpm: 120.0 },
//!     TempoEvent { tick: 1920, bpm: 60.0 },
//! ])?;
//!
//! assert_eq!(map.tick_to_seconds(1920), 2.0);
//! assert_eq!(map.tick_to_seconds(2400), 3.0);
//! assert_eq!(map.seconds_to_tick(3.0), 2400);
//! # Ok::<(), fretgate::FretError>(())
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::FretError;

/// Tempo used when the event list has nothing at tick 0.
pub const DEFAULT_BPM: f64 = 120.0;

const MICROS_PER_MINUTE: f64 = 60_000_000.0;
const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// A tempo change as reported by the MIDI parser.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoEvent {
    pub tick: i64,
    pub bpm: f64,
}

/// One constant-tempo stretch of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TempoSegment {
    pub start_tick: i64,
    pub start_seconds: f64,
    pub microseconds_per_quarter: f64,
}

impl TempoSegment {
    fn ticks_to_seconds(&self, ticks: f64, ticks_per_quarter: u32) -> f64 {
        ticks * self.microseconds_per_quarter / (MICROS_PER_SECOND * ticks_per_quarter as f64)
    }

    fn seconds_to_ticks(&self, seconds: f64, ticks_per_quarter: u32) -> f64 {
        seconds * MICROS_PER_SECOND * ticks_per_quarter as f64 / self.microseconds_per_quarter
    }

    pub fn bpm(&self) -> f64 {
        MICROS_PER_MINUTE / self.microseconds_per_quarter
    }
}

/// Immutable tick ↔ seconds mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct TempoMap {
    ticks_per_quarter: u32,
    segments: Vec<TempoSegment>,
}

impl TempoMap {
    /// Build a map from unordered tempo events.
    ///
    /// Events are sorted by tick. If none sits at tick 0 a 120 BPM event is
    /// synthesized there. Several events on the same tick collapse to the
    /// last one given.
    ///
    /// # Errors
    /// [`FretError::Tempo`] for a zero `ticks_per_quarter`, a negative event
    /// tick, or a BPM that is not a positive finite number.
    pub fn from_tempo_events(
        ticks_per_quarter: u32,
        events: &[TempoEvent],
    ) -> Result<Self, FretError> {
        if ticks_per_quarter == 0 {
            return Err(FretError::Tempo("ticks_per_quarter must be positive".to_string()));
        }

        let mut sorted = events.to_vec();
        for event in &sorted {
            if event.tick < 0 {
                return Err(FretError::Tempo(format!(
                    "tempo event at negative tick {}",
                    event.tick
                )));
            }
            if !event.bpm.is_finite() || event.bpm <= 0.0 {
                return Err(FretError::Tempo(format!(
                    "tempo event at tick {} has invalid bpm {}",
                    event.tick, event.bpm
                )));
            }
        }
        // Stable, so same-tick events keep their input order
        sorted.sort_by_key(|e| e.tick);
        if sorted.first().map_or(true, |e| e.tick != 0) {
            sorted.insert(0, TempoEvent { tick: 0, bpm: DEFAULT_BPM });
        }

        let mut segments: Vec<TempoSegment> = Vec::with_capacity(sorted.len());
        for event in &sorted {
            let microseconds_per_quarter = MICROS_PER_MINUTE / event.bpm;
            match segments.last_mut() {
                Some(last) if last.start_tick == event.tick => {
                    last.microseconds_per_quarter = microseconds_per_quarter;
                }
                Some(last) => {
                    let elapsed = last
                        .ticks_to_seconds((event.tick - last.start_tick) as f64, ticks_per_quarter);
                    let start_seconds = last.start_seconds + elapsed;
                    segments.push(TempoSegment {
                        start_tick: event.tick,
                        start_seconds,
                        microseconds_per_quarter,
                    });
                }
                None => segments.push(TempoSegment {
                    start_tick: event.tick,
                    start_seconds: 0.0,
                    microseconds_per_quarter,
                }),
            }
        }

        debug!(
            "Tempo map built: {} segment(s) at {} ticks per quarter",
            segments.len(),
            ticks_per_quarter
        );

        Ok(Self {
            ticks_per_quarter,
            segments,
        })
    }

    /// A single-tempo map.
    pub fn constant(ticks_per_quarter: u32, bpm: f64) -> Result<Self, FretError> {
        Self::from_tempo_events(ticks_per_quarter, &[TempoEvent { tick: 0, bpm }])
    }

    pub fn ticks_per_quarter(&self) -> u32 {
        self.ticks_per_quarter
    }

    pub fn segments(&self) -> &[TempoSegment] {
        &self.segments
    }

    pub fn tick_to_seconds(&self, tick: i64) -> f64 {
        let segment = self.segment_for_tick(tick);
        let offset = (tick - segment.start_tick) as f64;
        segment.start_seconds + segment.ticks_to_seconds(offset, self.ticks_per_quarter)
    }

    pub fn seconds_to_tick(&self, seconds: f64) -> i64 {
        let segment = self
            .segments
            .iter()
            .rev()
            .find(|s| s.start_seconds <= seconds)
            .unwrap_or(&self.segments[0]);
        let ticks =
            segment.seconds_to_ticks(seconds - segment.start_seconds, self.ticks_per_quarter);
        segment.start_tick + ticks.round() as i64
    }

    /// Tempo in effect at `tick`.
    pub fn bpm_at(&self, tick: i64) -> f64 {
        self.segment_for_tick(tick).bpm()
    }

    // Last segment starting at or before `tick`, first segment otherwise
    fn segment_for_tick(&self, tick: i64) -> &TempoSegment {
        self.segments
            .iter()
            .rev()
            .find(|s| s.start_tick <= tick)
            .unwrap_or(&self.segments[0])
    }
}
