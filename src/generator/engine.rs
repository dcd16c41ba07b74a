//! Target note generation engine
//!
//! Reduces a polyphonic source-note stream to a sequence of fretboard
//! targets that a difficulty profile permits.

use log::{debug, info};

use crate::error::FretError;
use crate::profile::{DifficultyProfile, MAX_FINGER};
use crate::tempo::TempoMap;

use super::fretboard::{Fretboard, MatchKind, Position};
use super::types::{GeneratorOptions, RepresentativePolicy, SourceNote, TargetNote};

// Slack for comparing onset gaps computed in floating point
const PACING_EPSILON: f64 = 1e-9;

/// A position with its finger assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    string: u8,
    fret: u8,
    finger: u8,
    pitch: u8,
}

/// Generator bound to a validated profile.
///
/// Construction fails fast on a contradictory profile; generation itself
/// never fails and silently drops notes that cannot be placed.
///
/// # Example
/// ```rust
/// use fretgate::{
///     DifficultyProfile, FretSet, GeneratorOptions, SourceNote, TargetNoteGenerator, TempoMap,
/// };
///
/// let profile = DifficultyProfile {
///     allowed_strings: vec![6],
///     allowed_frets: FretSet::Range { min: 0, max: 12 },
///     allowed_fingers: vec![0, 1, 2, 3, 4],
///     pitch_tolerance_semitones: 0,
///     max_simultaneous_notes: 1,
///     pacing: None,
///     prefer_open_strings: true,
///     gating_timeout_seconds: None,
/// };
/// let generator = TargetNoteGenerator::new(profile, GeneratorOptions::default())?;
/// let tempo = TempoMap::constant(480, 120.0)?;
///
/// let targets = generator.generate(&[SourceNote::new(0, 480, 52)], &tempo);
///
/// assert_eq!(targets[0].string, 6);
/// assert_eq!(targets[0].fret, 12);
/// assert_eq!(targets[0].expected_midi, 52);
/// # Ok::<(), fretgate::FretError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TargetNoteGenerator {
    profile: DifficultyProfile,
    options: GeneratorOptions,
    fretboard: Fretboard,
    /// Allowed fingers other than the open-string marker, ascending
    fretting_fingers: Vec<u8>,
}

impl TargetNoteGenerator {
    pub fn new(profile: DifficultyProfile, options: GeneratorOptions) -> Result<Self, FretError> {
        let fretboard = Fretboard::new(&profile, &options.tuning)?;
        let mut fretting_fingers: Vec<u8> = profile
            .allowed_fingers
            .iter()
            .copied()
            .filter(|&f| f >= 1)
            .collect();
        fretting_fingers.sort_unstable();
        fretting_fingers.dedup();

        Ok(Self {
            profile,
            options,
            fretboard,
            fretting_fingers,
        })
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    /// Generate targets in ascending tick order.
    ///
    /// # Pipeline
    /// 1. Drop notes with `tick_off <= tick_on`, sort by `(tick_on, midi_note)`
    /// 2. Group notes starting within the cluster window
    /// 3. Skip clusters closer than the profile's pacing gap to the previous target
    /// 4. Pick up to `max_simultaneous_notes` representatives per cluster
    /// 5. Place each on the fretboard, assign a finger, avoid same fret/finger repeats
    pub fn generate(&self, notes: &[SourceNote], tempo: &TempoMap) -> Vec<TargetNote> {
        let mut sorted: Vec<&SourceNote> =
            notes.iter().filter(|n| n.tick_off > n.tick_on).collect();
        if sorted.len() < notes.len() {
            debug!(
                "Skipped {} note(s) without positive duration",
                notes.len() - sorted.len()
            );
        }
        sorted.sort_by_key(|n| (n.tick_on, n.midi_note));

        let window = self
            .options
            .cluster_window_ticks
            .unwrap_or(tempo.ticks_per_quarter() / 16) as i64;
        let min_gap = self.profile.pacing.map(|p| p.min_gap_seconds());

        let mut targets: Vec<TargetNote> = Vec::new();
        let mut previous: Option<Placement> = None;
        let mut last_onset_seconds: Option<f64> = None;
        let mut dropped = 0usize;
        let mut paced_out = 0usize;

        let mut i = 0;
        while i < sorted.len() {
            let cluster_tick = sorted[i].tick_on;
            let mut end = i;
            while end < sorted.len() && sorted[end].tick_on - cluster_tick <= window {
                end += 1;
            }
            let cluster = &sorted[i..end];
            i = end;

            let onset_seconds = tempo.tick_to_seconds(cluster_tick);
            if let (Some(gap), Some(last)) = (min_gap, last_onset_seconds) {
                if onset_seconds - last < gap - PACING_EPSILON {
                    paced_out += cluster.len();
                    continue;
                }
            }

            // Voices already placed in this cluster
            let mut voices: Vec<Placement> = Vec::new();
            for note in self.representatives(cluster) {
                let Some((kind, candidates)) = self
                    .fretboard
                    .candidates(note.midi_note, self.profile.pitch_tolerance_semitones)
                else {
                    debug!(
                        "Dropped note {} at tick {}: no reachable position",
                        note.midi_note, note.tick_on
                    );
                    dropped += 1;
                    continue;
                };
                let Some(placement) = self.choose(&candidates, previous, &voices) else {
                    debug!(
                        "Dropped note {} at tick {}: no free string or pitch",
                        note.midi_note, note.tick_on
                    );
                    dropped += 1;
                    continue;
                };
                if kind != MatchKind::Exact {
                    debug!(
                        "Moved note {} at tick {} to {} ({:?} match)",
                        note.midi_note, note.tick_on, placement.pitch, kind
                    );
                }

                targets.push(TargetNote {
                    id: targets.len() as u32,
                    tick: cluster_tick,
                    duration_ticks: note.duration_ticks(),
                    string: placement.string,
                    fret: placement.fret,
                    finger: placement.finger,
                    expected_midi: placement.pitch,
                    source_midi: Some(note.midi_note),
                });
                voices.push(placement);
                previous = Some(placement);
                last_onset_seconds = Some(onset_seconds);
            }
        }

        info!(
            "Generated {} target(s) from {} source note(s): {} unplaceable, {} thinned by pacing",
            targets.len(),
            notes.len(),
            dropped,
            paced_out
        );
        targets
    }

    /// Up to `max_simultaneous_notes` distinct pitches, in policy order.
    /// Equal pitches resolve to the earliest note of the cluster.
    fn representatives<'a>(&self, cluster: &[&'a SourceNote]) -> Vec<&'a SourceNote> {
        let mut ordered: Vec<&'a SourceNote> = cluster.to_vec();
        match self.options.representative_policy {
            RepresentativePolicy::Highest => {
                ordered.sort_by(|a, b| b.midi_note.cmp(&a.midi_note))
            }
            RepresentativePolicy::Lowest => {
                ordered.sort_by(|a, b| a.midi_note.cmp(&b.midi_note))
            }
        }
        ordered.dedup_by_key(|n| n.midi_note);
        ordered.truncate(self.profile.max_simultaneous_notes as usize);
        ordered
    }

    /// Pick the first candidate in ergonomic order, unless it repeats the
    /// previous target's fret and finger and an alternative exists.
    ///
    /// Candidates on a string or pitch already taken by `voices` are skipped.
    fn choose(
        &self,
        candidates: &[Position],
        previous: Option<Placement>,
        voices: &[Placement],
    ) -> Option<Placement> {
        let placements: Vec<Placement> = candidates
            .iter()
            .filter(|p| {
                !voices
                    .iter()
                    .any(|v| v.string == p.string || v.pitch == p.pitch)
            })
            .filter_map(|p| self.place(p))
            .collect();
        let first = *placements.first()?;

        let Some(prev) = previous else {
            return Some(first);
        };
        if first.fret != prev.fret || first.finger != prev.finger {
            return Some(first);
        }

        if let Some(other_fret) = placements.iter().find(|p| p.fret != prev.fret) {
            return Some(*other_fret);
        }
        // An open string takes no finger, so only the repeat is left
        if first.fret == 0 {
            return Some(first);
        }
        let ideal = ideal_finger(first.fret);
        let other_finger = self
            .fretting_fingers
            .iter()
            .copied()
            .filter(|&f| f != prev.finger)
            .min_by_key(|&f| (f.abs_diff(ideal), f));
        match other_finger {
            Some(finger) => Some(Placement { finger, ..first }),
            None => Some(first),
        }
    }

    fn place(&self, position: &Position) -> Option<Placement> {
        let finger = if position.fret == 0 {
            0
        } else {
            self.finger_for_fret(position.fret)?
        };
        Some(Placement {
            string: position.string,
            fret: position.fret,
            finger,
            pitch: position.pitch,
        })
    }

    /// Allowed finger closest to the fret's ideal finger, lower on ties.
    fn finger_for_fret(&self, fret: u8) -> Option<u8> {
        let ideal = ideal_finger(fret);
        self.fretting_fingers
            .iter()
            .copied()
            .min_by_key(|&f| (f.abs_diff(ideal), f))
    }
}

/// Higher frets lean toward higher fingers: fret 1 → index, fret 4 and up → little finger.
fn ideal_finger(fret: u8) -> u8 {
    fret.clamp(1, MAX_FINGER)
}

/// Validate `profile` and generate targets in one call.
///
/// # Errors
/// [`FretError::Profile`] if the profile is contradictory.
pub fn generate_targets(
    notes: &[SourceNote],
    profile: &DifficultyProfile,
    tempo: &TempoMap,
    options: &GeneratorOptions,
) -> Result<Vec<TargetNote>, FretError> {
    let generator = TargetNoteGenerator::new(profile.clone(), options.clone())?;
    Ok(generator.generate(notes, tempo))
}
