//! Runtime state machine type definitions

use serde::Serialize;

use crate::generator::TargetNote;
use crate::profile::DifficultyProfile;

/// Gating state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayState {
    /// Timeline is running, the next target has not been reached
    Playing,
    /// The next target has been reached; the timeline waits for a hit
    WaitingForHit,
    /// No targets remain
    Finished,
}

/// What an update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    None,
    EnteredWaiting,
    ValidatedHit,
    TimeoutMiss,
    Finished,
}

/// Session state, replaced wholesale by every update.
///
/// # Fields
/// - `state`: current gating state
/// - `current_tick`: timeline position as last supplied by the host (or snapped by an update)
/// - `active_target_index`: index of the next unresolved target
/// - `waiting_target_id`: id of the target being waited on
/// - `waiting_started_at_s`: host time at which waiting began
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeState {
    pub state: PlayState,
    pub current_tick: i64,
    pub active_target_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiting_target_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiting_started_at_s: Option<f64>,
}

impl RuntimeState {
    pub fn new() -> Self {
        Self {
            state: PlayState::Playing,
            current_tick: 0,
            active_target_index: 0,
            waiting_target_id: None,
            waiting_started_at_s: None,
        }
    }

    /// Copy of this state with the timeline moved to `tick`.
    pub fn at_tick(&self, tick: i64) -> Self {
        Self {
            current_tick: tick,
            ..self.clone()
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == PlayState::Finished
    }
}

impl Default for RuntimeState {
    fn default() -> Self {
        Self::new()
    }
}

/// Song-time reading for the active target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SongClock {
    pub song_time_seconds: f64,
    /// Nominal time of the active target
    pub target_time_seconds: f64,
}

/// Tuning knobs of the state machine.
///
/// Supplying `song_clock` switches approach detection to song time as well
/// and stops `EnteredWaiting` from snapping `current_tick` to the target.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOptions {
    /// Ticks before a target at which gating starts
    pub approach_threshold_ticks: u32,
    /// Unset means a waiting target only resolves through a hit
    pub gating_timeout_seconds: Option<f64>,
    /// When false, running out of targets leaves the state untouched
    pub finish_when_no_targets: bool,
    pub late_hit_window_seconds: f64,
    pub song_clock: Option<SongClock>,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            approach_threshold_ticks: 0,
            gating_timeout_seconds: None,
            finish_when_no_targets: true,
            late_hit_window_seconds: 0.0,
            song_clock: None,
        }
    }
}

impl UpdateOptions {
    /// Options carrying the profile's gating timeout.
    pub fn from_profile(profile: &DifficultyProfile, approach_threshold_ticks: u32) -> Self {
        Self {
            approach_threshold_ticks,
            gating_timeout_seconds: profile.gating_timeout_seconds,
            ..Self::default()
        }
    }
}

/// Result of one update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateResult<'a> {
    pub state: RuntimeState,
    pub transition: Transition,
    /// The target the transition concerns, if any
    pub target: Option<&'a TargetNote>,
}
