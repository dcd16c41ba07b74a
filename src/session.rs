//! # Session
//!
//! The host loop around the runtime state machine: one [`Session::advance`]
//! call per frame samples time and input, runs [`update`], and appends a
//! [`ScoreEvent`] whenever a target resolves.
//!
//! A session is single-writer; drive it from one loop only. It holds no
//! resources, so stopping is just no longer calling `advance`.
//!
//! ## Example
//! ```rust
//! use fretgate::{ClockMode, Session, TargetNote, TempoMap, Transition, UpdateOptions};
//!
//! let tempo = TempoMap::constant(480, 120.0)?;
//! let targets = vec![TargetNote {
//!     id: 0, tick: 960, duration_ticks: 240,
//!     string: 5, fret: 0, finger: 0, expected_midi: 45, source_midi: Some(45),
//! }];
//! let options = UpdateOptions { approach_threshold_ticks: 48, ..UpdateOptions::default() };
//! let mut session = Session::new(targets, tempo, options, ClockMode::Ticks);
//!
//! assert_eq!(session.advance(0.95, 912, false), Transition::EnteredWaiting);
//! assert_eq!(session.advance(1.02, 912, true), Transition::ValidatedHit);
//! assert_eq!(session.advance(1.1, 1000, false), Transition::Finished);
//!
//! let summary = session.summary();
//! assert_eq!(summary.total_score, 100);
//! # Ok::<(), fretgate::FretError>(())
//! ```

use log::{debug, info};

use crate::generator::TargetNote;
use crate::runtime::{update, RuntimeState, SongClock, Transition, UpdateOptions};
use crate::scoring::{ScoreEvent, ScoreSummary};
use crate::tempo::TempoMap;

/// Which timing signal drives approach detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockMode {
    /// Ticks only; the highway freezes on the target while waiting
    #[default]
    Ticks,
    /// Song time as well, with the options' late-hit window
    SongTime,
}

#[derive(Debug, Clone)]
pub struct Session {
    targets: Vec<TargetNote>,
    tempo: TempoMap,
    options: UpdateOptions,
    clock_mode: ClockMode,
    state: RuntimeState,
    events: Vec<ScoreEvent>,
}

impl Session {
    pub fn new(
        targets: Vec<TargetNote>,
        tempo: TempoMap,
        options: UpdateOptions,
        clock_mode: ClockMode,
    ) -> Self {
        Self {
            targets,
            tempo,
            options,
            clock_mode,
            state: RuntimeState::new(),
            events: Vec::new(),
        }
    }

    /// Run one frame.
    ///
    /// `now_seconds` is song time, `tick` the host's timeline position and
    /// `hit` whether the player produced a valid hit this frame.
    pub fn advance(&mut self, now_seconds: f64, tick: i64, hit: bool) -> Transition {
        let state = self.state.at_tick(tick);
        let options = match self.clock_mode {
            ClockMode::Ticks => self.options.clone(),
            ClockMode::SongTime => UpdateOptions {
                song_clock: self.active_target_time().map(|target_time_seconds| SongClock {
                    song_time_seconds: now_seconds,
                    target_time_seconds,
                }),
                ..self.options.clone()
            },
        };

        let result = update(&state, &self.targets, now_seconds, hit, &options);
        let event = match (result.transition, result.target) {
            (Transition::ValidatedHit, Some(target)) => {
                let delta_ms = (now_seconds - self.target_time(target)) * 1000.0;
                Some(ScoreEvent::from_delta(target.id, delta_ms))
            }
            (Transition::TimeoutMiss, Some(target)) => {
                let waited = state
                    .waiting_started_at_s
                    .map_or(0.0, |started| now_seconds - started);
                Some(ScoreEvent::miss(target.id, waited * 1000.0))
            }
            _ => None,
        };

        if let Some(event) = event {
            debug!(
                "Target {} resolved: {:?} ({:+.1} ms, {} pts)",
                event.target_id, event.rating, event.delta_ms, event.points
            );
            self.events.push(event);
        }
        if result.transition == Transition::Finished {
            let summary = ScoreSummary::from_events(&self.events);
            info!(
                "Session finished: {} point(s), longest streak {}",
                summary.total_score, summary.longest_streak
            );
        }

        let transition = result.transition;
        self.state = result.state;
        transition
    }

    pub fn state(&self) -> &RuntimeState {
        &self.state
    }

    pub fn targets(&self) -> &[TargetNote] {
        &self.targets
    }

    pub fn tempo(&self) -> &TempoMap {
        &self.tempo
    }

    pub fn options(&self) -> &UpdateOptions {
        &self.options
    }

    pub fn events(&self) -> &[ScoreEvent] {
        &self.events
    }

    pub fn summary(&self) -> ScoreSummary {
        ScoreSummary::from_events(&self.events)
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Target currently gated or approaching.
    pub fn active_target(&self) -> Option<&TargetNote> {
        self.targets.get(self.state.active_target_index)
    }

    fn active_target_time(&self) -> Option<f64> {
        self.active_target().map(|t| self.target_time(t))
    }

    fn target_time(&self, target: &TargetNote) -> f64 {
        self.tempo.tick_to_seconds(target.tick)
    }
}
