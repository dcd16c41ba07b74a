//! The gating update function

use super::types::{PlayState, RuntimeState, Transition, UpdateOptions, UpdateResult};
use crate::generator::TargetNote;

/// Advance the session by one frame.
///
/// Pure: the input state is never modified and the same inputs always give
/// the same result. The host moves the timeline with
/// [`RuntimeState::at_tick`] before calling.
///
/// # Transitions
/// | From | Condition | To | Transition |
/// |------|-----------|----|------------|
/// | Finished | always | Finished | `None` |
/// | Playing / Waiting | no target left | Finished | `Finished` |
/// | Playing | approach reached | WaitingForHit | `EnteredWaiting` |
/// | Playing | valid hit before approach | Playing, next target | `ValidatedHit` |
/// | Waiting | valid hit | Playing, next target | `ValidatedHit` |
/// | Waiting | gating timeout elapsed | Playing, next target | `TimeoutMiss` |
///
/// # Example
/// ```rust
/// use fretgate::runtime::{update, PlayState, RuntimeState, Transition, UpdateOptions};
/// use fretgate::TargetNote;
///
/// let targets = vec![TargetNote {
///     id: 0, tick: 480, duration_ticks: 240,
///     string: 6, fret: 0, finger: 0, expected_midi: 40, source_midi: Some(40),
/// }];
/// let options = UpdateOptions { approach_threshold_ticks: 60, ..UpdateOptions::default() };
///
/// let state = RuntimeState::new().at_tick(420);
/// let result = update(&state, &targets, 0.4375, false, &options);
/// assert_eq!(result.transition, Transition::EnteredWaiting);
/// assert_eq!(result.state.current_tick, 480);
///
/// let result = update(&result.state, &targets, 0.6, true, &options);
/// assert_eq!(result.transition, Transition::ValidatedHit);
/// assert_eq!(result.state.state, PlayState::Playing);
/// assert_eq!(result.state.active_target_index, 1);
/// ```
pub fn update<'a>(
    state: &RuntimeState,
    targets: &'a [TargetNote],
    now_seconds: f64,
    is_hit_valid: bool,
    options: &UpdateOptions,
) -> UpdateResult<'a> {
    if state.state == PlayState::Finished {
        return unchanged(state);
    }

    let Some(target) = targets.get(state.active_target_index) else {
        if !options.finish_when_no_targets {
            return unchanged(state);
        }
        return UpdateResult {
            state: RuntimeState {
                state: PlayState::Finished,
                waiting_target_id: None,
                waiting_started_at_s: None,
                ..state.clone()
            },
            transition: Transition::Finished,
            target: None,
        };
    };

    match state.state {
        PlayState::Playing => {
            if approach_reached(state, target, options) {
                let current_tick = if options.song_clock.is_some() {
                    state.current_tick
                } else {
                    target.tick
                };
                return UpdateResult {
                    state: RuntimeState {
                        state: PlayState::WaitingForHit,
                        current_tick,
                        active_target_index: state.active_target_index,
                        waiting_target_id: Some(target.id),
                        waiting_started_at_s: Some(now_seconds),
                    },
                    transition: Transition::EnteredWaiting,
                    target: Some(target),
                };
            }
            if is_hit_valid {
                return advanced(state, state.current_tick, Transition::ValidatedHit, target);
            }
            unchanged(state)
        }
        PlayState::WaitingForHit => {
            if is_hit_valid {
                return advanced(state, target.tick + 1, Transition::ValidatedHit, target);
            }
            if let (Some(timeout), Some(started)) =
                (options.gating_timeout_seconds, state.waiting_started_at_s)
            {
                if now_seconds - started >= timeout {
                    return advanced(state, state.current_tick, Transition::TimeoutMiss, target);
                }
            }
            unchanged(state)
        }
        PlayState::Finished => unchanged(state),
    }
}

fn approach_reached(state: &RuntimeState, target: &TargetNote, options: &UpdateOptions) -> bool {
    let by_tick = state.current_tick >= target.tick - options.approach_threshold_ticks as i64;
    let by_song_time = options
        .song_clock
        .map_or(false, |clock| {
            clock.song_time_seconds >= clock.target_time_seconds - options.late_hit_window_seconds
        });
    by_tick || by_song_time
}

fn advanced<'a>(
    state: &RuntimeState,
    current_tick: i64,
    transition: Transition,
    target: &'a TargetNote,
) -> UpdateResult<'a> {
    UpdateResult {
        state: RuntimeState {
            state: PlayState::Playing,
            current_tick,
            active_target_index: state.active_target_index + 1,
            waiting_target_id: None,
            waiting_started_at_s: None,
        },
        transition,
        target: Some(target),
    }
}

fn unchanged<'a>(state: &RuntimeState) -> UpdateResult<'a> {
    UpdateResult {
        state: state.clone(),
        transition: Transition::None,
        target: None,
    }
}
