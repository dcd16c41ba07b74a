//! # Runtime Module
//!
//! Gate live player input against a generated target sequence.
//!
//! ## Model
//! The host owns a [`RuntimeState`] and calls [`update`] once per frame with
//! the current time and whether the player produced a valid hit. Each call
//! returns a fresh state plus a [`Transition`] label; `ValidatedHit` and
//! `TimeoutMiss` are the points where the host records a score event.
//!
//! ## Clock Modes
//!
//! ### Tick mode
//! - Gating starts once `current_tick` is within `approach_threshold_ticks` of the target
//! - Entering the wait snaps `current_tick` to the target tick, freezing the highway
//!
//! ### Song-time mode
//! - Selected by supplying [`SongClock`] in the options
//! - Gating also starts once song time reaches `target_time - late_hit_window`
//! - Entering the wait leaves `current_tick` where the host put it
//!
//! ## Related Modules
//! - `generator` - Produces the TargetNote sequence
//! - `scoring` - Rates the hit/miss transitions
//! - `session` - Host loop wiring the three together

mod machine;
mod types;


pub use machine::update;
pub use types::{PlayState, RuntimeState, SongClock, Transition, UpdateOptions, UpdateResult};
