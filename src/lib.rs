pub mod chart;
pub mod error;
pub mod generator;
pub mod profile;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod tempo;

pub use chart::Chart;
pub use error::*;
pub use generator::{
    generate_targets, Fretboard, GeneratorOptions, MatchKind, Position, RepresentativePolicy,
    SourceNote, TargetNote, TargetNoteGenerator, Tuning,
};
pub use profile::{Difficulty, DifficultyProfile, FretSet, Pacing};
pub use runtime::{update, PlayState, RuntimeState, SongClock, Transition, UpdateOptions};
pub use scoring::{Rating, ScoreEvent, ScoreSummary};
pub use session::{ClockMode, Session};
pub use tempo::{TempoEvent, TempoMap};

/// Generate the target sequence for a chart.
/// This is the main entry point for the library.
pub fn compile_chart(chart: &Chart) -> Result<Vec<TargetNote>, FretError> {
    let tempo = chart.tempo_map()?;
    let profile = chart.profile()?;
    generate_targets(&chart.sanitized_notes(), &profile, &tempo, &GeneratorOptions::default())
}

/// Build a ready-to-drive session for a chart, gated with the chart's
/// approach threshold and its profile's timeout.
pub fn start_session(chart: &Chart, clock_mode: ClockMode) -> Result<Session, FretError> {
    let tempo = chart.tempo_map()?;
    let profile = chart.profile()?;
    let notes = chart.sanitized_notes();
    let targets = generate_targets(&notes, &profile, &tempo, &GeneratorOptions::default())?;
    let options = UpdateOptions::from_profile(&profile, chart.approach_threshold_ticks());
    Ok(Session::new(targets, tempo, options, clock_mode))
}
