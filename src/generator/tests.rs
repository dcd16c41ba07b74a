use super::*;
use crate::error::FretError;
use crate::profile::{DifficultyProfile, FretSet, Pacing};
use crate::tempo::TempoMap;

fn profile(
    strings: Vec<u8>,
    frets: FretSet,
    fingers: Vec<u8>,
    tolerance: u8,
) -> DifficultyProfile {
    DifficultyProfile {
        allowed_strings: strings,
        allowed_frets: frets,
        allowed_fingers: fingers,
        pitch_tolerance_semitones: tolerance,
        max_simultaneous_notes: 1,
        pacing: None,
        prefer_open_strings: true,
        gating_timeout_seconds: None,
    }
}

fn all_fingers() -> Vec<u8> {
    vec![0, 1, 2, 3, 4]
}

fn unpaced(profile: DifficultyProfile) -> DifficultyProfile {
    DifficultyProfile {
        pacing: None,
        ..profile
    }
}

fn tempo() -> TempoMap {
    TempoMap::constant(480, 120.0).unwrap()
}

fn generate(notes: &[SourceNote], profile: DifficultyProfile) -> Vec<TargetNote> {
    let result = generate_targets(notes, &profile, &tempo(), &GeneratorOptions::default());
    assert!(result.is_ok());
    result.unwrap()
}

#[test]
fn test_exact_match_preferred_over_octave() {
    let notes = [SourceNote::new(0, 480, 52)];
    for tolerance in [0, 2, 12] {
        let p = profile(vec![6], FretSet::Range { min: 0, max: 12 }, all_fingers(), tolerance);
        let targets = generate(&notes, p);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].string, 6);
        assert_eq!(targets[0].fret, 12);
        assert_eq!(targets[0].expected_midi, 52);
        assert_eq!(targets[0].source_midi, Some(52));
    }
}

#[test]
fn test_open_string_uses_finger_zero() {
    let notes = [
        SourceNote::new(0, 240, 40),
        SourceNote::new(480, 720, 47),
        SourceNote::new(960, 1200, 45),
        SourceNote::new(1440, 1680, 64),
    ];
    let targets = generate(&notes, unpaced(DifficultyProfile::medium()));
    let placed: Vec<(u8, u8, u8)> = targets.iter().map(|t| (t.string, t.fret, t.finger)).collect();
    // open high E would repeat the open A's fret 0 / finger 0, so 64 moves to fret 5
    assert_eq!(placed, vec![(6, 0, 0), (5, 2, 2), (5, 0, 0), (2, 5, 4)]);
    for target in targets.iter().filter(|t| t.fret == 0) {
        assert_eq!(target.finger, 0);
    }
}

#[test]
fn test_open_strings_finger_zero_even_without_finger_zero_allowed() {
    let targets = generate(
        &[SourceNote::new(0, 240, 40)],
        profile(vec![6], FretSet::Range { min: 0, max: 5 }, vec![1, 2], 0),
    );
    assert_eq!(targets[0].fret, 0);
    assert_eq!(targets[0].finger, 0);
}

#[test]
fn test_non_contiguous_fret_list_respected() {
    // 42 = low E fret 2
    let targets = generate(
        &[SourceNote::new(0, 240, 42)],
        profile(vec![6], FretSet::List(vec![0, 2, 5]), all_fingers(), 1),
    );
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].fret, 2);
    assert_eq!(targets[0].expected_midi, 42);
}

#[test]
fn test_unlisted_fret_never_used_for_tolerance() {
    // 43 would be fret 3; only 42 (fret 2) and 45 (fret 5) are listed
    let targets = generate(
        &[SourceNote::new(0, 240, 43)],
        profile(vec![6], FretSet::List(vec![0, 2, 5]), all_fingers(), 1),
    );
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].fret, 2);
    assert_eq!(targets[0].expected_midi, 42);
    assert_eq!(targets[0].source_midi, Some(43));
}

#[test]
fn test_anti_repetition_consecutive_notes() {
    let notes = [SourceNote::new(0, 240, 42), SourceNote::new(480, 720, 44)];
    let p = profile(vec![6], FretSet::Range { min: 0, max: 8 }, vec![1, 2, 3, 4], 0);
    let targets = generate(&notes, p);
    assert_eq!(targets.len(), 2);
    assert_ne!(targets[0].fret, targets[1].fret);
    assert_ne!(targets[0].finger, targets[1].finger);
}

#[test]
fn test_anti_repetition_moves_repeated_pitch() {
    // 47 is fret 2 on the A string or fret 7 on low E
    let notes = [SourceNote::new(0, 240, 47), SourceNote::new(480, 720, 47)];
    let p = profile(vec![5, 6], FretSet::Range { min: 0, max: 8 }, all_fingers(), 0);
    let targets = generate(&notes, p);
    assert_eq!(targets.len(), 2);
    assert_eq!((targets[0].string, targets[0].fret, targets[0].finger), (5, 2, 2));
    assert_eq!((targets[1].string, targets[1].fret, targets[1].finger), (6, 7, 4));
    assert_eq!(targets[1].expected_midi, 47);
}

#[test]
fn test_repeated_open_string_moves_to_another_fret() {
    // 45 is the open A string or fret 5 on low E
    let notes = [SourceNote::new(0, 240, 45), SourceNote::new(480, 720, 45)];
    let p = profile(vec![5, 6], FretSet::Range { min: 0, max: 8 }, all_fingers(), 0);
    let targets = generate(&notes, p);
    assert_eq!(targets.len(), 2);
    assert_eq!((targets[0].string, targets[0].fret, targets[0].finger), (5, 0, 0));
    assert_eq!((targets[1].string, targets[1].fret, targets[1].finger), (6, 5, 4));
    assert_eq!(targets[1].expected_midi, 45);
}

#[test]
fn test_repeated_open_string_kept_without_alternative() {
    // 40 only sounds on the open low E string
    let notes = [SourceNote::new(0, 240, 40), SourceNote::new(480, 720, 40)];
    let p = profile(vec![6], FretSet::Range { min: 0, max: 5 }, all_fingers(), 0);
    let targets = generate(&notes, p);
    assert_eq!(targets.len(), 2);
    assert_eq!((targets[1].string, targets[1].fret, targets[1].finger), (6, 0, 0));
}

#[test]
fn test_anti_repetition_switches_finger_when_only_one_fret() {
    // Only fret 3 on string 6 sounds 43
    let notes = [SourceNote::new(0, 240, 43), SourceNote::new(480, 720, 43)];
    let p = profile(vec![6], FretSet::Range { min: 1, max: 5 }, vec![1, 2, 3, 4], 0);
    let targets = generate(&notes, p);
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].fret, 3);
    assert_eq!(targets[1].fret, 3);
    assert_eq!(targets[0].finger, 3);
    assert_ne!(targets[1].finger, 3);
}

#[test]
fn test_repeat_kept_when_no_alternative() {
    let notes = [SourceNote::new(0, 240, 43), SourceNote::new(480, 720, 43)];
    let p = profile(vec![6], FretSet::Range { min: 1, max: 5 }, vec![2], 0);
    let targets = generate(&notes, p);
    assert_eq!(targets.len(), 2);
    assert_eq!((targets[1].fret, targets[1].finger), (3, 2));
}

#[test]
fn test_finger_follows_fret() {
    let notes: Vec<SourceNote> = (1..=6u8)
        .map(|fret| {
            let tick = fret as i64 * 480;
            SourceNote::new(tick, tick + 240, 40 + fret)
        })
        .collect();
    let p = profile(vec![6], FretSet::Range { min: 0, max: 8 }, all_fingers(), 0);
    let targets = generate(&notes, p);
    let fingers: Vec<u8> = targets.iter().map(|t| t.finger).collect();
    assert_eq!(fingers, vec![1, 2, 3, 4, 4, 4]);
}

#[test]
fn test_finger_snaps_to_allowed_set() {
    let targets = generate(
        &[SourceNote::new(0, 240, 43)],
        profile(vec![6], FretSet::Range { min: 0, max: 5 }, vec![1, 2], 0),
    );
    assert_eq!(targets[0].fret, 3);
    assert_eq!(targets[0].finger, 2);
}

#[test]
fn test_unmappable_notes_dropped() {
    let notes = [
        SourceNote::new(0, 240, 20),
        SourceNote::new(480, 720, 41),
        SourceNote::new(960, 1200, 127),
    ];
    let p = profile(vec![6], FretSet::Range { min: 0, max: 5 }, all_fingers(), 0);
    let targets = generate(&notes, p);
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].expected_midi, 41);
    assert_eq!(targets[0].id, 0);
}

#[test]
fn test_octave_fallback_with_tolerance() {
    let targets = generate(
        &[SourceNote::new(0, 240, 55)],
        profile(vec![6], FretSet::Range { min: 0, max: 5 }, all_fingers(), 1),
    );
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].expected_midi, 43);
    assert_eq!(targets[0].source_midi, Some(55));
}

#[test]
fn test_highest_policy_picks_top_voice() {
    let notes = [
        SourceNote::new(0, 480, 40),
        SourceNote::new(0, 480, 47),
        SourceNote::new(10, 480, 52),
    ];
    let targets = generate(&notes, unpaced(DifficultyProfile::medium()));
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].source_midi, Some(52));
    assert_eq!(targets[0].tick, 0);
    assert_eq!(targets[0].duration_ticks, 470);
}

#[test]
fn test_lowest_policy_picks_bass() {
    let notes = [SourceNote::new(0, 480, 52), SourceNote::new(0, 960, 40)];
    let options = GeneratorOptions::with_policy(RepresentativePolicy::Lowest);
    let profile = unpaced(DifficultyProfile::medium());
    let targets = generate_targets(&notes, &profile, &tempo(), &options).unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].source_midi, Some(40));
    assert_eq!(targets[0].duration_ticks, 960);
}

#[test]
fn test_default_policy_is_highest() {
    assert_eq!(GeneratorOptions::default().representative_policy, RepresentativePolicy::Highest);
}

#[test]
fn test_notes_outside_cluster_window_are_separate() {
    // default window at 480 PPQ is 30 ticks
    let notes = [SourceNote::new(0, 240, 52), SourceNote::new(31, 240, 55)];
    let targets = generate(&notes, unpaced(DifficultyProfile::medium()));
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[1].tick, 31);
}

#[test]
fn test_two_note_polyphony_uses_distinct_strings() {
    let notes = [SourceNote::new(0, 480, 45), SourceNote::new(0, 480, 52)];
    let mut p = DifficultyProfile::hard();
    p.prefer_open_strings = true;
    let targets = generate(&notes, p);
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].tick, targets[1].tick);
    assert_ne!(targets[0].string, targets[1].string);
    assert_eq!(targets[0].expected_midi, 52);
    assert_eq!(targets[1].expected_midi, 45);
    assert_ne!(targets[0].id, targets[1].id);
}

#[test]
fn test_second_voice_avoids_first_voice_fret_and_finger() {
    // 52 takes D string fret 2; 47 would be A string fret 2 with the same finger
    let notes = [SourceNote::new(0, 480, 47), SourceNote::new(0, 480, 52)];
    let mut p = profile(vec![4, 5, 6], FretSet::Range { min: 0, max: 8 }, all_fingers(), 0);
    p.max_simultaneous_notes = 2;
    let targets = generate(&notes, p);
    assert_eq!(targets.len(), 2);
    assert_eq!((targets[0].string, targets[0].fret, targets[0].finger), (4, 2, 2));
    assert_eq!((targets[1].string, targets[1].fret, targets[1].finger), (6, 7, 4));
    assert_eq!(targets[1].expected_midi, 47);
    assert_eq!(targets[1].tick, 0);
}

#[test]
fn test_second_voice_skips_pitch_of_first_voice() {
    // 51 is one semitone from both 50 (already sounded) and 52
    let notes = [SourceNote::new(0, 480, 50), SourceNote::new(0, 480, 51)];
    let mut p = profile(vec![4, 5, 6], FretSet::List(vec![0, 2, 5, 7]), all_fingers(), 1);
    p.max_simultaneous_notes = 2;
    let options = GeneratorOptions::with_policy(RepresentativePolicy::Lowest);
    let targets = generate_targets(&notes, &p, &tempo(), &options).unwrap();
    assert_eq!(targets.len(), 2);
    assert_eq!((targets[0].string, targets[0].fret), (4, 0));
    assert_eq!((targets[1].string, targets[1].fret, targets[1].finger), (5, 7, 4));
    assert_eq!(targets[1].expected_midi, 52);
    assert_eq!(targets[1].source_midi, Some(51));
}

#[test]
fn test_second_voice_dropped_without_free_string() {
    let notes = [SourceNote::new(0, 480, 40), SourceNote::new(0, 480, 42)];
    let mut p = profile(vec![6], FretSet::Range { min: 0, max: 5 }, all_fingers(), 0);
    p.max_simultaneous_notes = 2;
    let targets = generate(&notes, p);
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].expected_midi, 42);
}

#[test]
fn test_pacing_thins_dense_passages() {
    // eighth notes at 120 BPM are 0.25 s apart
    let notes: Vec<SourceNote> = (0..8)
        .map(|i| SourceNote::new(i * 240, i * 240 + 200, 45))
        .collect();
    let mut p = profile(vec![5, 6], FretSet::Range { min: 0, max: 5 }, all_fingers(), 0);
    p.pacing = Some(Pacing::SecondsPerNote(0.5));
    let targets = generate(&notes, p.clone());
    assert_eq!(targets.iter().map(|t| t.tick).collect::<Vec<_>>(), vec![0, 480, 960, 1440]);

    p.pacing = Some(Pacing::NotesPerMinute(60.0));
    let targets = generate(&notes, p);
    assert_eq!(targets.iter().map(|t| t.tick).collect::<Vec<_>>(), vec![0, 960]);
}

#[test]
fn test_output_sorted_with_sequential_ids() {
    let notes = [
        SourceNote::new(960, 1200, 47),
        SourceNote::new(0, 240, 40),
        SourceNote::new(480, 720, 45),
    ];
    let targets = generate(&notes, unpaced(DifficultyProfile::medium()));
    assert_eq!(targets.iter().map(|t| t.tick).collect::<Vec<_>>(), vec![0, 480, 960]);
    assert_eq!(targets.iter().map(|t| t.id).collect::<Vec<_>>(), vec![0, 1, 2]);
}

#[test]
fn test_generation_is_deterministic() {
    let notes: Vec<SourceNote> = (0..32)
        .map(|i| SourceNote::new(i * 120, i * 120 + 100, 40 + ((i * 7) % 30) as u8))
        .collect();
    let first = generate(&notes, DifficultyProfile::medium());
    let second = generate(&notes, DifficultyProfile::medium());
    assert_eq!(first, second);
}

#[test]
fn test_zero_length_notes_skipped() {
    let notes = [SourceNote::new(0, 0, 40), SourceNote::new(480, 400, 45)];
    let targets = generate(&notes, DifficultyProfile::medium());
    assert!(targets.is_empty());
}

#[test]
fn test_contradictory_profile_fails_fast() {
    let result = TargetNoteGenerator::new(
        profile(vec![], FretSet::Range { min: 0, max: 5 }, vec![1], 0),
        GeneratorOptions::default(),
    );
    assert!(matches!(result, Err(FretError::Profile { field: "allowed_strings", .. })));

    let result = generate_targets(
        &[],
        &profile(vec![6], FretSet::Range { min: 5, max: 0 }, vec![1], 0),
        &tempo(),
        &GeneratorOptions::default(),
    );
    assert!(matches!(result, Err(FretError::Profile { field: "allowed_frets", .. })));
}

#[test]
fn test_custom_tuning() {
    // Drop D: low string down to D2
    let options = GeneratorOptions {
        tuning: Tuning::new([64, 59, 55, 50, 45, 38]),
        ..GeneratorOptions::default()
    };
    let p = profile(vec![6], FretSet::Range { min: 0, max: 5 }, all_fingers(), 0);
    let notes = [SourceNote::new(0, 240, 38)];
    let targets = generate_targets(&notes, &p, &tempo(), &options).unwrap();
    assert_eq!((targets[0].string, targets[0].fret), (6, 0));
}
