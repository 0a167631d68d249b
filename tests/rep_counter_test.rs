// ABOUTME: Integration tests for the repetition state machine
// ABOUTME: Validates full/partial classification, debounce, duration guards, and manual corrections
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]
#![allow(missing_docs)]

mod common;

use common::{drive_counter, squat_frame, squat_frame_with_confidence, sweep, FRAME_MS};
use pierre_motion::clock::ManualClock;
use pierre_motion::config::{ConfigError, MotionConfig, ThresholdProfile};
use pierre_motion::models::{ExerciseKind, Phase};
use pierre_motion::rep_counter::{RejectReason, RepCounter, RepOutcome};

fn squat_counter(profile: ThresholdProfile, clock: &ManualClock) -> RepCounter<ManualClock> {
    RepCounter::new(
        ExerciseKind::Squat,
        profile,
        &MotionConfig::default(),
        clock.clone(),
    )
    .unwrap()
}

fn squat_profile() -> ThresholdProfile {
    MotionConfig::default().exercises.squat
}

#[test]
fn test_single_squat_counts_one_full_rep() {
    let clock = ManualClock::new(0);
    let mut counter = squat_counter(squat_profile(), &clock);

    let angles = sweep(170.0, 90.0, 1200, FRAME_MS, 0);
    let (events, _) = drive_counter(&mut counter, &clock, &angles, 0, FRAME_MS);

    assert_eq!(events.len(), 1);
    let event = events[0];
    assert_eq!(event.outcome, RepOutcome::Full);
    assert_eq!(event.quality, Some(100.0));
    assert!(event.valley_angle < 100.0, "valley {}", event.valley_angle);
    assert_eq!(event.duration_ms, 594);
    assert!(!event.exceeded_max_duration);

    let state = counter.get_state();
    assert_eq!(state.total_reps, 1);
    assert_eq!(state.partial_reps, 0);
    assert_eq!(state.phase, Phase::Up);
    assert_eq!(state.last_rep_time_ms, Some(event.timestamp_ms));
}

#[test]
fn test_closure_resets_valley_and_peak() {
    let clock = ManualClock::new(0);
    let mut counter = squat_counter(squat_profile(), &clock);

    let mut closing = None;
    for (index, angle) in sweep(170.0, 90.0, 1200, FRAME_MS, 0).iter().enumerate() {
        clock.set(index as u64 * FRAME_MS);
        let result = counter.process_frame(&squat_frame(*angle));
        if result.last_event.is_some() {
            let state = counter.get_state();
            assert_eq!(state.valley_angle, 180.0);
            assert_eq!(state.peak_angle, 0.0);
            closing = Some(result);
            break;
        }
        assert!(result.angles.valley.unwrap() <= result.angles.primary);
    }

    let closing = closing.unwrap();
    assert!(closing.is_valid_rep_this_frame);
    assert_eq!(closing.current_phase, Phase::Up);
    assert_eq!(closing.angles.valley, Some(180.0));
    assert_eq!(closing.angles.peak, Some(0.0));
}

#[test]
fn test_consecutive_reps_accumulate() {
    let clock = ManualClock::new(0);
    let mut counter = squat_counter(squat_profile(), &clock);
    let angles = sweep(170.0, 90.0, 1200, FRAME_MS, 0);

    let (first, next) = drive_counter(&mut counter, &clock, &angles, 0, FRAME_MS);
    let (second, _) = drive_counter(&mut counter, &clock, &angles, next, FRAME_MS);

    assert_eq!(first.len() + second.len(), 2);
    assert_eq!(counter.get_state().total_reps, 2);

    let stats = counter.get_stats();
    assert_eq!(stats.valid_reps, 2);
    assert_eq!(stats.average_quality, Some(100.0));
    assert_eq!(stats.rejected_closures, 0);
}

#[test]
fn test_second_rep_inside_debounce_is_rejected() {
    let clock = ManualClock::new(0);
    let profile = ThresholdProfile {
        min_rep_duration_ms: 100,
        ..squat_profile()
    };
    let mut counter = squat_counter(profile, &clock);

    let (first, next) = drive_counter(&mut counter, &clock, &sweep(170.0, 90.0, 1200, 10, 0), 0, 10);
    let (second, _) = drive_counter(&mut counter, &clock, &sweep(170.0, 90.0, 300, 10, 0), next, 10);

    assert_eq!(first.len(), 1);
    assert!(first[0].is_full());
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].outcome, RepOutcome::Rejected(RejectReason::Debounce));
    assert_eq!(second[0].quality, None);
    assert_eq!(counter.get_state().total_reps, 1);
    assert_eq!(counter.get_stats().rejected_closures, 1);
    // A rejected closure still completes the phase
    assert_eq!(counter.get_state().phase, Phase::Up);
}

#[test]
fn test_second_rep_counts_without_debounce() {
    let clock = ManualClock::new(0);
    let profile = ThresholdProfile {
        min_rep_duration_ms: 100,
        debounce_ms: 0,
        ..squat_profile()
    };
    let mut counter = squat_counter(profile, &clock);

    let (_, next) = drive_counter(&mut counter, &clock, &sweep(170.0, 90.0, 1200, 10, 0), 0, 10);
    let (second, _) = drive_counter(&mut counter, &clock, &sweep(170.0, 90.0, 300, 10, 0), next, 10);

    assert_eq!(second.len(), 1);
    assert!(second[0].is_full());
    assert_eq!(counter.get_state().total_reps, 2);
}

#[test]
fn test_rep_shorter_than_minimum_is_rejected() {
    let clock = ManualClock::new(0);
    let mut counter = squat_counter(squat_profile(), &clock);

    let (events, _) = drive_counter(&mut counter, &clock, &sweep(170.0, 90.0, 300, 10, 0), 0, 10);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, RepOutcome::Rejected(RejectReason::TooShort));
    assert_eq!(counter.get_state().total_reps, 0);
    assert_eq!(counter.get_state().last_rep_time_ms, None);
}

#[test]
fn test_shallow_rep_is_partial() {
    let clock = ManualClock::new(0);
    let mut counter = squat_counter(squat_profile(), &clock);

    let (events, _) = drive_counter(
        &mut counter,
        &clock,
        &sweep(170.0, 110.0, 1200, FRAME_MS, 10),
        0,
        FRAME_MS,
    );

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, RepOutcome::Partial);
    assert!((events[0].valley_angle - 110.0).abs() < 1e-6);
    assert!((events[0].quality.unwrap() - 55.0).abs() < 1e-6);

    let state = counter.get_state();
    assert_eq!(state.total_reps, 0);
    assert_eq!(state.partial_reps, 1);
    // Partial reps do not start a debounce interval
    assert_eq!(state.last_rep_time_ms, None);
}

#[test]
fn test_rep_bottoming_out_on_the_down_line_is_partial() {
    let clock = ManualClock::new(0);
    let mut counter = squat_counter(squat_profile(), &clock);

    // 115° is exactly down_angle + tolerance for the default squat profile
    let (events, _) = drive_counter(
        &mut counter,
        &clock,
        &sweep(170.0, 115.0, 1200, FRAME_MS, 10),
        0,
        FRAME_MS,
    );

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, RepOutcome::Partial);
    assert!((events[0].valley_angle - 115.0).abs() < 1e-6);
    assert!((events[0].quality.unwrap() - 45.0).abs() < 1e-6);

    let state = counter.get_state();
    assert_eq!(state.total_reps, 0);
    assert_eq!(state.partial_reps, 1);
}

#[test]
fn test_movement_that_never_reaches_down_zone_counts_nothing() {
    let clock = ManualClock::new(0);
    let mut counter = squat_counter(squat_profile(), &clock);

    let (events, _) = drive_counter(
        &mut counter,
        &clock,
        &sweep(170.0, 125.0, 1200, FRAME_MS, 10),
        0,
        FRAME_MS,
    );

    assert!(events.is_empty());
    assert_eq!(counter.get_state().phase, Phase::Up);
    assert_eq!(counter.get_state().partial_reps, 0);
}

#[test]
fn test_slow_rep_is_flagged_but_counted() {
    let clock = ManualClock::new(0);
    let profile = ThresholdProfile {
        max_rep_duration_ms: 1000,
        ..squat_profile()
    };
    let mut counter = squat_counter(profile, &clock);

    let (events, _) = drive_counter(
        &mut counter,
        &clock,
        &sweep(170.0, 90.0, 1200, FRAME_MS, 30),
        0,
        FRAME_MS,
    );

    assert_eq!(events.len(), 1);
    assert!(events[0].is_full());
    assert!(events[0].exceeded_max_duration);
    assert!(events[0].duration_ms > 1000);
}

#[test]
fn test_unreliable_frames_do_not_move_the_counter() {
    let clock = ManualClock::new(0);
    let mut counter = squat_counter(squat_profile(), &clock);

    for (index, angle) in sweep(170.0, 90.0, 1200, FRAME_MS, 0).into_iter().enumerate() {
        clock.set(index as u64 * FRAME_MS);
        let result = counter.process_frame(&squat_frame_with_confidence(angle, 0.1));
        assert_eq!(result.current_phase, Phase::Up);
        assert!(!result.is_valid_rep_this_frame);
        assert!((result.angles.primary - 180.0).abs() < f64::EPSILON);
    }
    assert_eq!(counter.get_state().total_reps, 0);
}

#[test]
fn test_frame_result_reports_phase_and_valley() {
    let clock = ManualClock::new(0);
    let mut counter = squat_counter(squat_profile(), &clock);
    let angles = sweep(170.0, 90.0, 1200, FRAME_MS, 0);

    let mut saw_down = false;
    for (index, angle) in angles.iter().enumerate() {
        clock.set(index as u64 * FRAME_MS);
        let result = counter.process_frame(&common::squat_frame(*angle));
        assert!((0.0..=100.0).contains(&result.phase_progress_percent));
        if result.current_phase == Phase::Down {
            saw_down = true;
            let valley = result.angles.valley.unwrap();
            assert!(valley <= result.angles.primary);
        }
    }
    assert!(saw_down);
}

#[test]
fn test_reset_clears_counts_and_phase() {
    let clock = ManualClock::new(0);
    let mut counter = squat_counter(squat_profile(), &clock);
    let angles = sweep(170.0, 90.0, 1200, FRAME_MS, 0);
    let (_, next) = drive_counter(&mut counter, &clock, &angles, 0, FRAME_MS);
    assert_eq!(counter.get_state().total_reps, 1);

    clock.set(next);
    counter.reset();

    let state = counter.get_state();
    assert_eq!(state.total_reps, 0);
    assert_eq!(state.partial_reps, 0);
    assert_eq!(state.phase, Phase::Up);
    assert_eq!(state.last_rep_time_ms, None);
    assert!(!counter.is_stable());
    assert_eq!(counter.get_stats().best_quality, None);

    // Replaying the same rep after reset yields the same result
    let (events, _) = drive_counter(&mut counter, &clock, &angles, next, FRAME_MS);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].duration_ms, 594);
}

#[test]
fn test_force_and_undo_adjust_quality_history() {
    let clock = ManualClock::new(0);
    let mut counter = squat_counter(squat_profile(), &clock);

    assert_eq!(counter.force_count_rep(None), 1);
    assert_eq!(counter.force_count_rep(Some(40.0)), 2);

    let stats = counter.get_stats();
    assert_eq!(stats.valid_reps, 2);
    assert_eq!(stats.best_quality, Some(100.0));
    assert_eq!(stats.worst_quality, Some(40.0));
    assert_eq!(stats.average_quality, Some(70.0));
    // Manual counting leaves the state machine alone
    assert_eq!(counter.get_state().phase, Phase::Up);
    assert_eq!(counter.get_state().last_rep_time_ms, None);

    assert!(counter.undo_last_rep());
    assert_eq!(counter.get_stats().worst_quality, Some(100.0));
    assert!(counter.undo_last_rep());
    assert!(!counter.undo_last_rep());
    assert_eq!(counter.get_state().total_reps, 0);
}

#[test]
fn test_invalid_profiles_are_rejected() {
    let clock = ManualClock::new(0);
    let config = MotionConfig::default();

    let inverted = ThresholdProfile {
        down_angle: 160.0,
        up_angle: 100.0,
        ..squat_profile()
    };
    let result = RepCounter::new(ExerciseKind::Squat, inverted, &config, clock.clone());
    assert!(matches!(
        result,
        Err(ConfigError::InvalidThresholds {
            exercise: ExerciseKind::Squat,
            ..
        })
    ));

    let overlapping = ThresholdProfile {
        tolerance: 40.0,
        ..squat_profile()
    };
    assert!(RepCounter::new(ExerciseKind::Squat, overlapping, &config, clock.clone()).is_err());

    let not_finite = ThresholdProfile {
        down_angle: f64::NAN,
        ..squat_profile()
    };
    assert!(RepCounter::new(ExerciseKind::Squat, not_finite, &config, clock).is_err());
}

#[test]
fn test_update_thresholds_keeps_previous_on_error() {
    let clock = ManualClock::new(0);
    let mut counter = squat_counter(squat_profile(), &clock);

    let bad = ThresholdProfile {
        up_angle: 90.0,
        ..squat_profile()
    };
    assert!(counter.update_thresholds(bad).is_err());
    assert_eq!(*counter.get_thresholds(), squat_profile());

    let deeper = ThresholdProfile {
        down_angle: 80.0,
        ..squat_profile()
    };
    counter.update_thresholds(deeper).unwrap();
    assert!((counter.get_thresholds().down_angle - 80.0).abs() < f64::EPSILON);
}
