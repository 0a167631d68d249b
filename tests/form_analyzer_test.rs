// ABOUTME: Integration tests for the form rule engine
// ABOUTME: Validates severity grading, fitness-level scaling, rate limiting, scoring, and messages
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{knee_offset_frame, CONFIDENCE};
use pierre_motion::clock::ManualClock;
use pierre_motion::config::MotionConfig;
use pierre_motion::feedback_catalog::FeedbackCatalog;
use pierre_motion::form_analyzer::{get_recommendations, FormAnalysis, FormAnalyzer, FormIssue};
use pierre_motion::models::{
    ExerciseKind, FitnessLevel, FormIssueKind, Landmark, LandmarkId, Locale, PoseFrame, Severity,
    UserGender,
};
use pierre_motion::rep_counter::{RejectReason, RepEvent, RepOutcome};

const STANDING: f64 = 170.0;

fn analyzer(
    exercise: ExerciseKind,
    level: FitnessLevel,
    clock: &ManualClock,
) -> FormAnalyzer<ManualClock> {
    let config = MotionConfig::default();
    FormAnalyzer::new(
        exercise,
        *config.exercises.get(exercise),
        level,
        &config,
        FeedbackCatalog::default(),
        clock.clone(),
    )
    .unwrap()
}

fn knee_severity(level: FitnessLevel, offset: f64) -> Option<Severity> {
    let clock = ManualClock::new(0);
    let mut analyzer = analyzer(ExerciseKind::Squat, level, &clock);
    let analysis = analyzer.analyze_form(&knee_offset_frame(offset), STANDING);
    analysis
        .issues
        .iter()
        .find(|issue| issue.kind == FormIssueKind::KneeOverToes)
        .map(|issue| issue.severity)
}

/// Plank pose seen from the side with the hip dropped by `sag` below the shoulder-ankle line
fn plank_frame(sag: f64) -> PoseFrame {
    PoseFrame::new(vec![
        Landmark::new(LandmarkId::LeftShoulder, 0.2, 0.5, CONFIDENCE),
        Landmark::new(LandmarkId::LeftHip, 0.5, 0.5 + sag, CONFIDENCE),
        Landmark::new(LandmarkId::LeftAnkle, 0.8, 0.5, CONFIDENCE),
    ])
}

fn rep_event(outcome: RepOutcome, valley_angle: f64, duration_ms: u64) -> RepEvent {
    RepEvent {
        outcome,
        quality: Some(100.0),
        valley_angle,
        duration_ms,
        exceeded_max_duration: false,
        timestamp_ms: 0,
    }
}

#[test]
fn test_knee_over_toes_depends_on_fitness_level() {
    assert_eq!(
        knee_severity(FitnessLevel::Intermediate, 0.11),
        Some(Severity::Moderate)
    );
    assert_eq!(knee_severity(FitnessLevel::Beginner, 0.11), None);
    assert_eq!(
        knee_severity(FitnessLevel::Advanced, 0.11),
        Some(Severity::Moderate)
    );
}

/// Squat frame seen from the front with the right knee `difference` lower than the left
fn uneven_knees_frame(difference: f64) -> PoseFrame {
    PoseFrame::new(vec![
        Landmark::new(LandmarkId::LeftKnee, 0.45, 0.7, CONFIDENCE),
        Landmark::new(LandmarkId::RightKnee, 0.55, 0.7 + difference, CONFIDENCE),
        Landmark::new(LandmarkId::LeftAnkle, 0.45, 0.9, CONFIDENCE),
        Landmark::new(LandmarkId::RightAnkle, 0.55, 0.9, CONFIDENCE),
    ])
}

/// Shoulders and hips with the trunk leaning `tilt` degrees away from vertical
fn trunk_frame(tilt: f64) -> PoseFrame {
    let (dx, dy) = (0.3 * tilt.to_radians().sin(), 0.3 * tilt.to_radians().cos());
    PoseFrame::new(vec![
        Landmark::new(LandmarkId::LeftShoulder, 0.45 + dx, 0.5 - dy, CONFIDENCE),
        Landmark::new(LandmarkId::RightShoulder, 0.55 + dx, 0.5 - dy, CONFIDENCE),
        Landmark::new(LandmarkId::LeftHip, 0.45, 0.5, CONFIDENCE),
        Landmark::new(LandmarkId::RightHip, 0.55, 0.5, CONFIDENCE),
    ])
}

type Scenario = fn(&mut FormAnalyzer<ManualClock>, u32) -> FormAnalysis;

/// One rule driven through increasing deviation steps
struct LevelCase {
    exercise: ExerciseKind,
    kind: FormIssueKind,
    steps: std::ops::Range<u32>,
    run: Scenario,
}

fn level_cases() -> Vec<LevelCase> {
    vec![
        LevelCase {
            exercise: ExerciseKind::Squat,
            kind: FormIssueKind::KneeOverToes,
            steps: 0..300,
            run: |analyzer, step| {
                analyzer.analyze_form(&knee_offset_frame(f64::from(step) * 0.001), STANDING)
            },
        },
        LevelCase {
            exercise: ExerciseKind::Squat,
            kind: FormIssueKind::Asymmetry,
            steps: 0..300,
            run: |analyzer, step| {
                analyzer.analyze_form(&uneven_knees_frame(f64::from(step) * 0.001), STANDING)
            },
        },
        LevelCase {
            exercise: ExerciseKind::Squat,
            kind: FormIssueKind::BackRounding,
            steps: 0..90,
            run: |analyzer, step| analyzer.analyze_form(&trunk_frame(f64::from(step)), STANDING),
        },
        LevelCase {
            exercise: ExerciseKind::Squat,
            kind: FormIssueKind::InsufficientDepth,
            steps: 0..45,
            run: |analyzer, step| {
                let frame = knee_offset_frame(0.0);
                analyzer.analyze_form(&frame, 100.0 + f64::from(step));
                analyzer.analyze_form(&frame, STANDING)
            },
        },
        LevelCase {
            exercise: ExerciseKind::PushUp,
            kind: FormIssueKind::HipSag,
            steps: 0..200,
            run: |analyzer, step| analyzer.analyze_form(&plank_frame(f64::from(step) * 0.001), 160.0),
        },
        LevelCase {
            exercise: ExerciseKind::Plank,
            kind: FormIssueKind::HipSag,
            steps: 0..200,
            run: |analyzer, step| analyzer.analyze_form(&plank_frame(f64::from(step) * 0.001), 175.0),
        },
        LevelCase {
            exercise: ExerciseKind::Squat,
            kind: FormIssueKind::LimitedRange,
            steps: 1..60,
            run: |analyzer, step| {
                let valley = f64::from(step).mul_add(0.25, 107.5);
                analyzer.analyze_repetition(&rep_event(RepOutcome::Partial, valley, 1_000))
            },
        },
        LevelCase {
            exercise: ExerciseKind::Squat,
            kind: FormIssueKind::PaceTooFast,
            steps: 0..600,
            run: |analyzer, step| {
                analyzer.analyze_repetition(&rep_event(RepOutcome::Full, 95.0, u64::from(600 - step)))
            },
        },
    ]
}

fn graded(case: &LevelCase, level: FitnessLevel, step: u32) -> Option<Severity> {
    let clock = ManualClock::new(0);
    let mut analyzer = analyzer(case.exercise, level, &clock);
    (case.run)(&mut analyzer, step)
        .issues
        .iter()
        .find(|issue| issue.kind == case.kind)
        .map(|issue| issue.severity)
}

#[test]
fn test_fitness_level_regrades_moderate_findings() {
    for case in level_cases() {
        let mut moderate_seen = false;
        for step in case.steps.clone() {
            if graded(&case, FitnessLevel::Intermediate, step) != Some(Severity::Moderate) {
                continue;
            }
            moderate_seen = true;

            let beginner = graded(&case, FitnessLevel::Beginner, step);
            assert!(
                beginner.is_none_or(|severity| severity < Severity::Moderate),
                "{}: step {step} graded {beginner:?} for beginner",
                case.kind
            );
            let advanced = graded(&case, FitnessLevel::Advanced, step);
            assert!(
                advanced >= Some(Severity::Moderate),
                "{}: step {step} graded {advanced:?} for advanced",
                case.kind
            );
        }
        assert!(moderate_seen, "{} never graded moderate", case.kind);
    }
}

#[test]
fn test_pause_partway_down_is_not_judged_as_the_bottom() {
    let clock = ManualClock::new(0);
    let mut analyzer = analyzer(ExerciseKind::Squat, FitnessLevel::Intermediate, &clock);
    let frame = knee_offset_frame(0.0);

    for angle in [170.0, 150.0, 136.5, 136.6, 136.6, 136.0, 120.0, 100.0, 92.0, 95.0, 120.0, 150.0, 170.0] {
        let analysis = analyzer.analyze_form(&frame, angle);
        assert!(analysis.issues.is_empty(), "{angle}: {:?}", analysis.issues);
    }
}

#[test]
fn test_clean_frame_scores_perfect() {
    let clock = ManualClock::new(0);
    let mut analyzer = analyzer(ExerciseKind::Squat, FitnessLevel::Intermediate, &clock);

    let analysis = analyzer.analyze_form(&knee_offset_frame(0.0), STANDING);
    assert!(analysis.issues.is_empty());
    assert_eq!(analysis.overall_score, 100);
    assert!(analysis.is_in_safe_zone);
    assert!(analysis.improvements.is_empty());
}

#[test]
fn test_score_and_safe_zone_follow_severity() {
    let clock = ManualClock::new(0);
    let mut moderate = analyzer(ExerciseKind::Squat, FitnessLevel::Intermediate, &clock);
    let analysis = moderate.analyze_form(&knee_offset_frame(0.11), STANDING);
    assert_eq!(analysis.overall_score, 85);
    assert!(analysis.is_in_safe_zone);
    assert_eq!(analysis.improvements.len(), 1);

    let mut significant = analyzer(ExerciseKind::Squat, FitnessLevel::Intermediate, &clock);
    let analysis = significant.analyze_form(&knee_offset_frame(0.2), STANDING);
    assert_eq!(analysis.overall_score, 75);
    assert!(!analysis.is_in_safe_zone);
    assert_eq!(
        analysis.issues[0].landmarks.len(),
        2,
        "knee and ankle of the worse side"
    );
}

#[test]
fn test_same_issue_is_suppressed_during_cooldown() {
    let clock = ManualClock::new(0);
    let mut analyzer = analyzer(ExerciseKind::Squat, FitnessLevel::Intermediate, &clock);
    let frame = knee_offset_frame(0.11);

    assert_eq!(analyzer.analyze_form(&frame, STANDING).issues.len(), 1);

    clock.set(1_000);
    let analysis = analyzer.analyze_form(&frame, STANDING);
    assert!(analysis.issues.is_empty());
    assert_eq!(analysis.suppressed, vec![FormIssueKind::KneeOverToes]);
    // Suppressed issues do not cost points
    assert_eq!(analysis.overall_score, 100);

    clock.set(4_999);
    assert!(analyzer.analyze_form(&frame, STANDING).issues.is_empty());

    clock.set(5_000);
    assert_eq!(analyzer.analyze_form(&frame, STANDING).issues.len(), 1);
}

#[test]
fn test_rolling_window_caps_emissions_per_minute() {
    let clock = ManualClock::new(0);
    let mut analyzer = analyzer(ExerciseKind::Squat, FitnessLevel::Intermediate, &clock);
    let frame = knee_offset_frame(0.11);

    let mut emitted = 0;
    for second in (0..60).step_by(5) {
        clock.set(second * 1_000);
        emitted += analyzer.analyze_form(&frame, STANDING).issues.len();
    }
    assert_eq!(emitted, 6);

    // The first emission (t=0) leaves the window at t=60s
    clock.set(60_000);
    assert_eq!(analyzer.analyze_form(&frame, STANDING).issues.len(), 1);
}

#[test]
fn test_reset_clears_cooldowns() {
    let clock = ManualClock::new(0);
    let mut analyzer = analyzer(ExerciseKind::Squat, FitnessLevel::Intermediate, &clock);
    let frame = knee_offset_frame(0.11);

    assert_eq!(analyzer.analyze_form(&frame, STANDING).issues.len(), 1);
    analyzer.reset();
    assert_eq!(analyzer.analyze_form(&frame, STANDING).issues.len(), 1);
}

#[test]
fn test_level_change_keeps_cooldowns() {
    let clock = ManualClock::new(0);
    let mut analyzer = analyzer(ExerciseKind::Squat, FitnessLevel::Intermediate, &clock);
    let frame = knee_offset_frame(0.11);

    assert_eq!(analyzer.analyze_form(&frame, STANDING).issues.len(), 1);
    analyzer.set_user_level(FitnessLevel::Advanced);
    assert_eq!(analyzer.user_level(), FitnessLevel::Advanced);
    clock.set(1_000);
    assert_eq!(
        analyzer.analyze_form(&frame, STANDING).suppressed,
        vec![FormIssueKind::KneeOverToes]
    );
}

#[test]
fn test_shallow_squat_bottom_reports_insufficient_depth() {
    let clock = ManualClock::new(0);
    let mut analyzer = analyzer(ExerciseKind::Squat, FitnessLevel::Intermediate, &clock);
    let frame = knee_offset_frame(0.0);

    let mut found = Vec::new();
    for angle in [170.0, 150.0, 130.0, 125.0, 128.0, 140.0, 160.0] {
        let analysis = analyzer.analyze_form(&frame, angle);
        found.extend(analysis.issues.into_iter().map(|issue| (issue.kind, issue.severity)));
    }
    assert_eq!(
        found,
        vec![(FormIssueKind::InsufficientDepth, Severity::Minor)]
    );
}

#[test]
fn test_deep_squat_bottom_is_not_flagged() {
    let clock = ManualClock::new(0);
    let mut analyzer = analyzer(ExerciseKind::Squat, FitnessLevel::Intermediate, &clock);
    let frame = knee_offset_frame(0.0);

    for angle in [170.0, 130.0, 100.0, 95.0, 110.0, 150.0] {
        assert!(analyzer.analyze_form(&frame, angle).issues.is_empty());
    }
}

#[test]
fn test_plank_hip_sag_grades() {
    let cases = [
        (0.0, None),
        (0.045, Some(Severity::Minor)),
        (0.06, Some(Severity::Moderate)),
        (0.09, Some(Severity::Significant)),
    ];
    for (sag, expected) in cases {
        let clock = ManualClock::new(0);
        let mut analyzer = analyzer(ExerciseKind::Plank, FitnessLevel::Intermediate, &clock);
        let analysis = analyzer.analyze_form(&plank_frame(sag), 175.0);
        let severity = analysis
            .issues
            .iter()
            .find(|issue| issue.kind == FormIssueKind::HipSag)
            .map(|issue| issue.severity);
        assert_eq!(severity, expected, "sag {sag}");
    }
}

#[test]
fn test_pushup_hip_sag_uses_its_own_cutoffs() {
    let clock = ManualClock::new(0);
    let mut analyzer = analyzer(ExerciseKind::PushUp, FitnessLevel::Intermediate, &clock);
    // 17° of sag is minor on a plank but below the push-up trigger
    assert!(analyzer.analyze_form(&plank_frame(0.045), 160.0).issues.is_empty());
    let analysis = analyzer.analyze_form(&plank_frame(0.06), 160.0);
    assert_eq!(analysis.issues[0].kind, FormIssueKind::HipSag);
    assert_eq!(analysis.issues[0].severity, Severity::Moderate);
}

#[test]
fn test_exercises_without_frame_rules_stay_clean() {
    for exercise in [ExerciseKind::SitUp, ExerciseKind::JumpingJack] {
        let clock = ManualClock::new(0);
        let mut analyzer = analyzer(exercise, FitnessLevel::Advanced, &clock);
        let analysis = analyzer.analyze_form(&knee_offset_frame(0.3), 90.0);
        assert!(analysis.issues.is_empty(), "{exercise}");
        assert_eq!(analysis.overall_score, 100);
    }
}

#[test]
fn test_fast_rep_reports_pace_issue() {
    let clock = ManualClock::new(0);
    let mut analyzer = analyzer(ExerciseKind::Squat, FitnessLevel::Intermediate, &clock);

    let analysis = analyzer.analyze_repetition(&rep_event(RepOutcome::Full, 95.0, 200));
    assert_eq!(analysis.issues.len(), 1);
    assert_eq!(analysis.issues[0].kind, FormIssueKind::PaceTooFast);
    assert_eq!(analysis.issues[0].severity, Severity::Significant);
    assert!(analysis.issues[0].landmarks.is_empty());

    let mut fresh = self::analyzer(ExerciseKind::Squat, FitnessLevel::Intermediate, &clock);
    let analysis = fresh.analyze_repetition(&rep_event(RepOutcome::Full, 95.0, 450));
    assert_eq!(analysis.issues[0].severity, Severity::Minor);

    let mut beginner = self::analyzer(ExerciseKind::Squat, FitnessLevel::Beginner, &clock);
    assert!(beginner
        .analyze_repetition(&rep_event(RepOutcome::Full, 95.0, 450))
        .issues
        .is_empty());
}

#[test]
fn test_controlled_rep_and_rejections_are_clean() {
    let clock = ManualClock::new(0);
    let mut analyzer = analyzer(ExerciseKind::Squat, FitnessLevel::Advanced, &clock);

    assert!(analyzer
        .analyze_repetition(&rep_event(RepOutcome::Full, 95.0, 1_500))
        .issues
        .is_empty());
    let rejected = rep_event(RepOutcome::Rejected(RejectReason::TooShort), 95.0, 100);
    assert!(analyzer.analyze_repetition(&rejected).issues.is_empty());
}

#[test]
fn test_partial_rep_reports_limited_range() {
    let clock = ManualClock::new(0);
    let mut analyzer = analyzer(ExerciseKind::Squat, FitnessLevel::Intermediate, &clock);
    let analysis = analyzer.analyze_repetition(&rep_event(RepOutcome::Partial, 110.0, 1_000));
    assert_eq!(analysis.issues.len(), 1);
    assert_eq!(analysis.issues[0].kind, FormIssueKind::LimitedRange);
    assert_eq!(analysis.issues[0].severity, Severity::Minor);

    let mut other = self::analyzer(ExerciseKind::Squat, FitnessLevel::Intermediate, &clock);
    let analysis = other.analyze_repetition(&rep_event(RepOutcome::Partial, 120.0, 1_000));
    assert_eq!(analysis.issues[0].severity, Severity::Significant);
}

#[test]
fn test_plank_has_no_pace_rule() {
    let clock = ManualClock::new(0);
    let mut analyzer = analyzer(ExerciseKind::Plank, FitnessLevel::Advanced, &clock);
    assert!(analyzer
        .analyze_repetition(&rep_event(RepOutcome::Full, 150.0, 50))
        .issues
        .is_empty());
}

#[test]
fn test_messages_follow_locale_and_gender() {
    let clock = ManualClock::new(0);
    let fast = rep_event(RepOutcome::Full, 95.0, 100);

    let mut analyzer = analyzer(ExerciseKind::Squat, FitnessLevel::Intermediate, &clock);
    let message = analyzer.analyze_repetition(&fast).issues[0].message.clone();
    assert!(message.contains("campeão"), "{message}");

    analyzer.reset();
    analyzer.set_user_gender(Some(UserGender::Female));
    let message = analyzer.analyze_repetition(&fast).issues[0].message.clone();
    assert!(!message.contains("campeão"), "{message}");
    assert!(message.contains("campeã"), "{message}");

    analyzer.reset();
    analyzer.set_locale(Locale::En);
    let issue = analyzer.analyze_repetition(&fast).issues[0].clone();
    assert!(!issue.message.contains('{'), "{}", issue.message);
    assert_eq!(issue.correction, "Count 2 seconds down and 2 seconds up");
}

#[test]
fn test_recommendations_rank_by_severity() {
    let issue = |kind, severity| FormIssue {
        kind,
        severity,
        message: kind.as_str().to_owned(),
        correction: String::new(),
        landmarks: Vec::new(),
    };
    let issues = vec![
        issue(FormIssueKind::Asymmetry, Severity::Minor),
        issue(FormIssueKind::KneeOverToes, Severity::Moderate),
        issue(FormIssueKind::BackRounding, Severity::Significant),
        issue(FormIssueKind::InsufficientDepth, Severity::Moderate),
    ];

    let recommendations = get_recommendations(&issues);
    assert_eq!(recommendations.len(), 2);
    assert_eq!(recommendations[0].kind, FormIssueKind::BackRounding);
    assert_eq!(recommendations[0].priority, 1);
    // Equal priority keeps emission order
    assert_eq!(recommendations[1].kind, FormIssueKind::KneeOverToes);
    assert_eq!(recommendations[1].priority, 2);

    assert!(get_recommendations(&[]).is_empty());
}
