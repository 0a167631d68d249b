// ABOUTME: Per-exercise biomechanical form rules with severity grading and rate-limited feedback
// ABOUTME: Scores each analysis, tracks the safe zone, and ranks corrective recommendations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Form Rule Engine
//!
//! Each exercise has a fixed list of geometric checks. A check measures a
//! deviation from ideal posture and grades it against ascending cut-offs
//! (minor, moderate, significant). Every cut-off is multiplied by the
//! fitness level's tolerance, so a more tolerant level can only lower a
//! severity and a stricter one can only raise it. No tier above moderate
//! sits further than the beginner multiplier past the moderate cut-off, so
//! a moderate finding at the reference level is always graded lower for a
//! beginner.
//!
//! Detected issues then pass two rate limits before being emitted:
//!
//! - a per-kind cooldown suppresses repeats of the same issue kind
//! - a rolling window caps the total number of emitted issues
//!
//! Suppressed kinds are listed in [`FormAnalysis::suppressed`] but never
//! contribute to the score or the safe-zone flag.

use pierre_motion_core::constants::angles::FULLY_EXTENDED_DEGREES;
use pierre_motion_core::constants::feedback::{MAX_RECOMMENDATIONS, PERFECT_SCORE};
use pierre_motion_core::constants::form_rules;
use pierre_motion_core::models::{
    ExerciseKind, FitnessLevel, FormIssueKind, Landmark, LandmarkId, Locale, Point2, PoseFrame,
    Severity, Side, UserGender,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info};

use crate::angles::{angle_at_vertex, AngleModel, Joint};
use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, FeedbackConfig, MotionConfig, ThresholdProfile};
use crate::feedback_catalog::FeedbackCatalog;
use crate::rep_counter::{RepEvent, RepOutcome};

/// An emitted form observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormIssue {
    /// Issue taxonomy entry
    pub kind: FormIssueKind,
    /// How far past its threshold the measurement was
    pub severity: Severity,
    /// Encouraging, ready-to-display message
    pub message: String,
    /// Short corrective instruction
    pub correction: String,
    /// Landmarks involved in the measurement
    pub landmarks: Vec<LandmarkId>,
}

/// Result of one analysis call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormAnalysis {
    /// 100 minus the penalties of emitted issues, floored at 0
    pub overall_score: u32,
    /// Issues emitted on this call
    pub issues: Vec<FormIssue>,
    /// Deduplicated corrective instructions of the emitted issues
    pub improvements: Vec<String>,
    /// False when any significant issue was emitted
    pub is_in_safe_zone: bool,
    /// Issue kinds detected but withheld by the rate limits
    pub suppressed: Vec<FormIssueKind>,
}

impl FormAnalysis {
    /// Analysis with no findings
    #[must_use]
    pub const fn clean() -> Self {
        Self {
            overall_score: PERFECT_SCORE,
            issues: Vec::new(),
            improvements: Vec::new(),
            is_in_safe_zone: true,
            suppressed: Vec::new(),
        }
    }

    /// Top recommendations for this analysis, most severe first
    #[must_use]
    pub fn recommendations(&self) -> Vec<Recommendation> {
        get_recommendations(&self.issues)
    }

    /// Fold another analysis of the same frame into this one
    pub fn merge(&mut self, other: Self) {
        for improvement in other.improvements {
            if !self.improvements.contains(&improvement) {
                self.improvements.push(improvement);
            }
        }
        self.issues.extend(other.issues);
        self.suppressed.extend(other.suppressed);
        self.overall_score = score(&self.issues);
        self.is_in_safe_zone = is_safe(&self.issues);
    }
}

/// Compact, prioritized feedback entry for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// 1 = most urgent
    pub priority: u8,
    /// Issue taxonomy entry
    pub kind: FormIssueKind,
    /// Encouraging message
    pub message: String,
    /// Corrective instruction
    pub correction: String,
}

/// Priority-sorted (significant first) top recommendations for compact display
///
/// The sort is stable, so issues of equal priority keep their emission order.
#[must_use]
pub fn get_recommendations(issues: &[FormIssue]) -> Vec<Recommendation> {
    let mut ranked: Vec<&FormIssue> = issues.iter().collect();
    ranked.sort_by_key(|issue| issue.severity.priority());
    ranked
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|issue| Recommendation {
            priority: issue.severity.priority(),
            kind: issue.kind,
            message: issue.message.clone(),
            correction: issue.correction.clone(),
        })
        .collect()
}

/// A rule that fired before rate limiting
#[derive(Debug, Clone, PartialEq, Eq)]
struct Detection {
    kind: FormIssueKind,
    severity: Severity,
    landmarks: Vec<LandmarkId>,
}

/// Highest severity whose scaled cut-off the deviation exceeds
///
/// `cuts` must be in ascending order of both value and severity.
fn grade(deviation: f64, tolerance: f64, cuts: &[(f64, Severity)]) -> Option<Severity> {
    cuts.iter()
        .rev()
        .find(|(cut, _)| deviation > cut * tolerance)
        .map(|(_, severity)| *severity)
}

/// Tracks the deepest primary angle of each excursion below the top line
///
/// The valley is reported once the angle climbs back to the top, so pauses
/// and wobbles partway down never count as the bottom of a rep.
#[derive(Debug, Clone, Copy, Default)]
struct DepthTracker {
    excursion_min: Option<f64>,
}

impl DepthTracker {
    /// Feed one angle; returns the valley when an excursion returns to `top`
    fn observe(&mut self, angle: f64, top: f64) -> Option<f64> {
        if angle >= top {
            return self.excursion_min.take();
        }
        self.excursion_min = Some(self.excursion_min.map_or(angle, |min| min.min(angle)));
        None
    }
}

/// Mean position of whichever of the given landmarks are reliable
fn centroid(frame: &PoseFrame, ids: &[LandmarkId], min_confidence: f64) -> Option<Point2> {
    let points: Vec<Point2> = ids
        .iter()
        .filter_map(|id| frame.get_confident(*id, min_confidence))
        .map(Landmark::position)
        .collect();
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    Some(Point2::new(
        points.iter().map(|p| p.x).sum::<f64>() / n,
        points.iter().map(|p| p.y).sum::<f64>() / n,
    ))
}

/// Identifiers from `ids` that are present in the frame
fn present(frame: &PoseFrame, ids: &[LandmarkId]) -> Vec<LandmarkId> {
    ids.iter()
        .copied()
        .filter(|id| frame.get(*id).is_some())
        .collect()
}

fn score(issues: &[FormIssue]) -> u32 {
    let penalty: u32 = issues.iter().map(|issue| issue.severity.penalty()).sum();
    PERFECT_SCORE.saturating_sub(penalty)
}

fn is_safe(issues: &[FormIssue]) -> bool {
    !issues
        .iter()
        .any(|issue| issue.severity == Severity::Significant)
}

/// Rate-limited form rule engine owned by one session
#[derive(Debug)]
pub struct FormAnalyzer<C: Clock = SystemClock> {
    exercise: ExerciseKind,
    profile: ThresholdProfile,
    level: FitnessLevel,
    catalog: FeedbackCatalog,
    limits: FeedbackConfig,
    angle_model: AngleModel,
    last_emitted: [Option<u64>; FormIssueKind::COUNT],
    emission_window: VecDeque<u64>,
    depth: DepthTracker,
    clock: C,
}

impl FormAnalyzer {
    /// Analyzer with built-in configuration and the system clock
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in profile for `exercise` is invalid
    pub fn with_defaults(exercise: ExerciseKind, level: FitnessLevel) -> Result<Self, ConfigError> {
        let config = MotionConfig::default();
        let profile = *config.exercises.get(exercise);
        Self::new(
            exercise,
            profile,
            level,
            &config,
            FeedbackCatalog::default(),
            SystemClock::new(),
        )
    }
}

impl<C: Clock> FormAnalyzer<C> {
    /// Create an analyzer
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidThresholds` if the profile is invalid
    pub fn new(
        exercise: ExerciseKind,
        profile: ThresholdProfile,
        level: FitnessLevel,
        config: &MotionConfig,
        catalog: FeedbackCatalog,
        clock: C,
    ) -> Result<Self, ConfigError> {
        profile.validate(exercise)?;
        Ok(Self {
            exercise,
            profile,
            level,
            catalog,
            limits: config.feedback.clone(),
            angle_model: AngleModel::new(&config.angles),
            last_emitted: [None; FormIssueKind::COUNT],
            emission_window: VecDeque::new(),
            depth: DepthTracker::default(),
            clock,
        })
    }

    /// Evaluate the exercise's rules against one frame
    ///
    /// `current_primary_angle` is the counter's stabilized primary angle and
    /// drives the depth check.
    pub fn analyze_form(&mut self, raw: &PoseFrame, current_primary_angle: f64) -> FormAnalysis {
        let detections = self.detect(raw, current_primary_angle);
        self.emit(detections)
    }

    /// Evaluate tempo and range rules against a completed repetition
    pub fn analyze_repetition(&mut self, event: &RepEvent) -> FormAnalysis {
        let mut detections = Vec::new();
        if matches!(event.outcome, RepOutcome::Full | RepOutcome::Partial) {
            detections.extend(self.check_pace(event));
        }
        if event.outcome == RepOutcome::Partial {
            detections.extend(self.check_range(event));
        }
        self.emit(detections)
    }

    /// Change the fitness level; cooldown history is kept
    pub fn set_user_level(&mut self, level: FitnessLevel) {
        self.level = level;
        info!(exercise = %self.exercise, %level, "Form analyzer level changed");
    }

    /// Active fitness level
    #[must_use]
    pub const fn user_level(&self) -> FitnessLevel {
        self.level
    }

    /// Change the grammatical gender hint; cooldown history is kept
    pub fn set_user_gender(&mut self, gender: Option<UserGender>) {
        self.catalog.set_gender(gender);
    }

    /// Change the message locale; cooldown history is kept
    pub fn set_locale(&mut self, locale: Locale) {
        self.catalog = FeedbackCatalog::new(locale).with_gender(self.catalog.gender());
    }

    /// Replace the thresholds used by the depth and range checks
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidThresholds` and keeps the previous profile
    /// if `profile` is invalid
    pub fn update_thresholds(&mut self, profile: ThresholdProfile) -> Result<(), ConfigError> {
        profile.validate(self.exercise)?;
        self.profile = profile;
        Ok(())
    }

    /// Clear cooldowns, the rolling window, and depth tracking
    pub fn reset(&mut self) {
        self.last_emitted = [None; FormIssueKind::COUNT];
        self.emission_window.clear();
        self.depth = DepthTracker::default();
        info!(exercise = %self.exercise, "Form analyzer reset");
    }

    fn tolerance(&self) -> f64 {
        self.level.tolerance()
    }

    fn detect(&mut self, frame: &PoseFrame, primary_angle: f64) -> Vec<Detection> {
        let candidates = match self.exercise {
            ExerciseKind::Squat => vec![
                self.check_knee_over_toes(frame),
                self.check_back_rounding(frame),
                self.check_depth(frame, primary_angle),
                self.check_asymmetry(frame),
            ],
            ExerciseKind::Lunge => vec![
                self.check_knee_over_toes(frame),
                self.check_back_rounding(frame),
            ],
            ExerciseKind::PushUp => vec![
                self.check_elbow_flare(frame),
                self.check_hip_sag(frame, &PUSHUP_HIP_SAG_CUTS),
            ],
            ExerciseKind::Plank => vec![
                self.check_hip_sag(frame, &PLANK_HIP_SAG_CUTS),
                self.check_neck(frame),
            ],
            ExerciseKind::SitUp | ExerciseKind::JumpingJack => Vec::new(),
        };
        candidates.into_iter().flatten().collect()
    }

    fn check_knee_over_toes(&self, frame: &PoseFrame) -> Option<Detection> {
        let confidence = self.angle_model.joint_confidence();
        let (offset, side) = Side::BOTH
            .into_iter()
            .filter_map(|side| {
                let [knee, ankle] = frame.confident_points(
                    [LandmarkId::knee(side), LandmarkId::ankle(side)],
                    confidence,
                )?;
                Some(((knee.x - ankle.x).abs(), side))
            })
            .max_by(|a, b| a.0.total_cmp(&b.0))?;

        let severity = grade(offset, self.tolerance(), &KNEE_OVER_TOES_CUTS)?;
        Some(Detection {
            kind: FormIssueKind::KneeOverToes,
            severity,
            landmarks: vec![LandmarkId::knee(side), LandmarkId::ankle(side)],
        })
    }

    fn check_back_rounding(&self, frame: &PoseFrame) -> Option<Detection> {
        let confidence = self.angle_model.joint_confidence();
        let shoulders = [LandmarkId::LeftShoulder, LandmarkId::RightShoulder];
        let hips = [LandmarkId::LeftHip, LandmarkId::RightHip];
        let shoulder = centroid(frame, &shoulders, confidence)?;
        let hip = centroid(frame, &hips, confidence)?;

        // Image y grows downwards, so "up" is the negative y axis
        let (dx, dy) = hip.to(shoulder);
        let tilt = dx.abs().atan2(-dy).to_degrees();

        let severity = grade(tilt, self.tolerance(), &BACK_ROUNDING_CUTS)?;
        Some(Detection {
            kind: FormIssueKind::BackRounding,
            severity,
            landmarks: present(frame, &[shoulders[0], shoulders[1], hips[0], hips[1]]),
        })
    }

    fn check_depth(&mut self, frame: &PoseFrame, primary_angle: f64) -> Option<Detection> {
        let valley = self
            .depth
            .observe(primary_angle, self.profile.up_exit_angle())?;
        let shortfall = valley - self.profile.down_angle;
        let severity = grade(shortfall, self.tolerance(), &DEPTH_CUTS)?;
        Some(Detection {
            kind: FormIssueKind::InsufficientDepth,
            severity,
            landmarks: present(
                frame,
                &[
                    LandmarkId::LeftHip,
                    LandmarkId::RightHip,
                    LandmarkId::LeftKnee,
                    LandmarkId::RightKnee,
                ],
            ),
        })
    }

    fn check_asymmetry(&self, frame: &PoseFrame) -> Option<Detection> {
        let [left, right] = frame.confident_points(
            [LandmarkId::LeftKnee, LandmarkId::RightKnee],
            self.angle_model.joint_confidence(),
        )?;
        let difference = (left.y - right.y).abs();

        let severity = grade(difference, self.tolerance(), &ASYMMETRY_CUTS)?;
        Some(Detection {
            kind: FormIssueKind::Asymmetry,
            severity,
            landmarks: vec![LandmarkId::LeftKnee, LandmarkId::RightKnee],
        })
    }

    fn check_elbow_flare(&self, frame: &PoseFrame) -> Option<Detection> {
        let confidence = self.angle_model.joint_confidence();
        let (flare, side) = Side::BOTH
            .into_iter()
            .filter_map(|side| {
                let [hip, shoulder, elbow, wrist] = frame.confident_points(
                    [
                        LandmarkId::hip(side),
                        LandmarkId::shoulder(side),
                        LandmarkId::elbow(side),
                        LandmarkId::wrist(side),
                    ],
                    confidence,
                )?;
                let loaded = angle_at_vertex(shoulder, elbow, wrist) < form_rules::ELBOW_LOADED_ANGLE;
                loaded.then(|| (angle_at_vertex(hip, shoulder, elbow), side))
            })
            .max_by(|a, b| a.0.total_cmp(&b.0))?;

        let severity = grade(flare, self.tolerance(), &ELBOW_FLARE_CUTS)?;
        Some(Detection {
            kind: FormIssueKind::ElbowFlare,
            severity,
            landmarks: vec![
                LandmarkId::shoulder(side),
                LandmarkId::elbow(side),
                LandmarkId::hip(side),
            ],
        })
    }

    fn check_hip_sag(&self, frame: &PoseFrame, cuts: &[(f64, Severity)]) -> Option<Detection> {
        let body_line = self
            .angle_model
            .symmetric_angle(frame, Joint::BodyLine)
            .degrees()?;
        let sag = FULLY_EXTENDED_DEGREES - body_line;

        let severity = grade(sag, self.tolerance(), cuts)?;
        Some(Detection {
            kind: FormIssueKind::HipSag,
            severity,
            landmarks: present(
                frame,
                &[
                    LandmarkId::LeftShoulder,
                    LandmarkId::RightShoulder,
                    LandmarkId::LeftHip,
                    LandmarkId::RightHip,
                    LandmarkId::LeftAnkle,
                    LandmarkId::RightAnkle,
                ],
            ),
        })
    }

    fn check_neck(&self, frame: &PoseFrame) -> Option<Detection> {
        let confidence = self.angle_model.joint_confidence();
        let (deviation, side) = Side::BOTH
            .into_iter()
            .filter_map(|side| {
                let [hip, shoulder, nose] = frame.confident_points(
                    [LandmarkId::hip(side), LandmarkId::shoulder(side), LandmarkId::Nose],
                    confidence,
                )?;
                Some((
                    FULLY_EXTENDED_DEGREES - angle_at_vertex(hip, shoulder, nose),
                    side,
                ))
            })
            .max_by(|a, b| a.0.total_cmp(&b.0))?;

        let severity = grade(deviation, self.tolerance(), &NECK_CUTS)?;
        Some(Detection {
            kind: FormIssueKind::NeckStrain,
            severity,
            landmarks: vec![LandmarkId::Nose, LandmarkId::shoulder(side)],
        })
    }

    fn check_pace(&self, event: &RepEvent) -> Option<Detection> {
        if self.exercise.is_isometric() {
            return None;
        }
        let threshold = form_rules::FAST_REP_MS as f64 / self.tolerance();
        let duration = event.duration_ms as f64;
        if duration >= threshold {
            return None;
        }

        let severity = if duration < threshold * form_rules::FAST_REP_SIGNIFICANT_FRACTION {
            Severity::Significant
        } else if duration < threshold * form_rules::FAST_REP_MODERATE_FRACTION {
            Severity::Moderate
        } else {
            Severity::Minor
        };
        Some(Detection {
            kind: FormIssueKind::PaceTooFast,
            severity,
            landmarks: Vec::new(),
        })
    }

    fn check_range(&self, event: &RepEvent) -> Option<Detection> {
        let shortfall = event.valley_angle - self.profile.full_depth_limit();
        let severity = grade(shortfall, self.tolerance(), &LIMITED_RANGE_CUTS)?;
        Some(Detection {
            kind: FormIssueKind::LimitedRange,
            severity,
            landmarks: Vec::new(),
        })
    }

    fn emit(&mut self, detections: Vec<Detection>) -> FormAnalysis {
        let now = self.clock.now_ms();
        while self
            .emission_window
            .front()
            .is_some_and(|&emitted| now.saturating_sub(emitted) >= self.limits.window_ms)
        {
            self.emission_window.pop_front();
        }

        let mut analysis = FormAnalysis::clean();
        for detection in detections {
            let kind = detection.kind;
            let cooling_down = self.last_emitted[kind.index()]
                .is_some_and(|last| now.saturating_sub(last) < self.limits.cooldown_ms);
            let window_full = self.emission_window.len() >= self.limits.max_issues_per_window;

            if cooling_down || window_full {
                debug!(
                    exercise = %self.exercise,
                    issue = %kind,
                    severity = %detection.severity,
                    cooling_down,
                    window_full,
                    "Form issue suppressed by rate limit"
                );
                analysis.suppressed.push(kind);
                continue;
            }

            self.last_emitted[kind.index()] = Some(now);
            self.emission_window.push_back(now);

            let correction = self.catalog.correction(kind).to_owned();
            if !analysis.improvements.contains(&correction) {
                analysis.improvements.push(correction.clone());
            }
            analysis.issues.push(FormIssue {
                kind,
                severity: detection.severity,
                message: self.catalog.message(kind, detection.severity),
                correction,
                landmarks: detection.landmarks,
            });
        }

        analysis.overall_score = score(&analysis.issues);
        analysis.is_in_safe_zone = is_safe(&analysis.issues);
        analysis
    }
}

const KNEE_OVER_TOES_CUTS: [(f64, Severity); 3] = [
    (form_rules::KNEE_OVER_TOES_TRIGGER, Severity::Minor),
    (form_rules::KNEE_OVER_TOES_MODERATE, Severity::Moderate),
    (form_rules::KNEE_OVER_TOES_SIGNIFICANT, Severity::Significant),
];

const BACK_ROUNDING_CUTS: [(f64, Severity); 2] = [
    (form_rules::TRUNK_TILT_TRIGGER, Severity::Moderate),
    (form_rules::TRUNK_TILT_SIGNIFICANT, Severity::Significant),
];

const DEPTH_CUTS: [(f64, Severity); 3] = [
    (form_rules::DEPTH_SHORTFALL_TRIGGER, Severity::Minor),
    (form_rules::DEPTH_SHORTFALL_MODERATE, Severity::Moderate),
    (form_rules::DEPTH_SHORTFALL_SIGNIFICANT, Severity::Significant),
];

const ASYMMETRY_CUTS: [(f64, Severity); 3] = [
    (form_rules::KNEE_ASYMMETRY_TRIGGER, Severity::Minor),
    (form_rules::KNEE_ASYMMETRY_MODERATE, Severity::Moderate),
    (form_rules::KNEE_ASYMMETRY_SIGNIFICANT, Severity::Significant),
];

const ELBOW_FLARE_CUTS: [(f64, Severity); 2] = [
    (form_rules::ELBOW_FLARE_TRIGGER, Severity::Moderate),
    (form_rules::ELBOW_FLARE_SIGNIFICANT, Severity::Significant),
];

const PUSHUP_HIP_SAG_CUTS: [(f64, Severity); 2] = [
    (form_rules::PUSHUP_HIP_SAG_TRIGGER, Severity::Moderate),
    (form_rules::PUSHUP_HIP_SAG_SIGNIFICANT, Severity::Significant),
];

const PLANK_HIP_SAG_CUTS: [(f64, Severity); 3] = [
    (form_rules::PLANK_HIP_SAG_TRIGGER, Severity::Minor),
    (form_rules::PLANK_HIP_SAG_MODERATE, Severity::Moderate),
    (form_rules::PLANK_HIP_SAG_SIGNIFICANT, Severity::Significant),
];

const NECK_CUTS: [(f64, Severity); 2] = [
    (form_rules::NECK_DEVIATION_TRIGGER, Severity::Moderate),
    (form_rules::NECK_DEVIATION_SIGNIFICANT, Severity::Significant),
];

const LIMITED_RANGE_CUTS: [(f64, Severity); 3] = [
    (0.0, Severity::Minor),
    (form_rules::LIMITED_RANGE_MODERATE, Severity::Moderate),
    (form_rules::LIMITED_RANGE_SIGNIFICANT, Severity::Significant),
];
