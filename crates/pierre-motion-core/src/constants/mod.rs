// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Built-in defaults for smoothing, joint angles, repetition counting, and feedback limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Defaults are grouped by the component that consumes them. Every value here
//! can be shadowed through `MotionConfig` in the intelligence crate; these are
//! the baseline the configuration layer starts from.

/// Landmark smoothing and interpolation defaults
pub mod smoothing {
    /// Number of samples kept per landmark per axis
    pub const HISTORY_WINDOW: usize = 5;
    /// EMA responsiveness factor (higher = more responsive, less smooth)
    pub const EMA_ALPHA: f64 = 0.3;
    /// Landmarks below this confidence are replaced from history
    pub const INTERPOLATION_CONFIDENCE: f64 = 0.5;
    /// Confidence multiplier marking an interpolated landmark as synthesized
    pub const SYNTHESIZED_CONFIDENCE_DECAY: f64 = 0.8;
    /// Mean positional variance under which the tracked pose counts as stable
    pub const STABILITY_VARIANCE: f64 = 0.001;
}

/// Joint angle derivation defaults
pub mod angles {
    /// Minimum confidence for each of the three landmarks of a joint
    pub const JOINT_CONFIDENCE: f64 = 0.4;
    /// Angle reported when no side of a symmetric joint is measurable
    pub const FULLY_EXTENDED_DEGREES: f64 = 180.0;
    /// Vectors shorter than this are treated as degenerate
    pub const DEGENERATE_VECTOR_LENGTH: f64 = 1e-9;
    /// Extra moving-average window applied by the repetition counter
    pub const COUNTER_AVERAGE_WINDOW: usize = 5;
}

/// Repetition state machine constants
pub mod repetition {
    /// Valley value after a reset (nothing observed yet)
    pub const VALLEY_RESET_DEGREES: f64 = 180.0;
    /// Peak value after a reset (nothing observed yet)
    pub const PEAK_RESET_DEGREES: f64 = 0.0;
    /// Fraction of the safe-zone tolerance that still counts as full depth
    pub const FULL_DEPTH_BAND_FRACTION: f64 = 0.5;
    /// Upper bound for any rep quality score
    pub const MAX_QUALITY: f64 = 100.0;
    /// Quality at the outer edge of the full-depth band
    pub const BAND_EDGE_QUALITY: f64 = 60.0;
    /// Quality lost per degree a partial rep fell short of the band
    pub const PARTIAL_PENALTY_PER_DEGREE: f64 = 2.0;
    /// Floor for partial rep quality
    pub const PARTIAL_QUALITY_FLOOR: f64 = 30.0;
    /// Quality recorded for manually forced reps when none is supplied
    pub const FORCED_REP_QUALITY: f64 = 100.0;
}

/// Form feedback rate limits and scoring
pub mod feedback {
    /// Per-issue-kind cooldown in milliseconds
    pub const ISSUE_COOLDOWN_MS: u64 = 5_000;
    /// Maximum issues emitted inside one rolling window
    pub const MAX_ISSUES_PER_WINDOW: usize = 6;
    /// Rolling window length in milliseconds
    pub const ROLLING_WINDOW_MS: u64 = 60_000;
    /// Score every analysis starts from
    pub const PERFECT_SCORE: u32 = 100;
    /// Score penalty for a minor issue
    pub const MINOR_PENALTY: u32 = 5;
    /// Score penalty for a moderate issue
    pub const MODERATE_PENALTY: u32 = 15;
    /// Score penalty for a significant issue
    pub const SIGNIFICANT_PENALTY: u32 = 25;
    /// Maximum recommendations shown at once
    pub const MAX_RECOMMENDATIONS: usize = 2;
}

/// Fitness level tolerance multipliers applied to every form rule
pub mod tolerance {
    /// Beginner: 50% more tolerant
    pub const BEGINNER: f64 = 1.5;
    /// Intermediate: reference thresholds
    pub const INTERMEDIATE: f64 = 1.0;
    /// Advanced: 20% stricter
    pub const ADVANCED: f64 = 0.8;
}

/// Form rule reference thresholds at the intermediate level.
///
/// Positional values are in normalized frame units, angular values in degrees
/// of deviation from the ideal posture. Every rule's cut-off above its
/// moderate tier is at most 1.5 times the moderate cut-off, so that the
/// beginner tolerance always grades an intermediate moderate finding lower.
pub mod form_rules {
    /// Knee-past-ankle horizontal offset that starts a knee-over-toes issue
    pub const KNEE_OVER_TOES_TRIGGER: f64 = 0.08;
    /// Knee-over-toes offset for a moderate issue
    pub const KNEE_OVER_TOES_MODERATE: f64 = 0.10;
    /// Knee-over-toes offset for a significant issue
    pub const KNEE_OVER_TOES_SIGNIFICANT: f64 = 0.15;

    /// Trunk deviation from vertical that starts a back-rounding issue
    pub const TRUNK_TILT_TRIGGER: f64 = 40.0;
    /// Trunk deviation for a significant back-rounding issue
    pub const TRUNK_TILT_SIGNIFICANT: f64 = 60.0;

    /// Turnaround depth short of the down threshold that starts an issue
    pub const DEPTH_SHORTFALL_TRIGGER: f64 = 20.0;
    /// Depth shortfall for a moderate issue
    pub const DEPTH_SHORTFALL_MODERATE: f64 = 30.0;
    /// Depth shortfall for a significant issue
    pub const DEPTH_SHORTFALL_SIGNIFICANT: f64 = 40.0;

    /// Vertical knee height difference that starts an asymmetry issue
    pub const KNEE_ASYMMETRY_TRIGGER: f64 = 0.05;
    /// Knee height difference for a moderate asymmetry issue
    pub const KNEE_ASYMMETRY_MODERATE: f64 = 0.10;
    /// Knee height difference for a significant asymmetry issue
    pub const KNEE_ASYMMETRY_SIGNIFICANT: f64 = 0.15;

    /// Torso-to-upper-arm angle that starts an elbow-flare issue
    pub const ELBOW_FLARE_TRIGGER: f64 = 60.0;
    /// Torso-to-upper-arm angle for a significant elbow-flare issue
    pub const ELBOW_FLARE_SIGNIFICANT: f64 = 80.0;
    /// Elbow angle below which the arm counts as loaded (bottom half of a push-up)
    pub const ELBOW_LOADED_ANGLE: f64 = 120.0;

    /// Push-up body-line sag (degrees short of straight) that starts a hip-sag issue
    pub const PUSHUP_HIP_SAG_TRIGGER: f64 = 20.0;
    /// Push-up hip sag for a significant issue
    pub const PUSHUP_HIP_SAG_SIGNIFICANT: f64 = 30.0;

    /// Plank body-line sag that starts a hip-sag issue
    pub const PLANK_HIP_SAG_TRIGGER: f64 = 15.0;
    /// Plank hip sag for a moderate issue
    pub const PLANK_HIP_SAG_MODERATE: f64 = 20.0;
    /// Plank hip sag for a significant issue
    pub const PLANK_HIP_SAG_SIGNIFICANT: f64 = 30.0;

    /// Neck deviation from the spine line that starts a neck-strain issue
    pub const NECK_DEVIATION_TRIGGER: f64 = 30.0;
    /// Neck deviation for a significant issue
    pub const NECK_DEVIATION_SIGNIFICANT: f64 = 45.0;

    /// Down-phase duration (ms) under which a rep is too fast at the reference level
    pub const FAST_REP_MS: u64 = 500;
    /// Fraction of the fast-rep threshold under which pace is a significant issue
    pub const FAST_REP_SIGNIFICANT_FRACTION: f64 = 0.5;
    /// Fraction of the fast-rep threshold under which pace is a moderate issue
    pub const FAST_REP_MODERATE_FRACTION: f64 = 0.75;

    /// Degrees past the full-depth band at which a partial rep is a moderate range issue
    pub const LIMITED_RANGE_MODERATE: f64 = 5.0;
    /// Degrees past the full-depth band at which a partial rep is a significant range issue
    pub const LIMITED_RANGE_SIGNIFICANT: f64 = 7.5;
}
