// ABOUTME: Pure joint-angle geometry over landmark triples
// ABOUTME: Confidence-gated per-joint helpers and per-exercise primary/secondary angle selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Angle Model
//!
//! Joint angles are measured at the middle landmark of a triple using the
//! dot-product identity `cos(θ) = (v1 · v2) / (|v1| × |v2|)`. Every helper is
//! pure. A joint whose landmarks are missing or below the confidence
//! threshold yields [`AngleReading::Unavailable`], never a number derived
//! from an unreliable landmark.

use pierre_motion_core::constants::angles::{DEGENERATE_VECTOR_LENGTH, FULLY_EXTENDED_DEGREES};
use pierre_motion_core::models::{ExerciseKind, LandmarkId, Point2, PoseFrame, Side};
use serde::{Deserialize, Serialize};

use crate::config::AngleConfig;

/// Result of measuring one joint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "degrees")]
pub enum AngleReading {
    /// Angle in degrees
    Measured(f64),
    /// At least one landmark was missing or unreliable
    Unavailable,
}

impl AngleReading {
    /// Degrees, if measured
    #[must_use]
    pub const fn degrees(self) -> Option<f64> {
        match self {
            Self::Measured(degrees) => Some(degrees),
            Self::Unavailable => None,
        }
    }

    /// Degrees, or `fallback` when unavailable
    #[must_use]
    pub fn unwrap_or(self, fallback: f64) -> f64 {
        self.degrees().unwrap_or(fallback)
    }

    /// Whether a value was measured
    #[must_use]
    pub const fn is_measured(self) -> bool {
        matches!(self, Self::Measured(_))
    }

    /// Average both sides when available, otherwise whichever side exists
    #[must_use]
    pub fn combine(left: Self, right: Self) -> Self {
        match (left, right) {
            (Self::Measured(l), Self::Measured(r)) => Self::Measured((l + r) / 2.0),
            (Self::Measured(value), Self::Unavailable)
            | (Self::Unavailable, Self::Measured(value)) => Self::Measured(value),
            (Self::Unavailable, Self::Unavailable) => Self::Unavailable,
        }
    }
}

/// Angles reported for one exercise on one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExerciseAngles {
    /// Angle that drives repetition counting
    pub primary: f64,
    /// Supporting angle, for exercises that have one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<f64>,
    /// Highest primary angle seen in the current phase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak: Option<f64>,
    /// Lowest primary angle seen in the current phase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valley: Option<f64>,
}

/// Angle at `vertex` between the rays towards `p1` and `p3`, in degrees
///
/// Degenerate (zero-length) rays yield 180°.
#[must_use]
pub fn angle_at_vertex(p1: Point2, vertex: Point2, p3: Point2) -> f64 {
    let (ax, ay) = vertex.to(p1);
    let (bx, by) = vertex.to(p3);

    let magnitude_a = ax.hypot(ay);
    let magnitude_b = bx.hypot(by);
    if magnitude_a < DEGENERATE_VECTOR_LENGTH || magnitude_b < DEGENERATE_VECTOR_LENGTH {
        return FULLY_EXTENDED_DEGREES;
    }

    let dot = ax.mul_add(bx, ay * by);
    let cos_angle = (dot / (magnitude_a * magnitude_b)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Joints measured by the model, each a (end, vertex, end) landmark triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joint {
    /// Hip - knee - ankle
    Knee,
    /// Shoulder - elbow - wrist
    Elbow,
    /// Shoulder - hip - knee
    Hip,
    /// Shoulder - hip - ankle (straight body line = 180°)
    BodyLine,
    /// Hip - shoulder - wrist (arm raised overhead approaches 180°)
    ShoulderAbduction,
}

impl Joint {
    /// Landmark triple for this joint on one side, vertex in the middle
    #[must_use]
    pub const fn landmarks(self, side: Side) -> [LandmarkId; 3] {
        match self {
            Self::Knee => [
                LandmarkId::hip(side),
                LandmarkId::knee(side),
                LandmarkId::ankle(side),
            ],
            Self::Elbow => [
                LandmarkId::shoulder(side),
                LandmarkId::elbow(side),
                LandmarkId::wrist(side),
            ],
            Self::Hip => [
                LandmarkId::shoulder(side),
                LandmarkId::hip(side),
                LandmarkId::knee(side),
            ],
            Self::BodyLine => [
                LandmarkId::shoulder(side),
                LandmarkId::hip(side),
                LandmarkId::ankle(side),
            ],
            Self::ShoulderAbduction => [
                LandmarkId::hip(side),
                LandmarkId::shoulder(side),
                LandmarkId::wrist(side),
            ],
        }
    }
}

/// Joint-angle derivation with a fixed confidence gate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleModel {
    joint_confidence: f64,
}

impl Default for AngleModel {
    fn default() -> Self {
        Self::new(&AngleConfig::default())
    }
}

impl AngleModel {
    /// Create a model from configuration
    #[must_use]
    pub const fn new(config: &AngleConfig) -> Self {
        Self {
            joint_confidence: config.joint_confidence,
        }
    }

    /// Minimum landmark confidence required to measure a joint
    #[must_use]
    pub const fn joint_confidence(&self) -> f64 {
        self.joint_confidence
    }

    /// Measure a joint on one side
    #[must_use]
    pub fn joint_angle(&self, frame: &PoseFrame, joint: Joint, side: Side) -> AngleReading {
        frame
            .confident_points(joint.landmarks(side), self.joint_confidence)
            .map_or(AngleReading::Unavailable, |[p1, vertex, p3]| {
                AngleReading::Measured(angle_at_vertex(p1, vertex, p3))
            })
    }

    /// Knee angle (hip - knee - ankle)
    #[must_use]
    pub fn knee_angle(&self, frame: &PoseFrame, side: Side) -> AngleReading {
        self.joint_angle(frame, Joint::Knee, side)
    }

    /// Elbow angle (shoulder - elbow - wrist)
    #[must_use]
    pub fn elbow_angle(&self, frame: &PoseFrame, side: Side) -> AngleReading {
        self.joint_angle(frame, Joint::Elbow, side)
    }

    /// Hip angle (shoulder - hip - knee)
    #[must_use]
    pub fn hip_angle(&self, frame: &PoseFrame, side: Side) -> AngleReading {
        self.joint_angle(frame, Joint::Hip, side)
    }

    /// Body-line alignment angle (shoulder - hip - ankle)
    #[must_use]
    pub fn body_line_angle(&self, frame: &PoseFrame, side: Side) -> AngleReading {
        self.joint_angle(frame, Joint::BodyLine, side)
    }

    /// Joint measured on both sides and combined
    #[must_use]
    pub fn symmetric_angle(&self, frame: &PoseFrame, joint: Joint) -> AngleReading {
        AngleReading::combine(
            self.joint_angle(frame, joint, Side::Left),
            self.joint_angle(frame, joint, Side::Right),
        )
    }

    /// Primary angle for an exercise, unavailable when neither side is measurable
    #[must_use]
    pub fn primary_reading(&self, frame: &PoseFrame, exercise: ExerciseKind) -> AngleReading {
        self.symmetric_angle(frame, primary_joint(exercise))
    }

    /// Primary and secondary angles for an exercise
    ///
    /// Unmeasurable angles default to 180° (fully extended). Peak and valley
    /// are left empty; they are phase state owned by the repetition counter.
    #[must_use]
    pub fn exercise_angles(&self, frame: &PoseFrame, exercise: ExerciseKind) -> ExerciseAngles {
        ExerciseAngles {
            primary: self
                .primary_reading(frame, exercise)
                .unwrap_or(FULLY_EXTENDED_DEGREES),
            secondary: secondary_joint(exercise).map(|joint| {
                self.symmetric_angle(frame, joint)
                    .unwrap_or(FULLY_EXTENDED_DEGREES)
            }),
            peak: None,
            valley: None,
        }
    }
}

/// Joint whose angle drives counting for an exercise
#[must_use]
pub const fn primary_joint(exercise: ExerciseKind) -> Joint {
    match exercise {
        ExerciseKind::Squat | ExerciseKind::Lunge => Joint::Knee,
        ExerciseKind::PushUp => Joint::Elbow,
        ExerciseKind::SitUp => Joint::Hip,
        ExerciseKind::Plank => Joint::BodyLine,
        ExerciseKind::JumpingJack => Joint::ShoulderAbduction,
    }
}

/// Supporting joint reported alongside the primary angle
#[must_use]
pub const fn secondary_joint(exercise: ExerciseKind) -> Option<Joint> {
    match exercise {
        ExerciseKind::Squat | ExerciseKind::Lunge => Some(Joint::Hip),
        ExerciseKind::PushUp => Some(Joint::BodyLine),
        ExerciseKind::SitUp | ExerciseKind::Plank | ExerciseKind::JumpingJack => None,
    }
}
