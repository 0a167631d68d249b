// ABOUTME: Per-exercise threshold profiles and their precedence resolution
// ABOUTME: Built-in defaults shadowed by calibration data and explicit overrides, validated once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Threshold profiles
//!
//! A profile is resolved once per session in the order
//! built-in default < calibration < explicit override and validated as a
//! whole. Counting never re-merges layers per frame.

use pierre_motion_core::constants::repetition::FULL_DEPTH_BAND_FRACTION;
use pierre_motion_core::models::ExerciseKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ConfigError;

/// Largest joint angle the model can report
const MAX_JOINT_ANGLE: f64 = 180.0;

/// Flat, validated thresholds for one exercise kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdProfile {
    /// Angle (degrees) that defines "fully down"
    pub down_angle: f64,
    /// Angle (degrees) that defines "fully up"
    pub up_angle: f64,
    /// Safe-zone width applied to both boundaries
    pub tolerance: f64,
    /// Shortest plausible repetition in milliseconds
    pub min_rep_duration_ms: u64,
    /// Longest plausible repetition in milliseconds
    pub max_rep_duration_ms: u64,
    /// Minimum time between two accepted repetitions in milliseconds
    pub debounce_ms: u64,
}

impl ThresholdProfile {
    /// Angle at or below which the counter enters the down phase
    #[must_use]
    pub fn down_entry_angle(&self) -> f64 {
        self.down_angle + self.tolerance
    }

    /// Angle at or above which the counter attempts to close a repetition
    #[must_use]
    pub fn up_exit_angle(&self) -> f64 {
        self.up_angle - self.tolerance
    }

    /// Deepest valley that still counts as a full repetition
    #[must_use]
    pub fn full_depth_limit(&self) -> f64 {
        self.tolerance.mul_add(FULL_DEPTH_BAND_FRACTION, self.down_angle)
    }

    /// Validate the profile for the given exercise
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidThresholds` when the up angle does not
    /// exceed the down angle, the safe zones overlap, a value is not finite or
    /// negative, or the minimum duration exceeds the maximum
    pub fn validate(&self, exercise: ExerciseKind) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidThresholds { exercise, reason };

        for (name, value) in [
            ("down_angle", self.down_angle),
            ("up_angle", self.up_angle),
            ("tolerance", self.tolerance),
        ] {
            if !value.is_finite() {
                return Err(invalid(format!("{name} must be finite")));
            }
            if !(0.0..=MAX_JOINT_ANGLE).contains(&value) {
                return Err(invalid(format!(
                    "{name} must be between 0 and {MAX_JOINT_ANGLE} degrees, got {value}"
                )));
            }
        }

        if self.up_angle <= self.down_angle {
            return Err(invalid(format!(
                "up angle ({}) must exceed down angle ({})",
                self.up_angle, self.down_angle
            )));
        }

        if self.down_entry_angle() >= self.up_exit_angle() {
            return Err(invalid(format!(
                "tolerance {} makes the down zone ({}) overlap the up zone ({})",
                self.tolerance,
                self.down_entry_angle(),
                self.up_exit_angle()
            )));
        }

        if self.min_rep_duration_ms > self.max_rep_duration_ms {
            return Err(invalid(format!(
                "min rep duration ({} ms) exceeds max rep duration ({} ms)",
                self.min_rep_duration_ms, self.max_rep_duration_ms
            )));
        }

        Ok(())
    }

    /// Resolve default < calibration < override into one validated profile
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MalformedCalibration` if the calibration data is
    /// inconsistent, or `ConfigError::InvalidThresholds` if the merged profile
    /// is invalid
    pub fn resolve(
        exercise: ExerciseKind,
        defaults: &ExerciseDefaults,
        calibration: Option<&CalibrationProfile>,
        threshold_override: Option<&ThresholdOverride>,
    ) -> Result<Self, ConfigError> {
        let mut profile = *defaults.get(exercise);

        if let Some(calibration) = calibration {
            calibration.validate()?;
            calibration.apply(exercise, &mut profile);
        }

        if let Some(threshold_override) = threshold_override {
            threshold_override.apply(&mut profile);
        }

        profile.validate(exercise)?;
        Ok(profile)
    }
}

/// Built-in threshold profile for every exercise kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDefaults {
    /// Squat (knee angle)
    pub squat: ThresholdProfile,
    /// Push-up (elbow angle)
    pub push_up: ThresholdProfile,
    /// Sit-up (hip angle)
    pub sit_up: ThresholdProfile,
    /// Plank (body-line angle)
    pub plank: ThresholdProfile,
    /// Lunge (knee angle)
    pub lunge: ThresholdProfile,
    /// Jumping jack (shoulder abduction angle)
    pub jumping_jack: ThresholdProfile,
}

impl ExerciseDefaults {
    /// Profile for an exercise
    #[must_use]
    pub const fn get(&self, exercise: ExerciseKind) -> &ThresholdProfile {
        match exercise {
            ExerciseKind::Squat => &self.squat,
            ExerciseKind::PushUp => &self.push_up,
            ExerciseKind::SitUp => &self.sit_up,
            ExerciseKind::Plank => &self.plank,
            ExerciseKind::Lunge => &self.lunge,
            ExerciseKind::JumpingJack => &self.jumping_jack,
        }
    }

    /// Mutable profile for an exercise
    pub fn get_mut(&mut self, exercise: ExerciseKind) -> &mut ThresholdProfile {
        match exercise {
            ExerciseKind::Squat => &mut self.squat,
            ExerciseKind::PushUp => &mut self.push_up,
            ExerciseKind::SitUp => &mut self.sit_up,
            ExerciseKind::Plank => &mut self.plank,
            ExerciseKind::Lunge => &mut self.lunge,
            ExerciseKind::JumpingJack => &mut self.jumping_jack,
        }
    }

    /// Validate every built-in profile
    ///
    /// # Errors
    ///
    /// Returns the first profile validation failure
    pub fn validate(&self) -> Result<(), ConfigError> {
        ExerciseKind::ALL
            .into_iter()
            .try_for_each(|exercise| self.get(exercise).validate(exercise))
    }
}

impl Default for ExerciseDefaults {
    fn default() -> Self {
        Self {
            squat: ThresholdProfile {
                down_angle: 100.0,
                up_angle: 160.0,
                tolerance: 15.0,
                min_rep_duration_ms: 400,
                max_rep_duration_ms: 8_000,
                debounce_ms: 500,
            },
            push_up: ThresholdProfile {
                down_angle: 90.0,
                up_angle: 155.0,
                tolerance: 15.0,
                min_rep_duration_ms: 400,
                max_rep_duration_ms: 8_000,
                debounce_ms: 500,
            },
            sit_up: ThresholdProfile {
                down_angle: 70.0,
                up_angle: 130.0,
                tolerance: 15.0,
                min_rep_duration_ms: 500,
                max_rep_duration_ms: 8_000,
                debounce_ms: 500,
            },
            plank: ThresholdProfile {
                down_angle: 150.0,
                up_angle: 175.0,
                tolerance: 5.0,
                min_rep_duration_ms: 1_000,
                max_rep_duration_ms: 120_000,
                debounce_ms: 1_000,
            },
            lunge: ThresholdProfile {
                down_angle: 100.0,
                up_angle: 160.0,
                tolerance: 15.0,
                min_rep_duration_ms: 500,
                max_rep_duration_ms: 8_000,
                debounce_ms: 600,
            },
            jumping_jack: ThresholdProfile {
                down_angle: 40.0,
                up_angle: 150.0,
                tolerance: 20.0,
                min_rep_duration_ms: 300,
                max_rep_duration_ms: 4_000,
                debounce_ms: 300,
            },
        }
    }
}

/// Range of motion a user comfortably reaches for one exercise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeOfMotion {
    /// Smallest primary angle reached (bottom of the movement)
    pub min_angle: f64,
    /// Largest primary angle reached (top of the movement)
    pub max_angle: f64,
}

/// Thresholds measured during a calibration flow
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalibratedThresholds {
    /// Measured "fully down" angle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep_down_angle: Option<f64>,
    /// Measured "fully up" angle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep_up_angle: Option<f64>,
    /// Measured safe-zone tolerance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_zone_tolerance: Option<f64>,
}

/// Calibration data derived out-of-band from the user's own movement
///
/// Range-of-motion entries set the down/up angles for their exercise; the
/// calibrated thresholds, when present, shadow those for any exercise.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalibrationProfile {
    /// Measured range of motion per exercise
    #[serde(default)]
    pub range_of_motion: BTreeMap<ExerciseKind, RangeOfMotion>,
    /// Explicitly calibrated thresholds
    #[serde(default)]
    pub thresholds: CalibratedThresholds,
}

impl CalibrationProfile {
    /// Check that every measurement is a plausible joint angle
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MalformedCalibration` on non-finite or
    /// out-of-range angles, a negative tolerance, or an inverted range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let check_angle = |name: &str, value: f64| {
            if value.is_finite() && (0.0..=MAX_JOINT_ANGLE).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::MalformedCalibration(format!(
                    "{name} must be a finite angle between 0 and {MAX_JOINT_ANGLE}, got {value}"
                )))
            }
        };

        for (exercise, range) in &self.range_of_motion {
            check_angle("range_of_motion.min_angle", range.min_angle)?;
            check_angle("range_of_motion.max_angle", range.max_angle)?;
            if range.min_angle >= range.max_angle {
                return Err(ConfigError::MalformedCalibration(format!(
                    "{exercise} range of motion is inverted ({} >= {})",
                    range.min_angle, range.max_angle
                )));
            }
        }

        if let Some(down) = self.thresholds.rep_down_angle {
            check_angle("rep_down_angle", down)?;
        }
        if let Some(up) = self.thresholds.rep_up_angle {
            check_angle("rep_up_angle", up)?;
        }
        if let Some(tolerance) = self.thresholds.safe_zone_tolerance {
            check_angle("safe_zone_tolerance", tolerance)?;
        }

        Ok(())
    }

    fn apply(&self, exercise: ExerciseKind, profile: &mut ThresholdProfile) {
        if let Some(range) = self.range_of_motion.get(&exercise) {
            profile.down_angle = range.min_angle;
            profile.up_angle = range.max_angle;
        }
        if let Some(down) = self.thresholds.rep_down_angle {
            profile.down_angle = down;
        }
        if let Some(up) = self.thresholds.rep_up_angle {
            profile.up_angle = up;
        }
        if let Some(tolerance) = self.thresholds.safe_zone_tolerance {
            profile.tolerance = tolerance;
        }
    }
}

/// Explicit per-field override supplied by a session collaborator
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThresholdOverride {
    /// Override for `down_angle`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_angle: Option<f64>,
    /// Override for `up_angle`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_angle: Option<f64>,
    /// Override for `tolerance`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    /// Override for `min_rep_duration_ms`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rep_duration_ms: Option<u64>,
    /// Override for `max_rep_duration_ms`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rep_duration_ms: Option<u64>,
    /// Override for `debounce_ms`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
}

impl ThresholdOverride {
    fn apply(&self, profile: &mut ThresholdProfile) {
        if let Some(value) = self.down_angle {
            profile.down_angle = value;
        }
        if let Some(value) = self.up_angle {
            profile.up_angle = value;
        }
        if let Some(value) = self.tolerance {
            profile.tolerance = value;
        }
        if let Some(value) = self.min_rep_duration_ms {
            profile.min_rep_duration_ms = value;
        }
        if let Some(value) = self.max_rep_duration_ms {
            profile.max_rep_duration_ms = value;
        }
        if let Some(value) = self.debounce_ms {
            profile.debounce_ms = value;
        }
    }
}
