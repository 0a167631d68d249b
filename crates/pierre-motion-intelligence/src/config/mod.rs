// ABOUTME: Configuration module for the motion analysis engine
// ABOUTME: MotionConfig aggregates smoothing, angle, feedback, and per-exercise threshold settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Motion Configuration Module
//!
//! Built-in defaults come from `pierre_motion_core::constants`. All values can
//! be overridden via environment variables with the `MOTION_` prefix. The
//! caller loads the configuration once and injects it into each component;
//! there is no process-wide singleton.

mod error;
mod thresholds;

pub use error::ConfigError;
pub use thresholds::{
    CalibratedThresholds, CalibrationProfile, ExerciseDefaults, RangeOfMotion, ThresholdOverride,
    ThresholdProfile,
};

use pierre_motion_core::constants::{angles, feedback, smoothing};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::warn;

// ============================================================================
// Main Configuration
// ============================================================================

/// Motion analysis configuration container
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Landmark smoothing stage
    pub smoothing: SmoothingConfig,
    /// Joint angle derivation
    pub angles: AngleConfig,
    /// Form feedback rate limits
    pub feedback: FeedbackConfig,
    /// Built-in threshold profile per exercise
    pub exercises: ExerciseDefaults,
}

impl MotionConfig {
    /// Load configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config = config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment, falling back to built-in defaults
    ///
    /// A rejected environment is logged at warn level and otherwise ignored.
    #[must_use]
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load motion config, using defaults");
            Self::default()
        })
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.smoothing.validate()?;
        self.angles.validate()?;
        self.feedback.validate()?;
        self.exercises.validate()
    }

    /// Parse an environment variable into `target` when it is set
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Smoothing stage
        Self::apply_env_var("MOTION_SMOOTHING_ALPHA", &mut self.smoothing.alpha)?;
        Self::apply_env_var("MOTION_SMOOTHING_WINDOW", &mut self.smoothing.window_size)?;
        Self::apply_env_var(
            "MOTION_INTERPOLATION_CONFIDENCE",
            &mut self.smoothing.interpolation_confidence,
        )?;
        Self::apply_env_var(
            "MOTION_STABILITY_VARIANCE",
            &mut self.smoothing.stability_variance,
        )?;

        // Angle model
        Self::apply_env_var("MOTION_JOINT_CONFIDENCE", &mut self.angles.joint_confidence)?;
        Self::apply_env_var(
            "MOTION_ANGLE_AVERAGE_WINDOW",
            &mut self.angles.counter_average_window,
        )?;

        // Feedback rate limits
        Self::apply_env_var("MOTION_FEEDBACK_COOLDOWN_MS", &mut self.feedback.cooldown_ms)?;
        Self::apply_env_var(
            "MOTION_FEEDBACK_MAX_PER_WINDOW",
            &mut self.feedback.max_issues_per_window,
        )?;
        Self::apply_env_var("MOTION_FEEDBACK_WINDOW_MS", &mut self.feedback.window_ms)?;

        Ok(self)
    }
}

// ============================================================================
// Sub-Configurations
// ============================================================================

/// Smoothing stage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Samples kept per landmark per axis
    pub window_size: usize,
    /// EMA responsiveness factor in (0, 1]
    pub alpha: f64,
    /// Landmarks below this confidence are interpolated from history
    pub interpolation_confidence: f64,
    /// Confidence multiplier applied to interpolated landmarks
    pub synthesized_confidence_decay: f64,
    /// Mean variance threshold for `is_stable`
    pub stability_variance: f64,
}

impl SmoothingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "smoothing window_size must be > 0",
            ));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(ConfigError::InvalidRange(
                "smoothing alpha must be in (0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.interpolation_confidence) {
            return Err(ConfigError::InvalidRange(
                "interpolation_confidence must be between 0 and 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.synthesized_confidence_decay) {
            return Err(ConfigError::InvalidRange(
                "synthesized_confidence_decay must be between 0 and 1",
            ));
        }
        if !(self.stability_variance.is_finite() && self.stability_variance >= 0.0) {
            return Err(ConfigError::ValueOutOfRange(
                "stability_variance must be a non-negative number",
            ));
        }
        Ok(())
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window_size: smoothing::HISTORY_WINDOW,
            alpha: smoothing::EMA_ALPHA,
            interpolation_confidence: smoothing::INTERPOLATION_CONFIDENCE,
            synthesized_confidence_decay: smoothing::SYNTHESIZED_CONFIDENCE_DECAY,
            stability_variance: smoothing::STABILITY_VARIANCE,
        }
    }
}

/// Angle model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleConfig {
    /// Minimum confidence for every landmark of a joint triple
    pub joint_confidence: f64,
    /// Moving-average window the counter applies to the primary angle
    pub counter_average_window: usize,
}

impl AngleConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.joint_confidence) {
            return Err(ConfigError::InvalidRange(
                "joint_confidence must be between 0 and 1",
            ));
        }
        if self.counter_average_window == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "counter_average_window must be > 0",
            ));
        }
        Ok(())
    }
}

impl Default for AngleConfig {
    fn default() -> Self {
        Self {
            joint_confidence: angles::JOINT_CONFIDENCE,
            counter_average_window: angles::COUNTER_AVERAGE_WINDOW,
        }
    }
}

/// Form feedback rate-limit configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Minimum time between two emissions of the same issue kind
    pub cooldown_ms: u64,
    /// Maximum issues emitted inside one rolling window
    pub max_issues_per_window: usize,
    /// Rolling window length
    pub window_ms: u64,
}

impl FeedbackConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.cooldown_ms == 0 {
            return Err(ConfigError::ValueOutOfRange("cooldown_ms must be > 0"));
        }
        if self.window_ms == 0 {
            return Err(ConfigError::ValueOutOfRange("window_ms must be > 0"));
        }
        if self.max_issues_per_window == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "max_issues_per_window must be > 0",
            ));
        }
        Ok(())
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: feedback::ISSUE_COOLDOWN_MS,
            max_issues_per_window: feedback::MAX_ISSUES_PER_WINDOW,
            window_ms: feedback::ROLLING_WINDOW_MS,
        }
    }
}
