// ABOUTME: Configuration error types for motion analysis validation
// ABOUTME: Defines error variants for invalid ranges, threshold profiles, and calibration data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration error types for motion analysis validation.

use pierre_motion_core::errors::{AppError, ErrorCode};
use pierre_motion_core::models::ExerciseKind;
use std::env;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value outside acceptable range (e.g., window size of zero)
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Required configuration field is missing
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Environment variable access or parse error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] env::VarError),

    /// Failed to parse configuration value
    #[error("Parse error: {0}")]
    Parse(String),

    /// Numeric value outside valid range for parameter
    #[error("Value out of range: {0}")]
    ValueOutOfRange(&'static str),

    /// Threshold profile would miscount repetitions
    #[error("Invalid thresholds for {exercise}: {reason}")]
    InvalidThresholds {
        /// Exercise the profile belongs to
        exercise: ExerciseKind,
        /// What is wrong with it
        reason: String,
    },

    /// Calibration data is internally inconsistent
    #[error("Malformed calibration: {0}")]
    MalformedCalibration(String),
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let code = match &error {
            ConfigError::MissingField(_) => ErrorCode::ConfigMissing,
            ConfigError::EnvVar(_) | ConfigError::Parse(_) => ErrorCode::ConfigError,
            _ => ErrorCode::ConfigInvalid,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}
