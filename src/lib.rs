// ABOUTME: Main library entry point for the Pierre motion analysis workspace
// ABOUTME: Composes rep counting and form feedback into per-frame exercise sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Motion
//!
//! Real-time motion analysis for a camera-based workout assistant. Each
//! frame of 2D body landmarks from a pose estimator is smoothed, turned into
//! joint angles, fed to a repetition state machine and checked against
//! per-exercise form rules.
//!
//! ## Architecture
//!
//! - **`pierre_motion_core`**: landmark vocabulary, exercise taxonomy, errors, constants
//! - **`pierre_motion_intelligence`**: smoothing, angles, rep counter, form analyzer, config
//! - **`session`**: one exclusively owned pipeline per exercise session
//! - **`recording`**: JSON frame recordings for deterministic replay
//! - **`logging`**: structured logging setup for binaries
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_motion::models::{ExerciseKind, FitnessLevel, PoseFrame};
//! use pierre_motion::session::MotionSession;
//!
//! # fn main() -> Result<(), pierre_motion::config::ConfigError> {
//! let mut session = MotionSession::with_defaults(ExerciseKind::Squat, FitnessLevel::Beginner)?;
//! let report = session.process_frame(&PoseFrame::default());
//! println!("reps: {}", report.reps.total_reps);
//! # Ok(())
//! # }
//! ```

/// Structured logging setup
pub mod logging;

/// JSON frame recordings and replay
pub mod recording;

/// Per-exercise session pipeline
pub mod session;

pub use pierre_motion_core::{constants, errors, models};
pub use pierre_motion_intelligence::{
    angles, clock, config, feedback_catalog, form_analyzer, rep_counter, smoothing,
};
