// ABOUTME: Real-time motion analysis engine for camera-based workouts
// ABOUTME: Smoothing, joint angles, repetition counting, and rate-limited form feedback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Motion Intelligence
//!
//! Four components, each exclusively owned by one exercise session and driven
//! synchronously once per frame:
//!
//! - **smoothing**: jitter rejection and low-confidence interpolation
//! - **angles**: pure joint-angle geometry with confidence gating
//! - **`rep_counter`**: debounced phase state machine with rep quality scoring
//! - **`form_analyzer`**: per-exercise form rules with severity grading and rate limiting
//!
//! Timing is read from an injected [`clock::Clock`], and configuration is
//! resolved once into [`config::MotionConfig`] and [`config::ThresholdProfile`]
//! values passed to constructors.

/// Joint-angle geometry
pub mod angles;

/// Injectable monotonic clock
pub mod clock;

/// Validated configuration and threshold profiles
pub mod config;

/// Localized, gendered feedback messages
pub mod feedback_catalog;

/// Form rule engine
pub mod form_analyzer;

/// Repetition state machine
pub mod rep_counter;

/// Landmark smoothing stage
pub mod smoothing;

pub use angles::{AngleModel, AngleReading, ExerciseAngles, Joint};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, MotionConfig, ThresholdProfile};
pub use feedback_catalog::FeedbackCatalog;
pub use form_analyzer::{
    get_recommendations, FormAnalysis, FormAnalyzer, FormIssue, Recommendation,
};
pub use rep_counter::{
    CounterState, RejectReason, RepCounter, RepEvent, RepFrameResult, RepOutcome, RepStats,
};
pub use smoothing::{LandmarkSmoother, PositionVariance};
