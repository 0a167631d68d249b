// ABOUTME: Core data models for the motion analysis pipeline
// ABOUTME: Re-exports landmarks, pose frames, exercise taxonomy, and feedback vocabulary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Value types shared by every stage of the per-frame pipeline. Landmarks
//! and frames are produced once per frame by the pose-estimation
//! collaborator and never mutated; everything else is a closed enumeration
//! fixed at compile time.

mod exercise;
mod feedback;
mod landmark;

pub use exercise::{ExerciseKind, FitnessLevel, Phase};
pub use feedback::{FormIssueKind, Locale, Severity, UnknownGender, UserGender};
pub use landmark::{Landmark, LandmarkId, Point2, PoseFrame, Side, UnknownLandmark};
