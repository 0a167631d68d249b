// ABOUTME: Core types and constants for the Pierre motion analysis core
// ABOUTME: Foundation crate with landmark vocabulary, exercise taxonomy, error handling, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Motion Core
//!
//! Foundation crate providing shared types and constants for real-time
//! motion analysis. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Built-in defaults organized by component
//! - **models**: Landmarks, pose frames, exercise kinds, phases, and the form issue taxonomy

/// Unified error handling system with standard error codes
pub mod errors;

/// Built-in defaults organized by domain
pub mod constants;

/// Core data models (`Landmark`, `PoseFrame`, `ExerciseKind`, `FormIssueKind`, etc.)
pub mod models;
