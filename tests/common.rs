// ABOUTME: Shared synthetic-frame builders for motion integration tests
// ABOUTME: Generates squat sweeps and drives counters and sessions with a manual clock
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::cast_precision_loss
)]
//! Shared test utilities for `pierre_motion`
//!
//! Frames place the left knee at (0.5, 0.7) and the left ankle directly
//! below it at (0.5, 0.9); the hip sits on a 0.2 radius around the knee so
//! that the knee angle equals the requested angle exactly.

use pierre_motion::clock::ManualClock;
use pierre_motion::models::{Landmark, LandmarkId, PoseFrame};
use pierre_motion::rep_counter::{RepCounter, RepEvent};
use pierre_motion::session::{FrameReport, MotionSession};

/// Confidence used for all synthetic landmarks
pub const CONFIDENCE: f64 = 0.9;

/// Default frame interval (~30 Hz)
pub const FRAME_MS: u64 = 33;

/// Left-side hip/knee/ankle frame with the given knee angle in degrees
pub fn squat_frame(knee_angle: f64) -> PoseFrame {
    squat_frame_with_confidence(knee_angle, CONFIDENCE)
}

/// Same as [`squat_frame`] with an explicit landmark confidence
pub fn squat_frame_with_confidence(knee_angle: f64, confidence: f64) -> PoseFrame {
    let theta = knee_angle.to_radians();
    PoseFrame::new(vec![
        Landmark::new(
            LandmarkId::LeftHip,
            0.2f64.mul_add(theta.sin(), 0.5),
            0.2f64.mul_add(theta.cos(), 0.7),
            confidence,
        ),
        Landmark::new(LandmarkId::LeftKnee, 0.5, 0.7, confidence),
        Landmark::new(LandmarkId::LeftAnkle, 0.5, 0.9, confidence),
    ])
}

/// Knee angles for one rep: linear descent, `hold` frames at the bottom, linear ascent
pub fn sweep(top: f64, bottom: f64, duration_ms: u64, frame_ms: u64, hold: usize) -> Vec<f64> {
    let steps = (duration_ms / 2 / frame_ms).max(1);
    let n = steps as f64;
    let down = (0..=steps).map(|i| (bottom - top).mul_add(i as f64 / n, top));
    let bottom_hold = std::iter::repeat_n(bottom, hold);
    let up = (1..=steps).map(|i| (top - bottom).mul_add(i as f64 / n, bottom));
    down.chain(bottom_hold).chain(up).collect()
}

/// Feed angles to a counter, one frame every `frame_ms` starting at `start_ms`
///
/// Returns the closure events and the timestamp after the last frame.
pub fn drive_counter(
    counter: &mut RepCounter<ManualClock>,
    clock: &ManualClock,
    angles: &[f64],
    start_ms: u64,
    frame_ms: u64,
) -> (Vec<RepEvent>, u64) {
    let mut now = start_ms;
    let mut events = Vec::new();
    for angle in angles {
        clock.set(now);
        if let Some(event) = counter.process_frame(&squat_frame(*angle)).last_event {
            events.push(event);
        }
        now += frame_ms;
    }
    (events, now)
}

/// Feed angles to a session, one frame every `frame_ms` starting at `start_ms`
///
/// Returns every frame report and the timestamp after the last frame.
pub fn drive_session(
    session: &mut MotionSession<ManualClock>,
    clock: &ManualClock,
    angles: &[f64],
    start_ms: u64,
    frame_ms: u64,
) -> (Vec<FrameReport>, u64) {
    let mut now = start_ms;
    let mut reports = Vec::with_capacity(angles.len());
    for angle in angles {
        clock.set(now);
        reports.push(session.process_frame(&squat_frame(*angle)));
        now += frame_ms;
    }
    (reports, now)
}

/// Squat frame with both legs, knees displaced horizontally from the ankles
pub fn knee_offset_frame(offset: f64) -> PoseFrame {
    PoseFrame::new(vec![
        Landmark::new(LandmarkId::LeftHip, 0.45, 0.5, CONFIDENCE),
        Landmark::new(LandmarkId::RightHip, 0.55, 0.5, CONFIDENCE),
        Landmark::new(LandmarkId::LeftKnee, 0.45 + offset, 0.7, CONFIDENCE),
        Landmark::new(LandmarkId::RightKnee, 0.55 + offset, 0.7, CONFIDENCE),
        Landmark::new(LandmarkId::LeftAnkle, 0.45, 0.9, CONFIDENCE),
        Landmark::new(LandmarkId::RightAnkle, 0.55, 0.9, CONFIDENCE),
    ])
}
