// ABOUTME: Debounced up/down phase state machine that counts repetitions from a landmark stream
// ABOUTME: Classifies each closure as full, partial, or rejected and scores rep quality
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Repetition State Machine
//!
//! Per frame the counter smooths landmarks, measures the exercise's primary
//! angle, applies a short moving average and then evaluates the transition
//! rule:
//!
//! - `Up` → `Down` when the angle reaches `down_angle + tolerance` or below
//! - `Down` → `Up` when the angle reaches `up_angle - tolerance` or above; this
//!   attempts to close a repetition, gated by the debounce interval since the
//!   last accepted rep and the minimum rep duration since the phase began
//!
//! A closure that passes both guards is classified by the valley reached:
//! at or past `down_angle` it is a full rep scored at 100, inside the
//! full-depth band it is a full rep scored linearly down to 60, and anything
//! shallower is a partial rep counted separately. Every closure attempt resets
//! the valley and peak and restarts the phase timer.

use pierre_motion_core::constants::repetition::{
    BAND_EDGE_QUALITY, FORCED_REP_QUALITY, MAX_QUALITY, PARTIAL_PENALTY_PER_DEGREE,
    PARTIAL_QUALITY_FLOOR, PEAK_RESET_DEGREES, VALLEY_RESET_DEGREES,
};
use pierre_motion_core::models::{ExerciseKind, Phase, PoseFrame};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info};

use crate::angles::{AngleModel, ExerciseAngles};
use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, MotionConfig, ThresholdProfile};
use crate::smoothing::LandmarkSmoother;

/// Why a closure attempt did not record a repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Too soon after the last accepted repetition
    Debounce,
    /// The down phase was shorter than the minimum rep duration
    TooShort,
}

/// Classification of one closure attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepOutcome {
    /// Counted towards the total
    Full,
    /// Counted separately; the valley stayed short of the full-depth band
    Partial,
    /// Not counted
    Rejected(RejectReason),
}

/// Outcome of one `Down` → `Up` closure attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepEvent {
    /// How the attempt was classified
    pub outcome: RepOutcome,
    /// Quality score for full and partial reps
    pub quality: Option<f64>,
    /// Lowest smoothed primary angle reached
    pub valley_angle: f64,
    /// Time spent in the down phase
    pub duration_ms: u64,
    /// The rep took longer than the maximum plausible duration
    pub exceeded_max_duration: bool,
    /// Clock reading at closure
    pub timestamp_ms: u64,
}

impl RepEvent {
    /// Whether the attempt added to the total count
    #[must_use]
    pub const fn is_full(&self) -> bool {
        matches!(self.outcome, RepOutcome::Full)
    }
}

/// Mutable counter state owned by one session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CounterState {
    /// Current phase
    pub phase: Phase,
    /// Accepted (full) repetitions
    pub total_reps: u32,
    /// Partial repetitions
    pub partial_reps: u32,
    /// Clock reading of the last accepted repetition
    pub last_rep_time_ms: Option<u64>,
    /// Lowest smoothed angle since the last closure attempt
    pub valley_angle: f64,
    /// Highest smoothed angle since the last closure attempt
    pub peak_angle: f64,
    /// Clock reading when the current phase began
    pub phase_start_ms: u64,
    /// Most recent smoothed primary angle
    pub current_angle: f64,
}

impl CounterState {
    const fn new(now_ms: u64) -> Self {
        Self {
            phase: Phase::Up,
            total_reps: 0,
            partial_reps: 0,
            last_rep_time_ms: None,
            valley_angle: VALLEY_RESET_DEGREES,
            peak_angle: PEAK_RESET_DEGREES,
            phase_start_ms: now_ms,
            current_angle: VALLEY_RESET_DEGREES,
        }
    }
}

/// Per-frame counter output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepFrameResult {
    /// Accepted repetitions so far
    pub total_reps: u32,
    /// Phase after this frame
    pub current_phase: Phase,
    /// Progress through the current phase, 0-100
    pub phase_progress_percent: f64,
    /// A full repetition was accepted on this frame
    pub is_valid_rep_this_frame: bool,
    /// Partial repetitions so far
    pub partial_reps: u32,
    /// Quality of the most recent full or partial repetition
    pub last_rep_quality: Option<f64>,
    /// Smoothed primary angle with secondary, peak and valley
    pub angles: ExerciseAngles,
    /// Closure attempt evaluated on this frame, if any
    pub last_event: Option<RepEvent>,
}

/// Aggregate statistics for the current session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepStats {
    /// Full repetitions, including manual corrections
    pub total_reps: u32,
    /// Full repetitions with a recorded quality
    pub valid_reps: u32,
    /// Partial repetitions
    pub partial_reps: u32,
    /// Closure attempts rejected by a timing guard
    pub rejected_closures: u32,
    /// Mean quality over full repetitions
    pub average_quality: Option<f64>,
    /// Best full-rep quality
    pub best_quality: Option<f64>,
    /// Worst full-rep quality
    pub worst_quality: Option<f64>,
    /// Time since the counter was created or reset
    pub duration_ms: u64,
}

/// Repetition counter for exactly one exercise kind
#[derive(Debug)]
pub struct RepCounter<C: Clock = SystemClock> {
    exercise: ExerciseKind,
    profile: ThresholdProfile,
    smoother: LandmarkSmoother,
    angle_model: AngleModel,
    average_window: usize,
    recent_angles: VecDeque<f64>,
    state: CounterState,
    rep_qualities: Vec<f64>,
    last_rep_quality: Option<f64>,
    rejected_closures: u32,
    session_start_ms: u64,
    clock: C,
}

impl RepCounter {
    /// Counter with built-in configuration and the system clock
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in profile for `exercise` is invalid
    pub fn with_defaults(exercise: ExerciseKind) -> Result<Self, ConfigError> {
        let config = MotionConfig::default();
        let profile = *config.exercises.get(exercise);
        Self::new(exercise, profile, &config, SystemClock::new())
    }
}

impl<C: Clock> RepCounter<C> {
    /// Create a counter with a resolved threshold profile
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidThresholds` if the profile is invalid
    pub fn new(
        exercise: ExerciseKind,
        profile: ThresholdProfile,
        config: &MotionConfig,
        clock: C,
    ) -> Result<Self, ConfigError> {
        profile.validate(exercise)?;
        let now = clock.now_ms();
        Ok(Self {
            exercise,
            profile,
            smoother: LandmarkSmoother::new(config.smoothing.clone()),
            angle_model: AngleModel::new(&config.angles),
            average_window: config.angles.counter_average_window.max(1),
            recent_angles: VecDeque::with_capacity(config.angles.counter_average_window),
            state: CounterState::new(now),
            rep_qualities: Vec::new(),
            last_rep_quality: None,
            rejected_closures: 0,
            session_start_ms: now,
            clock,
        })
    }

    /// Exercise being counted
    #[must_use]
    pub const fn exercise(&self) -> ExerciseKind {
        self.exercise
    }

    /// Process one raw frame
    pub fn process_frame(&mut self, raw: &PoseFrame) -> RepFrameResult {
        let now = self.clock.now_ms();
        let stabilized = self.smoother.process(raw);

        let angle = match self
            .angle_model
            .primary_reading(&stabilized, self.exercise)
            .degrees()
        {
            Some(measured) => self.moving_average(measured),
            None => self.state.current_angle,
        };
        self.state.current_angle = angle;
        self.state.valley_angle = self.state.valley_angle.min(angle);
        self.state.peak_angle = self.state.peak_angle.max(angle);

        let event = self.evaluate_transition(angle, now);

        let mut angles = self.angle_model.exercise_angles(&stabilized, self.exercise);
        angles.primary = angle;
        angles.peak = Some(self.state.peak_angle);
        angles.valley = Some(self.state.valley_angle);

        RepFrameResult {
            total_reps: self.state.total_reps,
            current_phase: self.state.phase,
            phase_progress_percent: self.phase_progress_percent(),
            is_valid_rep_this_frame: event.as_ref().is_some_and(RepEvent::is_full),
            partial_reps: self.state.partial_reps,
            last_rep_quality: self.last_rep_quality,
            angles,
            last_event: event,
        }
    }

    fn moving_average(&mut self, measured: f64) -> f64 {
        self.recent_angles.push_back(measured);
        while self.recent_angles.len() > self.average_window {
            self.recent_angles.pop_front();
        }
        self.recent_angles.iter().sum::<f64>() / self.recent_angles.len() as f64
    }

    fn evaluate_transition(&mut self, angle: f64, now: u64) -> Option<RepEvent> {
        match self.state.phase {
            Phase::Up if angle <= self.profile.down_entry_angle() => {
                self.state.phase = Phase::Down;
                self.state.phase_start_ms = now;
                debug!(
                    exercise = %self.exercise,
                    angle,
                    "Entered down phase"
                );
                None
            }
            Phase::Down if angle >= self.profile.up_exit_angle() => Some(self.close_rep(now)),
            Phase::Up | Phase::Down => None,
        }
    }

    fn close_rep(&mut self, now: u64) -> RepEvent {
        let duration_ms = now.saturating_sub(self.state.phase_start_ms);
        let valley_angle = self.state.valley_angle;

        let debounce_passed = self
            .state
            .last_rep_time_ms
            .is_none_or(|last| now.saturating_sub(last) > self.profile.debounce_ms);
        let duration_passed = duration_ms > self.profile.min_rep_duration_ms;

        let (outcome, quality) = if !debounce_passed {
            (RepOutcome::Rejected(RejectReason::Debounce), None)
        } else if !duration_passed {
            (RepOutcome::Rejected(RejectReason::TooShort), None)
        } else {
            let (outcome, quality) = self.classify(valley_angle);
            (outcome, Some(quality))
        };

        match (outcome, quality) {
            (RepOutcome::Full, Some(quality)) => {
                self.state.total_reps += 1;
                self.state.last_rep_time_ms = Some(now);
                self.rep_qualities.push(quality);
                self.last_rep_quality = Some(quality);
            }
            (RepOutcome::Partial, Some(quality)) => {
                self.state.partial_reps += 1;
                self.last_rep_quality = Some(quality);
            }
            _ => self.rejected_closures += 1,
        }

        let event = RepEvent {
            outcome,
            quality,
            valley_angle,
            duration_ms,
            exceeded_max_duration: duration_ms > self.profile.max_rep_duration_ms,
            timestamp_ms: now,
        };

        debug!(
            exercise = %self.exercise,
            outcome = ?event.outcome,
            quality = ?event.quality,
            valley = valley_angle,
            duration_ms,
            reps = self.state.total_reps,
            partial_reps = self.state.partial_reps,
            "Closed repetition phase"
        );

        self.state.phase = Phase::Up;
        self.state.valley_angle = VALLEY_RESET_DEGREES;
        self.state.peak_angle = PEAK_RESET_DEGREES;
        self.state.phase_start_ms = now;

        event
    }

    fn classify(&self, valley: f64) -> (RepOutcome, f64) {
        let down = self.profile.down_angle;
        let band_edge = self.profile.full_depth_limit();

        if valley <= down {
            (RepOutcome::Full, MAX_QUALITY)
        } else if valley <= band_edge {
            let shortfall = (valley - down) / (band_edge - down);
            let quality = shortfall.mul_add(-(MAX_QUALITY - BAND_EDGE_QUALITY), MAX_QUALITY);
            (RepOutcome::Full, quality)
        } else {
            let quality = PARTIAL_PENALTY_PER_DEGREE
                .mul_add(-(valley - band_edge), BAND_EDGE_QUALITY)
                .max(PARTIAL_QUALITY_FLOOR);
            (RepOutcome::Partial, quality)
        }
    }

    /// Progress through the current phase, direction-aware and clamped to 0-100
    ///
    /// Descending from the top (`Up`) reads 0 at `up_angle`; ascending from
    /// the bottom (`Down`) reads 0 at `down_angle`.
    #[must_use]
    pub fn phase_progress_percent(&self) -> f64 {
        let range = self.profile.up_angle - self.profile.down_angle;
        let travelled = match self.state.phase {
            Phase::Up => self.profile.up_angle - self.state.current_angle,
            Phase::Down => self.state.current_angle - self.profile.down_angle,
        };
        (travelled / range * 100.0).clamp(0.0, 100.0)
    }

    /// Active thresholds
    #[must_use]
    pub const fn get_thresholds(&self) -> &ThresholdProfile {
        &self.profile
    }

    /// Replace the thresholds mid-session
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidThresholds` and keeps the previous profile
    /// if `profile` is invalid
    pub fn update_thresholds(&mut self, profile: ThresholdProfile) -> Result<(), ConfigError> {
        profile.validate(self.exercise)?;
        self.profile = profile;
        info!(exercise = %self.exercise, ?profile, "Updated repetition thresholds");
        Ok(())
    }

    /// Read-only view of the state machine
    #[must_use]
    pub const fn get_state(&self) -> &CounterState {
        &self.state
    }

    /// Aggregate statistics
    #[must_use]
    pub fn get_stats(&self) -> RepStats {
        let count = self.rep_qualities.len();
        let average_quality =
            (count > 0).then(|| self.rep_qualities.iter().sum::<f64>() / count as f64);

        RepStats {
            total_reps: self.state.total_reps,
            valid_reps: u32::try_from(count).unwrap_or(u32::MAX),
            partial_reps: self.state.partial_reps,
            rejected_closures: self.rejected_closures,
            average_quality,
            best_quality: self.rep_qualities.iter().copied().reduce(f64::max),
            worst_quality: self.rep_qualities.iter().copied().reduce(f64::min),
            duration_ms: self.clock.now_ms().saturating_sub(self.session_start_ms),
        }
    }

    /// Manually count a repetition, bypassing the state machine
    ///
    /// Operator escape hatch for miscounts. Phase, valley/peak and debounce
    /// timing are left untouched. Returns the new total.
    pub fn force_count_rep(&mut self, quality: Option<f64>) -> u32 {
        let quality = quality
            .filter(|q| q.is_finite())
            .map_or(FORCED_REP_QUALITY, |q| q.clamp(0.0, MAX_QUALITY));
        self.state.total_reps += 1;
        self.rep_qualities.push(quality);
        self.last_rep_quality = Some(quality);
        info!(
            exercise = %self.exercise,
            quality,
            reps = self.state.total_reps,
            "Repetition counted manually"
        );
        self.state.total_reps
    }

    /// Remove the most recent full repetition, bypassing the state machine
    ///
    /// Returns `false` (and changes nothing) when no repetition is counted.
    pub fn undo_last_rep(&mut self) -> bool {
        if self.state.total_reps == 0 {
            return false;
        }
        self.state.total_reps -= 1;
        self.rep_qualities.pop();
        self.last_rep_quality = self.rep_qualities.last().copied();
        info!(
            exercise = %self.exercise,
            reps = self.state.total_reps,
            "Last repetition removed manually"
        );
        true
    }

    /// Discard all counts, history, and phase state
    pub fn reset(&mut self) {
        let now = self.clock.now_ms();
        self.smoother.reset();
        self.recent_angles.clear();
        self.state = CounterState::new(now);
        self.rep_qualities.clear();
        self.last_rep_quality = None;
        self.rejected_closures = 0;
        self.session_start_ms = now;
        info!(exercise = %self.exercise, "Repetition counter reset");
    }

    /// Stability of the tracked landmarks
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.smoother.is_stable()
    }
}
