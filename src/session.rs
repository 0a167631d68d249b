// ABOUTME: Per-exercise session that drives rep counting and form analysis for each frame
// ABOUTME: Shares one clock and one resolved threshold profile between both components
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Motion session pipeline
//!
//! A [`MotionSession`] exclusively owns one [`RepCounter`] and one
//! [`FormAnalyzer`] for a single exercise. Each call to
//! [`MotionSession::process_frame`] counts first, then runs the frame rules
//! against the counter's stabilized primary angle and folds in the tempo and
//! range rules for any repetition that closed on that frame.

use chrono::{DateTime, Utc};
use pierre_motion_core::models::{ExerciseKind, FitnessLevel, Locale, PoseFrame, UserGender};
use pierre_motion_intelligence::config::{CalibrationProfile, ThresholdOverride};
use pierre_motion_intelligence::{
    Clock, ConfigError, FeedbackCatalog, FormAnalysis, FormAnalyzer, MotionConfig,
    RepCounter, RepFrameResult, RepStats, SystemClock, ThresholdProfile,
};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Span};
use uuid::Uuid;

/// Output of one processed frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Counter output
    pub reps: RepFrameResult,
    /// Frame rules merged with tempo/range rules for a closed repetition
    pub form: FormAnalysis,
}

/// End-of-session summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session identifier
    pub id: Uuid,
    /// Exercise performed
    pub exercise: ExerciseKind,
    /// Fitness level at the time of the summary
    pub level: FitnessLevel,
    /// Wall-clock start of the session (or of the last reset)
    pub started_at: DateTime<Utc>,
    /// Counter statistics
    pub stats: RepStats,
    /// Form issues emitted since start
    pub issues_emitted: u32,
    /// Mean form score over processed frames
    pub average_form_score: Option<f64>,
}

/// One exercise session
#[derive(Debug)]
pub struct MotionSession<C: Clock + Clone = SystemClock> {
    id: Uuid,
    exercise: ExerciseKind,
    started_at: DateTime<Utc>,
    counter: RepCounter<C>,
    analyzer: FormAnalyzer<C>,
    issues_emitted: u32,
    form_score_total: u64,
    frames_processed: u64,
    span: Span,
}

impl MotionSession {
    /// Session with built-in configuration, no calibration, and the system clock
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in profile for `exercise` is invalid
    pub fn with_defaults(exercise: ExerciseKind, level: FitnessLevel) -> Result<Self, ConfigError> {
        Self::new(
            exercise,
            level,
            &MotionConfig::default(),
            None,
            None,
            SystemClock::new(),
        )
    }
}

impl<C: Clock + Clone> MotionSession<C> {
    /// Create a session, resolving defaults < calibration < override once
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MalformedCalibration` or
    /// `ConfigError::InvalidThresholds` if the resolved profile is unusable
    pub fn new(
        exercise: ExerciseKind,
        level: FitnessLevel,
        config: &MotionConfig,
        calibration: Option<&CalibrationProfile>,
        threshold_override: Option<&ThresholdOverride>,
        clock: C,
    ) -> Result<Self, ConfigError> {
        let profile = ThresholdProfile::resolve(
            exercise,
            &config.exercises,
            calibration,
            threshold_override,
        )?;

        let counter = RepCounter::new(exercise, profile, config, clock.clone())?;
        let analyzer = FormAnalyzer::new(
            exercise,
            profile,
            level,
            config,
            FeedbackCatalog::default(),
            clock,
        )?;

        let id = Uuid::new_v4();
        let span = info_span!("motion_session", session_id = %id, exercise = %exercise);
        span.in_scope(|| {
            info!(
                %level,
                calibrated = calibration.is_some(),
                overridden = threshold_override.is_some(),
                ?profile,
                "Motion session started"
            );
        });

        Ok(Self {
            id,
            exercise,
            started_at: Utc::now(),
            counter,
            analyzer,
            issues_emitted: 0,
            form_score_total: 0,
            frames_processed: 0,
            span,
        })
    }

    /// Session identifier
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Exercise performed in this session
    #[must_use]
    pub const fn exercise(&self) -> ExerciseKind {
        self.exercise
    }

    /// Repetition counter owned by this session
    #[must_use]
    pub const fn counter(&self) -> &RepCounter<C> {
        &self.counter
    }

    /// Form analyzer owned by this session
    #[must_use]
    pub const fn analyzer(&self) -> &FormAnalyzer<C> {
        &self.analyzer
    }

    /// Count, then analyze form, for one raw frame
    pub fn process_frame(&mut self, raw: &PoseFrame) -> FrameReport {
        let _entered = self.span.enter();

        let reps = self.counter.process_frame(raw);
        let mut form = self.analyzer.analyze_form(raw, reps.angles.primary);
        if let Some(event) = reps.last_event.as_ref() {
            let repetition = self.analyzer.analyze_repetition(event);
            form.merge(repetition);
        }

        self.issues_emitted += u32::try_from(form.issues.len()).unwrap_or(u32::MAX);
        self.form_score_total += u64::from(form.overall_score);
        self.frames_processed += 1;

        FrameReport { reps, form }
    }

    /// Discard counts, smoothing history, cooldowns, and summary totals
    pub fn reset(&mut self) {
        let _entered = self.span.enter();
        self.counter.reset();
        self.analyzer.reset();
        self.issues_emitted = 0;
        self.form_score_total = 0;
        self.frames_processed = 0;
        self.started_at = Utc::now();
        info!("Motion session reset");
    }

    /// Change the fitness level used by the form rules
    pub fn set_user_level(&mut self, level: FitnessLevel) {
        let _entered = self.span.enter();
        self.analyzer.set_user_level(level);
    }

    /// Change the grammatical gender used in feedback messages
    pub fn set_user_gender(&mut self, gender: Option<UserGender>) {
        self.analyzer.set_user_gender(gender);
    }

    /// Change the feedback message locale
    pub fn set_locale(&mut self, locale: Locale) {
        self.analyzer.set_locale(locale);
    }

    /// Replace the thresholds of both components
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidThresholds` and leaves both components
    /// untouched if `profile` is invalid
    pub fn update_thresholds(&mut self, profile: ThresholdProfile) -> Result<(), ConfigError> {
        let _entered = self.span.enter();
        profile.validate(self.exercise)?;
        self.counter.update_thresholds(profile)?;
        self.analyzer.update_thresholds(profile)
    }

    /// Snapshot of the session so far
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        let average_form_score = (self.frames_processed > 0)
            .then(|| self.form_score_total as f64 / self.frames_processed as f64);

        SessionSummary {
            id: self.id,
            exercise: self.exercise,
            level: self.analyzer.user_level(),
            started_at: self.started_at,
            stats: self.counter.get_stats(),
            issues_emitted: self.issues_emitted,
            average_form_score,
        }
    }
}
