// ABOUTME: Exercise taxonomy, repetition phases, and fitness levels
// ABOUTME: Closed enumerations selected per session, with parsing and display implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::feedback::Locale;
use crate::constants::tolerance;
use crate::errors::AppError;

/// Exercise tracked by a session, fixed for the session's duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    /// Bodyweight squat (knee angle)
    Squat,
    /// Push-up (elbow angle)
    PushUp,
    /// Sit-up (hip angle)
    SitUp,
    /// Plank hold (shoulder-hip-ankle alignment)
    Plank,
    /// Forward lunge (knee angle)
    Lunge,
    /// Jumping jack (shoulder abduction)
    JumpingJack,
}

impl ExerciseKind {
    /// Every supported exercise
    pub const ALL: [Self; 6] = [
        Self::Squat,
        Self::PushUp,
        Self::SitUp,
        Self::Plank,
        Self::Lunge,
        Self::JumpingJack,
    ];

    /// Stable identifier used in configuration and recordings
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Squat => "squat",
            Self::PushUp => "push_up",
            Self::SitUp => "sit_up",
            Self::Plank => "plank",
            Self::Lunge => "lunge",
            Self::JumpingJack => "jumping_jack",
        }
    }

    /// Human-readable name in the given locale
    #[must_use]
    pub const fn display_name(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::PtBr, Self::Squat) => "Agachamento",
            (Locale::PtBr, Self::PushUp) => "Flexão",
            (Locale::PtBr, Self::SitUp) => "Abdominal",
            (Locale::PtBr, Self::Plank) => "Prancha",
            (Locale::PtBr, Self::Lunge) => "Afundo",
            (Locale::PtBr, Self::JumpingJack) => "Polichinelo",
            (Locale::En, Self::Squat) => "Squat",
            (Locale::En, Self::PushUp) => "Push-up",
            (Locale::En, Self::SitUp) => "Sit-up",
            (Locale::En, Self::Plank) => "Plank",
            (Locale::En, Self::Lunge) => "Lunge",
            (Locale::En, Self::JumpingJack) => "Jumping jack",
        }
    }

    /// Whether the exercise is a static hold rather than a repeated movement
    #[must_use]
    pub const fn is_isometric(self) -> bool {
        matches!(self, Self::Plank)
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "squat" => Ok(Self::Squat),
            "push_up" | "pushup" => Ok(Self::PushUp),
            "sit_up" | "situp" => Ok(Self::SitUp),
            "plank" => Ok(Self::Plank),
            "lunge" => Ok(Self::Lunge),
            "jumping_jack" | "jumpingjack" => Ok(Self::JumpingJack),
            _ => Err(AppError::invalid_input(format!(
                "Unknown exercise kind: '{s}'"
            ))),
        }
    }
}

/// Repetition phase tracked by the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Extended position; the initial phase
    #[default]
    Up,
    /// Flexed position, entered once the angle crosses into the down zone
    Down,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

/// Self-reported training level that scales every form rule tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    /// New to training; rules are most forgiving
    Beginner,
    /// Reference level
    #[default]
    Intermediate,
    /// Experienced; rules are strictest
    Advanced,
}

impl FitnessLevel {
    /// Multiplier applied to every rule trigger and severity cut-off
    #[must_use]
    pub const fn tolerance(self) -> f64 {
        match self {
            Self::Beginner => tolerance::BEGINNER,
            Self::Intermediate => tolerance::INTERMEDIATE,
            Self::Advanced => tolerance::ADVANCED,
        }
    }

    /// Stable identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitnessLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "iniciante" => Ok(Self::Beginner),
            "intermediate" | "intermediario" | "intermediário" => Ok(Self::Intermediate),
            "advanced" | "avancado" | "avançado" => Ok(Self::Advanced),
            _ => Err(AppError::invalid_input(format!(
                "Unknown fitness level: '{s}'"
            ))),
        }
    }
}
