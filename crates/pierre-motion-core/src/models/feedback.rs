// ABOUTME: Form feedback vocabulary: issue taxonomy, severities, locales, and gender hints
// ABOUTME: Closed enumerations used by the rule engine and the message catalog
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::feedback;
use crate::errors::AppError;

/// How far past its threshold a rule measurement is
///
/// Ordered so that `Minor < Moderate < Significant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Small deviation; informational
    Minor,
    /// Noticeable deviation worth correcting
    Moderate,
    /// Deviation that leaves the safe zone
    Significant,
}

impl Severity {
    /// Score penalty for one emitted issue of this severity
    #[must_use]
    pub const fn penalty(self) -> u32 {
        match self {
            Self::Minor => feedback::MINOR_PENALTY,
            Self::Moderate => feedback::MODERATE_PENALTY,
            Self::Significant => feedback::SIGNIFICANT_PENALTY,
        }
    }

    /// Display priority (1 = show first)
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Significant => 1,
            Self::Moderate => 2,
            Self::Minor => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minor => f.write_str("minor"),
            Self::Moderate => f.write_str("moderate"),
            Self::Significant => f.write_str("significant"),
        }
    }
}

/// Fixed taxonomy of form issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormIssueKind {
    /// Knee travels past the ankle horizontally
    KneeOverToes,
    /// Trunk tilts too far from vertical
    BackRounding,
    /// Descent turned around well short of target depth
    InsufficientDepth,
    /// Left and right sides at different heights
    Asymmetry,
    /// Elbows splayed away from the torso
    ElbowFlare,
    /// Hips sag below the shoulder-ankle line
    HipSag,
    /// Head pushed out of line with the spine
    NeckStrain,
    /// Repetition completed too quickly
    PaceTooFast,
    /// Repetition did not use the full range of motion
    LimitedRange,
}

impl FormIssueKind {
    /// Number of issue kinds
    pub const COUNT: usize = 9;

    /// Every issue kind in taxonomy order
    pub const ALL: [Self; Self::COUNT] = [
        Self::KneeOverToes,
        Self::BackRounding,
        Self::InsufficientDepth,
        Self::Asymmetry,
        Self::ElbowFlare,
        Self::HipSag,
        Self::NeckStrain,
        Self::PaceTooFast,
        Self::LimitedRange,
    ];

    /// Dense index for fixed-size bookkeeping arrays
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KneeOverToes => "knee_over_toes",
            Self::BackRounding => "back_rounding",
            Self::InsufficientDepth => "insufficient_depth",
            Self::Asymmetry => "asymmetry",
            Self::ElbowFlare => "elbow_flare",
            Self::HipSag => "hip_sag",
            Self::NeckStrain => "neck_strain",
            Self::PaceTooFast => "pace_too_fast",
            Self::LimitedRange => "limited_range",
        }
    }
}

impl fmt::Display for FormIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language of feedback messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    /// Brazilian Portuguese
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    /// English
    #[serde(rename = "en")]
    En,
}

impl FromStr for Locale {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Ok(Self::PtBr),
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            _ => Err(AppError::invalid_input(format!("Unsupported locale: '{s}'"))),
        }
    }
}

/// Grammatical gender hint for message agreement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserGender {
    /// Feminine agreement
    Female,
    /// Masculine agreement
    Male,
}

/// Error returned for unrecognized gender hints
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized gender hint: '{0}'")]
pub struct UnknownGender(pub String);

impl FromStr for UserGender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "feminino" | "female" | "f" => Ok(Self::Female),
            "masculino" | "male" | "m" => Ok(Self::Male),
            _ => Err(UnknownGender(s.to_owned())),
        }
    }
}
