// ABOUTME: Landmark vocabulary, single-frame landmark values, and pose frames
// ABOUTME: Immutable per-frame inputs produced by the upstream pose-estimation model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Body side of a bilateral landmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Subject's left side
    Left,
    /// Subject's right side
    Right,
}

impl Side {
    /// Both sides, left first
    pub const BOTH: [Self; 2] = [Self::Left, Self::Right];
}

/// Anatomical landmark identifiers (COCO 17-point vocabulary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkId {
    /// Nose tip
    Nose,
    /// Left eye
    LeftEye,
    /// Right eye
    RightEye,
    /// Left ear
    LeftEar,
    /// Right ear
    RightEar,
    /// Left shoulder
    LeftShoulder,
    /// Right shoulder
    RightShoulder,
    /// Left elbow
    LeftElbow,
    /// Right elbow
    RightElbow,
    /// Left wrist
    LeftWrist,
    /// Right wrist
    RightWrist,
    /// Left hip
    LeftHip,
    /// Right hip
    RightHip,
    /// Left knee
    LeftKnee,
    /// Right knee
    RightKnee,
    /// Left ankle
    LeftAnkle,
    /// Right ankle
    RightAnkle,
}

impl LandmarkId {
    /// Every identifier in vocabulary order
    pub const ALL: [Self; 17] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Wire name used by the pose-estimation collaborator
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    /// Side of the body, `None` for the nose
    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            Self::Nose => None,
            Self::LeftEye
            | Self::LeftEar
            | Self::LeftShoulder
            | Self::LeftElbow
            | Self::LeftWrist
            | Self::LeftHip
            | Self::LeftKnee
            | Self::LeftAnkle => Some(Side::Left),
            Self::RightEye
            | Self::RightEar
            | Self::RightShoulder
            | Self::RightElbow
            | Self::RightWrist
            | Self::RightHip
            | Self::RightKnee
            | Self::RightAnkle => Some(Side::Right),
        }
    }

    /// The same landmark on the opposite side (the nose mirrors to itself)
    #[must_use]
    pub const fn mirror(self) -> Self {
        match self {
            Self::Nose => Self::Nose,
            Self::LeftEye => Self::RightEye,
            Self::RightEye => Self::LeftEye,
            Self::LeftEar => Self::RightEar,
            Self::RightEar => Self::LeftEar,
            Self::LeftShoulder => Self::RightShoulder,
            Self::RightShoulder => Self::LeftShoulder,
            Self::LeftElbow => Self::RightElbow,
            Self::RightElbow => Self::LeftElbow,
            Self::LeftWrist => Self::RightWrist,
            Self::RightWrist => Self::LeftWrist,
            Self::LeftHip => Self::RightHip,
            Self::RightHip => Self::LeftHip,
            Self::LeftKnee => Self::RightKnee,
            Self::RightKnee => Self::LeftKnee,
            Self::LeftAnkle => Self::RightAnkle,
            Self::RightAnkle => Self::LeftAnkle,
        }
    }

    /// Shoulder on the given side
    #[must_use]
    pub const fn shoulder(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftShoulder,
            Side::Right => Self::RightShoulder,
        }
    }

    /// Elbow on the given side
    #[must_use]
    pub const fn elbow(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftElbow,
            Side::Right => Self::RightElbow,
        }
    }

    /// Wrist on the given side
    #[must_use]
    pub const fn wrist(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftWrist,
            Side::Right => Self::RightWrist,
        }
    }

    /// Hip on the given side
    #[must_use]
    pub const fn hip(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftHip,
            Side::Right => Self::RightHip,
        }
    }

    /// Knee on the given side
    #[must_use]
    pub const fn knee(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftKnee,
            Side::Right => Self::RightKnee,
        }
    }

    /// Ankle on the given side
    #[must_use]
    pub const fn ankle(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftAnkle,
            Side::Right => Self::RightAnkle,
        }
    }
}

impl fmt::Display for LandmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a landmark name is outside the vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown landmark identifier: '{0}'")]
pub struct UnknownLandmark(pub String);

impl FromStr for LandmarkId {
    type Err = UnknownLandmark;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownLandmark(s.to_owned()))
    }
}

/// A position in normalized frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    /// Horizontal coordinate (conventionally 0.0-1.0, left to right)
    pub x: f64,
    /// Vertical coordinate (conventionally 0.0-1.0, top to bottom)
    pub y: f64,
}

impl Point2 {
    /// Create a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `self` to `other`
    #[must_use]
    pub fn to(self, other: Self) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }

    /// Euclidean distance to another point
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// One detected body point for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Anatomical identifier
    pub id: LandmarkId,
    /// Normalized horizontal coordinate
    pub x: f64,
    /// Normalized vertical coordinate
    pub y: f64,
    /// Detection confidence in [0, 1]
    pub confidence: f64,
}

impl Landmark {
    /// Create a landmark
    #[must_use]
    pub const fn new(id: LandmarkId, x: f64, y: f64, confidence: f64) -> Self {
        Self {
            id,
            x,
            y,
            confidence,
        }
    }

    /// Position without confidence
    #[must_use]
    pub const fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Whether the confidence meets `min_confidence` and coordinates are finite
    #[must_use]
    pub fn is_reliable(&self, min_confidence: f64) -> bool {
        self.confidence >= min_confidence && self.x.is_finite() && self.y.is_finite()
    }
}

/// All landmarks detected in one frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseFrame {
    landmarks: Vec<Landmark>,
}

impl PoseFrame {
    /// Create a frame from detected landmarks
    #[must_use]
    pub const fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Look up a landmark; when the detector repeated an id the last one wins
    #[must_use]
    pub fn get(&self, id: LandmarkId) -> Option<&Landmark> {
        self.landmarks.iter().rev().find(|landmark| landmark.id == id)
    }

    /// Look up a landmark only if it meets the confidence threshold
    #[must_use]
    pub fn get_confident(&self, id: LandmarkId, min_confidence: f64) -> Option<&Landmark> {
        self.get(id)
            .filter(|landmark| landmark.is_reliable(min_confidence))
    }

    /// Positions of several landmarks, only if every one is reliable
    #[must_use]
    pub fn confident_points<const N: usize>(
        &self,
        ids: [LandmarkId; N],
        min_confidence: f64,
    ) -> Option<[Point2; N]> {
        let mut points = [Point2::default(); N];
        for (slot, id) in points.iter_mut().zip(ids) {
            *slot = self.get_confident(id, min_confidence)?.position();
        }
        Some(points)
    }

    /// Iterate landmarks in detection order
    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.landmarks.iter()
    }

    /// Number of landmarks in the frame
    #[must_use]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    /// Whether the frame carries no landmarks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Borrow the landmarks as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[Landmark] {
        &self.landmarks
    }
}

impl From<Vec<Landmark>> for PoseFrame {
    fn from(landmarks: Vec<Landmark>) -> Self {
        Self::new(landmarks)
    }
}

impl FromIterator<Landmark> for PoseFrame {
    fn from_iter<I: IntoIterator<Item = Landmark>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
