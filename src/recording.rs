// ABOUTME: JSON frame-recording format for replaying captured landmark streams
// ABOUTME: Drives a session with a manual clock so replays are deterministic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_motion_core::errors::{AppError, AppResult};
use pierre_motion_core::models::{ExerciseKind, FitnessLevel, PoseFrame};
use pierre_motion_intelligence::ManualClock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::session::{FrameReport, MotionSession};

/// One captured frame with its capture time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Milliseconds since the start of the recording
    pub timestamp_ms: u64,
    /// Landmarks as delivered by the pose estimator
    pub landmarks: PoseFrame,
}

/// A captured exercise set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecording {
    /// Exercise performed
    pub exercise: ExerciseKind,
    /// Fitness level of the performer
    #[serde(default)]
    pub level: FitnessLevel,
    /// Frames in capture order
    pub frames: Vec<RecordedFrame>,
}

impl FrameRecording {
    /// Create an empty recording
    #[must_use]
    pub const fn new(exercise: ExerciseKind, level: FitnessLevel) -> Self {
        Self {
            exercise,
            level,
            frames: Vec::new(),
        }
    }

    /// Append a frame
    ///
    /// # Errors
    ///
    /// Returns an error if `timestamp_ms` is earlier than the previous frame
    pub fn push(&mut self, timestamp_ms: u64, landmarks: PoseFrame) -> AppResult<()> {
        if let Some(last) = self.frames.last() {
            if timestamp_ms < last.timestamp_ms {
                return Err(AppError::invalid_input(format!(
                    "Frame timestamp {timestamp_ms} ms precedes previous frame at {} ms",
                    last.timestamp_ms
                )));
            }
        }
        self.frames.push(RecordedFrame {
            timestamp_ms,
            landmarks,
        });
        Ok(())
    }

    /// Recording length from first to last frame
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        match (self.frames.first(), self.frames.last()) {
            (Some(first), Some(last)) => last.timestamp_ms.saturating_sub(first.timestamp_ms),
            _ => 0,
        }
    }

    /// Check that frame timestamps never go backwards
    ///
    /// # Errors
    ///
    /// Returns an error naming the first out-of-order frame
    pub fn validate(&self) -> AppResult<()> {
        for (index, pair) in self.frames.windows(2).enumerate() {
            if pair[1].timestamp_ms < pair[0].timestamp_ms {
                return Err(AppError::invalid_input(format!(
                    "Frame {} timestamp {} ms precedes frame {index} at {} ms",
                    index + 1,
                    pair[1].timestamp_ms,
                    pair[0].timestamp_ms
                )));
            }
        }
        Ok(())
    }

    /// Load and validate a recording from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid recording,
    /// or has out-of-order timestamps
    pub fn load(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        let recording: Self = serde_json::from_str(&contents)?;
        recording.validate()?;
        debug!(
            path = %path.display(),
            exercise = %recording.exercise,
            frames = recording.frames.len(),
            "Loaded frame recording"
        );
        Ok(recording)
    }

    /// Write the recording as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn save(&self, path: &Path) -> AppResult<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Feed every frame through `session`, setting `clock` to each timestamp
    ///
    /// `clock` must be the clock (or a clone of it) the session was built with.
    pub fn replay(
        &self,
        session: &mut MotionSession<ManualClock>,
        clock: &ManualClock,
    ) -> Vec<FrameReport> {
        self.frames
            .iter()
            .map(|frame| {
                clock.set(frame.timestamp_ms);
                session.process_frame(&frame.landmarks)
            })
            .collect()
    }
}
