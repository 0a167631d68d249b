// ABOUTME: Landmark smoothing stage with low-confidence interpolation and per-axis EMA
// ABOUTME: Keeps a bounded per-landmark history and reports positional variance and stability
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Landmark Smoothing Stage
//!
//! Each call to [`LandmarkSmoother::process`] runs two passes per landmark:
//!
//! 1. **Interpolation** - a landmark below the interpolation confidence is
//!    replaced by its most recent historical position, with its confidence
//!    multiplied by the synthesized-confidence decay. Landmarks with no
//!    history pass through unchanged.
//! 2. **Smoothing** - the (possibly interpolated) position is appended to a
//!    bounded history and the output is the exponential moving average of
//!    that history, seeded by its oldest sample.
//!
//! Malformed input never fails; it falls through to "pass unchanged".

use pierre_motion_core::models::{Landmark, LandmarkId, PoseFrame};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use crate::config::SmoothingConfig;

/// Bounded position history for one landmark
#[derive(Debug, Clone, Default)]
struct LandmarkHistory {
    x: VecDeque<f64>,
    y: VecDeque<f64>,
}

impl LandmarkHistory {
    fn push(&mut self, x: f64, y: f64, capacity: usize) {
        for (axis, value) in [(&mut self.x, x), (&mut self.y, y)] {
            axis.push_back(value);
            while axis.len() > capacity {
                axis.pop_front();
            }
        }
    }

    fn latest(&self) -> Option<(f64, f64)> {
        Some((*self.x.back()?, *self.y.back()?))
    }
}

/// Per-axis positional variance of one landmark over the history window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionVariance {
    /// Horizontal variance
    pub x: f64,
    /// Vertical variance
    pub y: f64,
}

impl PositionVariance {
    /// Mean of both axes
    #[must_use]
    pub fn mean(&self) -> f64 {
        (self.x + self.y) / 2.0
    }
}

/// Jitter-rejecting landmark filter owned by one session
#[derive(Debug, Clone)]
pub struct LandmarkSmoother {
    config: SmoothingConfig,
    history: BTreeMap<LandmarkId, LandmarkHistory>,
}

impl LandmarkSmoother {
    /// Create a smoother with empty history
    #[must_use]
    pub const fn new(config: SmoothingConfig) -> Self {
        Self {
            config,
            history: BTreeMap::new(),
        }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    /// Interpolate and smooth one raw frame
    ///
    /// The stabilized frame holds one landmark per identifier present in the
    /// input (the last duplicate wins), ordered by identifier.
    pub fn process(&mut self, raw: &PoseFrame) -> PoseFrame {
        let mut latest: BTreeMap<LandmarkId, Landmark> = BTreeMap::new();
        for landmark in raw.iter() {
            latest.insert(landmark.id, *landmark);
        }

        latest
            .into_values()
            .map(|landmark| self.stabilize(landmark))
            .collect()
    }

    fn stabilize(&mut self, landmark: Landmark) -> Landmark {
        let finite = landmark.x.is_finite() && landmark.y.is_finite();
        let reliable = finite && landmark.confidence >= self.config.interpolation_confidence;

        let candidate = if reliable {
            landmark
        } else {
            match self.history.get(&landmark.id).and_then(LandmarkHistory::latest) {
                Some((x, y)) => Landmark {
                    x,
                    y,
                    confidence: landmark.confidence * self.config.synthesized_confidence_decay,
                    ..landmark
                },
                None => return landmark,
            }
        };

        let capacity = self.config.window_size;
        let history = self.history.entry(candidate.id).or_default();
        history.push(candidate.x, candidate.y, capacity);

        Landmark {
            x: exponential_moving_average(&history.x, self.config.alpha),
            y: exponential_moving_average(&history.y, self.config.alpha),
            ..candidate
        }
    }

    /// Positional variance of a landmark over its current history
    #[must_use]
    pub fn variance(&self, id: LandmarkId) -> Option<PositionVariance> {
        let history = self.history.get(&id)?;
        Some(PositionVariance {
            x: population_variance(&history.x)?,
            y: population_variance(&history.y)?,
        })
    }

    /// Whether the mean variance across tracked landmarks is under the stability threshold
    ///
    /// Returns `false` while nothing is tracked.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        let variances: Vec<f64> = self
            .history
            .keys()
            .filter_map(|id| self.variance(*id))
            .map(|variance| variance.mean())
            .collect();

        if variances.is_empty() {
            return false;
        }

        let mean = variances.iter().sum::<f64>() / variances.len() as f64;
        mean < self.config.stability_variance
    }

    /// Number of landmarks with history
    #[must_use]
    pub fn tracked_landmarks(&self) -> usize {
        self.history.len()
    }

    /// Discard all history
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

/// EMA over a history, seeded by its oldest sample
fn exponential_moving_average(values: &VecDeque<f64>, alpha: f64) -> f64 {
    let mut samples = values.iter();
    let Some(&seed) = samples.next() else {
        return 0.0;
    };
    // Written as a step towards the sample so constant input is a fixed point
    samples.fold(seed, |previous, &value| {
        alpha.mul_add(value - previous, previous)
    })
}

fn population_variance(values: &VecDeque<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    Some(values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n)
}
