//! Interpolation between keyframes
//!
//! Times before the first keyframe take the first value and times after the
//! last keyframe take the last value.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Technique for tweening translations and scales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TweenVectors {
    #[default]
    Lerp,
    /// Value of the nearest preceding keyframe
    Nearest,
}

/// Technique for tweening rotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TweenRotations {
    /// Normalized linear interpolation
    #[default]
    Nlerp,
    /// Spherical linear interpolation
    Slerp,
    /// Value of the nearest preceding keyframe
    Nearest,
}

/// Locate `time` between keyframes: (index of preceding keyframe, fraction toward the next)
fn locate(time: f32, times: &[f32]) -> (usize, f32) {
    let last = times.len() - 1;
    if time <= times[0] {
        return (0, 0.0);
    }
    if time >= times[last] {
        return (last, 0.0);
    }
    // first index whose time exceeds `time`; at least 1 given the checks above
    let next = times.partition_point(|&t| t <= time);
    let prev = next - 1;
    let span = times[next] - times[prev];
    let fraction = if span > 0.0 {
        (time - times[prev]) / span
    } else {
        0.0
    };
    (prev, fraction)
}

impl TweenVectors {
    /// Interpolate `values` (parallel with `times`) at `time`.
    ///
    /// Returns None if there are no keyframes or the lengths differ.
    pub fn interpolate(self, time: f32, times: &[f32], values: &[Vec3]) -> Option<Vec3> {
        if times.is_empty() || times.len() != values.len() {
            return None;
        }
        let (prev, fraction) = locate(time, times);
        let result = match self {
            TweenVectors::Nearest => values[prev],
            TweenVectors::Lerp if fraction == 0.0 => values[prev],
            TweenVectors::Lerp => values[prev].lerp(values[prev + 1], fraction),
        };
        Some(result)
    }
}

impl TweenRotations {
    /// Interpolate `values` (parallel with `times`) at `time`.
    ///
    /// Returns None if there are no keyframes or the lengths differ.
    pub fn interpolate(self, time: f32, times: &[f32], values: &[Quat]) -> Option<Quat> {
        if times.is_empty() || times.len() != values.len() {
            return None;
        }
        let (prev, fraction) = locate(time, times);
        if fraction == 0.0 || self == TweenRotations::Nearest {
            return Some(values[prev]);
        }
        let start = values[prev];
        let mut end = values[prev + 1];
        // take the short way around
        if start.dot(end) < 0.0 {
            end = -end;
        }
        let result = match self {
            TweenRotations::Nlerp => start.lerp(end, fraction),
            TweenRotations::Slerp => start.slerp(end, fraction),
            TweenRotations::Nearest => start,
        };
        Some(result)
    }
}
