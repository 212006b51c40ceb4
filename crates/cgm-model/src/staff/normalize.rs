//! Min/max normalization of plotted curves

use crate::constants::DEGENERATE_RANGE_VALUE;

/// Rescale keyframe values and interpolated samples together into [0, 1].
///
/// Both slices share one range so the two curves stay comparable. When every
/// value is the same, every value becomes [`DEGENERATE_RANGE_VALUE`].
pub fn normalize_jointly(keyframes: &mut [f32], samples: &mut [f32]) {
    let (min, max) = keyframes
        .iter()
        .chain(samples.iter())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        });
    let range = max - min;
    for value in keyframes.iter_mut().chain(samples.iter_mut()) {
        *value = if range > 0.0 {
            (*value - min) / range
        } else {
            DEGENERATE_RANGE_VALUE
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_keyframes_alone() {
        let mut keys = [2.0, 4.0, 6.0];
        normalize_jointly(&mut keys, &mut []);
        assert_eq!(keys, [0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_shared_range() {
        let mut keys = [1.0, 2.0];
        let mut samples = [0.0, 4.0];
        normalize_jointly(&mut keys, &mut samples);
        assert_relative_eq!(keys[0], 0.25);
        assert_relative_eq!(keys[1], 0.5);
        assert_eq!(samples, [0.0, 1.0]);
    }

    #[test]
    fn test_pose_value_extends_range() {
        // three keyframes plus the displayed pose
        let mut keys = [2.0, 4.0, 6.0, 10.0];
        normalize_jointly(&mut keys, &mut []);
        assert_eq!(keys, [0.0, 0.25, 0.5, 1.0]);
    }

    #[test]
    fn test_flat_curve_sits_mid_height() {
        let mut keys = [3.0, 3.0, 3.0, 3.0];
        let mut samples = [3.0; 5];
        normalize_jointly(&mut keys, &mut samples);
        assert!(keys.iter().chain(&samples).all(|&v| v == 0.5));
    }

    #[test]
    fn test_empty_is_noop() {
        normalize_jointly(&mut [], &mut []);
    }
}
