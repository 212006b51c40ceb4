//! Scratch buffers for plotting, reused between plots

/// Number of curve channels: w, x, y and z
pub const NUM_CHANNELS: usize = 4;

/// Per-channel keyframe and sample values plus sample times.
///
/// Buffers only ever grow. Callers read the leading `num_keyframes` or
/// `num_samples` entries and ignore the rest.
#[derive(Debug, Clone, Default)]
pub struct SampleBuffers {
    /// Keyframe values per channel, with room for one extra pose value
    pub keys: [Vec<f32>; NUM_CHANNELS],
    /// Interpolated values per channel
    pub samples: [Vec<f32>; NUM_CHANNELS],
    /// Sample times in seconds
    pub sample_times: Vec<f32>,
    /// Sample times scaled to [0, 1]
    pub normalized_sample_times: Vec<f32>,
}

fn grow(buffer: &mut Vec<f32>, len: usize) {
    if buffer.len() < len {
        buffer.resize(len, 0.0);
    }
}

impl SampleBuffers {
    /// Make room for `num_keyframes` and `num_samples` values per channel and
    /// spread the sample times evenly over `duration`
    pub fn prepare(&mut self, num_keyframes: usize, num_samples: usize, duration: f32) {
        for keys in &mut self.keys {
            grow(keys, num_keyframes);
        }
        for samples in &mut self.samples {
            grow(samples, num_samples);
        }
        grow(&mut self.sample_times, num_samples);
        grow(&mut self.normalized_sample_times, num_samples);

        for i in 0..num_samples {
            let t = if num_samples > 1 {
                i as f32 / (num_samples - 1) as f32
            } else {
                0.0
            };
            self.normalized_sample_times[i] = t;
            self.sample_times[i] = duration * t;
        }
    }

    /// Current capacity in keyframes
    pub fn keyframe_capacity(&self) -> usize {
        self.keys[0].len()
    }

    pub fn sample_capacity(&self) -> usize {
        self.sample_times.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffers_never_shrink() {
        let mut buffers = SampleBuffers::default();
        buffers.prepare(6, 10, 1.0);
        buffers.prepare(2, 3, 1.0);
        assert_eq!(buffers.keyframe_capacity(), 6);
        assert_eq!(buffers.sample_capacity(), 10);
        assert!(buffers.samples.iter().all(|s| s.len() == 10));
    }

    #[test]
    fn test_sample_times() {
        let mut buffers = SampleBuffers::default();
        buffers.prepare(0, 5, 2.0);
        assert_eq!(buffers.normalized_sample_times, [0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(buffers.sample_times, [0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_single_sample_at_start() {
        let mut buffers = SampleBuffers::default();
        buffers.prepare(0, 1, 3.0);
        assert_eq!(buffers.normalized_sample_times, [0.0]);
        assert_eq!(buffers.sample_times, [0.0]);
    }
}
