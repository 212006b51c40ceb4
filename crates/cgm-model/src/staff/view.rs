//! The view that receives plotted curves

/// Curve channel, used by views to pick a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    W,
    X,
    Y,
    Z,
}

/// One sparkline: normalized keyframes plus the interpolated curve through them
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    /// Two-letter label, such as "rw" or "tx"
    pub label: String,
    /// Vertical slot in the view
    pub plot_index: usize,
    pub channel: Channel,
    pub key_times: Vec<f32>,
    pub key_values: Vec<f32>,
    pub sample_times: Vec<f32>,
    pub sample_values: Vec<f32>,
}

/// Receiver of staff plots
pub trait ScoreView {
    fn attach_plot(&mut self, plot: Plot);

    /// Mark the displayed pose's rotation (normalized components)
    fn add_pose_rotation(&mut self, w: f32, x: f32, y: f32, z: f32);

    /// Mark the displayed pose's translation or scale (normalized components)
    fn add_pose_vector(&mut self, x: f32, y: f32, z: f32);
}
