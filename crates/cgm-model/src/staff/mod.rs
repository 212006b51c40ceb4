//! Staff track: sparkline data for the animation track being scored
//!
//! A staff shows one animation track as a set of small plots, one per
//! component of each transform channel. Keyframe values and the curve
//! interpolated between them are normalized together so both fit the same
//! unit-height strip. Bone tracks also mark where the displayed pose sits.

mod buffers;
mod normalize;
mod view;

pub use buffers::{NUM_CHANNELS, SampleBuffers};
pub use normalize::normalize_jointly;
pub use view::{Channel, Plot, ScoreView};

use cgm_core::{Animation, Track};
use glam::{Quat, Vec3};

use crate::cgm::LoadedCgm;
use crate::config::ScoreConfig;

/// Errors from loading or plotting a staff track
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StaffError {
    #[error("No animation is loaded")]
    NoAnimation,
    #[error("No skeleton is loaded")]
    NoSkeleton,
    #[error("No bone with index {0}")]
    BoneNotFound(usize),
    #[error("Bone {0:?} has no track in the loaded animation")]
    NoTrackForBone(String),
    #[error("Bone {0:?} already has a track in the loaded animation")]
    BoneHasTrack(String),
    #[error("No spatial track with index {0}")]
    SpatialTrackNotFound(usize),
    #[error("No track is loaded")]
    NoTrack,
    #[error("Track has no {0}")]
    MissingChannel(&'static str),
    #[error("Cannot interpolate the track's {0}")]
    Interpolation(&'static str),
}

/// Which track of the loaded animation is on the staff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackSource {
    Bone(usize),
    /// Index among the spatial tracks only
    Spatial(usize),
}

const ROTATION_CHANNELS: [(Channel, &str); 4] = [
    (Channel::W, "rw"),
    (Channel::X, "rx"),
    (Channel::Y, "ry"),
    (Channel::Z, "rz"),
];
const TRANSLATION_CHANNELS: [(Channel, &str); 3] =
    [(Channel::X, "tx"), (Channel::Y, "ty"), (Channel::Z, "tz")];
const SCALE_CHANNELS: [(Channel, &str); 3] =
    [(Channel::X, "sx"), (Channel::Y, "sy"), (Channel::Z, "sz")];

fn quat_components(q: Quat) -> [f32; NUM_CHANNELS] {
    [q.w, q.x, q.y, q.z]
}

fn vector_components(v: Vec3) -> [f32; NUM_CHANNELS] {
    [v.x, v.y, v.z, 0.0]
}

/// Plotting state for one score view
#[derive(Debug, Clone, Default)]
pub struct StaffTrack {
    num_samples: usize,
    label: Option<String>,
    source: Option<TrackSource>,
    /// Keyframe times scaled by the animation duration
    key_times: Vec<f32>,
    buffers: SampleBuffers,
}

impl StaffTrack {
    pub fn new(config: &ScoreConfig) -> Self {
        Self {
            num_samples: config.num_samples,
            ..Self::default()
        }
    }

    /// Number of interpolated samples per plot. Zero plots the keyframes only.
    pub fn set_num_samples(&mut self, num_samples: usize) {
        self.num_samples = num_samples;
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Put the track of a bone on the staff
    pub fn load_bone_track(&mut self, cgm: &LoadedCgm, bone_index: usize) -> Result<(), StaffError> {
        let skeleton = cgm.skeleton.as_ref().ok_or(StaffError::NoSkeleton)?;
        let bone_name = skeleton
            .bone_name(bone_index)
            .ok_or(StaffError::BoneNotFound(bone_index))?;
        let animation = cgm.animation.as_ref().ok_or(StaffError::NoAnimation)?;
        let track = animation
            .find_track_for_bone(bone_index)
            .ok_or_else(|| StaffError::NoTrackForBone(bone_name.to_string()))?;

        self.label = Some(bone_name.to_string());
        self.source = Some(TrackSource::Bone(bone_index));
        self.load_key_times(track, animation.duration);
        tracing::debug!("Staff shows the track of bone {:?}", bone_name);
        Ok(())
    }

    /// Put the n-th spatial track of the loaded animation on the staff
    pub fn load_spatial_track(
        &mut self,
        cgm: &LoadedCgm,
        spatial_track_index: usize,
    ) -> Result<(), StaffError> {
        let animation = cgm.animation.as_ref().ok_or(StaffError::NoAnimation)?;
        let track = animation
            .find_spatial_track(spatial_track_index)
            .ok_or(StaffError::SpatialTrackNotFound(spatial_track_index))?;

        let label = Animation::describe_track(track, cgm.skeleton.as_ref());
        tracing::debug!("Staff shows {}", label);
        self.label = Some(label);
        self.source = Some(TrackSource::Spatial(spatial_track_index));
        self.load_key_times(track, animation.duration);
        Ok(())
    }

    /// Label the staff with a bone that the loaded animation doesn't animate
    pub fn set_trackless_bone(
        &mut self,
        cgm: &LoadedCgm,
        bone_index: usize,
    ) -> Result<(), StaffError> {
        let skeleton = cgm.skeleton.as_ref().ok_or(StaffError::NoSkeleton)?;
        let bone_name = skeleton
            .bone_name(bone_index)
            .ok_or(StaffError::BoneNotFound(bone_index))?;
        if cgm
            .animation
            .as_ref()
            .is_some_and(|a| a.has_track_for_bone(bone_index))
        {
            return Err(StaffError::BoneHasTrack(bone_name.to_string()));
        }
        self.label = Some(bone_name.to_string());
        self.source = None;
        self.key_times.clear();
        Ok(())
    }

    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Normalized time of a keyframe of the loaded track
    pub fn frame_t(&self, frame_index: usize) -> Option<f32> {
        self.key_times.get(frame_index).copied()
    }

    pub fn has_rotations(&self, cgm: &LoadedCgm) -> bool {
        self.track(cgm).is_ok_and(|(t, _)| t.rotations.is_some())
    }

    pub fn has_translations(&self, cgm: &LoadedCgm) -> bool {
        self.track(cgm).is_ok_and(|(t, _)| t.translations.is_some())
    }

    pub fn has_scales(&self, cgm: &LoadedCgm) -> bool {
        self.track(cgm).is_ok_and(|(t, _)| t.scales.is_some())
    }

    /// Plot w, x, y and z of the track's rotations into slots starting at
    /// `num_plots`
    pub fn plot_rotations(
        &mut self,
        cgm: &LoadedCgm,
        num_plots: usize,
        view: &mut impl ScoreView,
        config: &ScoreConfig,
    ) -> Result<(), StaffError> {
        let (track, duration) = self.track(cgm)?;
        let rotations = track
            .rotations
            .as_deref()
            .ok_or(StaffError::MissingChannel("rotations"))?;
        let keyframes: Vec<_> = rotations.iter().copied().map(quat_components).collect();
        let pose = track
            .target_bone()
            .map(|bone| quat_components(cgm.pose.user_rotation(bone)));
        let technique = config.tween_rotations;

        self.load_key_times(track, duration);
        let pose = self.plot_channels(
            view,
            num_plots,
            &ROTATION_CHANNELS,
            &keyframes,
            |time| {
                technique
                    .interpolate(time, &track.times, rotations)
                    .map(quat_components)
                    .ok_or(StaffError::Interpolation("rotations"))
            },
            duration,
            pose,
        )?;
        if let Some([w, x, y, z]) = pose {
            view.add_pose_rotation(w, x, y, z);
        }
        Ok(())
    }

    /// Plot x, y and z of the track's translations into slots starting at
    /// `num_plots`
    pub fn plot_translations(
        &mut self,
        cgm: &LoadedCgm,
        num_plots: usize,
        view: &mut impl ScoreView,
        config: &ScoreConfig,
    ) -> Result<(), StaffError> {
        let (track, duration) = self.track(cgm)?;
        let translations = track
            .translations
            .as_deref()
            .ok_or(StaffError::MissingChannel("translations"))?;
        let pose = track
            .target_bone()
            .map(|bone| cgm.pose.user_translation(bone));
        self.plot_vectors(
            view,
            num_plots,
            &TRANSLATION_CHANNELS,
            track,
            duration,
            translations,
            pose,
            |time, values| {
                config
                    .tween_translations
                    .interpolate(time, &track.times, values)
                    .ok_or(StaffError::Interpolation("translations"))
            },
        )
    }

    /// Plot x, y and z of the track's scales into slots starting at
    /// `num_plots`
    pub fn plot_scales(
        &mut self,
        cgm: &LoadedCgm,
        num_plots: usize,
        view: &mut impl ScoreView,
        config: &ScoreConfig,
    ) -> Result<(), StaffError> {
        let (track, duration) = self.track(cgm)?;
        let scales = track
            .scales
            .as_deref()
            .ok_or(StaffError::MissingChannel("scales"))?;
        let pose = track.target_bone().map(|bone| cgm.pose.user_scale(bone));
        self.plot_vectors(
            view,
            num_plots,
            &SCALE_CHANNELS,
            track,
            duration,
            scales,
            pose,
            |time, values| {
                config
                    .tween_scales
                    .interpolate(time, &track.times, values)
                    .ok_or(StaffError::Interpolation("scales"))
            },
        )
    }

    /// Resolve the loaded track in `cgm`, with the animation's duration
    fn track<'a>(&self, cgm: &'a LoadedCgm) -> Result<(&'a Track, f32), StaffError> {
        let source = self.source.ok_or(StaffError::NoTrack)?;
        let animation = cgm.animation.as_ref().ok_or(StaffError::NoAnimation)?;
        let track = match source {
            TrackSource::Bone(index) => animation.find_track_for_bone(index),
            TrackSource::Spatial(index) => animation.find_spatial_track(index),
        };
        track
            .map(|t| (t, animation.duration))
            .ok_or(StaffError::NoTrack)
    }

    fn load_key_times(&mut self, track: &Track, duration: f32) {
        self.key_times.clear();
        self.key_times.extend_from_slice(&track.times);
        if duration > 0.0 {
            for t in &mut self.key_times {
                *t /= duration;
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn plot_vectors(
        &mut self,
        view: &mut impl ScoreView,
        num_plots: usize,
        channels: &[(Channel, &str)],
        track: &Track,
        duration: f32,
        values: &[Vec3],
        pose: Option<Vec3>,
        interpolate: impl Fn(f32, &[Vec3]) -> Result<Vec3, StaffError>,
    ) -> Result<(), StaffError> {
        let keyframes: Vec<_> = values.iter().copied().map(vector_components).collect();
        self.load_key_times(track, duration);
        let pose = self.plot_channels(
            view,
            num_plots,
            channels,
            &keyframes,
            |time| interpolate(time, values).map(vector_components),
            duration,
            pose.map(vector_components),
        )?;
        if let Some([x, y, z, _]) = pose {
            view.add_pose_vector(x, y, z);
        }
        Ok(())
    }

    /// Fill the buffers for `channels`, normalize them and attach one plot
    /// per channel. Returns the normalized pose value, if one was given.
    #[allow(clippy::too_many_arguments)]
    fn plot_channels(
        &mut self,
        view: &mut impl ScoreView,
        num_plots: usize,
        channels: &[(Channel, &str)],
        keyframes: &[[f32; NUM_CHANNELS]],
        sample: impl Fn(f32) -> Result<[f32; NUM_CHANNELS], StaffError>,
        duration: f32,
        pose: Option<[f32; NUM_CHANNELS]>,
    ) -> Result<Option<[f32; NUM_CHANNELS]>, StaffError> {
        let num_frames = keyframes.len();
        let num_samples = self.num_samples;
        let buffers = &mut self.buffers;
        buffers.prepare(num_frames + 1, num_samples, duration);

        for (i, values) in keyframes.iter().enumerate() {
            for c in 0..channels.len() {
                buffers.keys[c][i] = values[c];
            }
        }
        for i in 0..num_samples {
            let values = sample(buffers.sample_times[i])?;
            for c in 0..channels.len() {
                buffers.samples[c][i] = values[c];
            }
        }
        // the pose rides along as one extra keyframe so it shares the range
        let num_to_normalize = match pose {
            Some(values) => {
                for c in 0..channels.len() {
                    buffers.keys[c][num_frames] = values[c];
                }
                num_frames + 1
            }
            None => num_frames,
        };
        for c in 0..channels.len() {
            normalize_jointly(
                &mut buffers.keys[c][..num_to_normalize],
                &mut buffers.samples[c][..num_samples],
            );
        }

        for (c, &(channel, label)) in channels.iter().enumerate() {
            let key_values = buffers.keys[c][..num_frames].to_vec();
            let (sample_times, sample_values) = if num_samples > 0 {
                (
                    buffers.normalized_sample_times[..num_samples].to_vec(),
                    buffers.samples[c][..num_samples].to_vec(),
                )
            } else {
                (self.key_times.clone(), key_values.clone())
            };
            view.attach_plot(Plot {
                label: label.to_string(),
                plot_index: num_plots + c,
                channel,
                key_times: self.key_times.clone(),
                key_values,
                sample_times,
                sample_values,
            });
        }

        Ok(pose.map(|_| {
            let mut normalized = [0.0; NUM_CHANNELS];
            for (c, value) in normalized.iter_mut().enumerate().take(channels.len()) {
                *value = buffers.keys[c][num_frames];
            }
            normalized
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgm_core::{Scene, Skeleton, TrackTarget, Transform};

    #[derive(Default)]
    struct RecordingView {
        plots: Vec<Plot>,
        pose_rotations: Vec<[f32; 4]>,
        pose_vectors: Vec<[f32; 3]>,
    }

    impl ScoreView for RecordingView {
        fn attach_plot(&mut self, plot: Plot) {
            self.plots.push(plot);
        }

        fn add_pose_rotation(&mut self, w: f32, x: f32, y: f32, z: f32) {
            self.pose_rotations.push([w, x, y, z]);
        }

        fn add_pose_vector(&mut self, x: f32, y: f32, z: f32) {
            self.pose_vectors.push([x, y, z]);
        }
    }

    fn model() -> LoadedCgm {
        let mut skeleton = Skeleton::new();
        let arm = skeleton.add_bone("arm", None);
        skeleton.add_bone("hand", Some(arm));

        let mut animation = Animation::new("wave", 2.0);
        let arm_track = Track::new(
            TrackTarget::Bone(arm),
            vec![0.0, 1.0, 2.0],
            Some(vec![
                Vec3::new(2.0, 1.0, 0.0),
                Vec3::new(4.0, 1.0, 0.0),
                Vec3::new(6.0, 1.0, 0.0),
            ]),
            Some(vec![Quat::IDENTITY; 3]),
            None,
        )
        .unwrap();
        animation.add_track(arm_track);
        let door_track = Track::new(
            TrackTarget::Spatial("door".into()),
            vec![0.0, 2.0],
            None,
            Some(vec![Quat::IDENTITY, Quat::from_rotation_y(1.0)]),
            Some(vec![Vec3::ONE; 2]),
        )
        .unwrap();
        animation.add_track(door_track);

        let mut cgm = LoadedCgm::new("model", Scene::new("root"))
            .with_skeleton(skeleton)
            .with_animation(animation);
        cgm.pose
            .set_transform(arm, Transform::from_translation(Vec3::new(4.0, 1.0, 0.0)));
        cgm
    }

    #[test]
    fn test_load_bone_track() {
        let cgm = model();
        let mut staff = StaffTrack::default();
        staff.load_bone_track(&cgm, 0).unwrap();
        assert_eq!(staff.label_text(), Some("arm"));
        assert_eq!(staff.frame_t(1), Some(0.5));
        assert_eq!(staff.frame_t(2), Some(1.0));
        assert_eq!(staff.frame_t(3), None);
        assert!(staff.has_rotations(&cgm));
        assert!(staff.has_translations(&cgm));
        assert!(!staff.has_scales(&cgm));
    }

    #[test]
    fn test_keyframes_double_as_samples() {
        let cgm = model();
        let mut staff = StaffTrack::default();
        staff.load_bone_track(&cgm, 0).unwrap();
        let mut view = RecordingView::default();
        staff
            .plot_translations(&cgm, 4, &mut view, &ScoreConfig::default())
            .unwrap();

        let labels: Vec<_> = view.plots.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["tx", "ty", "tz"]);
        assert_eq!(view.plots[0].plot_index, 4);
        assert_eq!(view.plots[2].plot_index, 6);
        assert_eq!(view.plots[0].channel, Channel::X);

        // pose x = 4 shares the range of the keyframes
        let tx = &view.plots[0];
        assert_eq!(tx.key_times, [0.0, 0.5, 1.0]);
        assert_eq!(tx.key_values, [0.0, 0.5, 1.0]);
        assert_eq!(tx.sample_times, tx.key_times);
        assert_eq!(tx.sample_values, tx.key_values);
        assert_eq!(view.plots[1].key_values, [0.5; 3]);
        assert_eq!(view.pose_vectors, [[0.5, 0.5, 0.5]]);
    }

    #[test]
    fn test_samples_share_range_with_keyframes() {
        let cgm = model();
        let config = ScoreConfig::default();
        let mut staff = StaffTrack::new(&config);
        staff.set_num_samples(5);
        staff.load_bone_track(&cgm, 0).unwrap();
        let mut view = RecordingView::default();
        staff.plot_translations(&cgm, 0, &mut view, &config).unwrap();

        let tx = &view.plots[0];
        assert_eq!(tx.sample_times, [0.0, 0.25, 0.5, 0.75, 1.0]);
        for (value, expected) in tx.sample_values.iter().zip([0.0, 0.25, 0.5, 0.75, 1.0]) {
            assert_relative_eq!(*value, expected);
        }
        assert_eq!(tx.key_values.len(), 3);
    }

    #[test]
    fn test_bone_rotations_mark_pose() {
        let cgm = model();
        let mut staff = StaffTrack::default();
        staff.set_num_samples(3);
        staff.load_bone_track(&cgm, 0).unwrap();
        let mut view = RecordingView::default();
        staff
            .plot_rotations(&cgm, 0, &mut view, &ScoreConfig::default())
            .unwrap();

        let labels: Vec<_> = view.plots.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["rw", "rx", "ry", "rz"]);
        assert_eq!(view.pose_rotations, [[0.5; 4]]);
        assert!(view.pose_vectors.is_empty());
    }

    #[test]
    fn test_spatial_track_has_no_pose() {
        let cgm = model();
        let mut staff = StaffTrack::default();
        staff.set_num_samples(4);
        staff.load_spatial_track(&cgm, 0).unwrap();
        assert_eq!(staff.label_text(), Some("spatial door"));
        assert!(!staff.has_translations(&cgm));

        let mut view = RecordingView::default();
        let config = ScoreConfig::default();
        staff.plot_rotations(&cgm, 0, &mut view, &config).unwrap();
        staff.plot_scales(&cgm, 4, &mut view, &config).unwrap();
        assert_eq!(view.plots.len(), 7);
        assert!(view.pose_rotations.is_empty());
        assert!(view.pose_vectors.is_empty());

        // y rotation goes from 0 up to sin(0.5)
        let ry = &view.plots[2];
        assert_eq!(ry.key_values, [0.0, 1.0]);
        assert_eq!(view.plots[4].label, "sx");
        assert_eq!(view.plots[4].sample_values, [0.5; 4]);
    }

    #[test]
    fn test_missing_channel() {
        let cgm = model();
        let mut staff = StaffTrack::default();
        staff.load_bone_track(&cgm, 0).unwrap();
        let mut view = RecordingView::default();
        let result = staff.plot_scales(&cgm, 0, &mut view, &ScoreConfig::default());
        assert_eq!(result, Err(StaffError::MissingChannel("scales")));
        assert!(view.plots.is_empty());
    }

    #[test]
    fn test_trackless_bone() {
        let cgm = model();
        let mut staff = StaffTrack::default();
        assert_eq!(
            staff.load_bone_track(&cgm, 1),
            Err(StaffError::NoTrackForBone("hand".into()))
        );
        assert_eq!(
            staff.set_trackless_bone(&cgm, 0),
            Err(StaffError::BoneHasTrack("arm".into()))
        );

        staff.load_bone_track(&cgm, 0).unwrap();
        staff.set_trackless_bone(&cgm, 1).unwrap();
        assert_eq!(staff.label_text(), Some("hand"));
        assert_eq!(staff.frame_t(0), None);
        assert!(!staff.has_rotations(&cgm));
        let mut view = RecordingView::default();
        assert_eq!(
            staff.plot_rotations(&cgm, 0, &mut view, &ScoreConfig::default()),
            Err(StaffError::NoTrack)
        );
    }

    #[test]
    fn test_zero_duration_keeps_raw_times() {
        let mut cgm = model();
        if let Some(animation) = cgm.animation.as_mut() {
            animation.duration = 0.0;
        }
        let mut staff = StaffTrack::default();
        staff.load_bone_track(&cgm, 0).unwrap();
        assert_eq!(staff.frame_t(2), Some(2.0));
    }

    #[test]
    fn test_bad_indices() {
        let cgm = model();
        let mut staff = StaffTrack::default();
        assert_eq!(
            staff.load_bone_track(&cgm, 9),
            Err(StaffError::BoneNotFound(9))
        );
        assert_eq!(
            staff.load_spatial_track(&cgm, 1),
            Err(StaffError::SpatialTrackNotFound(1))
        );
        let empty = LoadedCgm::new("empty", Scene::new("root"));
        assert_eq!(staff.load_bone_track(&empty, 0), Err(StaffError::NoSkeleton));
    }
}
