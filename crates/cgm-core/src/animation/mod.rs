//! Skeletons, animation tracks and the displayed pose

mod pose;
mod tween;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

pub use pose::Pose;
pub use tween::{TweenRotations, TweenVectors};

/// A bone in a skeleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    /// Index of the parent bone (None for root bones)
    pub parent: Option<usize>,
}

/// Bone hierarchy, parents before children
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub bones: Vec<Bone>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bone, returning its index
    pub fn add_bone(&mut self, name: impl Into<String>, parent: Option<usize>) -> usize {
        self.bones.push(Bone {
            name: name.into(),
            parent,
        });
        self.bones.len() - 1
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn bone_name(&self, index: usize) -> Option<&str> {
        self.bones.get(index).map(|b| b.name.as_str())
    }

    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.bones.get(index).and_then(|b| b.parent)
    }
}

/// What a track animates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackTarget {
    /// Bone, by index into the skeleton
    Bone(usize),
    /// Spatial, by name
    Spatial(String),
}

/// Keyframe data for one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub target: TrackTarget,
    /// Keyframe times in seconds, ascending, starting at 0
    pub times: Vec<f32>,
    pub translations: Option<Vec<Vec3>>,
    pub rotations: Option<Vec<Quat>>,
    pub scales: Option<Vec<Vec3>>,
}

impl Track {
    /// Create a track after checking that every channel matches the keyframe count
    pub fn new(
        target: TrackTarget,
        times: Vec<f32>,
        translations: Option<Vec<Vec3>>,
        rotations: Option<Vec<Quat>>,
        scales: Option<Vec<Vec3>>,
    ) -> Result<Self, TrackError> {
        match times.first() {
            None => return Err(TrackError::NoKeyframes),
            Some(&t) if t != 0.0 => return Err(TrackError::FirstTimeNotZero(t)),
            _ => {}
        }
        if times.windows(2).any(|w| w[1] < w[0]) {
            return Err(TrackError::TimesNotSorted);
        }
        let expected = times.len();
        let lengths = [
            translations.as_ref().map(Vec::len),
            rotations.as_ref().map(Vec::len),
            scales.as_ref().map(Vec::len),
        ];
        if let Some(found) = lengths.into_iter().flatten().find(|&n| n != expected) {
            return Err(TrackError::LengthMismatch { expected, found });
        }
        Ok(Self {
            target,
            times,
            translations,
            rotations,
            scales,
        })
    }

    pub fn num_keyframes(&self) -> usize {
        self.times.len()
    }

    pub fn is_bone_track(&self) -> bool {
        matches!(self.target, TrackTarget::Bone(_))
    }

    pub fn target_bone(&self) -> Option<usize> {
        match self.target {
            TrackTarget::Bone(index) => Some(index),
            TrackTarget::Spatial(_) => None,
        }
    }
}

/// A named collection of tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub name: String,
    /// Duration in seconds
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl Animation {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            tracks: Vec::new(),
        }
    }

    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn find_track_for_bone(&self, bone_index: usize) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|t| t.target == TrackTarget::Bone(bone_index))
    }

    pub fn has_track_for_bone(&self, bone_index: usize) -> bool {
        self.find_track_for_bone(bone_index).is_some()
    }

    /// The n-th spatial track, counting only spatial tracks
    pub fn find_spatial_track(&self, spatial_track_index: usize) -> Option<&Track> {
        self.tracks
            .iter()
            .filter(|t| matches!(t.target, TrackTarget::Spatial(_)))
            .nth(spatial_track_index)
    }

    pub fn count_spatial_tracks(&self) -> usize {
        self.tracks
            .iter()
            .filter(|t| matches!(t.target, TrackTarget::Spatial(_)))
            .count()
    }

    /// Short human-readable description of a track
    pub fn describe_track(track: &Track, skeleton: Option<&Skeleton>) -> String {
        match &track.target {
            TrackTarget::Bone(index) => match skeleton.and_then(|s| s.bone_name(*index)) {
                Some(name) => format!("bone {name}"),
                None => format!("bone #{index}"),
            },
            TrackTarget::Spatial(name) => format!("spatial {name}"),
        }
    }
}

/// Track construction errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackError {
    #[error("Track has no keyframes")]
    NoKeyframes,
    #[error("First keyframe time must be 0, got {0}")]
    FirstTimeNotZero(f32),
    #[error("Keyframe times are not in ascending order")]
    TimesNotSorted,
    #[error("Channel has {found} values, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_validation() {
        let bad = Track::new(
            TrackTarget::Bone(0),
            vec![0.0, 1.0],
            Some(vec![Vec3::ZERO]),
            None,
            None,
        );
        assert_eq!(
            bad,
            Err(TrackError::LengthMismatch {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            Track::new(TrackTarget::Bone(0), vec![0.5], None, None, None),
            Err(TrackError::FirstTimeNotZero(0.5))
        );
        assert_eq!(
            Track::new(TrackTarget::Bone(0), vec![], None, None, None),
            Err(TrackError::NoKeyframes)
        );
    }

    #[test]
    fn test_find_spatial_track_skips_bone_tracks() {
        let mut anim = Animation::new("walk", 2.0);
        anim.add_track(Track::new(TrackTarget::Bone(0), vec![0.0], None, None, None).unwrap());
        anim.add_track(
            Track::new(TrackTarget::Spatial("hat".into()), vec![0.0], None, None, None).unwrap(),
        );
        let track = anim.find_spatial_track(0).unwrap();
        assert_eq!(track.target, TrackTarget::Spatial("hat".into()));
        assert!(anim.find_spatial_track(1).is_none());
        assert!(anim.has_track_for_bone(0));
        assert!(!anim.has_track_for_bone(1));
    }

    #[test]
    fn test_describe_track() {
        let mut skeleton = Skeleton::new();
        skeleton.add_bone("spine", None);
        let track = Track::new(TrackTarget::Bone(0), vec![0.0], None, None, None).unwrap();
        assert_eq!(
            Animation::describe_track(&track, Some(&skeleton)),
            "bone spine"
        );
        assert_eq!(Animation::describe_track(&track, None), "bone #0");
    }
}
