//! Displayed pose: one user transform per bone

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::transform::Transform;

/// User transforms of a skeleton's bones
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    transforms: Vec<Transform>,
}

impl Pose {
    /// Bind pose for a skeleton with `num_bones` bones
    pub fn new(num_bones: usize) -> Self {
        Self {
            transforms: vec![Transform::IDENTITY; num_bones],
        }
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// User transform of a bone (identity for unknown bones)
    pub fn user_transform(&self, bone_index: usize) -> Transform {
        self.transforms
            .get(bone_index)
            .copied()
            .unwrap_or(Transform::IDENTITY)
    }

    pub fn user_rotation(&self, bone_index: usize) -> Quat {
        self.user_transform(bone_index).rotation
    }

    pub fn user_translation(&self, bone_index: usize) -> Vec3 {
        self.user_transform(bone_index).translation
    }

    pub fn user_scale(&self, bone_index: usize) -> Vec3 {
        self.user_transform(bone_index).scale
    }

    /// Set a bone's user transform, growing the pose if needed
    pub fn set_transform(&mut self, bone_index: usize, transform: Transform) {
        if bone_index >= self.transforms.len() {
            self.transforms.resize(bone_index + 1, Transform::IDENTITY);
        }
        self.transforms[bone_index] = transform;
    }
}
