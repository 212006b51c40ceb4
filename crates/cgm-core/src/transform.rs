//! Translation/rotation/scale transform

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Rigid transform with non-uniform scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform from a translation only
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Create a transform from a translation and rotation
    pub fn from_translation_rotation(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Apply `parent` on top of this transform (this transform is local to the parent)
    pub fn combine_with_parent(&self, parent: &Transform) -> Transform {
        let scale = parent.scale * self.scale;
        let rotation = parent.rotation * self.rotation;
        let translation = parent.rotation * (parent.scale * self.translation) + parent.translation;
        Transform {
            translation,
            rotation,
            scale,
        }
    }
}
