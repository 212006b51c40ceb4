//! Light sources owned by spatials

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_LIGHT_COLOR;

/// Identity of one light value. A duplicated light gets a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LightId(pub Uuid);

impl LightId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LightId {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind-specific light data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LightKind {
    Ambient,
    Directional {
        direction: Vec3,
    },
    Point {
        position: Vec3,
        radius: f32,
    },
    Spot {
        position: Vec3,
        direction: Vec3,
        range: f32,
        inner_angle: f32,
        outer_angle: f32,
    },
    Probe {
        position: Vec3,
        radius: f32,
    },
}

/// A light attached to a spatial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub id: LightId,
    pub name: String,
    /// Color (RGBA)
    pub color: [f32; 4],
    pub enabled: bool,
    pub kind: LightKind,
}

impl Light {
    /// Create an enabled white light of the given kind
    pub fn new(name: impl Into<String>, kind: LightKind) -> Self {
        Self {
            id: LightId::new(),
            name: name.into(),
            color: DEFAULT_LIGHT_COLOR,
            enabled: true,
            kind,
        }
    }

    pub fn ambient(name: impl Into<String>) -> Self {
        Self::new(name, LightKind::Ambient)
    }

    pub fn directional(name: impl Into<String>, direction: Vec3) -> Self {
        Self::new(
            name,
            LightKind::Directional {
                direction: direction.normalize(),
            },
        )
    }

    pub fn point(name: impl Into<String>, position: Vec3) -> Self {
        Self::new(
            name,
            LightKind::Point {
                position,
                radius: 0.0,
            },
        )
    }

    pub fn spot(name: impl Into<String>, position: Vec3, direction: Vec3) -> Self {
        Self::new(
            name,
            LightKind::Spot {
                position,
                direction: direction.normalize(),
                range: 100.0,
                inner_angle: std::f32::consts::PI / 8.0,
                outer_angle: std::f32::consts::PI / 4.0,
            },
        )
    }

    pub fn probe(name: impl Into<String>, position: Vec3) -> Self {
        Self::new(
            name,
            LightKind::Probe {
                position,
                radius: 1.0,
            },
        )
    }

    /// Copy this light under a fresh id
    pub fn duplicate(&self) -> Self {
        Self {
            id: LightId::new(),
            ..self.clone()
        }
    }

    /// Short description of the light's kind
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            LightKind::Ambient => "Ambient",
            LightKind::Directional { .. } => "Directional",
            LightKind::Point { .. } => "Point",
            LightKind::Spot { .. } => "Spot",
            LightKind::Probe { .. } => "Probe",
        }
    }

    /// Direction, for directional and spot lights
    pub fn direction(&self) -> Option<Vec3> {
        match self.kind {
            LightKind::Directional { direction } | LightKind::Spot { direction, .. } => {
                Some(direction)
            }
            _ => None,
        }
    }

    /// Position, for point, spot and probe lights
    pub fn position(&self) -> Option<Vec3> {
        match self.kind {
            LightKind::Point { position, .. }
            | LightKind::Spot { position, .. }
            | LightKind::Probe { position, .. } => Some(position),
            _ => None,
        }
    }

    /// Set the direction. Returns false if this kind has no direction.
    pub fn set_direction(&mut self, new_direction: Vec3) -> bool {
        match &mut self.kind {
            LightKind::Directional { direction } | LightKind::Spot { direction, .. } => {
                *direction = new_direction.normalize();
                true
            }
            _ => false,
        }
    }

    /// Set the position. Returns false if this kind has no position.
    pub fn set_position(&mut self, new_position: Vec3) -> bool {
        match &mut self.kind {
            LightKind::Point { position, .. }
            | LightKind::Spot { position, .. }
            | LightKind::Probe { position, .. } => {
                *position = new_position;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_gets_new_id() {
        let light = Light::point("lamp", Vec3::ONE);
        let copy = light.duplicate();
        assert_ne!(light.id, copy.id);
        assert_eq!(light.name, copy.name);
        assert_eq!(light.kind, copy.kind);
    }

    #[test]
    fn test_direction_only_for_directed_kinds() {
        let mut sun = Light::directional("sun", Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(sun.direction(), Some(Vec3::NEG_Y));
        assert!(sun.position().is_none());
        assert!(sun.set_direction(Vec3::X));

        let mut ambient = Light::ambient("fill");
        assert!(!ambient.set_direction(Vec3::X));
        assert!(!ambient.set_position(Vec3::X));
        assert_eq!(ambient.type_name(), "Ambient");
    }
}
