//! Collision shapes and their geometric parameters

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MARGIN;

use super::ShapeId;

/// Local axis of an axis-aligned shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two axes perpendicular to this one, in ascending order
    fn others(self) -> (usize, usize) {
        match self {
            Axis::X => (1, 2),
            Axis::Y => (0, 2),
            Axis::Z => (0, 1),
        }
    }
}

/// Child of a compound shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildShape {
    pub shape: ShapeId,
    pub location: Vec3,
    pub rotation: Quat,
}

/// Kind-specific shape data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    Box {
        half_extents: Vec3,
    },
    Capsule {
        radius: f32,
        /// Height of the cylindrical part
        height: f32,
        axis: Axis,
    },
    Cone {
        radius: f32,
        height: f32,
        axis: Axis,
    },
    Cylinder {
        half_extents: Vec3,
        axis: Axis,
    },
    Sphere {
        radius: f32,
    },
    Compound {
        children: Vec<ChildShape>,
    },
}

/// A collision shape registered in a physics space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionShape {
    pub kind: ShapeKind,
    pub margin: f32,
    pub scale: Vec3,
}

impl CollisionShape {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            margin: DEFAULT_MARGIN,
            scale: Vec3::ONE,
        }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::new(ShapeKind::Box { half_extents })
    }

    pub fn capsule(radius: f32, height: f32, axis: Axis) -> Self {
        Self::new(ShapeKind::Capsule {
            radius,
            height,
            axis,
        })
    }

    pub fn cone(radius: f32, height: f32, axis: Axis) -> Self {
        Self::new(ShapeKind::Cone {
            radius,
            height,
            axis,
        })
    }

    pub fn cylinder(half_extents: Vec3, axis: Axis) -> Self {
        Self::new(ShapeKind::Cylinder { half_extents, axis })
    }

    pub fn sphere(radius: f32) -> Self {
        Self::new(ShapeKind::Sphere { radius })
    }

    pub fn compound(children: Vec<ChildShape>) -> Self {
        Self::new(ShapeKind::Compound { children })
    }

    /// Short description of the shape's kind
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ShapeKind::Box { .. } => "Box",
            ShapeKind::Capsule { .. } => "Capsule",
            ShapeKind::Cone { .. } => "Cone",
            ShapeKind::Cylinder { .. } => "Cylinder",
            ShapeKind::Sphere { .. } => "Sphere",
            ShapeKind::Compound { .. } => "Compound",
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self.kind, ShapeKind::Compound { .. })
    }

    /// Children, for compound shapes
    pub fn children(&self) -> &[ChildShape] {
        match &self.kind {
            ShapeKind::Compound { children } => children,
            _ => &[],
        }
    }

    /// Main axis of capsules, cones and cylinders
    pub fn axis(&self) -> Option<Axis> {
        match self.kind {
            ShapeKind::Capsule { axis, .. }
            | ShapeKind::Cone { axis, .. }
            | ShapeKind::Cylinder { axis, .. } => Some(axis),
            _ => None,
        }
    }

    /// Unscaled half extents. None for compounds.
    pub fn half_extents(&self) -> Option<Vec3> {
        let result = match self.kind {
            ShapeKind::Box { half_extents } | ShapeKind::Cylinder { half_extents, .. } => {
                half_extents
            }
            ShapeKind::Capsule {
                radius,
                height,
                axis,
            } => axial_extents(axis, height / 2.0 + radius, radius),
            ShapeKind::Cone {
                radius,
                height,
                axis,
            } => axial_extents(axis, height / 2.0, radius),
            ShapeKind::Sphere { radius } => Vec3::splat(radius),
            ShapeKind::Compound { .. } => return None,
        };
        Some(result)
    }

    /// Unscaled height, where the kind has one. For a box, the largest extent.
    pub fn height(&self) -> Option<f32> {
        match self.kind {
            ShapeKind::Box { half_extents } => Some(2.0 * half_extents.max_element()),
            ShapeKind::Capsule { height, .. } | ShapeKind::Cone { height, .. } => Some(height),
            ShapeKind::Cylinder { half_extents, axis } => Some(half_extents[axis.index()]),
            ShapeKind::Sphere { radius } => Some(2.0 * radius),
            _ => None,
        }
    }

    /// Unscaled radius, where the kind has one. For a box, the largest half extent.
    pub fn radius(&self) -> Option<f32> {
        match self.kind {
            ShapeKind::Box { half_extents } => Some(half_extents.max_element()),
            ShapeKind::Capsule { radius, .. }
            | ShapeKind::Cone { radius, .. }
            | ShapeKind::Sphere { radius } => Some(radius),
            _ => None,
        }
    }

    /// A replacement shape with the given half extents.
    ///
    /// Returns None when this kind cannot take those extents, for example a
    /// sphere with unequal extents, a capsule shorter than its diameter or a
    /// compound.
    pub fn with_half_extents(&self, new_half_extents: Vec3) -> Option<CollisionShape> {
        let kind = match self.kind {
            ShapeKind::Box { .. } => ShapeKind::Box {
                half_extents: new_half_extents,
            },
            ShapeKind::Capsule { axis, .. } | ShapeKind::Cone { axis, .. } => {
                let axial = new_half_extents[axis.index()];
                let (i, j) = axis.others();
                let radius = new_half_extents[i];
                if radius != new_half_extents[j] {
                    return None;
                }
                if matches!(self.kind, ShapeKind::Capsule { .. }) {
                    if axial < radius {
                        return None;
                    }
                    ShapeKind::Capsule {
                        radius,
                        height: 2.0 * (axial - radius),
                        axis,
                    }
                } else {
                    ShapeKind::Cone {
                        radius,
                        height: 2.0 * axial,
                        axis,
                    }
                }
            }
            ShapeKind::Cylinder { axis, .. } => ShapeKind::Cylinder {
                half_extents: new_half_extents,
                axis,
            },
            ShapeKind::Sphere { .. } => {
                let e = new_half_extents;
                if e.x != e.y || e.y != e.z {
                    return None;
                }
                ShapeKind::Sphere { radius: e.x }
            }
            ShapeKind::Compound { .. } => return None,
        };
        Some(self.replacement(kind))
    }

    /// A replacement shape with the given height. None for compounds.
    pub fn with_height(&self, new_height: f32) -> Option<CollisionShape> {
        let kind = match self.kind {
            ShapeKind::Box { .. } | ShapeKind::Sphere { .. } => {
                return self.with_radius(new_height / 2.0);
            }
            ShapeKind::Capsule { radius, axis, .. } => ShapeKind::Capsule {
                radius,
                height: new_height,
                axis,
            },
            ShapeKind::Cone { radius, axis, .. } => ShapeKind::Cone {
                radius,
                height: new_height,
                axis,
            },
            ShapeKind::Cylinder {
                mut half_extents,
                axis,
            } => {
                half_extents[axis.index()] = new_height;
                ShapeKind::Cylinder { half_extents, axis }
            }
            ShapeKind::Compound { .. } => return None,
        };
        Some(self.replacement(kind))
    }

    /// A replacement shape with the given radius. None for compounds.
    pub fn with_radius(&self, new_radius: f32) -> Option<CollisionShape> {
        let kind = match self.kind {
            ShapeKind::Box { .. } => ShapeKind::Box {
                half_extents: Vec3::splat(new_radius),
            },
            ShapeKind::Capsule { height, axis, .. } => ShapeKind::Capsule {
                radius: new_radius,
                height,
                axis,
            },
            ShapeKind::Cone { height, axis, .. } => ShapeKind::Cone {
                radius: new_radius,
                height,
                axis,
            },
            ShapeKind::Cylinder {
                mut half_extents,
                axis,
            } => {
                let (i, j) = axis.others();
                half_extents[i] = new_radius;
                half_extents[j] = new_radius;
                ShapeKind::Cylinder { half_extents, axis }
            }
            ShapeKind::Sphere { .. } => ShapeKind::Sphere { radius: new_radius },
            ShapeKind::Compound { .. } => return None,
        };
        Some(self.replacement(kind))
    }

    /// Whether `shape_id` is one of this compound's children
    pub fn has_child(&self, shape_id: ShapeId) -> bool {
        self.children().iter().any(|c| c.shape == shape_id)
    }

    fn replacement(&self, kind: ShapeKind) -> CollisionShape {
        CollisionShape {
            kind,
            margin: self.margin,
            scale: self.scale,
        }
    }
}

fn axial_extents(axis: Axis, axial: f32, radial: f32) -> Vec3 {
    let mut result = Vec3::splat(radial);
    result[axis.index()] = axial;
    result
}
