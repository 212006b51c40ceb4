//! Physics joints between rigid bodies

use serde::{Deserialize, Serialize};

use super::{BodyId, JointId};

/// Joint type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointKind {
    Point2Point,
    Hinge,
    Cone,
    Slider,
    SixDof,
    New6Dof,
}

impl JointKind {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            JointKind::Point2Point => "Point2Point",
            JointKind::Hinge => "Hinge",
            JointKind::Cone => "Cone",
            JointKind::Slider => "Slider",
            JointKind::SixDof => "SixDof",
            JointKind::New6Dof => "New6Dof",
        }
    }
}

/// Which end of a joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointEnd {
    A,
    B,
}

/// A joint registered in a physics space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsJoint {
    pub id: JointId,
    pub kind: JointKind,
    /// Body at end A (None for single-ended joints)
    pub body_a: Option<BodyId>,
    pub body_b: Option<BodyId>,
}

impl PhysicsJoint {
    /// Body at the given end
    pub fn body(&self, end: JointEnd) -> Option<BodyId> {
        match end {
            JointEnd::A => self.body_a,
            JointEnd::B => self.body_b,
        }
    }
}
