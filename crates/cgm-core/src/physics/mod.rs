//! Physics space: collision shapes, rigid bodies and joints

mod joint;
mod ragdoll;
mod shape;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

pub use joint::{JointEnd, JointKind, PhysicsJoint};
pub use ragdoll::{LinkKind, PhysicsLink, Ragdoll, RangeOfMotion};
pub use shape::{Axis, ChildShape, CollisionShape, ShapeKind};

use crate::constants::FIRST_OBJECT_ID;
use crate::transform::Transform;

/// Id of a collision shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u64);

/// Id of a rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u64);

/// Id of a joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JointId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl JointId {
    /// Parse a joint name (lower-case hex id)
    pub fn parse_name(name: &str) -> Option<Self> {
        u64::from_str_radix(name, 16).ok().map(JointId)
    }
}

/// A rigid body using one collision shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub id: BodyId,
    pub mass: f32,
    pub shape: ShapeId,
    pub transform: Transform,
}

/// Registry of physics objects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsSpace {
    next_id: u64,
    shapes: BTreeMap<ShapeId, CollisionShape>,
    bodies: BTreeMap<BodyId, RigidBody>,
    joints: BTreeMap<JointId, PhysicsJoint>,
}

impl Default for PhysicsSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsSpace {
    pub fn new() -> Self {
        Self {
            next_id: FIRST_OBJECT_ID,
            shapes: BTreeMap::new(),
            bodies: BTreeMap::new(),
            joints: BTreeMap::new(),
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ============== Shapes ==============

    /// Register a shape under a fresh id
    pub fn add_shape(&mut self, shape: CollisionShape) -> ShapeId {
        let id = ShapeId(self.allocate_id());
        self.shapes.insert(id, shape);
        id
    }

    pub fn shape(&self, id: ShapeId) -> Option<&CollisionShape> {
        self.shapes.get(&id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut CollisionShape> {
        self.shapes.get_mut(&id)
    }

    /// All shapes, keyed and ordered by id
    pub fn shape_map(&self) -> &BTreeMap<ShapeId, CollisionShape> {
        &self.shapes
    }

    /// All shape ids, ascending
    pub fn shape_ids(&self) -> Vec<ShapeId> {
        self.shapes.keys().copied().collect()
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<CollisionShape> {
        self.shapes.remove(&id)
    }

    /// Ids of every body and compound shape that uses `shape`, as raw ids
    pub fn user_set(&self, shape: ShapeId) -> BTreeSet<u64> {
        let bodies = self
            .bodies
            .values()
            .filter(|b| b.shape == shape)
            .map(|b| b.id.0);
        let compounds = self
            .shapes
            .iter()
            .filter(|(_, s)| s.has_child(shape))
            .map(|(id, _)| id.0);
        bodies.chain(compounds).collect()
    }

    /// Point every body that uses `old` at `new`
    pub fn replace_in_objects(&mut self, old: ShapeId, new: ShapeId) -> usize {
        let mut count = 0;
        for body in self.bodies.values_mut().filter(|b| b.shape == old) {
            body.shape = new;
            count += 1;
        }
        tracing::debug!("Replaced shape {} with {} in {} bodies", old, new, count);
        count
    }

    /// Point every compound child that uses `old` at `new`
    pub fn replace_in_compounds(&mut self, old: ShapeId, new: ShapeId) -> usize {
        let mut count = 0;
        for shape in self.shapes.values_mut() {
            if let ShapeKind::Compound { children } = &mut shape.kind {
                for child in children.iter_mut().filter(|c| c.shape == old) {
                    child.shape = new;
                    count += 1;
                }
            }
        }
        tracing::debug!("Replaced shape {} with {} in {} compounds", old, new, count);
        count
    }

    // ============== Bodies ==============

    /// Register a rigid body under a fresh id
    pub fn add_body(&mut self, mass: f32, shape: ShapeId, transform: Transform) -> BodyId {
        let id = BodyId(self.allocate_id());
        self.bodies.insert(
            id,
            RigidBody {
                id,
                mass,
                shape,
                transform,
            },
        );
        id
    }

    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.get(&id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &RigidBody> {
        self.bodies.values()
    }

    pub fn remove_body(&mut self, id: BodyId) -> Option<RigidBody> {
        self.bodies.remove(&id)
    }

    /// Display name of a body
    pub fn object_name(id: BodyId) -> String {
        format!("Rigid{id}")
    }

    // ============== Joints ==============

    /// Register a joint under a fresh id
    pub fn add_joint(
        &mut self,
        kind: JointKind,
        body_a: Option<BodyId>,
        body_b: Option<BodyId>,
    ) -> JointId {
        let id = JointId(self.allocate_id());
        self.joints.insert(
            id,
            PhysicsJoint {
                id,
                kind,
                body_a,
                body_b,
            },
        );
        id
    }

    pub fn joint(&self, id: JointId) -> Option<&PhysicsJoint> {
        self.joints.get(&id)
    }

    /// All joint ids, ascending
    pub fn joint_ids(&self) -> Vec<JointId> {
        self.joints.keys().copied().collect()
    }

    pub fn remove_joint(&mut self, id: JointId) -> Option<PhysicsJoint> {
        self.joints.remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn test_ids_are_unique_and_ascending() {
        let mut space = PhysicsSpace::new();
        let a = space.add_shape(CollisionShape::sphere(1.0));
        let b = space.add_shape(CollisionShape::sphere(2.0));
        let body = space.add_body(1.0, a, Transform::IDENTITY);
        assert!(a < b);
        assert!(b.0 < body.0);
        assert_eq!(space.shape_ids(), vec![a, b]);
    }

    #[test]
    fn test_user_set_includes_bodies_and_compounds() {
        let mut space = PhysicsSpace::new();
        let ball = space.add_shape(CollisionShape::sphere(1.0));
        let compound = space.add_shape(CollisionShape::compound(vec![ChildShape {
            shape: ball,
            location: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }]));
        let body = space.add_body(1.0, ball, Transform::IDENTITY);

        let users = space.user_set(ball);
        assert!(users.contains(&compound.0));
        assert!(users.contains(&body.0));
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn test_replace_in_objects_and_compounds() {
        let mut space = PhysicsSpace::new();
        let old = space.add_shape(CollisionShape::sphere(1.0));
        let compound = space.add_shape(CollisionShape::compound(vec![ChildShape {
            shape: old,
            location: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }]));
        let body = space.add_body(1.0, old, Transform::IDENTITY);
        let new = space.add_shape(CollisionShape::sphere(2.0));

        assert_eq!(space.replace_in_objects(old, new), 1);
        assert_eq!(space.body(body).unwrap().shape, new);
        assert_eq!(space.replace_in_compounds(old, new), 1);
        assert!(space.shape(compound).unwrap().has_child(new));
    }

    #[test]
    fn test_joint_name_parse() {
        let mut space = PhysicsSpace::new();
        let joint = space.add_joint(JointKind::Hinge, None, None);
        let name = joint.to_string();
        assert_eq!(JointId::parse_name(&name), Some(joint));
        assert_eq!(JointId::parse_name("not hex"), None);
    }
}
