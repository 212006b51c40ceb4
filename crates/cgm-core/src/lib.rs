//! Scene-side object model for the CGM editor
//!
//! The editor never owns rendering or simulation. It consumes a scene graph,
//! a physics space and animation data through the types in this crate.

pub mod animation;
pub mod constants;
pub mod physics;
pub mod scene;
pub mod transform;

pub use animation::{
    Animation, Bone, Pose, Skeleton, Track, TrackError, TrackTarget, TweenRotations, TweenVectors,
};
pub use physics::{
    Axis, BodyId, ChildShape, CollisionShape, JointEnd, JointId, JointKind, LinkKind, PhysicsJoint,
    PhysicsLink, PhysicsSpace, Ragdoll, RangeOfMotion, RigidBody, ShapeId, ShapeKind,
};
pub use scene::{
    Light, LightId, LightKind, MatParam, MatParamOverride, MatParamValue, Material, Scene,
    SceneError, Spatial, SpatialId, VarType,
};
pub use transform::Transform;
