//! The editable model: applies edits to a loaded model and records them for undo

use cgm_core::{
    BodyId, CollisionShape, JointId, JointKind, Light, LightId, LinkKind, MatParam, PhysicsLink,
    RangeOfMotion, SceneError, ShapeId, Skeleton, SpatialId, Transform,
};
use glam::Vec3;

use crate::cgm::LoadedCgm;
use crate::constants::DEFAULT_HISTORY_DEPTH;
use crate::history::History;

/// Half extents of the box shape given to a newly created link body
pub const LINK_HALF_EXTENTS: Vec3 = Vec3::splat(0.1);

/// Mass of a newly created link body
pub const LINK_MASS: f32 = 1.0;

/// Edit operations the selection wrappers forward to.
///
/// Every operation either applies completely and records one history event,
/// or fails without touching the model.
pub trait CgmEditor {
    /// The model being edited
    fn cgm(&self) -> &LoadedCgm;

    /// Add a light to a spatial
    fn add_light(
        &mut self,
        owner: SpatialId,
        light: Light,
        description: &str,
    ) -> Result<LightId, EditError>;

    /// Replace a light in its owner, or remove it when `new_light` is None
    fn replace_light(
        &mut self,
        old: LightId,
        new_light: Option<Light>,
        description: &str,
    ) -> Result<(), EditError>;

    /// Replace a light that differs only in color. Repeated recolors of one
    /// light form a single history event.
    fn replace_light_color(&mut self, old: LightId, new_light: Light) -> Result<(), EditError>;

    /// Replace a light that differs only in position or direction. Repeated
    /// edits of one light form a single history event.
    fn replace_light_pos_dir(&mut self, old: LightId, new_light: Light) -> Result<(), EditError>;

    /// Remove a parameter from the selected spatial's material
    fn delete_mat_param(&mut self, name: &str) -> Result<MatParam, EditError>;

    /// Register `new_shape` and point every body using `old` at it
    fn replace_shape_in_objects(
        &mut self,
        old: ShapeId,
        new_shape: CollisionShape,
        description: &str,
    ) -> Result<ShapeId, EditError>;

    /// Register a resized copy of `old` and use it everywhere `old` was used.
    /// Repeated resizes of one shape form a single history event.
    fn replace_shape_for_resize(
        &mut self,
        old: ShapeId,
        new_shape: CollisionShape,
    ) -> Result<ShapeId, EditError>;

    fn set_shape_margin(&mut self, shape: ShapeId, margin: f32) -> Result<(), EditError>;

    /// Create a bone link. Returns the new link's name.
    fn link_bone(&mut self, bone: &str) -> Result<String, EditError>;

    /// Create an attachment link for a bone. Returns the new link's name.
    fn attach_bone(&mut self, bone: &str) -> Result<String, EditError>;

    /// Remove a link along with its body and joint
    fn unlink(&mut self, link_name: &str) -> Result<(), EditError>;
}

/// Errors from edits
#[derive(Debug, Clone, thiserror::Error)]
pub enum EditError {
    #[error("Spatial not found: {0:?}")]
    SpatialNotFound(SpatialId),
    #[error("Light not found: {0:?}")]
    LightNotFound(LightId),
    #[error("Shape not found: {0}")]
    ShapeNotFound(ShapeId),
    #[error("Bone not found: {0}")]
    BoneNotFound(String),
    #[error("Link not found: {0}")]
    LinkNotFound(String),
    #[error("Already linked: {0}")]
    AlreadyLinked(String),
    #[error("Model has no ragdoll")]
    NoRagdoll,
    #[error("Link {0} has children")]
    LinkHasChildren(String),
    #[error("The torso link cannot be removed")]
    TorsoLink,
    #[error("Selected spatial has no material")]
    NoMaterial,
    #[error("Material parameter not found: {0}")]
    ParamNotFound(String),
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// A loaded model with edit history
#[derive(Debug, Clone)]
pub struct EditableCgm {
    cgm: LoadedCgm,
    history: History,
    edit_count: usize,
    /// Key of the continuous edit in progress, empty if none
    continuous_edit: String,
}

impl Default for EditableCgm {
    fn default() -> Self {
        Self::new(LoadedCgm::empty(), DEFAULT_HISTORY_DEPTH)
    }
}

impl EditableCgm {
    pub fn new(cgm: LoadedCgm, max_history_depth: usize) -> Self {
        Self {
            cgm,
            history: History::new(max_history_depth),
            edit_count: 0,
            continuous_edit: String::new(),
        }
    }

    /// Replace the model and forget all history
    pub fn load(&mut self, cgm: LoadedCgm) {
        tracing::info!("Loaded model {:?}", cgm.name());
        self.cgm = cgm;
        self.history.clear();
        self.edit_count = 0;
        self.continuous_edit.clear();
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Number of edits since load
    pub fn edit_count(&self) -> usize {
        self.edit_count
    }

    pub fn select_spatial(&mut self, id: SpatialId) -> Result<(), crate::select::SelectionError> {
        self.cgm.select_spatial(id)
    }

    pub fn undo(&mut self) -> Option<String> {
        self.continuous_edit.clear();
        self.history.undo(&mut self.cgm)
    }

    pub fn redo(&mut self) -> Option<String> {
        self.continuous_edit.clear();
        self.history.redo(&mut self.cgm)
    }

    /// Record an ordinary edit
    fn set_edited(&mut self, description: String, before: LoadedCgm) {
        self.edit_count += 1;
        self.continuous_edit.clear();
        self.history.record(description, before);
    }

    /// Checkpoint for a continuous edit, or None if it continues the previous one
    fn continuous_checkpoint(&self, key: &str) -> Option<LoadedCgm> {
        (self.continuous_edit != key).then(|| self.cgm.clone())
    }

    fn set_edited_continuous(
        &mut self,
        key: String,
        description: String,
        checkpoint: Option<LoadedCgm>,
    ) {
        if let Some(before) = checkpoint {
            self.edit_count += 1;
            self.history.record(description, before);
        }
        self.continuous_edit = key;
    }

    fn light_owner(&self, id: LightId) -> Result<SpatialId, EditError> {
        self.cgm
            .scene
            .find_owner(id)
            .ok_or(EditError::LightNotFound(id))
    }

    fn light_name(&self, id: LightId) -> Result<String, EditError> {
        self.cgm
            .scene
            .find_light(id)
            .map(|(_, l)| l.name.clone())
            .ok_or(EditError::LightNotFound(id))
    }

    fn require_shape(&self, id: ShapeId) -> Result<(), EditError> {
        if self.cgm.physics.shape(id).is_none() {
            return Err(EditError::ShapeNotFound(id));
        }
        Ok(())
    }

    /// Swap one light for another in place
    fn swap_light(&mut self, old: LightId, new_light: Light) -> Result<(), EditError> {
        let owner = self.light_owner(old)?;
        self.cgm.scene.replace_light(owner, old, new_light)?;
        Ok(())
    }

    /// Name of the nearest link above `bone`: the closest linked ancestor bone,
    /// or the torso
    fn parent_link_name(&self, skeleton: &Skeleton, bone_index: usize) -> String {
        let mut current = skeleton.parent_of(bone_index);
        while let Some(index) = current {
            if let (Some(name), Some(ragdoll)) = (skeleton.bone_name(index), &self.cgm.ragdoll)
                && ragdoll.find_bone_link(name).is_some()
            {
                return LinkKind::Bone(name.to_string()).link_name();
            }
            current = skeleton.parent_of(index);
        }
        LinkKind::Torso.link_name()
    }

    fn bone_index(&self, bone: &str) -> Result<usize, EditError> {
        self.cgm
            .skeleton
            .as_ref()
            .and_then(|s| s.find_bone(bone))
            .ok_or_else(|| EditError::BoneNotFound(bone.to_string()))
    }

    /// Whether `bone` lies in the subtree below `ancestor`
    fn is_descendant(skeleton: &Skeleton, bone: usize, ancestor: usize) -> bool {
        let mut current = skeleton.parent_of(bone);
        while let Some(index) = current {
            if index == ancestor {
                return true;
            }
            current = skeleton.parent_of(index);
        }
        false
    }

    /// Create a body and a joint to the parent link's body
    fn create_link_body(&mut self, parent_body: BodyId) -> (BodyId, JointId) {
        let shape = self
            .cgm
            .physics
            .add_shape(CollisionShape::cuboid(LINK_HALF_EXTENTS));
        let body = self
            .cgm
            .physics
            .add_body(LINK_MASS, shape, Transform::IDENTITY);
        let joint =
            self.cgm
                .physics
                .add_joint(JointKind::New6Dof, Some(parent_body), Some(body));
        (body, joint)
    }
}

impl CgmEditor for EditableCgm {
    fn cgm(&self) -> &LoadedCgm {
        &self.cgm
    }

    fn add_light(
        &mut self,
        owner: SpatialId,
        light: Light,
        description: &str,
    ) -> Result<LightId, EditError> {
        if !self.cgm.scene.contains(owner) {
            return Err(EditError::SpatialNotFound(owner));
        }
        let before = self.cgm.clone();
        let id = self.cgm.scene.add_light(owner, light)?;
        self.set_edited(description.to_string(), before);
        Ok(id)
    }

    fn replace_light(
        &mut self,
        old: LightId,
        new_light: Option<Light>,
        description: &str,
    ) -> Result<(), EditError> {
        let owner = self.light_owner(old)?;
        let before = self.cgm.clone();
        match new_light {
            Some(light) => {
                self.cgm.scene.replace_light(owner, old, light)?;
            }
            None => {
                self.cgm.scene.remove_light(owner, old)?;
            }
        }
        self.set_edited(description.to_string(), before);
        Ok(())
    }

    fn replace_light_color(&mut self, old: LightId, new_light: Light) -> Result<(), EditError> {
        let name = self.light_name(old)?;
        let key = format!("lc{name}");
        let checkpoint = self.continuous_checkpoint(&key);
        self.swap_light(old, new_light)?;
        self.set_edited_continuous(key, format!("recolor light named {name:?}"), checkpoint);
        Ok(())
    }

    fn replace_light_pos_dir(&mut self, old: LightId, new_light: Light) -> Result<(), EditError> {
        let name = self.light_name(old)?;
        let key = format!("lpd{name}");
        let checkpoint = self.continuous_checkpoint(&key);
        self.swap_light(old, new_light)?;
        self.set_edited_continuous(
            key,
            format!("reposition and/or redirect light named {name:?}"),
            checkpoint,
        );
        Ok(())
    }

    fn delete_mat_param(&mut self, name: &str) -> Result<MatParam, EditError> {
        let spatial = self.cgm.selected_spatial();
        let material = self.cgm.scene.material(spatial).ok_or(EditError::NoMaterial)?;
        if material.param(name).is_none() {
            return Err(EditError::ParamNotFound(name.to_string()));
        }
        let before = self.cgm.clone();
        let removed = self
            .cgm
            .scene
            .material_mut(spatial)
            .and_then(|m| m.clear_param(name))
            .ok_or_else(|| EditError::ParamNotFound(name.to_string()))?;
        self.set_edited(format!("delete material parameter {name:?}"), before);
        Ok(removed)
    }

    fn replace_shape_in_objects(
        &mut self,
        old: ShapeId,
        new_shape: CollisionShape,
        description: &str,
    ) -> Result<ShapeId, EditError> {
        self.require_shape(old)?;
        let before = self.cgm.clone();
        let new_id = self.cgm.physics.add_shape(new_shape);
        self.cgm.physics.replace_in_objects(old, new_id);
        self.set_edited(description.to_string(), before);
        Ok(new_id)
    }

    fn replace_shape_for_resize(
        &mut self,
        old: ShapeId,
        new_shape: CollisionShape,
    ) -> Result<ShapeId, EditError> {
        self.require_shape(old)?;
        let checkpoint = self.continuous_checkpoint(&format!("ss{old}"));
        let physics = &mut self.cgm.physics;
        let new_id = physics.add_shape(new_shape);
        physics.replace_in_objects(old, new_id);
        physics.replace_in_compounds(old, new_id);
        physics.remove_shape(old);
        self.set_edited_continuous(
            format!("ss{new_id}"),
            "resize collision shape".to_string(),
            checkpoint,
        );
        Ok(new_id)
    }

    fn set_shape_margin(&mut self, shape: ShapeId, margin: f32) -> Result<(), EditError> {
        self.require_shape(shape)?;
        let before = self.cgm.clone();
        if let Some(target) = self.cgm.physics.shape_mut(shape) {
            target.margin = margin;
        }
        self.set_edited(format!("set margin of collision shape {shape} to {margin}"), before);
        Ok(())
    }

    fn link_bone(&mut self, bone: &str) -> Result<String, EditError> {
        let ragdoll = self.cgm.ragdoll.as_ref().ok_or(EditError::NoRagdoll)?;
        let bone_index = self.bone_index(bone)?;
        if ragdoll.find_bone_link(bone).is_some() {
            return Err(EditError::AlreadyLinked(bone.to_string()));
        }
        let skeleton = self
            .cgm
            .skeleton
            .clone()
            .ok_or_else(|| EditError::BoneNotFound(bone.to_string()))?;
        let parent_name = self.parent_link_name(&skeleton, bone_index);
        let parent_body = ragdoll
            .link(&parent_name)
            .map(|l| l.body)
            .ok_or_else(|| EditError::LinkNotFound(parent_name.clone()))?;

        // links currently under the parent that belong below the new bone
        let adopted: Vec<PhysicsLink> = ragdoll
            .children(&parent_name)
            .iter()
            .filter_map(|name| ragdoll.link(name))
            .filter(|link| {
                link.kind
                    .bone_name()
                    .and_then(|b| skeleton.find_bone(b))
                    .is_some_and(|i| i == bone_index || Self::is_descendant(&skeleton, i, bone_index))
            })
            .filter(|link| link.kind != LinkKind::Bone(bone.to_string()))
            .cloned()
            .collect();

        let before = self.cgm.clone();
        let (body, joint) = self.create_link_body(parent_body);
        let link = PhysicsLink {
            kind: LinkKind::Bone(bone.to_string()),
            body,
            joint: Some(joint),
            parent: Some(parent_name),
            range_of_motion: Some(RangeOfMotion::default()),
        };
        let link_name = link.name();

        let mut relinked = Vec::with_capacity(adopted.len());
        for mut child in adopted {
            if let Some(old_joint) = child.joint {
                self.cgm.physics.remove_joint(old_joint);
            }
            child.joint = Some(self.cgm.physics.add_joint(
                JointKind::New6Dof,
                Some(body),
                Some(child.body),
            ));
            child.parent = Some(link_name.clone());
            relinked.push(child);
        }

        if let Some(ragdoll) = self.cgm.ragdoll.as_mut() {
            ragdoll.insert_link(link);
            for child in relinked {
                ragdoll.insert_link(child);
            }
        }
        self.set_edited(format!("link bone {bone:?}"), before);
        Ok(link_name)
    }

    fn attach_bone(&mut self, bone: &str) -> Result<String, EditError> {
        let ragdoll = self.cgm.ragdoll.as_ref().ok_or(EditError::NoRagdoll)?;
        let bone_index = self.bone_index(bone)?;
        if ragdoll.find_attachment_link(bone).is_some() {
            return Err(EditError::AlreadyLinked(bone.to_string()));
        }
        let parent_name = match ragdoll.find_bone_link(bone) {
            Some(link) => link.name(),
            None => {
                let skeleton = self
                    .cgm
                    .skeleton
                    .as_ref()
                    .ok_or_else(|| EditError::BoneNotFound(bone.to_string()))?;
                self.parent_link_name(skeleton, bone_index)
            }
        };
        let parent_body = ragdoll
            .link(&parent_name)
            .map(|l| l.body)
            .ok_or_else(|| EditError::LinkNotFound(parent_name.clone()))?;

        let before = self.cgm.clone();
        let (body, joint) = self.create_link_body(parent_body);
        let link = PhysicsLink {
            kind: LinkKind::Attachment(bone.to_string()),
            body,
            joint: Some(joint),
            parent: Some(parent_name),
            range_of_motion: None,
        };
        let link_name = link.name();
        if let Some(ragdoll) = self.cgm.ragdoll.as_mut() {
            ragdoll.insert_link(link);
        }
        self.set_edited(format!("attach model to bone {bone:?}"), before);
        Ok(link_name)
    }

    fn unlink(&mut self, link_name: &str) -> Result<(), EditError> {
        let ragdoll = self.cgm.ragdoll.as_ref().ok_or(EditError::NoRagdoll)?;
        let link = ragdoll
            .link(link_name)
            .ok_or_else(|| EditError::LinkNotFound(link_name.to_string()))?;
        if link.kind == LinkKind::Torso {
            return Err(EditError::TorsoLink);
        }
        if !ragdoll.children(link_name).is_empty() {
            return Err(EditError::LinkHasChildren(link_name.to_string()));
        }
        let (body, joint) = (link.body, link.joint);

        let before = self.cgm.clone();
        if let Some(ragdoll) = self.cgm.ragdoll.as_mut() {
            ragdoll.remove_link(link_name);
        }
        let physics = &mut self.cgm.physics;
        if let Some(joint) = joint {
            physics.remove_joint(joint);
        }
        if let Some(removed) = physics.remove_body(body)
            && physics.user_set(removed.shape).is_empty()
        {
            physics.remove_shape(removed.shape);
        }
        self.set_edited(format!("unlink {link_name:?}"), before);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgm_core::{Material, MatParamValue, PhysicsSpace, Ragdoll, Scene};

    fn editable_with_lights() -> (EditableCgm, LightId, LightId) {
        let mut scene = Scene::new("root");
        let root = scene.root();
        let lamp = scene.add_light(root, Light::point("lamp", Vec3::Y)).unwrap();
        let sun = scene
            .add_light(root, Light::directional("sun", Vec3::NEG_Y))
            .unwrap();
        (
            EditableCgm::new(LoadedCgm::new("model", scene), 10),
            lamp,
            sun,
        )
    }

    fn recolored(editable: &EditableCgm, id: LightId, red: f32) -> Light {
        let (_, light) = editable.cgm().scene.find_light(id).unwrap();
        let mut copy = light.duplicate();
        copy.color = [red, 0.0, 0.0, 1.0];
        copy
    }

    #[test]
    fn test_replace_light_records_event() {
        let (mut editable, lamp, _) = editable_with_lights();
        let mut copy = recolored(&editable, lamp, 1.0);
        copy.name = "bulb".into();
        let new_id = copy.id;

        editable
            .replace_light(lamp, Some(copy), "rename light")
            .unwrap();
        assert_eq!(editable.cgm().list_light_names(), ["bulb", "sun"]);
        assert!(editable.cgm().scene.find_light(new_id).is_some());
        assert_eq!(editable.edit_count(), 1);

        assert_eq!(editable.undo().as_deref(), Some("rename light"));
        assert_eq!(editable.cgm().list_light_names(), ["lamp", "sun"]);
    }

    #[test]
    fn test_remove_light() {
        let (mut editable, lamp, _) = editable_with_lights();
        editable.replace_light(lamp, None, "delete light").unwrap();
        assert_eq!(editable.cgm().list_light_names(), ["sun"]);
    }

    #[test]
    fn test_unknown_light_leaves_history_untouched() {
        let (mut editable, _, _) = editable_with_lights();
        let result = editable.replace_light(LightId::new(), None, "delete light");
        assert!(matches!(result, Err(EditError::LightNotFound(_))));
        assert_eq!(editable.edit_count(), 0);
        assert!(!editable.history().can_undo());
    }

    #[test]
    fn test_repeated_recolor_is_one_event() {
        let (mut editable, lamp, _) = editable_with_lights();
        let mut current = lamp;
        for step in 1..=3 {
            let copy = recolored(&editable, current, step as f32 / 3.0);
            let next = copy.id;
            editable.replace_light_color(current, copy).unwrap();
            current = next;
        }
        assert_eq!(editable.edit_count(), 1);
        assert_eq!(editable.history().events(), ["recolor light named \"lamp\""]);

        editable.undo();
        let (_, light) = editable.cgm().scene.find_light(lamp).unwrap();
        assert_eq!(light.color, [1.0; 4]);
    }

    #[test]
    fn test_ordinary_edit_breaks_continuous_edit() {
        let (mut editable, lamp, sun) = editable_with_lights();
        let copy = recolored(&editable, lamp, 0.5);
        let lamp2 = copy.id;
        editable.replace_light_color(lamp, copy).unwrap();
        editable.replace_light(sun, None, "delete light").unwrap();
        let copy = recolored(&editable, lamp2, 0.2);
        editable.replace_light_color(lamp2, copy).unwrap();
        assert_eq!(editable.edit_count(), 3);
    }

    #[test]
    fn test_delete_mat_param() {
        let mut scene = Scene::new("root");
        let root = scene.root();
        let mut material = Material::new("Unshaded");
        material.set_param("Color", MatParamValue::Color([1.0; 4]));
        let geometry = scene.add_geometry(root, "quad", material).unwrap();
        let mut editable = EditableCgm::new(LoadedCgm::new("model", scene), 10);

        assert!(matches!(
            editable.delete_mat_param("Color"),
            Err(EditError::NoMaterial)
        ));
        editable.select_spatial(geometry).unwrap();
        assert!(matches!(
            editable.delete_mat_param("Glow"),
            Err(EditError::ParamNotFound(_))
        ));
        let removed = editable.delete_mat_param("Color").unwrap();
        assert_eq!(removed.name, "Color");
        assert!(editable.cgm().list_mat_param_names("").is_empty());
    }

    #[test]
    fn test_resize_replaces_everywhere_and_coalesces() {
        let mut physics = PhysicsSpace::new();
        let ball = physics.add_shape(CollisionShape::sphere(1.0));
        let body = physics.add_body(1.0, ball, Transform::IDENTITY);
        let cgm = LoadedCgm::new("model", Scene::new("root")).with_physics(physics);
        let mut editable = EditableCgm::new(cgm, 10);

        let first = editable
            .replace_shape_for_resize(ball, CollisionShape::sphere(2.0))
            .unwrap();
        let second = editable
            .replace_shape_for_resize(first, CollisionShape::sphere(3.0))
            .unwrap();
        let physics = &editable.cgm().physics;
        assert_eq!(physics.body(body).unwrap().shape, second);
        assert!(physics.shape(ball).is_none());
        assert!(physics.shape(first).is_none());
        assert_eq!(editable.edit_count(), 1);
    }

    fn ragdoll_model() -> EditableCgm {
        let mut skeleton = Skeleton::new();
        let hips = skeleton.add_bone("hips", None);
        let spine = skeleton.add_bone("spine", Some(hips));
        skeleton.add_bone("head", Some(spine));
        skeleton.add_bone("thigh", Some(hips));

        let mut physics = PhysicsSpace::new();
        let shape = physics.add_shape(CollisionShape::cuboid(Vec3::splat(0.3)));
        let torso = physics.add_body(10.0, shape, Transform::IDENTITY);
        let cgm = LoadedCgm::new("model", Scene::new("root"))
            .with_physics(physics)
            .with_skeleton(skeleton)
            .with_ragdoll(Ragdoll::new(torso));
        EditableCgm::new(cgm, 10)
    }

    #[test]
    fn test_link_bone_parents_to_nearest_linked_ancestor() {
        let mut editable = ragdoll_model();
        assert_eq!(editable.link_bone("head").unwrap(), "Bone:head");
        assert_eq!(editable.link_bone("spine").unwrap(), "Bone:spine");

        let ragdoll = editable.cgm().ragdoll.as_ref().unwrap();
        assert_eq!(ragdoll.link("Bone:spine").unwrap().parent.as_deref(), Some("Torso:"));
        // head was adopted by the new spine link
        assert_eq!(ragdoll.link("Bone:head").unwrap().parent.as_deref(), Some("Bone:spine"));
        let head_joint = ragdoll.link("Bone:head").unwrap().joint.unwrap();
        let spine_body = ragdoll.link("Bone:spine").unwrap().body;
        assert_eq!(editable.cgm().physics.joint(head_joint).unwrap().body_a, Some(spine_body));
    }

    #[test]
    fn test_link_bone_errors() {
        let mut editable = ragdoll_model();
        assert!(matches!(
            editable.link_bone("tail"),
            Err(EditError::BoneNotFound(_))
        ));
        editable.link_bone("thigh").unwrap();
        assert!(matches!(
            editable.link_bone("thigh"),
            Err(EditError::AlreadyLinked(_))
        ));

        let mut bare = EditableCgm::default();
        assert!(matches!(bare.link_bone("thigh"), Err(EditError::NoRagdoll)));
    }

    #[test]
    fn test_attach_bone_uses_bone_link() {
        let mut editable = ragdoll_model();
        editable.link_bone("spine").unwrap();
        let name = editable.attach_bone("head").unwrap();
        assert_eq!(name, "Attachment:head");
        let ragdoll = editable.cgm().ragdoll.as_ref().unwrap();
        assert_eq!(ragdoll.link(&name).unwrap().parent.as_deref(), Some("Bone:spine"));
        assert!(ragdoll.link(&name).unwrap().range_of_motion.is_none());
    }

    #[test]
    fn test_unlink() {
        let mut editable = ragdoll_model();
        editable.link_bone("spine").unwrap();
        editable.link_bone("head").unwrap();

        assert!(matches!(editable.unlink("Torso:"), Err(EditError::TorsoLink)));
        assert!(matches!(
            editable.unlink("Bone:spine"),
            Err(EditError::LinkHasChildren(_))
        ));
        let body = editable
            .cgm()
            .ragdoll
            .as_ref()
            .unwrap()
            .link("Bone:head")
            .unwrap()
            .body;
        editable.unlink("Bone:head").unwrap();
        assert!(editable.cgm().physics.body(body).is_none());
        assert_eq!(editable.cgm().ragdoll.as_ref().unwrap().len(), 2);

        editable.undo();
        assert_eq!(editable.cgm().ragdoll.as_ref().unwrap().len(), 3);
    }
}
