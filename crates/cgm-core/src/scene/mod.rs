//! Scene graph of named spatials

mod light;
mod material;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use light::{Light, LightId, LightKind};
pub use material::{MatParam, MatParamOverride, MatParamValue, Material, VarType};

use crate::transform::Transform;

/// Identity of a spatial within a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpatialId(pub Uuid);

impl SpatialId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SpatialId {
    fn default() -> Self {
        Self::new()
    }
}

/// A node or geometry in the scene graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spatial {
    pub id: SpatialId,
    pub name: String,
    pub parent: Option<SpatialId>,
    pub children: Vec<SpatialId>,
    pub local_transform: Transform,
    /// Material (geometries only)
    pub material: Option<Material>,
    /// Material-parameter overrides applied to this subtree
    pub overrides: Vec<MatParamOverride>,
    /// Lights owned by this spatial
    pub lights: Vec<Light>,
}

impl Spatial {
    fn new(name: impl Into<String>, parent: Option<SpatialId>, material: Option<Material>) -> Self {
        Self {
            id: SpatialId::new(),
            name: name.into(),
            parent,
            children: Vec::new(),
            local_transform: Transform::IDENTITY,
            material,
            overrides: Vec::new(),
            lights: Vec::new(),
        }
    }

    /// Geometries carry a material, nodes do not
    pub fn is_geometry(&self) -> bool {
        self.material.is_some()
    }
}

/// Scene graph rooted at a single node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    root: SpatialId,
    spatials: HashMap<SpatialId, Spatial>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("root")
    }
}

impl Scene {
    /// Create a scene containing only a root node
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = Spatial::new(root_name, None, None);
        let root_id = root.id;
        let mut spatials = HashMap::new();
        spatials.insert(root_id, root);
        Self {
            root: root_id,
            spatials,
        }
    }

    pub fn root(&self) -> SpatialId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.spatials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spatials.is_empty()
    }

    /// Add a node under `parent`
    pub fn add_node(
        &mut self,
        parent: SpatialId,
        name: impl Into<String>,
    ) -> Result<SpatialId, SceneError> {
        self.insert(Spatial::new(name, Some(parent), None))
    }

    /// Add a geometry with a material under `parent`
    pub fn add_geometry(
        &mut self,
        parent: SpatialId,
        name: impl Into<String>,
        material: Material,
    ) -> Result<SpatialId, SceneError> {
        self.insert(Spatial::new(name, Some(parent), Some(material)))
    }

    fn insert(&mut self, spatial: Spatial) -> Result<SpatialId, SceneError> {
        let parent_id = spatial.parent.ok_or(SceneError::NoParent)?;
        let parent = self
            .spatials
            .get_mut(&parent_id)
            .ok_or(SceneError::SpatialNotFound(parent_id))?;
        if parent.is_geometry() {
            return Err(SceneError::NotANode(parent_id));
        }
        let id = spatial.id;
        parent.children.push(id);
        self.spatials.insert(id, spatial);
        Ok(id)
    }

    pub fn get(&self, id: SpatialId) -> Option<&Spatial> {
        self.spatials.get(&id)
    }

    pub fn get_mut(&mut self, id: SpatialId) -> Option<&mut Spatial> {
        self.spatials.get_mut(&id)
    }

    pub fn contains(&self, id: SpatialId) -> bool {
        self.spatials.contains_key(&id)
    }

    /// First spatial (depth-first) with the given name
    pub fn find_by_name(&self, name: &str) -> Option<SpatialId> {
        self.depth_first()
            .into_iter()
            .find(|id| self.spatials.get(id).is_some_and(|s| s.name == name))
    }

    /// Chain from `id` up to the root, `id` first
    pub fn ancestors(&self, id: SpatialId) -> Vec<SpatialId> {
        let mut chain = Vec::new();
        let mut current = self.spatials.get(&id);
        while let Some(spatial) = current {
            chain.push(spatial.id);
            current = spatial.parent.and_then(|p| self.spatials.get(&p));
        }
        chain
    }

    /// All spatials in depth-first (pre-order) order
    pub fn depth_first(&self) -> Vec<SpatialId> {
        let mut result = Vec::with_capacity(self.spatials.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if let Some(spatial) = self.spatials.get(&id) {
                result.push(id);
                stack.extend(spatial.children.iter().rev().copied());
            }
        }
        result
    }

    /// Material of a geometry
    pub fn material(&self, id: SpatialId) -> Option<&Material> {
        self.spatials.get(&id).and_then(|s| s.material.as_ref())
    }

    pub fn material_mut(&mut self, id: SpatialId) -> Option<&mut Material> {
        self.spatials.get_mut(&id).and_then(|s| s.material.as_mut())
    }

    /// Every light with its owner, in depth-first order of the owners
    pub fn list_lights(&self) -> Vec<(SpatialId, &Light)> {
        self.depth_first()
            .into_iter()
            .filter_map(|id| self.spatials.get(&id))
            .flat_map(|s| s.lights.iter().map(move |l| (s.id, l)))
            .collect()
    }

    /// Look up a light and its owner
    pub fn find_light(&self, light_id: LightId) -> Option<(SpatialId, &Light)> {
        self.spatials.values().find_map(|s| {
            s.lights
                .iter()
                .find(|l| l.id == light_id)
                .map(|l| (s.id, l))
        })
    }

    /// The spatial that owns a light
    pub fn find_owner(&self, light_id: LightId) -> Option<SpatialId> {
        self.find_light(light_id).map(|(owner, _)| owner)
    }

    /// Attach a light to a spatial
    pub fn add_light(&mut self, owner: SpatialId, light: Light) -> Result<LightId, SceneError> {
        let spatial = self
            .spatials
            .get_mut(&owner)
            .ok_or(SceneError::SpatialNotFound(owner))?;
        let id = light.id;
        spatial.lights.push(light);
        Ok(id)
    }

    /// Detach a light from its owner, returning it
    pub fn remove_light(&mut self, owner: SpatialId, light_id: LightId) -> Result<Light, SceneError> {
        let spatial = self
            .spatials
            .get_mut(&owner)
            .ok_or(SceneError::SpatialNotFound(owner))?;
        let index = spatial
            .lights
            .iter()
            .position(|l| l.id == light_id)
            .ok_or(SceneError::LightNotFound(light_id))?;
        Ok(spatial.lights.remove(index))
    }

    /// Replace a light in place, keeping its position in the owner's list
    pub fn replace_light(
        &mut self,
        owner: SpatialId,
        old: LightId,
        new_light: Light,
    ) -> Result<LightId, SceneError> {
        let spatial = self
            .spatials
            .get_mut(&owner)
            .ok_or(SceneError::SpatialNotFound(owner))?;
        let slot = spatial
            .lights
            .iter_mut()
            .find(|l| l.id == old)
            .ok_or(SceneError::LightNotFound(old))?;
        let id = new_light.id;
        *slot = new_light;
        Ok(id)
    }
}

/// Scene-graph errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum SceneError {
    #[error("Spatial not found: {0:?}")]
    SpatialNotFound(SpatialId),
    #[error("Spatial is a geometry and cannot have children: {0:?}")]
    NotANode(SpatialId),
    #[error("Spatial has no parent")]
    NoParent,
    #[error("Light not found: {0:?}")]
    LightNotFound(LightId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn sample_scene() -> (Scene, SpatialId, SpatialId) {
        let mut scene = Scene::new("root");
        let body = scene.add_node(scene.root(), "body").unwrap();
        let head = scene
            .add_geometry(body, "head", Material::new("Unshaded"))
            .unwrap();
        (scene, body, head)
    }

    #[test]
    fn test_ancestors_from_leaf() {
        let (scene, body, head) = sample_scene();
        assert_eq!(scene.ancestors(head), vec![head, body, scene.root()]);
    }

    #[test]
    fn test_geometry_cannot_have_children() {
        let (mut scene, _, head) = sample_scene();
        assert!(matches!(
            scene.add_node(head, "hat"),
            Err(SceneError::NotANode(_))
        ));
    }

    #[test]
    fn test_list_lights_depth_first() {
        let (mut scene, body, _) = sample_scene();
        let root = scene.root();
        scene.add_light(body, Light::point("b", Vec3::ZERO)).unwrap();
        scene.add_light(root, Light::ambient("a")).unwrap();
        let names: Vec<_> = scene
            .list_lights()
            .into_iter()
            .map(|(_, l)| l.name.clone())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_replace_light_keeps_order() {
        let (mut scene, body, _) = sample_scene();
        let first = scene.add_light(body, Light::ambient("first")).unwrap();
        scene.add_light(body, Light::ambient("second")).unwrap();

        let mut renamed = scene.find_light(first).unwrap().1.duplicate();
        renamed.name = "renamed".into();
        let new_id = scene.replace_light(body, first, renamed).unwrap();

        assert!(scene.find_light(first).is_none());
        assert_eq!(scene.find_owner(new_id), Some(body));
        assert_eq!(scene.get(body).unwrap().lights[0].name, "renamed");
    }
}
