//! The loaded C-G model and its editor-side aggregate

use cgm_core::{
    Animation, Light, LightId, Material, PhysicsSpace, Pose, Ragdoll, Scene, Skeleton, SpatialId,
};

use crate::config::EditorConfig;
use crate::editable::{CgmEditor, EditableCgm};
use crate::select::{SelectionError, Selections};

/// A loaded computer-graphics model: scene, physics and animation data.
///
/// Cloning takes a whole snapshot, which is what the edit history stores.
#[derive(Debug, Clone)]
pub struct LoadedCgm {
    name: Option<String>,
    pub scene: Scene,
    pub physics: PhysicsSpace,
    pub ragdoll: Option<Ragdoll>,
    pub skeleton: Option<Skeleton>,
    pub animation: Option<Animation>,
    /// Displayed pose of the skeleton
    pub pose: Pose,
    selected_spatial: SpatialId,
}

impl Default for LoadedCgm {
    fn default() -> Self {
        Self::empty()
    }
}

impl LoadedCgm {
    /// A model slot with nothing loaded
    pub fn empty() -> Self {
        let scene = Scene::default();
        Self {
            name: None,
            selected_spatial: scene.root(),
            scene,
            physics: PhysicsSpace::new(),
            ragdoll: None,
            skeleton: None,
            animation: None,
            pose: Pose::default(),
        }
    }

    /// A loaded model with the root spatial selected
    pub fn new(name: impl Into<String>, scene: Scene) -> Self {
        Self {
            name: Some(name.into()),
            selected_spatial: scene.root(),
            scene,
            ..Self::empty()
        }
    }

    pub fn with_physics(mut self, physics: PhysicsSpace) -> Self {
        self.physics = physics;
        self
    }

    pub fn with_ragdoll(mut self, ragdoll: Ragdoll) -> Self {
        self.ragdoll = Some(ragdoll);
        self
    }

    /// Set the skeleton and reset the displayed pose to its bind pose
    pub fn with_skeleton(mut self, skeleton: Skeleton) -> Self {
        self.pose = Pose::new(skeleton.len());
        self.skeleton = Some(skeleton);
        self
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.name.is_some()
    }

    // ============== Spatial selection ==============

    pub fn selected_spatial(&self) -> SpatialId {
        self.selected_spatial
    }

    pub fn select_spatial(&mut self, id: SpatialId) -> Result<(), SelectionError> {
        if !self.scene.contains(id) {
            return Err(SelectionError::InvalidSelection {
                kind: "spatial",
                id: format!("{:?}", id.0),
            });
        }
        tracing::debug!("Selected spatial {:?}", id.0);
        self.selected_spatial = id;
        Ok(())
    }

    /// Material of the selected spatial, if it is a geometry
    pub fn selected_material(&self) -> Option<&Material> {
        self.scene.material(self.selected_spatial)
    }

    /// Names of the parameters defined on the selected material, sorted
    pub fn list_mat_param_names(&self, prefix: &str) -> Vec<String> {
        self.selected_material()
            .map(|m| {
                m.param_names()
                    .into_iter()
                    .filter(|name| name.starts_with(prefix))
                    .collect()
            })
            .unwrap_or_default()
    }

    // ============== Lights ==============

    /// Every light in the scene with its owner, in traversal order
    pub fn list_lights(&self) -> Vec<(SpatialId, &Light)> {
        self.scene.list_lights()
    }

    /// Light names, parallel with [`LoadedCgm::list_lights`]
    pub fn list_light_names(&self) -> Vec<String> {
        self.list_lights()
            .into_iter()
            .map(|(_, light)| light.name.clone())
            .collect()
    }

    pub fn has_light(&self, name: &str) -> bool {
        self.list_lights().iter().any(|(_, l)| l.name == name)
    }

    /// First light (in traversal order) with the given name
    pub fn find_light_by_name(&self, name: &str) -> Option<LightId> {
        self.list_lights()
            .into_iter()
            .find(|(_, l)| l.name == name)
            .map(|(_, l)| l.id)
    }
}

/// An editable model together with the selections made in it
#[derive(Debug, Default)]
pub struct Cgm {
    pub editable: EditableCgm,
    pub selections: Selections,
}

impl Cgm {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            editable: EditableCgm::new(LoadedCgm::empty(), config.history.max_depth),
            selections: Selections::default(),
        }
    }

    pub fn loaded(&self) -> &LoadedCgm {
        self.editable.cgm()
    }

    /// Replace the model, discarding history and selections
    pub fn load(&mut self, cgm: LoadedCgm) {
        self.editable.load(cgm);
        self.selections.clear();
    }

    /// Undo the latest edit. Selections are cleared.
    pub fn undo(&mut self) -> Option<String> {
        let result = self.editable.undo();
        if result.is_some() {
            self.selections.clear();
        }
        result
    }

    /// Redo the latest undone edit. Selections are cleared.
    pub fn redo(&mut self) -> Option<String> {
        let result = self.editable.redo();
        if result.is_some() {
            self.selections.clear();
        }
        result
    }
}
