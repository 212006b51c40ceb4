//! Selected ragdoll link, tracked by link name

use cgm_core::{PhysicsLink, PhysicsSpace, RangeOfMotion};

use super::{SelectedJoint, SelectionError};
use crate::cgm::LoadedCgm;
use crate::cycle;
use crate::editable::CgmEditor;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedLink {
    selected: Option<String>,
}

impl SelectedLink {
    pub fn is_selected(&self) -> bool {
        self.selected.is_some()
    }

    pub fn name(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn find<'a>(&self, cgm: &'a LoadedCgm) -> Option<&'a PhysicsLink> {
        cgm.ragdoll.as_ref()?.link(self.selected.as_deref()?)
    }

    /// Select a link by name ("Torso:", "Bone:<bone>" or "Attachment:<bone>")
    pub fn select(&mut self, cgm: &LoadedCgm, name: &str) -> Result<(), SelectionError> {
        let exists = cgm
            .ragdoll
            .as_ref()
            .is_some_and(|r| r.link(name).is_some());
        if !exists {
            return Err(SelectionError::InvalidSelection {
                kind: "link",
                id: name.to_string(),
            });
        }
        tracing::debug!("Selected link {:?}", name);
        self.selected = Some(name.to_string());
        Ok(())
    }

    pub fn select_none(&mut self) {
        self.selected = None;
    }

    fn sorted_names(cgm: &LoadedCgm) -> Vec<String> {
        cgm.ragdoll
            .as_ref()
            .map(|r| r.links_sorted())
            .unwrap_or_default()
    }

    pub fn select_next(&mut self, cgm: &LoadedCgm) {
        let names = Self::sorted_names(cgm);
        if let Some(current) = &self.selected
            && let Some(next) = cycle::next(current, &names)
        {
            self.selected = Some(next.clone());
        }
    }

    pub fn select_previous(&mut self, cgm: &LoadedCgm) {
        let names = Self::sorted_names(cgm);
        if let Some(current) = &self.selected
            && let Some(previous) = cycle::previous(current, &names)
        {
            self.selected = Some(previous.clone());
        }
    }

    /// Position of the selection among the link names, sorted
    pub fn find_index(&self, cgm: &LoadedCgm) -> Option<usize> {
        cycle::index_of(self.selected.as_ref()?, &Self::sorted_names(cgm))
    }

    pub fn body_name(&self, cgm: &LoadedCgm) -> Option<String> {
        self.find(cgm).map(|l| PhysicsSpace::object_name(l.body))
    }

    pub fn bone_name(&self, cgm: &LoadedCgm) -> Option<String> {
        self.find(cgm)?.kind.bone_name().map(str::to_string)
    }

    pub fn child_names(&self, cgm: &LoadedCgm) -> Vec<String> {
        match (&cgm.ragdoll, &self.selected) {
            (Some(ragdoll), Some(name)) => ragdoll.children(name),
            _ => Vec::new(),
        }
    }

    pub fn count_children(&self, cgm: &LoadedCgm) -> usize {
        self.child_names(cgm).len()
    }

    pub fn is_bone_link(&self, cgm: &LoadedCgm) -> bool {
        self.find(cgm).is_some_and(|l| l.is_bone_link())
    }

    /// Name of the joint to the parent link (None for the torso)
    pub fn joint_name(&self, cgm: &LoadedCgm) -> Option<String> {
        self.find(cgm)?.joint.map(|id| id.to_string())
    }

    pub fn parent_name(&self, cgm: &LoadedCgm) -> Option<String> {
        self.find(cgm)?.parent.clone()
    }

    pub fn mass(&self, cgm: &LoadedCgm) -> Option<f32> {
        let link = self.find(cgm)?;
        cgm.physics.body(link.body).map(|b| b.mass)
    }

    /// Joint limits, for bone links
    pub fn range_of_motion(&self, cgm: &LoadedCgm) -> Option<RangeOfMotion> {
        self.find(cgm)?.range_of_motion
    }

    pub fn select_parent(&mut self, cgm: &LoadedCgm) -> Result<(), SelectionError> {
        let link = self.find(cgm).ok_or(SelectionError::NotSelected("link"))?;
        let parent = link.parent.clone().ok_or(SelectionError::Unsupported {
            kind: "link",
            operation: "select the parent of",
        })?;
        self.select(cgm, &parent)
    }

    /// Select the joint that connects this link to its parent
    pub fn select_joint(
        &self,
        cgm: &LoadedCgm,
        joint: &mut SelectedJoint,
    ) -> Result<(), SelectionError> {
        let link = self.find(cgm).ok_or(SelectionError::NotSelected("link"))?;
        let id = link.joint.ok_or(SelectionError::Unsupported {
            kind: "link",
            operation: "select the joint of",
        })?;
        joint.select_id(cgm, id)
    }

    /// Link a bone to the ragdoll and select the new link
    pub fn create_bone_link(
        &mut self,
        editor: &mut impl CgmEditor,
        bone: &str,
    ) -> Result<(), SelectionError> {
        match editor.link_bone(bone) {
            Ok(name) => {
                self.selected = Some(name);
                Ok(())
            }
            Err(error) => {
                tracing::warn!("Failed to link bone {:?}: {}", bone, error);
                Err(error.into())
            }
        }
    }

    /// Attach a model to a bone and select the new link
    pub fn create_attachment_link(
        &mut self,
        editor: &mut impl CgmEditor,
        bone: &str,
    ) -> Result<(), SelectionError> {
        match editor.attach_bone(bone) {
            Ok(name) => {
                self.selected = Some(name);
                Ok(())
            }
            Err(error) => {
                tracing::warn!("Failed to attach to bone {:?}: {}", bone, error);
                Err(error.into())
            }
        }
    }

    /// Remove the selected link and deselect it. Does nothing if none is selected.
    pub fn unlink(&mut self, editor: &mut impl CgmEditor) -> Result<(), SelectionError> {
        let Some(name) = self.selected.clone() else {
            return Ok(());
        };
        editor.unlink(&name)?;
        self.select_none();
        Ok(())
    }
}
