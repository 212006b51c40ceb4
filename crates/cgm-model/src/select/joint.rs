//! Selected physics joint

use cgm_core::{JointEnd, JointId, PhysicsJoint, PhysicsSpace};

use super::SelectionError;
use crate::cgm::LoadedCgm;
use crate::cycle;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedJoint {
    selected: Option<JointId>,
}

impl SelectedJoint {
    pub fn is_selected(&self) -> bool {
        self.selected.is_some()
    }

    pub fn id(&self) -> Option<JointId> {
        self.selected
    }

    /// Name of the selected joint: its id in lower-case hex
    pub fn name(&self) -> Option<String> {
        self.selected.map(|id| id.to_string())
    }

    pub fn find<'a>(&self, cgm: &'a LoadedCgm) -> Option<&'a PhysicsJoint> {
        cgm.physics.joint(self.selected?)
    }

    /// Select a joint by name
    pub fn select(&mut self, cgm: &LoadedCgm, name: &str) -> Result<(), SelectionError> {
        let id = JointId::parse_name(name).ok_or_else(|| SelectionError::InvalidSelection {
            kind: "joint",
            id: name.to_string(),
        })?;
        self.select_id(cgm, id)
    }

    pub fn select_id(&mut self, cgm: &LoadedCgm, id: JointId) -> Result<(), SelectionError> {
        if cgm.physics.joint(id).is_none() {
            return Err(SelectionError::InvalidSelection {
                kind: "joint",
                id: id.to_string(),
            });
        }
        tracing::debug!("Selected joint {}", id);
        self.selected = Some(id);
        Ok(())
    }

    pub fn select_none(&mut self) {
        self.selected = None;
    }

    pub fn select_next(&mut self, cgm: &LoadedCgm) {
        if let Some(current) = self.selected
            && let Some(&next) = cycle::next(&current, &cgm.physics.joint_ids())
        {
            self.selected = Some(next);
        }
    }

    pub fn select_previous(&mut self, cgm: &LoadedCgm) {
        if let Some(current) = self.selected
            && let Some(&previous) = cycle::previous(&current, &cgm.physics.joint_ids())
        {
            self.selected = Some(previous);
        }
    }

    /// Position of the selection among all joints, ascending by id
    pub fn index(&self, cgm: &LoadedCgm) -> Option<usize> {
        cycle::index_of(&self.selected?, &cgm.physics.joint_ids())
    }

    pub fn type_name(&self, cgm: &LoadedCgm) -> &'static str {
        self.find(cgm).map_or("", |j| j.kind.display_name())
    }

    /// Name of the body at one end of the selected joint
    pub fn end_name(&self, cgm: &LoadedCgm, end: JointEnd) -> Option<String> {
        self.find(cgm)?.body(end).map(PhysicsSpace::object_name)
    }
}
