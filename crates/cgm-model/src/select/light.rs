//! Selected light
//!
//! Lights are replaced rather than mutated: each edit duplicates the selected
//! light under a fresh id, changes the duplicate, hands it to the editor and
//! then selects it.

use cgm_core::{Light, LightId, SpatialId, Transform};
use glam::{Mat3, Quat, Vec3};

use super::SelectionError;
use crate::cgm::LoadedCgm;
use crate::constants::NO_LIGHT;
use crate::cycle;
use crate::editable::CgmEditor;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedLight {
    selected: Option<LightId>,
    owner: Option<SpatialId>,
}

impl SelectedLight {
    pub fn is_selected(&self) -> bool {
        self.selected.is_some()
    }

    pub fn id(&self) -> Option<LightId> {
        self.selected
    }

    pub fn find<'a>(&self, cgm: &'a LoadedCgm) -> Option<&'a Light> {
        cgm.scene.find_light(self.selected?).map(|(_, light)| light)
    }

    /// Name of the selected light, or the "no light" placeholder
    pub fn name(&self, cgm: &LoadedCgm) -> String {
        self.find(cgm)
            .map_or_else(|| NO_LIGHT.to_string(), |l| l.name.clone())
    }

    /// Name of the spatial that owns the selected light
    pub fn owner_name(&self, cgm: &LoadedCgm) -> Option<String> {
        self.find(cgm)?;
        cgm.scene.get(self.owner?).map(|s| s.name.clone())
    }

    pub fn type_name(&self, cgm: &LoadedCgm) -> &'static str {
        self.find(cgm).map_or("", Light::type_name)
    }

    pub fn color(&self, cgm: &LoadedCgm) -> Option<[f32; 4]> {
        self.find(cgm).map(|l| l.color)
    }

    pub fn is_enabled(&self, cgm: &LoadedCgm) -> bool {
        self.find(cgm).is_some_and(|l| l.enabled)
    }

    pub fn direction(&self, cgm: &LoadedCgm) -> Option<Vec3> {
        self.find(cgm)?.direction()
    }

    pub fn position(&self, cgm: &LoadedCgm) -> Option<Vec3> {
        self.find(cgm)?.position()
    }

    /// Position of the selection in scene traversal order
    pub fn find_index(&self, cgm: &LoadedCgm) -> Option<usize> {
        let selected = self.selected?;
        cgm.list_lights()
            .iter()
            .position(|(_, light)| light.id == selected)
    }

    pub fn can_direct(&self, cgm: &LoadedCgm) -> bool {
        self.direction(cgm).is_some()
    }

    pub fn can_position(&self, cgm: &LoadedCgm) -> bool {
        self.position(cgm).is_some()
    }

    /// Select a light by name. The "no light" placeholder deselects.
    pub fn select(&mut self, cgm: &LoadedCgm, name: &str) -> Result<(), SelectionError> {
        if name == NO_LIGHT {
            self.select_none();
            return Ok(());
        }
        let id = cgm
            .find_light_by_name(name)
            .ok_or_else(|| SelectionError::InvalidSelection {
                kind: "light",
                id: name.to_string(),
            })?;
        self.select_id(cgm, id)
    }

    pub fn select_id(&mut self, cgm: &LoadedCgm, id: LightId) -> Result<(), SelectionError> {
        let owner = cgm
            .scene
            .find_owner(id)
            .ok_or_else(|| SelectionError::InvalidSelection {
                kind: "light",
                id: id.0.to_string(),
            })?;
        tracing::debug!("Selected light {}", id.0);
        self.selected = Some(id);
        self.owner = Some(owner);
        Ok(())
    }

    pub fn select_none(&mut self) {
        self.selected = None;
        self.owner = None;
    }

    pub fn select_next(&mut self, cgm: &LoadedCgm) {
        self.step(cgm, 1);
    }

    pub fn select_previous(&mut self, cgm: &LoadedCgm) {
        self.step(cgm, -1);
    }

    /// Move through lights in traversal order, wrapping at either end
    fn step(&mut self, cgm: &LoadedCgm, offset: isize) {
        let Some(current) = self.selected else {
            return;
        };
        let listed = cgm.list_lights();
        let Some(index) = listed.iter().position(|(_, light)| light.id == current) else {
            return;
        };
        let (owner, light) = listed[cycle::modulo(index as isize + offset, listed.len())];
        tracing::debug!("Selected light {}", light.id.0);
        self.selected = Some(light.id);
        self.owner = Some(owner);
    }

    /// Invoked after a model is loaded
    pub fn post_load(&mut self) {
        self.select_none();
    }

    /// Rename the selected light
    pub fn rename(
        &mut self,
        editor: &mut impl CgmEditor,
        new_name: &str,
    ) -> Result<(), SelectionError> {
        let Some(light) = self.find(editor.cgm()) else {
            return Ok(());
        };
        if light.name == new_name {
            return Ok(());
        }
        check_new_name(editor.cgm(), new_name)?;
        let old = light.id;
        let mut copy = light.duplicate();
        copy.name = new_name.to_string();
        let description = format!(
            "rename {} light {:?} to {:?}",
            light.type_name(),
            light.name,
            new_name
        );
        let new_id = copy.id;
        editor.replace_light(old, Some(copy), &description)?;
        self.selected = Some(new_id);
        Ok(())
    }

    pub fn set_color(
        &mut self,
        editor: &mut impl CgmEditor,
        color: [f32; 4],
    ) -> Result<(), SelectionError> {
        let Some(light) = self.find(editor.cgm()) else {
            return Ok(());
        };
        if color.iter().any(|c| !c.is_finite()) {
            return Err(SelectionError::InvalidArgument(format!(
                "color {color:?} is not finite"
            )));
        }
        let old = light.id;
        let mut copy = light.duplicate();
        copy.color = color;
        let new_id = copy.id;
        editor.replace_light_color(old, copy)?;
        self.selected = Some(new_id);
        Ok(())
    }

    /// Point the selected light along `direction` (normalized)
    pub fn set_direction(
        &mut self,
        editor: &mut impl CgmEditor,
        direction: Vec3,
    ) -> Result<(), SelectionError> {
        let Some(light) = self.find(editor.cgm()) else {
            return Ok(());
        };
        if !direction.is_finite() || direction.length_squared() == 0.0 {
            return Err(SelectionError::InvalidArgument(format!(
                "direction {direction} cannot be normalized"
            )));
        }
        let old = light.id;
        let mut copy = light.duplicate();
        if !copy.set_direction(direction) {
            return Err(SelectionError::Unsupported {
                kind: "light",
                operation: "set the direction of",
            });
        }
        let new_id = copy.id;
        editor.replace_light_pos_dir(old, copy)?;
        self.selected = Some(new_id);
        Ok(())
    }

    pub fn reverse_direction(&mut self, editor: &mut impl CgmEditor) -> Result<(), SelectionError> {
        if !self.is_selected() {
            return Ok(());
        }
        let direction = self.direction(editor.cgm()).ok_or(SelectionError::Unsupported {
            kind: "light",
            operation: "reverse the direction of",
        })?;
        self.set_direction(editor, -direction)
    }

    /// Snap the direction to the nearest coordinate axis
    pub fn cardinalize_direction(
        &mut self,
        editor: &mut impl CgmEditor,
    ) -> Result<(), SelectionError> {
        if !self.is_selected() {
            return Ok(());
        }
        let direction = self.direction(editor.cgm()).ok_or(SelectionError::Unsupported {
            kind: "light",
            operation: "cardinalize the direction of",
        })?;
        self.set_direction(editor, cardinalize(direction))
    }

    pub fn set_enabled(
        &mut self,
        editor: &mut impl CgmEditor,
        enabled: bool,
    ) -> Result<(), SelectionError> {
        let Some(light) = self.find(editor.cgm()) else {
            return Ok(());
        };
        if light.enabled == enabled {
            return Ok(());
        }
        let old = light.id;
        let mut copy = light.duplicate();
        copy.enabled = enabled;
        let description = format!(
            "{} the {} light named {:?}",
            if enabled { "enable" } else { "disable" },
            light.type_name(),
            light.name
        );
        let new_id = copy.id;
        editor.replace_light(old, Some(copy), &description)?;
        self.selected = Some(new_id);
        Ok(())
    }

    pub fn set_position(
        &mut self,
        editor: &mut impl CgmEditor,
        position: Vec3,
    ) -> Result<(), SelectionError> {
        let Some(light) = self.find(editor.cgm()) else {
            return Ok(());
        };
        if !position.is_finite() {
            return Err(SelectionError::InvalidArgument(format!(
                "position {position} is not finite"
            )));
        }
        let old = light.id;
        let mut copy = light.duplicate();
        if !copy.set_position(position) {
            return Err(SelectionError::Unsupported {
                kind: "light",
                operation: "set the position of",
            });
        }
        let new_id = copy.id;
        editor.replace_light_pos_dir(old, copy)?;
        self.selected = Some(new_id);
        Ok(())
    }

    /// Add a copy of the selected light to the selected spatial and select
    /// the copy
    pub fn copy_selected(
        &mut self,
        editor: &mut impl CgmEditor,
        new_name: &str,
    ) -> Result<(), SelectionError> {
        let light = self
            .find(editor.cgm())
            .ok_or(SelectionError::NotSelected("light"))?;
        check_new_name(editor.cgm(), new_name)?;
        let mut copy = light.duplicate();
        copy.name = new_name.to_string();
        let owner = editor.cgm().selected_spatial();
        let description = format!("copy selected light, set name={new_name:?}");
        let new_id = editor.add_light(owner, copy, &description)?;
        self.selected = Some(new_id);
        self.owner = Some(owner);
        Ok(())
    }

    /// Delete and deselect the selected light
    pub fn delete(&mut self, editor: &mut impl CgmEditor) -> Result<(), SelectionError> {
        let Some(light) = self.find(editor.cgm()) else {
            return Ok(());
        };
        let old = light.id;
        let description = format!("delete {} light named {:?}", light.type_name(), light.name);
        editor.replace_light(old, None, &description)?;
        self.select_none();
        Ok(())
    }

    /// Local transform for a visualization of the selected light: translated
    /// to its position, with the local X axis along its direction
    pub fn transform(&self, cgm: &LoadedCgm) -> Transform {
        let Some(light) = self.find(cgm) else {
            return Transform::IDENTITY;
        };
        let translation = light.position().unwrap_or(Vec3::ZERO);
        let rotation = light.direction().map_or(Quat::IDENTITY, |direction| {
            let side = direction.any_orthonormal_vector();
            Quat::from_mat3(&Mat3::from_cols(direction, side, direction.cross(side)))
        });
        Transform::from_translation_rotation(translation, rotation)
    }
}

fn check_new_name(cgm: &LoadedCgm, name: &str) -> Result<(), SelectionError> {
    if name.is_empty() || name == NO_LIGHT {
        return Err(SelectionError::InvalidArgument(format!(
            "{name:?} is not a usable light name"
        )));
    }
    if cgm.has_light(name) {
        return Err(SelectionError::InvalidArgument(format!(
            "a light named {name:?} already exists"
        )));
    }
    Ok(())
}

/// The unit axis vector closest to `direction`, keeping its sign
fn cardinalize(direction: Vec3) -> Vec3 {
    let abs = direction.abs();
    if abs.x >= abs.y && abs.x >= abs.z {
        Vec3::X * direction.x.signum()
    } else if abs.y >= abs.z {
        Vec3::Y * direction.y.signum()
    } else {
        Vec3::Z * direction.z.signum()
    }
}
