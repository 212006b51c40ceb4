//! Selected material parameter, tracked by name

use cgm_core::{MatParam, MatParamValue, Material, SpatialId, VarType};

use super::SelectionError;
use crate::cgm::LoadedCgm;
use crate::cycle;
use crate::editable::CgmEditor;

/// Reference to a material parameter, kept after the parameter is gone
#[derive(Debug, Clone, PartialEq)]
pub struct MatParamRef {
    pub spatial: SpatialId,
    pub name: String,
    pub value: MatParamValue,
}

impl MatParamRef {
    /// Asset path of the referenced texture, for texture parameters
    pub fn texture_path(&self) -> Option<&str> {
        match &self.value {
            MatParamValue::Texture2D(path) => Some(path),
            _ => None,
        }
    }
}

/// Parameter selected in the selected spatial's material
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedMatParam {
    selected: Option<String>,
}

impl SelectedMatParam {
    pub fn name(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self) -> bool {
        self.selected.is_some()
    }

    /// Select a parameter defined on the selected material
    pub fn select(&mut self, cgm: &LoadedCgm, name: &str) -> Result<(), SelectionError> {
        if !cgm.list_mat_param_names("").iter().any(|n| n == name) {
            return Err(SelectionError::InvalidSelection {
                kind: "material parameter",
                id: name.to_string(),
            });
        }
        tracing::debug!("Selected material parameter {:?}", name);
        self.selected = Some(name.to_string());
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn find<'a>(&self, cgm: &'a LoadedCgm) -> Option<&'a MatParam> {
        let name = self.selected.as_deref()?;
        if !cgm.is_loaded() {
            return None;
        }
        cgm.selected_material()?.param(name)
    }

    pub fn value<'a>(&self, cgm: &'a LoadedCgm) -> Option<&'a MatParamValue> {
        self.find(cgm).map(|p| &p.value)
    }

    pub fn var_type(&self, cgm: &LoadedCgm) -> Option<VarType> {
        self.find(cgm).map(|p| p.var_type)
    }

    /// Position of the selection among the defined parameters, sorted by name
    pub fn find_name_index(&self, cgm: &LoadedCgm) -> Option<usize> {
        let name = self.selected.as_ref()?;
        cycle::index_of(name, &cgm.list_mat_param_names(""))
    }

    pub fn select_next_name(&mut self, cgm: &LoadedCgm) {
        let names = cgm.list_mat_param_names("");
        if let Some(current) = &self.selected
            && let Some(next) = cycle::next(current, &names)
        {
            self.selected = Some(next.clone());
        }
    }

    pub fn select_previous_name(&mut self, cgm: &LoadedCgm) {
        let names = cgm.list_mat_param_names("");
        if let Some(current) = &self.selected
            && let Some(previous) = cycle::previous(current, &names)
        {
            self.selected = Some(previous.clone());
        }
    }

    /// Whether an enabled override with a value replaces the selected
    /// parameter anywhere from the selected spatial up to the root
    pub fn is_overridden(&self, cgm: &LoadedCgm) -> bool {
        let Some(name) = self.selected.as_deref() else {
            return false;
        };
        cgm.scene
            .ancestors(cgm.selected_spatial())
            .into_iter()
            .filter_map(|id| cgm.scene.get(id))
            .any(|spatial| spatial.overrides.iter().any(|o| o.overrides(name)))
    }

    pub fn make_ref(&self, cgm: &LoadedCgm) -> Option<MatParamRef> {
        let param = self.find(cgm)?;
        Some(MatParamRef {
            spatial: cgm.selected_spatial(),
            name: param.name.clone(),
            value: param.value.clone(),
        })
    }

    /// Keep the selection only if the new material defines it
    pub fn post_set_material(&mut self, material: &Material) {
        if let Some(name) = &self.selected
            && material.param(name).is_none()
        {
            self.deselect();
        }
    }

    /// Delete and deselect the selected parameter.
    ///
    /// Returns a reference to the deleted parameter so that anything tracking
    /// its texture can let go of it. Does nothing if no parameter is selected.
    pub fn delete(
        &mut self,
        editor: &mut impl CgmEditor,
    ) -> Result<Option<MatParamRef>, SelectionError> {
        let Some(name) = self.selected.clone() else {
            return Ok(None);
        };
        let reference = self.make_ref(editor.cgm());
        editor.delete_mat_param(&name)?;
        self.deselect();
        Ok(reference)
    }
}
