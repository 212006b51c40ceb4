//! Selected collision shape, tracked by id

use std::collections::BTreeSet;

use cgm_core::{BodyId, ChildShape, CollisionShape, PhysicsSpace, ShapeId, ShapeKind, Transform};
use glam::{Quat, Vec3};

use super::SelectionError;
use crate::cgm::LoadedCgm;
use crate::cycle;
use crate::editable::CgmEditor;

/// Editable parameter of a collision shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeParameter {
    HalfExtentX,
    HalfExtentY,
    HalfExtentZ,
    Height,
    Margin,
    Radius,
    ScaleX,
    ScaleY,
    ScaleZ,
}

impl ShapeParameter {
    pub const ALL: [ShapeParameter; 9] = [
        ShapeParameter::HalfExtentX,
        ShapeParameter::HalfExtentY,
        ShapeParameter::HalfExtentZ,
        ShapeParameter::Height,
        ShapeParameter::Margin,
        ShapeParameter::Radius,
        ShapeParameter::ScaleX,
        ShapeParameter::ScaleY,
        ShapeParameter::ScaleZ,
    ];

    /// Component index for per-axis parameters
    fn axis_index(self) -> Option<usize> {
        match self {
            ShapeParameter::HalfExtentX | ShapeParameter::ScaleX => Some(0),
            ShapeParameter::HalfExtentY | ShapeParameter::ScaleY => Some(1),
            ShapeParameter::HalfExtentZ | ShapeParameter::ScaleZ => Some(2),
            _ => None,
        }
    }

    fn is_half_extent(self) -> bool {
        matches!(
            self,
            ShapeParameter::HalfExtentX | ShapeParameter::HalfExtentY | ShapeParameter::HalfExtentZ
        )
    }
}

/// Bound on compound nesting followed when locating a shape
const MAX_COMPOUND_DEPTH: usize = 16;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedShape {
    selected: Option<ShapeId>,
}

impl SelectedShape {
    pub fn id(&self) -> Option<ShapeId> {
        self.selected
    }

    pub fn is_selected(&self) -> bool {
        self.selected.is_some()
    }

    pub fn find<'a>(&self, cgm: &'a LoadedCgm) -> Option<&'a CollisionShape> {
        cgm.physics.shape(self.selected?)
    }

    pub fn select(&mut self, cgm: &LoadedCgm, id: ShapeId) -> Result<(), SelectionError> {
        if cgm.physics.shape(id).is_none() {
            return Err(SelectionError::InvalidSelection {
                kind: "shape",
                id: id.to_string(),
            });
        }
        tracing::debug!("Selected shape {}", id);
        self.selected = Some(id);
        Ok(())
    }

    pub fn select_none(&mut self) {
        self.selected = None;
    }

    pub fn select_next(&mut self, cgm: &LoadedCgm) {
        if let Some(current) = self.selected
            && let Some(&next) = cycle::next(&current, &cgm.physics.shape_ids())
        {
            self.selected = Some(next);
        }
    }

    pub fn select_previous(&mut self, cgm: &LoadedCgm) {
        if let Some(current) = self.selected
            && let Some(&previous) = cycle::previous(&current, &cgm.physics.shape_ids())
        {
            self.selected = Some(previous);
        }
    }

    /// Select the first child of the selected compound
    pub fn select_first_child(&mut self, cgm: &LoadedCgm) {
        if let Some(child) = self.find(cgm).and_then(|s| s.children().first()) {
            self.selected = Some(child.shape);
        }
    }

    /// Position of the selection among all shapes, ascending by id
    pub fn index(&self, cgm: &LoadedCgm) -> Option<usize> {
        cycle::index_of(&self.selected?, &cgm.physics.shape_ids())
    }

    /// Kind of the selected shape, empty if none
    pub fn type_name(&self, cgm: &LoadedCgm) -> &'static str {
        self.find(cgm).map_or("", |s| s.type_name())
    }

    pub fn is_compound(&self, cgm: &LoadedCgm) -> bool {
        self.find(cgm).is_some_and(|s| s.is_compound())
    }

    pub fn count_children(&self, cgm: &LoadedCgm) -> usize {
        self.find(cgm).map_or(0, |s| s.children().len())
    }

    /// Names of the compound's children that start with `prefix`
    pub fn list_child_names(&self, cgm: &LoadedCgm, prefix: &str) -> Vec<String> {
        self.find(cgm)
            .map(|s| {
                s.children()
                    .iter()
                    .map(|c| c.shape.to_string())
                    .filter(|name| name.starts_with(prefix))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn axis_index(&self, cgm: &LoadedCgm) -> Option<usize> {
        self.find(cgm)?.axis().map(|a| a.index())
    }

    pub fn scale(&self, cgm: &LoadedCgm) -> Option<Vec3> {
        self.find(cgm).map(|s| s.scale)
    }

    pub fn half_extents(&self, cgm: &LoadedCgm) -> Option<Vec3> {
        self.find(cgm)?.half_extents()
    }

    /// Current value of a parameter, NaN if nothing is selected or the
    /// parameter does not apply
    pub fn value(&self, cgm: &LoadedCgm, parameter: ShapeParameter) -> f32 {
        let Some(shape) = self.find(cgm) else {
            return f32::NAN;
        };
        let result = match parameter {
            ShapeParameter::HalfExtentX | ShapeParameter::HalfExtentY | ShapeParameter::HalfExtentZ => {
                shape
                    .half_extents()
                    .zip(parameter.axis_index())
                    .map(|(he, i)| he[i])
            }
            ShapeParameter::Height => shape.height(),
            ShapeParameter::Radius => shape.radius(),
            ShapeParameter::Margin => Some(shape.margin),
            ShapeParameter::ScaleX | ShapeParameter::ScaleY | ShapeParameter::ScaleZ => {
                parameter.axis_index().map(|i| shape.scale[i])
            }
        };
        result.unwrap_or(f32::NAN)
    }

    pub fn can_set(&self, cgm: &LoadedCgm, parameter: ShapeParameter) -> bool {
        let Some(shape) = self.find(cgm) else {
            return false;
        };
        let kind = &shape.kind;
        match parameter {
            ShapeParameter::HalfExtentX | ShapeParameter::HalfExtentY | ShapeParameter::HalfExtentZ => {
                matches!(kind, ShapeKind::Box { .. } | ShapeKind::Cylinder { .. })
            }
            ShapeParameter::Height | ShapeParameter::Radius => !shape.is_compound(),
            ShapeParameter::Margin => !matches!(kind, ShapeKind::Sphere { .. }),
            ShapeParameter::ScaleX | ShapeParameter::ScaleY | ShapeParameter::ScaleZ => false,
        }
    }

    /// Set a parameter of the selected shape.
    ///
    /// Resizing replaces the shape, after which the replacement is selected.
    /// Does nothing if no shape is selected.
    pub fn set(
        &mut self,
        editor: &mut impl CgmEditor,
        parameter: ShapeParameter,
        value: f32,
    ) -> Result<(), SelectionError> {
        let Some(id) = self.selected else {
            return Ok(());
        };
        if !value.is_finite() || value < 0.0 {
            return Err(SelectionError::InvalidArgument(format!(
                "{parameter:?} must be finite and non-negative, got {value}"
            )));
        }
        if !self.can_set(editor.cgm(), parameter) {
            return Err(SelectionError::Unsupported {
                kind: "shape",
                operation: "set this parameter of",
            });
        }
        let shape = self
            .find(editor.cgm())
            .ok_or_else(|| stale(id))?
            .clone();

        if parameter == ShapeParameter::Margin {
            editor.set_shape_margin(id, value)?;
            return Ok(());
        }
        if parameter.is_half_extent() {
            let mut half_extents = shape.half_extents().ok_or_else(|| stale(id))?;
            if let Some(i) = parameter.axis_index() {
                half_extents[i] = value;
            }
            return self.set_half_extents(editor, half_extents);
        }
        let resized = match parameter {
            ShapeParameter::Height => shape.with_height(value),
            _ => shape.with_radius(value),
        };
        match resized {
            Some(new_shape) => self.replace_for_resize(editor, id, new_shape),
            None => Err(SelectionError::Unsupported {
                kind: "shape",
                operation: "resize",
            }),
        }
    }

    /// Replace the selected shape with one of the given half extents
    pub fn set_half_extents(
        &mut self,
        editor: &mut impl CgmEditor,
        half_extents: Vec3,
    ) -> Result<(), SelectionError> {
        let Some(id) = self.selected else {
            return Ok(());
        };
        if !half_extents.is_finite() || half_extents.min_element() < 0.0 {
            return Err(SelectionError::InvalidArgument(format!(
                "half extents must be finite and non-negative, got {half_extents}"
            )));
        }
        let shape = self.find(editor.cgm()).ok_or_else(|| stale(id))?;
        let new_shape = shape
            .with_half_extents(half_extents)
            .ok_or(SelectionError::Unsupported {
                kind: "shape",
                operation: "apply these half extents to",
            })?;
        self.replace_for_resize(editor, id, new_shape)
    }

    /// Wrap the selected shape in a new compound shape and select the compound
    pub fn add_parent(&mut self, editor: &mut impl CgmEditor) -> Result<(), SelectionError> {
        let Some(id) = self.selected else {
            return Ok(());
        };
        if self.is_compound(editor.cgm()) {
            return Ok(());
        }
        let compound = CollisionShape::compound(vec![ChildShape {
            shape: id,
            location: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }]);
        let new_id = editor.replace_shape_in_objects(
            id,
            compound,
            "replace collision shape with a compound shape",
        )?;
        self.selected = Some(new_id);
        Ok(())
    }

    /// Raw ids of the bodies and compounds that use the selected shape
    pub fn user_set(&self, cgm: &LoadedCgm) -> BTreeSet<u64> {
        self.selected
            .map(|id| cgm.physics.user_set(id))
            .unwrap_or_default()
    }

    /// World transform of the selected shape, when it has exactly one user
    pub fn transform(&self, cgm: &LoadedCgm) -> Transform {
        self.selected
            .and_then(|id| shape_transform(&cgm.physics, id, MAX_COMPOUND_DEPTH))
            .unwrap_or(Transform::IDENTITY)
    }

    fn replace_for_resize(
        &mut self,
        editor: &mut impl CgmEditor,
        old: ShapeId,
        new_shape: CollisionShape,
    ) -> Result<(), SelectionError> {
        let new_id = editor.replace_shape_for_resize(old, new_shape)?;
        self.selected = Some(new_id);
        Ok(())
    }
}

fn stale(id: ShapeId) -> SelectionError {
    SelectionError::InvalidSelection {
        kind: "shape",
        id: id.to_string(),
    }
}

/// Transform of a shape through its single user, following compound nesting
fn shape_transform(physics: &PhysicsSpace, shape: ShapeId, depth: usize) -> Option<Transform> {
    let users = physics.user_set(shape);
    if users.len() != 1 {
        return None;
    }
    let user = *users.first()?;
    if let Some(body) = physics.body(BodyId(user)) {
        return Some(body.transform);
    }
    if depth == 0 {
        return None;
    }
    let compound_id = ShapeId(user);
    let child = physics
        .shape(compound_id)?
        .children()
        .iter()
        .find(|c| c.shape == shape)?;
    let local = Transform::from_translation_rotation(child.location, child.rotation);
    let parent = shape_transform(physics, compound_id, depth - 1)?;
    Some(local.combine_with_parent(&parent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editable::EditableCgm;
    use approx::assert_relative_eq;
    use cgm_core::{Axis, Scene};

    struct Fixture {
        editable: EditableCgm,
        ball: ShapeId,
        crate_box: ShapeId,
        capsule: ShapeId,
        body: BodyId,
    }

    fn fixture() -> Fixture {
        let mut physics = PhysicsSpace::new();
        let ball = physics.add_shape(CollisionShape::sphere(0.5));
        let crate_box = physics.add_shape(CollisionShape::cuboid(Vec3::new(1.0, 2.0, 3.0)));
        let capsule = physics.add_shape(CollisionShape::capsule(0.5, 2.0, Axis::Y));
        let body = physics.add_body(
            2.0,
            ball,
            Transform::from_translation(Vec3::new(0.0, 4.0, 0.0)),
        );
        physics.add_body(1.0, crate_box, Transform::IDENTITY);
        let cgm = LoadedCgm::new("model", Scene::new("root")).with_physics(physics);
        Fixture {
            editable: EditableCgm::new(cgm, 10),
            ball,
            crate_box,
            capsule,
            body,
        }
    }

    #[test]
    fn test_select_invalid_id_fails() {
        let f = fixture();
        let mut selected = SelectedShape::default();
        let result = selected.select(f.editable.cgm(), ShapeId(0xdead));
        assert!(matches!(
            result,
            Err(SelectionError::InvalidSelection { .. })
        ));
        assert!(!selected.is_selected());
    }

    #[test]
    fn test_navigation_wraps_by_id() {
        let f = fixture();
        let cgm = f.editable.cgm();
        let mut selected = SelectedShape::default();
        selected.select(cgm, f.capsule).unwrap();
        assert_eq!(selected.index(cgm), Some(2));

        selected.select_next(cgm);
        assert_eq!(selected.id(), Some(f.ball));
        selected.select_previous(cgm);
        assert_eq!(selected.id(), Some(f.capsule));
        selected.select_previous(cgm);
        assert_eq!(selected.id(), Some(f.crate_box));
    }

    #[test]
    fn test_empty_selection_queries() {
        let f = fixture();
        let cgm = f.editable.cgm();
        let mut selected = SelectedShape::default();
        selected.select_next(cgm);
        assert!(!selected.is_selected());
        assert_eq!(selected.type_name(cgm), "");
        assert!(selected.value(cgm, ShapeParameter::Radius).is_nan());
        assert!(!selected.can_set(cgm, ShapeParameter::Margin));
        assert_eq!(selected.transform(cgm), Transform::IDENTITY);
    }

    #[test]
    fn test_values_and_permissions() {
        let f = fixture();
        let cgm = f.editable.cgm();
        let mut selected = SelectedShape::default();

        selected.select(cgm, f.crate_box).unwrap();
        assert_eq!(selected.type_name(cgm), "Box");
        assert_eq!(selected.value(cgm, ShapeParameter::HalfExtentZ), 3.0);
        assert_eq!(selected.value(cgm, ShapeParameter::ScaleY), 1.0);
        assert!(selected.can_set(cgm, ShapeParameter::HalfExtentX));
        assert!(!selected.can_set(cgm, ShapeParameter::ScaleX));

        selected.select(cgm, f.ball).unwrap();
        assert!(!selected.can_set(cgm, ShapeParameter::HalfExtentX));
        assert!(!selected.can_set(cgm, ShapeParameter::Margin));
        assert!(selected.can_set(cgm, ShapeParameter::Radius));
        assert_eq!(selected.axis_index(cgm), None);

        selected.select(cgm, f.capsule).unwrap();
        assert_eq!(selected.axis_index(cgm), Some(1));
        assert_eq!(selected.value(cgm, ShapeParameter::Height), 2.0);
    }

    #[test]
    fn test_set_radius_replaces_and_reselects() {
        let mut f = fixture();
        let mut selected = SelectedShape::default();
        selected.select(f.editable.cgm(), f.ball).unwrap();

        selected
            .set(&mut f.editable, ShapeParameter::Radius, 2.0)
            .unwrap();
        let new_id = selected.id().unwrap();
        assert_ne!(new_id, f.ball);
        let cgm = f.editable.cgm();
        assert_eq!(selected.value(cgm, ShapeParameter::Radius), 2.0);
        assert_eq!(cgm.physics.body(f.body).unwrap().shape, new_id);
    }

    #[test]
    fn test_set_half_extent_on_box() {
        let mut f = fixture();
        let mut selected = SelectedShape::default();
        selected.select(f.editable.cgm(), f.crate_box).unwrap();
        selected
            .set(&mut f.editable, ShapeParameter::HalfExtentY, 5.0)
            .unwrap();
        assert_eq!(
            selected.half_extents(f.editable.cgm()),
            Some(Vec3::new(1.0, 5.0, 3.0))
        );
    }

    #[test]
    fn test_set_rejects_unsupported_and_negative() {
        let mut f = fixture();
        let mut selected = SelectedShape::default();
        selected.set(&mut f.editable, ShapeParameter::Radius, 1.0).unwrap();
        assert_eq!(f.editable.edit_count(), 0);

        selected.select(f.editable.cgm(), f.ball).unwrap();
        assert!(matches!(
            selected.set(&mut f.editable, ShapeParameter::Margin, 0.1),
            Err(SelectionError::Unsupported { .. })
        ));
        assert!(matches!(
            selected.set(&mut f.editable, ShapeParameter::Radius, -1.0),
            Err(SelectionError::InvalidArgument(_))
        ));
        assert_eq!(selected.id(), Some(f.ball));
    }

    #[test]
    fn test_set_rejects_non_finite_sizes() {
        let mut f = fixture();
        let mut selected = SelectedShape::default();
        selected.select(f.editable.cgm(), f.crate_box).unwrap();
        assert!(matches!(
            selected.set_half_extents(&mut f.editable, Vec3::new(f32::NAN, 1.0, 1.0)),
            Err(SelectionError::InvalidArgument(_))
        ));
        assert!(matches!(
            selected.set_half_extents(&mut f.editable, Vec3::new(1.0, f32::INFINITY, 1.0)),
            Err(SelectionError::InvalidArgument(_))
        ));
        assert!(matches!(
            selected.set(&mut f.editable, ShapeParameter::HalfExtentX, f32::INFINITY),
            Err(SelectionError::InvalidArgument(_))
        ));
        assert!(matches!(
            selected.set(&mut f.editable, ShapeParameter::HalfExtentX, f32::NAN),
            Err(SelectionError::InvalidArgument(_))
        ));
        assert_eq!(selected.id(), Some(f.crate_box));
        assert_eq!(
            selected.half_extents(f.editable.cgm()),
            Some(Vec3::new(1.0, 2.0, 3.0))
        );
        assert_eq!(f.editable.edit_count(), 0);
    }

    #[test]
    fn test_capsule_too_short_for_radius() {
        let mut f = fixture();
        let mut selected = SelectedShape::default();
        selected.select(f.editable.cgm(), f.capsule).unwrap();
        assert!(matches!(
            selected.set_half_extents(&mut f.editable, Vec3::new(1.0, 0.2, 1.0)),
            Err(SelectionError::Unsupported { .. })
        ));
        assert_eq!(selected.id(), Some(f.capsule));
        assert_eq!(selected.value(f.editable.cgm(), ShapeParameter::Height), 2.0);
        assert_eq!(f.editable.edit_count(), 0);
    }

    #[test]
    fn test_set_margin_keeps_id() {
        let mut f = fixture();
        let mut selected = SelectedShape::default();
        selected.select(f.editable.cgm(), f.capsule).unwrap();
        selected
            .set(&mut f.editable, ShapeParameter::Margin, 0.2)
            .unwrap();
        assert_eq!(selected.id(), Some(f.capsule));
        assert_relative_eq!(selected.value(f.editable.cgm(), ShapeParameter::Margin), 0.2);
    }

    #[test]
    fn test_add_parent_and_child_navigation() {
        let mut f = fixture();
        let mut selected = SelectedShape::default();
        selected.select(f.editable.cgm(), f.ball).unwrap();
        selected.add_parent(&mut f.editable).unwrap();

        let cgm = f.editable.cgm();
        let compound = selected.id().unwrap();
        assert!(selected.is_compound(cgm));
        assert_eq!(selected.count_children(cgm), 1);
        assert_eq!(selected.list_child_names(cgm, ""), [f.ball.to_string()]);
        assert!(selected.list_child_names(cgm, "zz").is_empty());
        assert_eq!(cgm.physics.body(f.body).unwrap().shape, compound);
        assert!(selected.value(cgm, ShapeParameter::Radius).is_nan());

        selected.select_first_child(cgm);
        assert_eq!(selected.id(), Some(f.ball));
        assert_eq!(
            selected.user_set(cgm),
            BTreeSet::from([compound.0])
        );
        // located through the compound and its body
        assert_eq!(selected.transform(cgm).translation, Vec3::new(0.0, 4.0, 0.0));
    }
}
