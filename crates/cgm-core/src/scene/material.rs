//! Materials, material parameters and parameter overrides

use std::collections::BTreeMap;

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Type of a material parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarType {
    Float,
    Int,
    Boolean,
    Vector2,
    Vector3,
    Vector4,
    Color,
    Texture2D,
}

/// Value of a material parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatParamValue {
    Float(f32),
    Int(i32),
    Boolean(bool),
    Vector2(Vec2),
    Vector3(Vec3),
    Vector4(Vec4),
    Color([f32; 4]),
    /// Asset path of a texture
    Texture2D(String),
}

impl MatParamValue {
    /// The variable type this value belongs to
    pub fn var_type(&self) -> VarType {
        match self {
            MatParamValue::Float(_) => VarType::Float,
            MatParamValue::Int(_) => VarType::Int,
            MatParamValue::Boolean(_) => VarType::Boolean,
            MatParamValue::Vector2(_) => VarType::Vector2,
            MatParamValue::Vector3(_) => VarType::Vector3,
            MatParamValue::Vector4(_) => VarType::Vector4,
            MatParamValue::Color(_) => VarType::Color,
            MatParamValue::Texture2D(_) => VarType::Texture2D,
        }
    }
}

/// A parameter defined on a material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatParam {
    pub name: String,
    pub var_type: VarType,
    pub value: MatParamValue,
}

impl MatParam {
    pub fn new(name: impl Into<String>, value: MatParamValue) -> Self {
        Self {
            name: name.into(),
            var_type: value.var_type(),
            value,
        }
    }
}

/// Material assigned to a geometry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Name of the material definition
    pub definition: String,
    params: BTreeMap<String, MatParam>,
}

impl Material {
    pub fn new(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            params: BTreeMap::new(),
        }
    }

    /// Look up a parameter by name
    pub fn param(&self, name: &str) -> Option<&MatParam> {
        self.params.get(name)
    }

    /// Define or redefine a parameter
    pub fn set_param(&mut self, name: impl Into<String>, value: MatParamValue) {
        let name = name.into();
        self.params.insert(name.clone(), MatParam::new(name, value));
    }

    /// Remove a parameter, returning it if it was defined
    pub fn clear_param(&mut self, name: &str) -> Option<MatParam> {
        self.params.remove(name)
    }

    /// Names of all defined parameters, sorted
    pub fn param_names(&self) -> Vec<String> {
        self.params.keys().cloned().collect()
    }

    pub fn params(&self) -> impl Iterator<Item = &MatParam> {
        self.params.values()
    }
}

/// Spatial-level override of a material parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatParamOverride {
    pub name: String,
    pub var_type: VarType,
    /// None means the override is defined but carries no value
    pub value: Option<MatParamValue>,
    pub enabled: bool,
}

impl MatParamOverride {
    pub fn new(var_type: VarType, name: impl Into<String>, value: Option<MatParamValue>) -> Self {
        Self {
            name: name.into(),
            var_type,
            value,
            enabled: true,
        }
    }

    /// Whether this override actually replaces the named parameter
    pub fn overrides(&self, param_name: &str) -> bool {
        self.enabled && self.value.is_some() && self.name == param_name
    }
}
