//! Literal-or-symbolic parameters and the registry that resolves them
//!
//! Every numeric input of a fold, orbit or primitive is either fixed when the
//! step is built or names a key in a [`Registry`]. Symbolic values are read
//! from the registry on every CPU evaluation and become `uniform` reads in the
//! generated shader, so both paths always see the same number.

use std::collections::BTreeMap;
use std::sync::Arc;

use glam::Vec3;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::glsl;
use crate::{Error, Result};

/// Prefix separating generated uniforms from the template's own uniforms
pub const UNIFORM_PREFIX: &str = "_";

/// Uniform name a registry key is exposed under
pub fn uniform_name(key: &str) -> String {
    format!("{}{}", UNIFORM_PREFIX, key)
}

/// The value type a registry key is locked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamKind {
    Float,
    Vec3,
}

impl ParamKind {
    /// GLSL type used for the uniform declaration
    pub fn glsl_type(self) -> &'static str {
        match self {
            ParamKind::Float => "float",
            ParamKind::Vec3 => "vec3",
        }
    }
}

/// A registry value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Float(f32),
    Vec3(Vec3),
}

impl Value {
    pub fn kind(&self) -> ParamKind {
        match self {
            Value::Float(_) => ParamKind::Float,
            Value::Vec3(_) => ParamKind::Vec3,
        }
    }

    fn zero(kind: ParamKind) -> Self {
        match kind {
            ParamKind::Float => Value::Float(0.0),
            ParamKind::Vec3 => Value::Vec3(Vec3::ZERO),
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Value::Vec3(v)
    }
}

impl From<[f32; 3]> for Value {
    fn from(v: [f32; 3]) -> Self {
        Value::Vec3(Vec3::from_array(v))
    }
}

/// Process-scoped store of tunable parameters, keyed by name.
///
/// Keys are registered lazily (with a zero value) the first time a step that
/// references them is appended to an object. A key keeps its [`ParamKind`]
/// for the registry's lifetime. Iteration is in key order so that anything
/// generated from the registry is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    values: BTreeMap<String, Value>,
}

/// Registry shared between an input thread and a render thread
pub type SharedRegistry = Arc<RwLock<Registry>>;

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into a [`SharedRegistry`]
    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    /// Register `key` with a zero value of `kind` unless it already exists.
    pub fn declare(&mut self, key: &str, kind: ParamKind) -> Result<()> {
        if !glsl::is_key(key) {
            return Err(Error::InvalidName(key.to_string()));
        }
        match self.values.get(key) {
            Some(existing) if existing.kind() != kind => Err(Error::ParamKindConflict {
                key: key.to_string(),
                declared: existing.kind(),
                requested: kind,
            }),
            Some(_) => Ok(()),
            None => {
                self.values.insert(key.to_string(), Value::zero(kind));
                Ok(())
            }
        }
    }

    /// Write a value and return what was stored.
    ///
    /// A float written to a vec3 key is splatted to all three components. A
    /// vec3 written to a float key is rejected. Unknown keys are registered
    /// with the kind of `value`.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<Value> {
        let value = value.into();
        let stored = match (self.values.get(key), value) {
            (Some(Value::Vec3(_)), Value::Float(v)) => Value::Vec3(Vec3::splat(v)),
            (Some(Value::Float(_)), Value::Vec3(_)) => {
                return Err(Error::ParamKindConflict {
                    key: key.to_string(),
                    declared: ParamKind::Float,
                    requested: ParamKind::Vec3,
                });
            }
            (Some(_), v) => v,
            (None, v) => {
                if !glsl::is_key(key) {
                    return Err(Error::InvalidName(key.to_string()));
                }
                v
            }
        };
        self.values.insert(key.to_string(), stored);
        Ok(stored)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).copied()
    }

    pub fn kind(&self, key: &str) -> Option<ParamKind> {
        self.values.get(key).map(Value::kind)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Read a float key. Missing keys read as their declaration default of zero.
    pub fn float(&self, key: &str) -> f32 {
        match self.values.get(key) {
            Some(Value::Float(v)) => *v,
            Some(Value::Vec3(v)) => v.x,
            None => 0.0,
        }
    }

    /// Read a vec3 key. Missing keys read as the zero vector.
    pub fn vec3(&self, key: &str) -> Vec3 {
        match self.values.get(key) {
            Some(Value::Vec3(v)) => *v,
            Some(Value::Float(v)) => Vec3::splat(*v),
            None => Vec3::ZERO,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A float parameter
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Literal(f32),
    Symbol(String),
}

impl Scalar {
    pub fn declare(&self, registry: &mut Registry) -> Result<()> {
        match self {
            Scalar::Literal(v) if v.is_nan() => Err(Error::NanLiteral),
            Scalar::Literal(_) => Ok(()),
            Scalar::Symbol(key) => registry.declare(key, ParamKind::Float),
        }
    }

    pub fn resolve(&self, registry: &Registry) -> f32 {
        match self {
            Scalar::Literal(v) => *v,
            Scalar::Symbol(key) => registry.float(key),
        }
    }

    pub fn literal(&self) -> Option<f32> {
        match self {
            Scalar::Literal(v) => Some(*v),
            Scalar::Symbol(_) => None,
        }
    }

    /// Shader expression for this value
    pub fn glsl(&self) -> String {
        match self {
            Scalar::Literal(v) => glsl::float(*v),
            Scalar::Symbol(key) => uniform_name(key),
        }
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::Literal(v)
    }
}

impl From<&str> for Scalar {
    fn from(key: &str) -> Self {
        Scalar::Symbol(key.to_string())
    }
}

impl From<String> for Scalar {
    fn from(key: String) -> Self {
        Scalar::Symbol(key)
    }
}

/// A 3-vector parameter
#[derive(Debug, Clone, PartialEq)]
pub enum Vector {
    Literal(Vec3),
    /// A vec3-typed registry key
    Symbol(String),
    /// Per-component values, each literal or a float-typed key
    Components([Scalar; 3]),
}

impl Vector {
    pub fn declare(&self, registry: &mut Registry) -> Result<()> {
        match self {
            Vector::Literal(v) if v.is_nan() => Err(Error::NanLiteral),
            Vector::Literal(_) => Ok(()),
            Vector::Symbol(key) => registry.declare(key, ParamKind::Vec3),
            Vector::Components(parts) => parts.iter().try_for_each(|s| s.declare(registry)),
        }
    }

    pub fn resolve(&self, registry: &Registry) -> Vec3 {
        match self {
            Vector::Literal(v) => *v,
            Vector::Symbol(key) => registry.vec3(key),
            Vector::Components([x, y, z]) => Vec3::new(
                x.resolve(registry),
                y.resolve(registry),
                z.resolve(registry),
            ),
        }
    }

    pub fn literal(&self) -> Option<Vec3> {
        match self {
            Vector::Literal(v) => Some(*v),
            Vector::Symbol(_) => None,
            Vector::Components([x, y, z]) => Some(Vec3::new(x.literal()?, y.literal()?, z.literal()?)),
        }
    }

    /// True only for a literal exactly equal to `v`
    pub fn is_literal(&self, v: Vec3) -> bool {
        self.literal() == Some(v)
    }

    /// Shader expression for this value
    pub fn glsl(&self) -> String {
        match self {
            Vector::Literal(v) => glsl::vec3(*v),
            Vector::Symbol(key) => uniform_name(key),
            Vector::Components([x, y, z]) => {
                format!("vec3({}, {}, {})", x.glsl(), y.glsl(), z.glsl())
            }
        }
    }

    /// Scale a literal to unit length; symbolic values are used as given.
    pub(crate) fn normalized(self) -> Self {
        match self.literal() {
            Some(v) => Vector::Literal(v.normalize_or_zero()),
            None => self,
        }
    }
}

impl From<Vec3> for Vector {
    fn from(v: Vec3) -> Self {
        Vector::Literal(v)
    }
}

impl From<[f32; 3]> for Vector {
    fn from(v: [f32; 3]) -> Self {
        Vector::Literal(Vec3::from_array(v))
    }
}

/// A bare number means the same value on every axis
impl From<f32> for Vector {
    fn from(v: f32) -> Self {
        Vector::Literal(Vec3::splat(v))
    }
}

impl From<&str> for Vector {
    fn from(key: &str) -> Self {
        Vector::Symbol(key.to_string())
    }
}

impl From<String> for Vector {
    fn from(key: String) -> Self {
        Vector::Symbol(key)
    }
}

impl From<[Scalar; 3]> for Vector {
    fn from(parts: [Scalar; 3]) -> Self {
        Vector::Components(parts)
    }
}
