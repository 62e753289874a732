//! Objects: ordered pipelines of folds, orbit traps and primitives
//!
//! An [`Object`] is evaluated by pushing a copy of the query point through
//! its steps in order. Folds move the point, primitives report a distance in
//! the frame reached so far, orbit steps only matter for generated color code.
//!
//! Nearest-point queries reuse the same walk and then carry the winning
//! candidate back out through the folds that preceded it, replaying each
//! fold's branch with [`Fold::unfold`]. This yields surface points (and thus
//! normals) without differentiating the field.

// Emitters write into a String, which cannot fail
#![allow(clippy::unwrap_used)]

use std::fmt::Write;
use std::sync::Arc;

use glam::{Vec3, Vec4};

use crate::fold::Fold;
use crate::glsl;
use crate::orbit::Orbit;
use crate::param::Registry;
use crate::primitive::{Color, Primitive};
use crate::{Error, Result};

/// One pipeline step
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Fold(Fold),
    Orbit(Orbit),
    Primitive(Primitive),
    /// Another object used as a primitive, evaluated in the current frame
    Object(Arc<Object>),
}

impl From<Fold> for Step {
    fn from(fold: Fold) -> Self {
        Step::Fold(fold)
    }
}

impl From<Orbit> for Step {
    fn from(orbit: Orbit) -> Self {
        Step::Orbit(orbit)
    }
}

impl From<Primitive> for Step {
    fn from(primitive: Primitive) -> Self {
        Step::Primitive(primitive)
    }
}

impl From<Arc<Object>> for Step {
    fn from(object: Arc<Object>) -> Self {
        Step::Object(object)
    }
}

impl From<Object> for Step {
    fn from(object: Object) -> Self {
        Step::Object(Arc::new(object))
    }
}

/// Distance given to an empty union
const NO_HIT: f32 = glsl::BIG;

/// A named fold/primitive pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    name: String,
    steps: Vec<Step>,
    orbit_declared: bool,
}

impl Object {
    /// Create an empty object. `name` becomes part of generated function names.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !glsl::is_object_name(&name) {
            return Err(Error::InvalidName(name));
        }
        Ok(Self {
            name,
            steps: Vec::new(),
            orbit_declared: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Append a step, registering its symbolic parameters.
    ///
    /// Nested objects declare their own parameters again, so an object built
    /// against another registry still gets uniforms in this one. Fails if a
    /// parameter key is already registered with the other kind, or if the
    /// step reads the orbit trap before (or re-inits it after) an init step.
    pub fn push(&mut self, registry: &mut Registry, step: impl Into<Step>) -> Result<&mut Self> {
        let step = step.into();
        match &step {
            Step::Fold(fold) => fold.declare(registry)?,
            Step::Orbit(orbit) => {
                if orbit.is_init() && self.orbit_declared {
                    return Err(Error::OrbitRedeclared {
                        object: self.name.clone(),
                    });
                }
                if !orbit.is_init() && !self.orbit_declared {
                    return Err(self.orbit_error());
                }
                orbit.declare(registry)?;
                self.orbit_declared |= orbit.is_init();
            }
            Step::Primitive(primitive) => {
                if primitive.color == Color::Orbit && !self.orbit_declared {
                    return Err(self.orbit_error());
                }
                primitive.declare(registry)?;
            }
            Step::Object(object) => object.declare(registry)?,
        }
        self.steps.push(step);
        Ok(self)
    }

    /// Register every symbolic parameter of this object and its nested objects
    pub fn declare(&self, registry: &mut Registry) -> Result<()> {
        self.steps.iter().try_for_each(|step| match step {
            Step::Fold(fold) => fold.declare(registry),
            Step::Orbit(orbit) => orbit.declare(registry),
            Step::Primitive(primitive) => primitive.declare(registry),
            Step::Object(object) => object.declare(registry),
        })
    }

    /// Builder form of [`Object::push`]
    pub fn with(mut self, registry: &mut Registry, step: impl Into<Step>) -> Result<Self> {
        self.push(registry, step)?;
        Ok(self)
    }

    fn orbit_error(&self) -> Error {
        Error::OrbitUninitialized {
            object: self.name.clone(),
        }
    }

    /// Objects referenced as primitives, in pipeline order
    pub fn nested(&self) -> impl Iterator<Item = &Arc<Object>> {
        self.steps.iter().filter_map(|step| match step {
            Step::Object(object) => Some(object),
            _ => None,
        })
    }

    // ========================================================================
    // Numeric path
    // ========================================================================

    /// Distance estimate at `origin` (`w` is normally 1)
    pub fn de(&self, origin: Vec4, registry: &Registry) -> f32 {
        let mut p = origin;
        let mut d = NO_HIT;
        for step in &self.steps {
            match step {
                Step::Fold(fold) => p = fold.fold(p, origin, registry),
                Step::Primitive(primitive) => d = d.min(primitive.de(p, registry)),
                Step::Object(object) => d = d.min(object.de(p, registry)),
                Step::Orbit(_) => {}
            }
        }
        d
    }

    /// Closest surface point to `origin`, in the caller's frame.
    ///
    /// Each primitive proposes its projection in the frame it sees; the
    /// candidate with the smallest distance (rescaled by `w`) wins and is
    /// carried back out through the folds that came before it.
    pub fn np(&self, origin: Vec4, registry: &Registry) -> Result<Vec3> {
        let mut undo: Vec<(&Fold, Vec4)> = Vec::new();
        let mut best: Option<(usize, Vec3, f32)> = None;
        let mut p = origin;

        for step in &self.steps {
            let candidate = match step {
                Step::Fold(fold) => {
                    undo.push((fold, p));
                    p = fold.fold(p, origin, registry);
                    None
                }
                Step::Primitive(primitive) => Some(primitive.np(p, registry)?),
                Step::Object(object) => Some(object.np(p, registry)?),
                Step::Orbit(_) => None,
            };
            if let Some(n) = candidate {
                let d = (n - p.truncate()).length_squared() / (p.w * p.w);
                if best.is_none_or(|(_, _, best_d)| d < best_d) {
                    // Folds pushed so far are exactly the ones this candidate must be carried through
                    best = Some((undo.len(), n, d));
                }
            }
        }

        let (depth, mut n, _) = best.ok_or_else(|| Error::NoPrimitive(self.name.clone()))?;
        undo.truncate(depth);
        while let Some((fold, pre)) = undo.pop() {
            n = fold.unfold(pre, n, origin, registry);
        }
        Ok(n)
    }

    // ========================================================================
    // Shader path
    // ========================================================================

    pub fn distance_fn(&self) -> String {
        format!("de_{}", self.name)
    }

    pub fn color_fn(&self) -> String {
        format!("col_{}", self.name)
    }

    /// Prototypes for both generated functions
    pub fn forward_decl(&self) -> String {
        forward_decl(&self.name)
    }

    /// `float de_<name>(vec4 p)` and `vec4 col_<name>(vec4 p)` definitions.
    ///
    /// Nested objects are called by name; compiling them is the caller's job.
    pub fn emit(&self) -> String {
        let mut code = String::new();

        writeln!(code, "float {}(vec4 p) {{", self.distance_fn()).unwrap();
        writeln!(code, "\tvec4 o = p;").unwrap();
        writeln!(code, "\tfloat d = 1e20;").unwrap();
        for step in &self.steps {
            match step {
                Step::Fold(fold) => code.push_str(&fold.emit()),
                Step::Primitive(primitive) => {
                    writeln!(code, "\td = min(d, {});", primitive.emit()).unwrap();
                }
                Step::Object(object) => {
                    writeln!(code, "\td = min(d, {}(p));", object.distance_fn()).unwrap();
                }
                Step::Orbit(_) => {}
            }
        }
        writeln!(code, "\treturn d;").unwrap();
        writeln!(code, "}}").unwrap();

        writeln!(code, "vec4 {}(vec4 p) {{", self.color_fn()).unwrap();
        writeln!(code, "\tvec4 o = p;").unwrap();
        writeln!(code, "\tvec4 col = vec4(1e20);").unwrap();
        writeln!(code, "\tvec4 newCol;").unwrap();
        for step in &self.steps {
            let color = match step {
                Step::Fold(fold) => {
                    code.push_str(&fold.emit());
                    continue;
                }
                Step::Orbit(orbit) => {
                    code.push_str(&orbit.emit());
                    continue;
                }
                Step::Primitive(primitive) => primitive.emit_color(),
                Step::Object(object) => format!("{}(p)", object.color_fn()),
            };
            writeln!(code, "\tnewCol = {};", color).unwrap();
            writeln!(code, "\tif (newCol.w < col.w) {{ col = newCol; }}").unwrap();
        }
        writeln!(code, "\treturn col;").unwrap();
        writeln!(code, "}}").unwrap();

        code
    }
}

fn forward_decl(name: &str) -> String {
    format!("float de_{name}(vec4 p);\nvec4 col_{name}(vec4 p);\n")
}

/// Union of several objects
#[derive(Debug, Clone, PartialEq)]
pub struct MultiObject {
    name: String,
    children: Vec<Arc<Object>>,
}

impl MultiObject {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !glsl::is_object_name(&name) {
            return Err(Error::InvalidName(name));
        }
        Ok(Self {
            name,
            children: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Arc<Object>] {
        &self.children
    }

    /// Add a child, declaring its parameters in `registry`
    pub fn add(
        &mut self,
        registry: &mut Registry,
        child: impl Into<Arc<Object>>,
    ) -> Result<&mut Self> {
        let child = child.into();
        child.declare(registry)?;
        self.children.push(child);
        Ok(self)
    }

    /// Builder form of [`MultiObject::add`]
    pub fn with(mut self, registry: &mut Registry, child: impl Into<Arc<Object>>) -> Result<Self> {
        self.add(registry, child)?;
        Ok(self)
    }

    pub fn de(&self, origin: Vec4, registry: &Registry) -> f32 {
        self.children
            .iter()
            .map(|child| child.de(origin, registry))
            .fold(NO_HIT, f32::min)
    }

    /// The child nearest point closest to `origin`
    pub fn np(&self, origin: Vec4, registry: &Registry) -> Result<Vec3> {
        let target = origin.truncate();
        let mut best: Option<(Vec3, f32)> = None;
        for child in &self.children {
            let n = child.np(origin, registry)?;
            let d = (n - target).length_squared();
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((n, d));
            }
        }
        best.map(|(n, _)| n)
            .ok_or_else(|| Error::NoPrimitive(self.name.clone()))
    }

    pub fn forward_decl(&self) -> String {
        forward_decl(&self.name)
    }

    /// Combinator functions calling each child's generated functions by name
    pub fn emit(&self) -> String {
        let mut code = String::new();

        writeln!(code, "float de_{}(vec4 p) {{", self.name).unwrap();
        writeln!(code, "\tfloat d = 1e20;").unwrap();
        for child in &self.children {
            writeln!(code, "\td = min(d, {}(p));", child.distance_fn()).unwrap();
        }
        writeln!(code, "\treturn d;").unwrap();
        writeln!(code, "}}").unwrap();

        writeln!(code, "vec4 col_{}(vec4 p) {{", self.name).unwrap();
        writeln!(code, "\tvec4 col = vec4(1e20);").unwrap();
        writeln!(code, "\tvec4 newCol;").unwrap();
        for child in &self.children {
            writeln!(code, "\tnewCol = {}(p);", child.color_fn()).unwrap();
            writeln!(code, "\tif (newCol.w < col.w) {{ col = newCol; }}").unwrap();
        }
        writeln!(code, "\treturn col;").unwrap();
        writeln!(code, "}}").unwrap();

        code
    }
}

/// The root of a renderable scene
#[derive(Debug, Clone, PartialEq)]
pub enum Scene {
    Object(Arc<Object>),
    Multi(Arc<MultiObject>),
}

impl Scene {
    pub fn name(&self) -> &str {
        match self {
            Scene::Object(object) => object.name(),
            Scene::Multi(multi) => multi.name(),
        }
    }

    pub fn de(&self, origin: Vec4, registry: &Registry) -> f32 {
        match self {
            Scene::Object(object) => object.de(origin, registry),
            Scene::Multi(multi) => multi.de(origin, registry),
        }
    }

    pub fn np(&self, origin: Vec4, registry: &Registry) -> Result<Vec3> {
        match self {
            Scene::Object(object) => object.np(origin, registry),
            Scene::Multi(multi) => multi.np(origin, registry),
        }
    }
}

impl From<Object> for Scene {
    fn from(object: Object) -> Self {
        Scene::Object(Arc::new(object))
    }
}

impl From<Arc<Object>> for Scene {
    fn from(object: Arc<Object>) -> Self {
        Scene::Object(object)
    }
}

impl From<MultiObject> for Scene {
    fn from(multi: MultiObject) -> Self {
        Scene::Multi(Arc::new(multi))
    }
}
