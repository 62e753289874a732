//! # Foldspace Core
//!
//! Composable space-folding fractals.
//!
//! A fractal is an [`Object`]: an ordered pipeline of space folds, orbit
//! traps and terminal primitives. The same pipeline is evaluated on the CPU
//! (distance estimate and nearest surface point) and compiled to GLSL for a
//! ray marcher, and both paths read symbolic parameters from one
//! [`Registry`].
//!
//! ## Quick Start
//!
//! ```rust
//! use foldspace_core::prelude::*;
//!
//! let mut reg = Registry::new();
//! let mut menger = Object::new("menger")?;
//! for _ in 0..8 {
//!     menger
//!         .push(&mut reg, Fold::abs())?
//!         .push(&mut reg, Fold::menger())?
//!         .push(&mut reg, Fold::scale_translate(3.0, [-2.0, -2.0, 0.0]))?
//!         .push(&mut reg, Fold::plane([0.0, 0.0, -1.0], -1.0))?;
//! }
//! menger.push(&mut reg, Primitive::box3(2.0, 0.0))?;
//!
//! let d = menger.de(Vec4::new(0.0, 0.0, 5.0, 1.0), &reg);
//! assert!(d > 0.0);
//!
//! let glsl = SceneCompiler::compile(&Scene::from(menger))?;
//! assert!(glsl.source().contains("float de_menger(vec4 p)"));
//! # Ok::<(), foldspace_core::Error>(())
//! ```
//!
//! ## Conventions
//!
//! - Points are `Vec4`; `w` starts at 1 and accumulates scale
//! - Angles are radians
//! - Symbolic parameter `k` is the uniform `_k` in generated code

pub mod compile;
pub mod fold;
pub mod glsl;
pub mod object;
pub mod orbit;
pub mod param;
pub mod primitive;
pub mod scenes;

mod error;

pub use compile::{CompiledScene, SceneCompiler};
pub use error::{Error, Result};
pub use fold::{Axis, Fold};
pub use object::{MultiObject, Object, Scene, Step};
pub use orbit::{Orbit, OrbitStat};
pub use param::{ParamKind, Registry, Scalar, SharedRegistry, Value, Vector};
pub use primitive::{Color, Primitive, Shape};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::compile::{CompiledScene, SceneCompiler};
    pub use crate::fold::{Axis, Fold};
    pub use crate::object::{MultiObject, Object, Scene};
    pub use crate::orbit::Orbit;
    pub use crate::param::{Registry, SharedRegistry, Value};
    pub use crate::primitive::Primitive;

    // Math (re-export glam)
    pub use glam::{Vec3, Vec4};

    // Error handling
    pub use crate::{Error, Result};
}
