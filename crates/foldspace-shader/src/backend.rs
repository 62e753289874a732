//! Graphics API seam
//!
//! The assembler only produces text. Turning it into a program and pushing
//! uniform values is delegated to a [`ShaderBackend`], so the library never
//! links a graphics API itself.

use std::fmt;

use foldspace_core::Value;

use crate::Result;

/// Shader stage reported in compile errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => write!(f, "Vertex"),
            Stage::Fragment => write!(f, "Fragment"),
        }
    }
}

/// A graphics API able to build programs and set uniforms
pub trait ShaderBackend {
    /// Handle to a linked program
    type Program;
    /// Handle to one uniform slot of a program
    type Location: Copy;

    /// Compile both stages and link them.
    ///
    /// Implementations report stage failures as [`Error::Compile`] and link
    /// failures as [`Error::Link`], carrying the driver's log.
    ///
    /// [`Error::Compile`]: crate::Error::Compile
    /// [`Error::Link`]: crate::Error::Link
    fn compile(&mut self, vertex: &str, fragment: &str) -> Result<Self::Program>;

    /// Slot for a uniform, or `None` if the program does not use it
    fn uniform_location(&mut self, program: &Self::Program, name: &str) -> Option<Self::Location>;

    /// Push a value into a slot of the current program
    fn upload(&mut self, location: Self::Location, value: Value);
}
