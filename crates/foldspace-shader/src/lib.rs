//! Foldspace Shader - GLSL program assembly for foldspace scenes
//!
//! Takes a compiled scene graph from `foldspace-core` and produces complete
//! vertex/fragment sources, then binds registry keys to uniform slots through
//! a caller-supplied graphics backend.
//!
//! ## Key Types
//!
//! - [`RenderSettings`] - `#define` table for the fragment template
//! - [`ShaderAssembler`] - Splices settings, uniforms and scene code into a template
//! - [`ShaderBackend`] - Compile/upload seam to the graphics API
//! - [`ShaderSession`] - Keeps registry writes and uniform slots in sync
//!
//! ## Example
//!
//! ```rust
//! use foldspace_core::{scenes, Registry};
//! use foldspace_shader::{RenderSettings, ShaderAssembler};
//!
//! let mut reg = Registry::new();
//! let scene = scenes::build("mandelbox", &mut reg)?;
//! let shader = ShaderAssembler::new().assemble(&scene, &reg, &RenderSettings::default())?;
//! assert!(shader.fragment.contains("#define DE de_mandelbox"));
//! # Ok::<(), foldspace_shader::Error>(())
//! ```

mod assembler;
mod backend;
mod error;
mod session;
mod settings;
pub mod template;

pub use assembler::{AssembledShader, ShaderAssembler, uniform_declarations};
pub use backend::{ShaderBackend, Stage};
pub use error::{Error, Result};
pub use session::ShaderSession;
pub use settings::{RenderSettings, SettingValue, apply_params_json};
