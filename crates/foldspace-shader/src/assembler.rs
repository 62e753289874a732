//! Full shader assembly
//!
//! Splices three generated sections into a fragment template:
//!
//! 1. render settings as `#define`s, followed by the `DE`/`COL` entry aliases
//! 2. one `uniform` declaration per registry key
//! 3. forward declarations and bodies of every compiled object

use std::borrow::Cow;

use foldspace_core::param::uniform_name;
use foldspace_core::{CompiledScene, ParamKind, Registry, Scene, SceneCompiler};

use crate::settings::RenderSettings;
use crate::template::{self, DEFINES_MARKER, SCENE_MARKER, UNIFORMS_MARKER};
use crate::Result;

/// Sources ready to hand to a [`ShaderBackend`](crate::ShaderBackend)
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledShader {
    pub vertex: String,
    pub fragment: String,
    /// Registry keys declared as uniforms, in declaration order
    pub uniforms: Vec<(String, ParamKind)>,
    pub scene: CompiledScene,
}

/// Combines templates, settings, registry and scene into shader sources
#[derive(Debug, Clone)]
pub struct ShaderAssembler<'a> {
    vertex: Cow<'a, str>,
    fragment: Cow<'a, str>,
}

impl Default for ShaderAssembler<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderAssembler<'static> {
    /// Assembler using the bundled templates
    pub fn new() -> Self {
        Self {
            vertex: Cow::Borrowed(template::VERTEX),
            fragment: Cow::Borrowed(template::FRAGMENT),
        }
    }
}

impl<'a> ShaderAssembler<'a> {
    /// Assembler using caller-provided templates
    pub fn with_templates(vertex: impl Into<Cow<'a, str>>, fragment: impl Into<Cow<'a, str>>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    pub fn assemble(
        &self,
        scene: &Scene,
        registry: &Registry,
        settings: &RenderSettings,
    ) -> Result<AssembledShader> {
        template::check_markers(&self.fragment)?;

        let compiled = SceneCompiler::compile(scene)?;

        let mut defines = settings.defines();
        defines.push_str(&compiled.entry_defines());

        let uniforms: Vec<(String, ParamKind)> = registry
            .iter()
            .map(|(key, value)| (key.to_string(), value.kind()))
            .collect();

        let fragment = template::splice(&self.fragment, DEFINES_MARKER, &defines)?;
        let fragment =
            template::splice(&fragment, UNIFORMS_MARKER, &uniform_declarations(registry))?;
        let fragment = template::splice(&fragment, SCENE_MARKER, &compiled.source())?;

        Ok(AssembledShader {
            vertex: self.vertex.to_string(),
            fragment,
            uniforms,
            scene: compiled,
        })
    }
}

/// `uniform <type> _<key>;` for every registry key
pub fn uniform_declarations(registry: &Registry) -> String {
    registry
        .iter()
        .map(|(key, value)| {
            format!("uniform {} {};\n", value.kind().glsl_type(), uniform_name(key))
        })
        .collect()
}
