//! Uniform binding for a compiled scene
//!
//! A [`ShaderSession`] owns the program built from a scene and keeps the
//! uniform slots of every registry key. Writes through [`ShaderSession::set`]
//! update the shared registry and reach the GPU in the same call.

use std::collections::BTreeMap;

use foldspace_core::param::uniform_name;
use foldspace_core::{Scene, SharedRegistry, Value};

use crate::assembler::ShaderAssembler;
use crate::backend::ShaderBackend;
use crate::settings::RenderSettings;
use crate::Result;

pub struct ShaderSession<B: ShaderBackend> {
    backend: B,
    registry: SharedRegistry,
    program: Option<B::Program>,
    bindings: BTreeMap<String, B::Location>,
}

impl<B: ShaderBackend> ShaderSession<B> {
    pub fn new(backend: B, registry: SharedRegistry) -> Self {
        Self {
            backend,
            registry,
            program: None,
            bindings: BTreeMap::new(),
        }
    }

    /// Assemble and compile `scene` with the bundled templates
    pub fn compile(&mut self, scene: &Scene, settings: &RenderSettings) -> Result<&B::Program> {
        self.compile_with(&ShaderAssembler::new(), scene, settings)
    }

    /// Assemble and compile `scene`, bind every uniform and upload current values.
    ///
    /// Any previously compiled program and its bindings are replaced.
    pub fn compile_with(
        &mut self,
        assembler: &ShaderAssembler<'_>,
        scene: &Scene,
        settings: &RenderSettings,
    ) -> Result<&B::Program> {
        let shader = assembler.assemble(scene, &self.registry.read(), settings)?;
        let program = self.backend.compile(&shader.vertex, &shader.fragment)?;

        self.bindings.clear();
        for (key, _) in &shader.uniforms {
            match self.backend.uniform_location(&program, &uniform_name(key)) {
                Some(location) => {
                    self.bindings.insert(key.clone(), location);
                }
                // Drivers drop uniforms the program never reads
                None => tracing::debug!("Uniform '{}' is unused by the program", key),
            }
        }

        {
            let registry = self.registry.read();
            for (key, location) in &self.bindings {
                if let Some(value) = registry.get(key) {
                    self.backend.upload(*location, value);
                }
            }
        }

        tracing::info!(
            "Compiled program for '{}' ({} uniforms bound)",
            scene.name(),
            self.bindings.len()
        );
        Ok(&*self.program.insert(program))
    }

    /// Write a parameter and push it to its uniform if one is bound
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<Value> {
        let stored = self.registry.write().set(key, value)?;
        match self.bindings.get(key) {
            Some(location) => self.backend.upload(*location, stored),
            None => tracing::warn!("Parameter '{}' has no uniform binding", key),
        }
        Ok(stored)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.registry.read().get(key)
    }

    pub fn is_bound(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn program(&self) -> Option<&B::Program> {
        self.program.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
