//! Scene graph to GLSL compiler
//!
//! Walks a [`Scene`] and emits one `de_`/`col_` function pair per distinct
//! object, each exactly once, with forward declarations for all of them so
//! that definition order does not matter.

use std::collections::HashMap;
use std::sync::Arc;

use crate::object::{MultiObject, Object, Scene};
use crate::{Error, Result};

/// GLSL produced for one scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledScene {
    /// Name of the root object; `de_<root>` is the scene distance function
    pub root: String,
    /// Every compiled object, in visit order
    pub objects: Vec<String>,
    /// Prototypes for every generated function
    pub forward_decls: String,
    /// Function definitions
    pub bodies: String,
}

impl CompiledScene {
    /// Forward declarations followed by the definitions
    pub fn source(&self) -> String {
        format!("{}{}", self.forward_decls, self.bodies)
    }

    /// Entry-point aliases for the fragment template
    pub fn entry_defines(&self) -> String {
        format!(
            "#define DE de_{root}\n#define COL col_{root}\n",
            root = self.root
        )
    }
}

enum Node {
    Object(Arc<Object>),
    Multi(Arc<MultiObject>),
}

impl Node {
    fn same_as(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Object(a), Node::Object(b)) => Arc::ptr_eq(a, b) || a == b,
            (Node::Multi(a), Node::Multi(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => false,
        }
    }
}

/// Emits each object of a scene graph once
#[derive(Default)]
pub struct SceneCompiler {
    seen: HashMap<String, Node>,
    objects: Vec<String>,
    forward_decls: String,
    bodies: String,
}

impl SceneCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a whole scene
    pub fn compile(scene: &Scene) -> Result<CompiledScene> {
        let mut compiler = Self::new();
        match scene {
            Scene::Object(object) => compiler.add_object(object)?,
            Scene::Multi(multi) => compiler.add_multi(multi)?,
        }
        tracing::info!(
            "Compiled scene '{}' ({} objects)",
            scene.name(),
            compiler.objects.len()
        );
        Ok(compiler.finish(scene.name()))
    }

    /// Returns false if the node was already compiled
    fn visit(&mut self, name: &str, node: Node) -> Result<bool> {
        if let Some(existing) = self.seen.get(name) {
            if existing.same_as(&node) {
                return Ok(false);
            }
            return Err(Error::DuplicateName(name.to_string()));
        }
        self.seen.insert(name.to_string(), node);
        self.objects.push(name.to_string());
        Ok(true)
    }

    /// Compile an object and, after it, every object it nests
    pub fn add_object(&mut self, object: &Arc<Object>) -> Result<()> {
        if !self.visit(object.name(), Node::Object(object.clone()))? {
            return Ok(());
        }
        self.forward_decls.push_str(&object.forward_decl());
        self.bodies.push_str(&object.emit());
        tracing::debug!("Compiled object '{}'", object.name());

        for nested in object.nested() {
            self.add_object(nested)?;
        }
        Ok(())
    }

    /// Compile a union's children, then the union itself
    pub fn add_multi(&mut self, multi: &Arc<MultiObject>) -> Result<()> {
        if !self.visit(multi.name(), Node::Multi(multi.clone()))? {
            return Ok(());
        }
        for child in multi.children() {
            self.add_object(child)?;
        }
        self.forward_decls.push_str(&multi.forward_decl());
        self.bodies.push_str(&multi.emit());
        tracing::debug!("Compiled union '{}'", multi.name());
        Ok(())
    }

    pub fn finish(self, root: &str) -> CompiledScene {
        CompiledScene {
            root: root.to_string(),
            objects: self.objects,
            forward_decls: self.forward_decls,
            bodies: self.bodies,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::fold::Fold;
    use crate::param::Registry;
    use crate::primitive::Primitive;

    fn leaf(reg: &mut Registry, name: &str) -> Arc<Object> {
        Arc::new(
            Object::new(name)
                .unwrap()
                .with(reg, Primitive::sphere(1.0, 0.0))
                .unwrap(),
        )
    }

    #[test]
    fn shared_objects_are_emitted_once() {
        let mut reg = Registry::new();
        let ball = leaf(&mut reg, "ball");
        let root = Object::new("root")
            .unwrap()
            .with(&mut reg, ball.clone())
            .unwrap()
            .with(&mut reg, Fold::translate([2.0, 0.0, 0.0]))
            .unwrap()
            .with(&mut reg, ball)
            .unwrap();

        let compiled = SceneCompiler::compile(&Scene::from(root)).unwrap();
        assert_eq!(compiled.objects, vec!["root", "ball"]);
        assert_eq!(compiled.bodies.matches("float de_ball(vec4 p) {").count(), 1);
        assert_eq!(compiled.forward_decls.matches("float de_ball(vec4 p);").count(), 1);
        assert!(compiled.source().starts_with("float de_root(vec4 p);\n"));
    }

    #[test]
    fn distinct_objects_with_same_name_are_rejected() {
        let mut reg = Registry::new();
        let a = leaf(&mut reg, "ball");
        let b = Arc::new(
            Object::new("ball")
                .unwrap()
                .with(&mut reg, Primitive::box3(1.0, 0.0))
                .unwrap(),
        );
        let multi = MultiObject::new("pair")
            .unwrap()
            .with(&mut reg, a)
            .unwrap()
            .with(&mut reg, b)
            .unwrap();
        assert_eq!(
            SceneCompiler::compile(&Scene::from(multi)),
            Err(Error::DuplicateName("ball".into()))
        );
    }

    #[test]
    fn union_children_come_first() {
        let mut reg = Registry::new();
        let a = leaf(&mut reg, "a");
        let b = leaf(&mut reg, "b");
        let multi = MultiObject::new("both")
            .unwrap()
            .with(&mut reg, a)
            .unwrap()
            .with(&mut reg, b)
            .unwrap();
        let compiled = SceneCompiler::compile(&Scene::from(multi)).unwrap();
        assert_eq!(compiled.objects, vec!["both", "a", "b"]);
        let a_at = compiled.bodies.find("float de_a(").unwrap();
        let both_at = compiled.bodies.find("float de_both(").unwrap();
        assert!(a_at < both_at);
        assert_eq!(
            compiled.entry_defines(),
            "#define DE de_both\n#define COL col_both\n"
        );
    }
}
