//! Integration tests for pipeline evaluation and compilation

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use std::thread;

use approx::assert_relative_eq;
use foldspace_core::prelude::*;
use foldspace_core::{scenes, Error};

fn at(x: f32, y: f32, z: f32) -> Vec4 {
    Vec4::new(x, y, z, 1.0)
}

fn unit_sphere(reg: &mut Registry, name: &str, c: [f32; 3]) -> Object {
    Object::new(name)
        .expect("valid name")
        .with(reg, Primitive::sphere(1.0, c))
        .expect("literal parameters")
}

#[test]
fn sphere_distance_signs() {
    let mut reg = Registry::new();
    let ball = unit_sphere(&mut reg, "ball", [0.0; 3]);
    assert_relative_eq!(ball.de(at(0.0, 0.0, 0.0), &reg), -1.0);
    assert_relative_eq!(ball.de(at(2.0, 0.0, 0.0), &reg), 1.0);
}

#[test]
fn union_of_two_spheres() {
    let mut reg = Registry::new();
    let left = unit_sphere(&mut reg, "left", [-2.0, 0.0, 0.0]);
    let right = unit_sphere(&mut reg, "right", [2.0, 0.0, 0.0]);
    let scene = Scene::from(
        MultiObject::new("pair")
            .unwrap()
            .with(&mut reg, left)
            .unwrap()
            .with(&mut reg, right)
            .unwrap(),
    );
    assert_relative_eq!(scene.de(at(0.0, 0.0, 0.0), &reg), 1.0);
    assert_relative_eq!(
        scene.np(at(-5.0, 0.0, 0.0), &reg).unwrap(),
        Vec3::new(-3.0, 0.0, 0.0),
        epsilon = 1e-6
    );
}

#[test]
fn gallery_distances_are_finite() {
    for name in scenes::NAMES {
        let mut reg = Registry::new();
        let scene = scenes::build(name, &mut reg).unwrap();
        for p in [at(0.0, 0.0, 12.0), at(0.3, -0.7, 2.5), at(-4.0, 1.0, 0.5)] {
            let d = scene.de(p, &reg);
            assert!(d.is_finite(), "{name} DE at {p} is {d}");
        }
    }
}

#[test]
fn tetrahedron_scene_has_no_nearest_point() {
    let mut reg = Registry::new();
    let scene = scenes::build("sierpinski_tetrahedron", &mut reg).unwrap();
    assert_eq!(
        scene.np(at(0.0, 0.0, 12.0), &reg),
        Err(Error::NearestPointUnsupported("tetrahedron"))
    );
}

#[test]
fn menger_nearest_points_lie_on_surface() {
    let mut reg = Registry::new();
    let scene = scenes::build("menger", &mut reg).unwrap();
    for p in [at(0.0, 0.0, 5.0), at(1.5, 1.5, 1.5), at(2.0, 0.3, -0.4)] {
        let np = scene.np(p, &reg).unwrap();
        let on_surface = scene.de(np.extend(1.0), &reg);
        assert!(on_surface.abs() < 1e-3, "DE at NP of {p} is {on_surface}");
        // A surface point is never closer than the distance bound allows
        assert!(np.distance(p.truncate()) >= scene.de(p, &reg) - 1e-3);
    }
}

#[test]
fn compilation_is_deterministic() {
    for name in scenes::NAMES {
        let mut first = Registry::new();
        let mut second = Registry::new();
        let a = SceneCompiler::compile(&scenes::build(name, &mut first).unwrap()).unwrap();
        let b = SceneCompiler::compile(&scenes::build(name, &mut second).unwrap()).unwrap();
        assert_eq!(a.source(), b.source(), "{name} compiled differently");
        assert_eq!(first, second);
    }
}

#[test]
fn symbolic_parameters_follow_registry_writes() {
    let mut reg = Registry::new();
    let scene = scenes::build("twin_spheres", &mut reg).unwrap();
    let shared = reg.into_shared();
    assert_relative_eq!(scene.de(at(0.0, 0.0, 0.0), &shared.read()), 1.0);

    let writer = {
        let shared = shared.clone();
        thread::spawn(move || {
            shared.write().set("v", [2.0, 0.0, 0.0]).unwrap();
        })
    };
    writer.join().expect("writer thread");

    // v moves the right sphere onto the origin
    assert_relative_eq!(scene.de(at(0.0, 0.0, 0.0), &shared.read()), -1.0);
}

#[test]
fn kind_conflicts_fail_at_construction() {
    let mut reg = Registry::new();
    let mut obj = Object::new("conflict").unwrap();
    obj.push(&mut reg, Fold::translate("k")).unwrap();
    assert!(matches!(
        obj.push(&mut reg, Fold::scale("k")),
        Err(Error::ParamKindConflict { .. })
    ));
}
