//! Built-in fractal gallery
//!
//! Each builder registers its parameters in the given registry. Scenes that
//! use symbolic keys get their tuning defaults from [`DEFAULT_PARAMS`].

use std::f32::consts::FRAC_PI_2;

use crate::fold::Fold;
use crate::object::{MultiObject, Object, Scene};
use crate::orbit::Orbit;
use crate::param::Registry;
use crate::primitive::Primitive;
use crate::{Error, Result};

/// Gallery entries accepted by [`build`]
pub const NAMES: &[&str] = &[
    "infinite_spheres",
    "butterweed_hills",
    "mandelbox",
    "mausoleum",
    "menger",
    "tree_planet",
    "sierpinski_tetrahedron",
    "snow_stadium",
    "test_fractal",
    "twin_spheres",
];

/// Starting values for the numbered tuning keys
pub const DEFAULT_PARAMS: &[(&str, f32)] = &[("0", 1.5), ("1", 1.5), ("2", 2.0)];

/// Build a gallery scene by name
pub fn build(name: &str, registry: &mut Registry) -> Result<Scene> {
    let scene: Scene = match name {
        "infinite_spheres" => infinite_spheres(registry)?.into(),
        "butterweed_hills" => butterweed_hills(registry)?.into(),
        "mandelbox" => mandelbox(registry)?.into(),
        "mausoleum" => mausoleum(registry)?.into(),
        "menger" => menger(registry)?.into(),
        "tree_planet" => tree_planet(registry)?.into(),
        "sierpinski_tetrahedron" => sierpinski_tetrahedron(registry)?.into(),
        "snow_stadium" => snow_stadium(registry)?.into(),
        "test_fractal" => test_fractal(registry)?.into(),
        "twin_spheres" => twin_spheres(registry)?.into(),
        other => return Err(Error::UnknownScene(other.to_string())),
    };
    for &(key, value) in DEFAULT_PARAMS {
        if registry.contains(key) {
            registry.set(key, value)?;
        }
    }
    Ok(scene)
}

pub fn infinite_spheres(reg: &mut Registry) -> Result<Object> {
    let mut obj = Object::new("infinite_spheres")?;
    obj.push(reg, Fold::repeat_x(2.0))?
        .push(reg, Fold::repeat_y(2.0))?
        .push(reg, Fold::repeat_z(2.0))?
        .push(reg, Primitive::sphere(0.5, [1.0, 1.0, 1.0]).colored([0.9, 0.9, 0.5]))?;
    Ok(obj)
}

pub fn butterweed_hills(reg: &mut Registry) -> Result<Object> {
    let mut obj = Object::new("butterweed_hills")?;
    obj.push(reg, Orbit::init_zero())?;
    for _ in 0..30 {
        obj.push(reg, Fold::abs())?
            .push(reg, Fold::scale_translate(1.5, [-1.0, -0.5, -0.2]))?
            .push(reg, Orbit::sum([0.5, 0.03, 0.0]))?
            .push(reg, Fold::rotate_x(3.61))?
            .push(reg, Fold::rotate_y(2.03))?;
    }
    obj.push(reg, Primitive::sphere(1.0, 0.0).orbit_colored())?;
    Ok(obj)
}

pub fn mandelbox(reg: &mut Registry) -> Result<Object> {
    let mut obj = Object::new("mandelbox")?;
    obj.push(reg, Orbit::init_inf())?;
    for _ in 0..16 {
        obj.push(reg, Fold::box_fold(1.0))?
            .push(reg, Fold::sphere(0.5, 1.0))?
            .push(reg, Fold::scale_origin(2.0))?
            .push(reg, Orbit::min_abs(1.0))?;
    }
    obj.push(reg, Primitive::box3(6.0, 0.0).orbit_colored())?;
    Ok(obj)
}

pub fn mausoleum(reg: &mut Registry) -> Result<Object> {
    let mut obj = Object::new("mausoleum")?;
    obj.push(reg, Orbit::init_zero())?;
    for _ in 0..8 {
        obj.push(reg, Fold::box_fold(0.34))?
            .push(reg, Fold::menger())?
            .push(reg, Fold::scale_translate(3.28, [-5.27, -0.34, 0.0]))?
            .push(reg, Fold::rotate_x(FRAC_PI_2))?
            .push(reg, Orbit::max([0.42, 0.38, 0.19]))?;
    }
    obj.push(reg, Primitive::box3(2.0, 0.0).orbit_colored())?;
    Ok(obj)
}

pub fn menger(reg: &mut Registry) -> Result<Object> {
    let mut obj = Object::new("menger")?;
    for _ in 0..8 {
        obj.push(reg, Fold::abs())?
            .push(reg, Fold::menger())?
            .push(reg, Fold::scale_translate(3.0, [-2.0, -2.0, 0.0]))?
            .push(reg, Fold::plane([0.0, 0.0, -1.0], -1.0))?;
    }
    obj.push(reg, Primitive::box3(2.0, 0.0).colored([0.2, 0.5, 1.0]))?;
    Ok(obj)
}

pub fn tree_planet(reg: &mut Registry) -> Result<Object> {
    let mut obj = Object::new("tree_planet")?;
    obj.push(reg, Orbit::init_inf())?;
    for _ in 0..30 {
        obj.push(reg, Fold::rotate_y(0.44))?
            .push(reg, Fold::abs())?
            .push(reg, Fold::menger())?
            .push(reg, Orbit::min_abs([0.24, 2.28, 7.6]))?
            .push(reg, Fold::scale_translate(1.3, [-2.0, -4.8, 0.0]))?
            .push(reg, Fold::plane([0.0, 0.0, -1.0], 0.0))?;
    }
    obj.push(reg, Primitive::box3(4.8, 0.0).orbit_colored())?;
    Ok(obj)
}

pub fn sierpinski_tetrahedron(reg: &mut Registry) -> Result<Object> {
    let mut obj = Object::new("sierpinski_tetrahedron")?;
    obj.push(reg, Orbit::init_zero())?;
    for _ in 0..9 {
        obj.push(reg, Fold::sierpinski())?
            .push(reg, Fold::scale_translate(2.0, -1.0))?;
    }
    obj.push(reg, Primitive::tetrahedron(1.0, 0.0).colored([0.8, 0.8, 0.5]))?;
    Ok(obj)
}

pub fn snow_stadium(reg: &mut Registry) -> Result<Object> {
    let mut obj = Object::new("snow_stadium")?;
    obj.push(reg, Orbit::init_inf())?;
    for _ in 0..30 {
        obj.push(reg, Fold::rotate_y(3.33))?
            .push(reg, Fold::sierpinski())?
            .push(reg, Fold::rotate_x(0.15))?
            .push(reg, Fold::menger())?
            .push(reg, Fold::scale_translate(1.57, [-6.61, -4.0, -2.42]))?
            .push(reg, Orbit::min_abs(1.0))?;
    }
    obj.push(reg, Primitive::box3(4.8, 0.0).orbit_colored())?;
    Ok(obj)
}

/// Rotation about z is driven by the `0` key
pub fn test_fractal(reg: &mut Registry) -> Result<Object> {
    let mut obj = Object::new("test_fractal")?;
    obj.push(reg, Orbit::init_inf())?;
    for _ in 0..20 {
        obj.push(reg, Fold::sierpinski())?
            .push(reg, Fold::menger())?
            .push(reg, Fold::rotate_y(FRAC_PI_2))?
            .push(reg, Fold::abs())?
            .push(reg, Fold::rotate_z("0"))?
            .push(reg, Fold::scale_translate(1.89, [-7.10, 0.396, -6.29]))?
            .push(reg, Orbit::min_abs([1.0, 1.0, 1.0]))?;
    }
    obj.push(reg, Primitive::box3(6.0, 0.0).orbit_colored())?;
    Ok(obj)
}

/// Two unit spheres side by side, centered on the `v` key
pub fn twin_spheres(reg: &mut Registry) -> Result<MultiObject> {
    let left = Object::new("twin_left")?
        .with(reg, Fold::translate("v"))?
        .with(reg, Primitive::sphere(1.0, [-2.0, 0.0, 0.0]).colored([0.9, 0.3, 0.2]))?;
    let right = Object::new("twin_right")?
        .with(reg, Fold::translate("v"))?
        .with(reg, Primitive::sphere(1.0, [2.0, 0.0, 0.0]).colored([0.2, 0.4, 0.9]))?;
    MultiObject::new("twin_spheres")?
        .with(reg, left)?
        .with(reg, right)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::param::Value;

    #[test]
    fn every_name_builds() {
        for name in NAMES {
            let mut reg = Registry::new();
            let scene = build(name, &mut reg).unwrap();
            assert_eq!(scene.name(), *name);
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        let mut reg = Registry::new();
        assert_eq!(
            build("teapot", &mut reg),
            Err(Error::UnknownScene("teapot".into()))
        );
    }

    #[test]
    fn symbolic_scenes_get_defaults() {
        let mut reg = Registry::new();
        build("test_fractal", &mut reg).unwrap();
        assert_eq!(reg.get("0"), Some(Value::Float(1.5)));
        assert!(!reg.contains("1"));

        let mut reg = Registry::new();
        build("twin_spheres", &mut reg).unwrap();
        assert_eq!(reg.kind("v"), Some(crate::param::ParamKind::Vec3));
    }
}
