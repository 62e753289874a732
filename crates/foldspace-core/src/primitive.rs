//! Terminal distance estimators
//!
//! Primitives are measured in whatever folded frame the pipeline has reached.
//! Every raw distance is divided by `p.w` so that upstream scale folds keep
//! the estimate a valid bound in the caller's frame.

// Mathematical formulas use standard notation with single-char variable names
#![allow(clippy::many_single_char_names)]

use glam::{Vec3, Vec4};

use crate::glsl;
use crate::param::{Registry, Scalar, Vector};
use crate::{Error, Result};

const INV_SQRT_3: f32 = 0.577_350_26;

/// Shape of a primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere { r: Scalar, c: Vector },
    /// Axis-aligned box with half extents `s`
    Box { s: Vector, c: Vector },
    Tetrahedron { r: Scalar, c: Vector },
    /// Three infinite tubes along the coordinate axes
    InfCross { r: Scalar, c: Vector },
    /// Infinite tubes along X and Y only
    InfCrossXY { r: Scalar, c: Vector },
    /// Infinite tube through `c` along direction `n`
    InfLine { r: Scalar, n: Vector, c: Vector },
}

/// Surface color of a primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgb(Vec3),
    /// Use the orbit trap accumulated so far
    Orbit,
}

impl Default for Color {
    fn default() -> Self {
        Color::Rgb(Vec3::ONE)
    }
}

/// A shape plus its color
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub shape: Shape,
    pub color: Color,
}

impl Primitive {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            color: Color::default(),
        }
    }

    pub fn sphere(r: impl Into<Scalar>, c: impl Into<Vector>) -> Self {
        Self::new(Shape::Sphere {
            r: r.into(),
            c: c.into(),
        })
    }

    pub fn box3(s: impl Into<Vector>, c: impl Into<Vector>) -> Self {
        Self::new(Shape::Box {
            s: s.into(),
            c: c.into(),
        })
    }

    pub fn tetrahedron(r: impl Into<Scalar>, c: impl Into<Vector>) -> Self {
        Self::new(Shape::Tetrahedron {
            r: r.into(),
            c: c.into(),
        })
    }

    pub fn inf_cross(r: impl Into<Scalar>, c: impl Into<Vector>) -> Self {
        Self::new(Shape::InfCross {
            r: r.into(),
            c: c.into(),
        })
    }

    pub fn inf_cross_xy(r: impl Into<Scalar>, c: impl Into<Vector>) -> Self {
        Self::new(Shape::InfCrossXY {
            r: r.into(),
            c: c.into(),
        })
    }

    /// A literal direction is normalized here; a symbolic one must be unit length.
    pub fn inf_line(r: impl Into<Scalar>, n: impl Into<Vector>, c: impl Into<Vector>) -> Self {
        Self::new(Shape::InfLine {
            r: r.into(),
            n: n.into().normalized(),
            c: c.into(),
        })
    }

    pub fn colored(mut self, rgb: impl Into<Vec3>) -> Self {
        self.color = Color::Rgb(rgb.into());
        self
    }

    pub fn orbit_colored(mut self) -> Self {
        self.color = Color::Orbit;
        self
    }

    pub fn name(&self) -> &'static str {
        match self.shape {
            Shape::Sphere { .. } => "sphere",
            Shape::Box { .. } => "box",
            Shape::Tetrahedron { .. } => "tetrahedron",
            Shape::InfCross { .. } => "inf_cross",
            Shape::InfCrossXY { .. } => "inf_cross_xy",
            Shape::InfLine { .. } => "inf_line",
        }
    }

    pub fn declare(&self, registry: &mut Registry) -> Result<()> {
        match &self.shape {
            Shape::Sphere { r, c }
            | Shape::Tetrahedron { r, c }
            | Shape::InfCross { r, c }
            | Shape::InfCrossXY { r, c } => {
                r.declare(registry)?;
                c.declare(registry)
            }
            Shape::Box { s, c } => {
                s.declare(registry)?;
                c.declare(registry)
            }
            Shape::InfLine { r, n, c } => {
                r.declare(registry)?;
                n.declare(registry)?;
                c.declare(registry)
            }
        }
    }

    fn center(&self, registry: &Registry) -> Vec3 {
        match &self.shape {
            Shape::Sphere { c, .. }
            | Shape::Box { c, .. }
            | Shape::Tetrahedron { c, .. }
            | Shape::InfCross { c, .. }
            | Shape::InfCrossXY { c, .. }
            | Shape::InfLine { c, .. } => c.resolve(registry),
        }
    }

    /// Distance estimate at `p`, already divided by `p.w`
    pub fn de(&self, p: Vec4, registry: &Registry) -> f32 {
        let q = p.truncate() - self.center(registry);
        let raw = match &self.shape {
            Shape::Sphere { r, .. } => q.length() - r.resolve(registry),
            Shape::Box { s, .. } => {
                let a = q.abs() - s.resolve(registry);
                a.max_element().min(0.0) + a.max(Vec3::ZERO).length()
            }
            Shape::Tetrahedron { r, .. } => {
                let md = (-q.x - q.y - q.z)
                    .max(q.x + q.y - q.z)
                    .max(-q.x + q.y + q.z)
                    .max(q.x - q.y + q.z);
                (md - r.resolve(registry)) * INV_SQRT_3
            }
            Shape::InfCross { r, .. } => {
                let sq = q * q;
                (sq.x + sq.y).min(sq.x + sq.z).min(sq.y + sq.z).sqrt() - r.resolve(registry)
            }
            Shape::InfCrossXY { r, .. } => {
                let sq = q * q;
                (sq.x.min(sq.y) + sq.z).sqrt() - r.resolve(registry)
            }
            Shape::InfLine { r, n, .. } => {
                let n = n.resolve(registry);
                (q - n * n.dot(q)).length() - r.resolve(registry)
            }
        };
        raw / p.w
    }

    /// Closest surface point to `p`, in the same frame as `p`.
    ///
    /// Solved by direct projection; the tetrahedron has no projection and
    /// fails with [`Error::NearestPointUnsupported`].
    pub fn np(&self, p: Vec4, registry: &Registry) -> Result<Vec3> {
        let c = self.center(registry);
        let q = p.truncate() - c;
        let local = match &self.shape {
            Shape::Sphere { r, .. } => q.normalize_or_zero() * r.resolve(registry),
            Shape::Box { s, .. } => {
                let s = s.resolve(registry);
                q.max(-s).min(s)
            }
            Shape::Tetrahedron { .. } => return Err(Error::NearestPointUnsupported(self.name())),
            Shape::InfCross { r, .. } => {
                let a = q.abs();
                let axis = if a.x >= a.y && a.x >= a.z {
                    0
                } else if a.y >= a.z {
                    1
                } else {
                    2
                };
                onto_tube(q, axis, r.resolve(registry))
            }
            Shape::InfCrossXY { r, .. } => {
                let axis = if q.x.abs() > q.y.abs() { 0 } else { 1 };
                onto_tube(q, axis, r.resolve(registry))
            }
            Shape::InfLine { r, n, .. } => {
                let n = n.resolve(registry);
                let along = n * n.dot(q);
                along + (q - along).normalize_or_zero() * r.resolve(registry)
            }
        };
        Ok(local + c)
    }

    /// GLSL distance expression in terms of `vec4 p`
    pub fn emit(&self) -> String {
        match &self.shape {
            Shape::Sphere { r, c } => format!("de_sphere({}, {})", glsl::centered(c), r.glsl()),
            Shape::Box { s, c } => format!("de_box({}, {})", glsl::centered(c), s.glsl()),
            Shape::Tetrahedron { r, c } => {
                format!("de_tetrahedron({}, {})", glsl::centered(c), r.glsl())
            }
            Shape::InfCross { r, c } => {
                format!("de_inf_cross({}, {})", glsl::centered(c), r.glsl())
            }
            Shape::InfCrossXY { r, c } => {
                format!("de_inf_cross_xy({}, {})", glsl::centered(c), r.glsl())
            }
            Shape::InfLine { r, n, c } => format!(
                "de_inf_line({}, {}, {})",
                glsl::centered(c),
                n.glsl(),
                r.glsl()
            ),
        }
    }

    /// GLSL `vec4(rgb, distance)` expression
    pub fn emit_color(&self) -> String {
        match self.color {
            Color::Rgb(rgb) => format!("vec4({}, {})", glsl::vec3(rgb), self.emit()),
            Color::Orbit => format!("vec4(orbit, {})", self.emit()),
        }
    }
}

/// Project `q` onto the tube of radius `r` running along `axis`
fn onto_tube(q: Vec3, axis: usize, r: f32) -> Vec3 {
    let mut radial = q;
    radial[axis] = 0.0;
    let mut out = radial.normalize_or_zero() * r;
    out[axis] = q[axis];
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use approx::assert_relative_eq;

    fn at(x: f32, y: f32, z: f32) -> Vec4 {
        Vec4::new(x, y, z, 1.0)
    }

    #[test]
    fn sphere_distance() {
        let reg = Registry::new();
        let s = Primitive::sphere(1.0, 0.0);
        assert_relative_eq!(s.de(at(0.0, 0.0, 0.0), &reg), -1.0);
        assert_relative_eq!(s.de(at(2.0, 0.0, 0.0), &reg), 1.0);
    }

    #[test]
    fn distance_is_divided_by_w() {
        let reg = Registry::new();
        let s = Primitive::sphere(1.0, 0.0);
        assert_relative_eq!(s.de(Vec4::new(3.0, 0.0, 0.0, 2.0), &reg), 1.0);
    }

    #[test]
    fn box_distance_inside_and_out() {
        let reg = Registry::new();
        let b = Primitive::box3(1.0, [1.0, 0.0, 0.0]);
        assert_relative_eq!(b.de(at(1.0, 0.0, 0.0), &reg), -1.0);
        assert_relative_eq!(b.de(at(3.0, 0.0, 0.0), &reg), 1.0);
        assert_relative_eq!(b.de(at(3.0, 2.0, 0.0), &reg), 2.0_f32.sqrt());
    }

    #[test]
    fn tetrahedron_distance_and_missing_np() {
        let reg = Registry::new();
        let t = Primitive::tetrahedron(1.0, 0.0);
        assert!(t.de(at(0.0, 0.0, 0.0), &reg) < 0.0);
        assert!(t.de(at(5.0, 5.0, 5.0), &reg) > 0.0);
        assert_eq!(
            t.np(at(1.0, 1.0, 1.0), &reg),
            Err(Error::NearestPointUnsupported("tetrahedron"))
        );
    }

    #[test]
    fn sphere_np_is_analytic() {
        let reg = Registry::new();
        let c = Vec3::new(0.5, -1.0, 2.0);
        let s = Primitive::sphere(1.5, c);
        let p = at(3.0, 1.0, -1.0);
        let expected = (p.truncate() - c).normalize() * 1.5 + c;
        assert_relative_eq!(s.np(p, &reg).unwrap(), expected, epsilon = 1e-6);
    }

    #[test]
    fn projections_land_on_surface() {
        let reg = Registry::new();
        let shapes = [
            Primitive::sphere(1.0, [0.2, 0.0, 0.0]),
            Primitive::box3([1.0, 0.5, 2.0], 0.0),
            Primitive::inf_cross(0.3, 0.0),
            Primitive::inf_cross_xy(0.4, [0.0, 0.0, 1.0]),
            Primitive::inf_line(0.25, [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        let points = [at(2.0, 1.5, -0.5), at(-0.2, 3.0, 0.7), at(0.1, -0.4, 4.0)];
        for shape in &shapes {
            for p in points {
                let np = shape.np(p, &reg).unwrap();
                let d = shape.de(np.extend(1.0), &reg);
                assert_relative_eq!(d, 0.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn emission_uses_offset_only_when_needed() {
        assert_eq!(Primitive::sphere(1.0, 0.0).emit(), "de_sphere(p, 1.0)");
        assert_eq!(
            Primitive::box3(2.0, [0.0, 1.0, 0.0]).emit(),
            "de_box(p - vec4(vec3(0.0, 1.0, 0.0), 0.0), vec3(2.0, 2.0, 2.0))"
        );
        assert_eq!(
            Primitive::inf_line("r", [1.0, 0.0, 0.0], "c").emit(),
            "de_inf_line(p - vec4(_c, 0.0), vec3(1.0, 0.0, 0.0), _r)"
        );
    }

    #[test]
    fn color_emission() {
        let s = Primitive::sphere(0.5, 0.0).colored([0.9, 0.9, 0.5]);
        assert_eq!(s.emit_color(), "vec4(vec3(0.9, 0.9, 0.5), de_sphere(p, 0.5))");
        let o = Primitive::box3(6.0, 0.0).orbit_colored();
        assert_eq!(o.emit_color(), "vec4(orbit, de_box(p, vec3(6.0, 6.0, 6.0)))");
    }
}
