//! Space folds
//!
//! A fold warps the query point before any distance is measured. Each fold
//! has three faces that must agree with each other:
//!
//! - [`Fold::fold`] moves a point forward through the fold,
//! - [`Fold::unfold`] carries a probe from the fold's output frame back to its
//!   input frame, replaying the branch the forward step took for the retained
//!   pre-fold point,
//! - [`Fold::emit`] writes the same forward step as GLSL.
//!
//! The `w` component of a point tracks the accumulated scale so that
//! primitives can divide their raw distance by it.

// Emitters write into a String, which cannot fail
// Identity shortcuts compare exact literals
#![allow(clippy::unwrap_used)]
#![allow(clippy::float_cmp)]

use std::fmt::Write;

use glam::{Vec3, Vec4};

use crate::glsl;
use crate::param::{Registry, Scalar, Vector};
use crate::Result;

/// Keeps the inversion finite at the origin
pub const INVERSION_EPSILON: f32 = 1e-12;

/// A coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    fn swizzle(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    fn upper(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }

    /// The (u, v) plane a rotation about this axis mixes: X turns y into z,
    /// Y turns z into x, Z turns x into y.
    fn rotation_plane(self) -> (usize, usize) {
        match self {
            Axis::X => (1, 2),
            Axis::Y => (2, 0),
            Axis::Z => (0, 1),
        }
    }
}

/// A space-folding operator
#[derive(Debug, Clone, PartialEq)]
pub enum Fold {
    /// Reflect across the plane `dot(p, n) = d` when on its negative side
    Plane { n: Vector, d: Scalar },
    /// `p = |p - c| + c`
    Abs { c: Vector },
    /// Tetrahedral symmetry: three conditional swap-negations
    Sierpinski,
    /// Cubic symmetry: sort coordinates descending
    Menger,
    /// `p = p*s + t`, with `w *= |s|`
    ScaleTranslate { s: Scalar, t: Vector },
    /// `p = p*s + o` where `o` is the unfolded query point
    ScaleOrigin { s: Scalar },
    /// Reflect each coordinate outside `[-r, r]` back inside
    Box { r: Vector },
    /// Mandelbox sphere inversion between `min_r` and `max_r` (squared radii)
    Sphere { min_r: Scalar, max_r: Scalar },
    /// `p /= |p|^2`
    Inversion,
    /// Rotate by `a` radians about an axis
    Rotate { axis: Axis, a: Scalar },
    /// Tile one axis with period `m`, mirroring every tile
    Repeat { axis: Axis, m: Scalar },
}

impl Fold {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Literal normals are normalized here; symbolic normals must be unit length.
    pub fn plane(n: impl Into<Vector>, d: impl Into<Scalar>) -> Self {
        Fold::Plane {
            n: n.into().normalized(),
            d: d.into(),
        }
    }

    /// Abs fold about the origin
    pub fn abs() -> Self {
        Self::abs_about(0.0)
    }

    pub fn abs_about(c: impl Into<Vector>) -> Self {
        Fold::Abs { c: c.into() }
    }

    pub fn sierpinski() -> Self {
        Fold::Sierpinski
    }

    pub fn menger() -> Self {
        Fold::Menger
    }

    pub fn scale_translate(s: impl Into<Scalar>, t: impl Into<Vector>) -> Self {
        Fold::ScaleTranslate {
            s: s.into(),
            t: t.into(),
        }
    }

    pub fn scale(s: impl Into<Scalar>) -> Self {
        Self::scale_translate(s, 0.0)
    }

    pub fn translate(t: impl Into<Vector>) -> Self {
        Self::scale_translate(1.0, t)
    }

    pub fn scale_origin(s: impl Into<Scalar>) -> Self {
        Fold::ScaleOrigin { s: s.into() }
    }

    pub fn box_fold(r: impl Into<Vector>) -> Self {
        Fold::Box { r: r.into() }
    }

    pub fn sphere(min_r: impl Into<Scalar>, max_r: impl Into<Scalar>) -> Self {
        Fold::Sphere {
            min_r: min_r.into(),
            max_r: max_r.into(),
        }
    }

    pub fn inversion() -> Self {
        Fold::Inversion
    }

    pub fn rotate(axis: Axis, a: impl Into<Scalar>) -> Self {
        Fold::Rotate { axis, a: a.into() }
    }

    pub fn rotate_x(a: impl Into<Scalar>) -> Self {
        Self::rotate(Axis::X, a)
    }

    pub fn rotate_y(a: impl Into<Scalar>) -> Self {
        Self::rotate(Axis::Y, a)
    }

    pub fn rotate_z(a: impl Into<Scalar>) -> Self {
        Self::rotate(Axis::Z, a)
    }

    pub fn repeat(axis: Axis, m: impl Into<Scalar>) -> Self {
        Fold::Repeat { axis, m: m.into() }
    }

    pub fn repeat_x(m: impl Into<Scalar>) -> Self {
        Self::repeat(Axis::X, m)
    }

    pub fn repeat_y(m: impl Into<Scalar>) -> Self {
        Self::repeat(Axis::Y, m)
    }

    pub fn repeat_z(m: impl Into<Scalar>) -> Self {
        Self::repeat(Axis::Z, m)
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Register every symbolic parameter of this fold
    pub fn declare(&self, registry: &mut Registry) -> Result<()> {
        match self {
            Fold::Plane { n, d } => {
                n.declare(registry)?;
                d.declare(registry)
            }
            Fold::Abs { c } => c.declare(registry),
            Fold::ScaleTranslate { s, t } => {
                s.declare(registry)?;
                t.declare(registry)
            }
            Fold::ScaleOrigin { s } => s.declare(registry),
            Fold::Box { r } => r.declare(registry),
            Fold::Sphere { min_r, max_r } => {
                min_r.declare(registry)?;
                max_r.declare(registry)
            }
            Fold::Rotate { a, .. } => a.declare(registry),
            Fold::Repeat { m, .. } => m.declare(registry),
            Fold::Sierpinski | Fold::Menger | Fold::Inversion => Ok(()),
        }
    }

    // ========================================================================
    // Numeric path
    // ========================================================================

    /// Apply the fold. `origin` is the pipeline's unfolded query point.
    pub fn fold(&self, p: Vec4, origin: Vec4, registry: &Registry) -> Vec4 {
        let xyz = p.truncate();
        match self {
            Fold::Plane { n, d } => {
                let n = n.resolve(registry);
                let d = d.resolve(registry);
                (xyz - 2.0 * (xyz.dot(n) - d).min(0.0) * n).extend(p.w)
            }
            Fold::Abs { c } => {
                let c = c.resolve(registry);
                ((xyz - c).abs() + c).extend(p.w)
            }
            Fold::Sierpinski => sierpinski(xyz).0.extend(p.w),
            Fold::Menger => menger(xyz).0.extend(p.w),
            Fold::ScaleTranslate { s, t } => {
                let s = s.resolve(registry);
                (xyz * s + t.resolve(registry)).extend(p.w * s.abs())
            }
            Fold::ScaleOrigin { s } => {
                let s = s.resolve(registry);
                (xyz * s + origin.truncate()).extend((p.w * s).abs() + origin.w)
            }
            Fold::Box { r } => {
                let r = r.resolve(registry);
                (xyz.max(-r).min(r) * 2.0 - xyz).extend(p.w)
            }
            Fold::Sphere { min_r, max_r } => {
                p * sphere_factor(xyz, min_r.resolve(registry), max_r.resolve(registry))
            }
            Fold::Inversion => p / (xyz.length_squared() + INVERSION_EPSILON),
            Fold::Rotate { axis, a } => rotate(xyz, *axis, a.resolve(registry)).extend(p.w),
            Fold::Repeat { axis, m } => {
                let mut p = p;
                let i = axis.index();
                p[i] = tile_local(p[i], m.resolve(registry)).abs();
                p
            }
        }
    }

    /// Carry `probe` from this fold's output frame back to its input frame.
    ///
    /// `pre` is the point as it was before [`Fold::fold`] ran; the branch it
    /// selected decides which inverse is applied to `probe`.
    pub fn unfold(&self, pre: Vec4, probe: Vec3, origin: Vec4, registry: &Registry) -> Vec3 {
        let xyz = pre.truncate();
        match self {
            Fold::Plane { n, d } => {
                let n = n.resolve(registry);
                let d = d.resolve(registry);
                if xyz.dot(n) - d < 0.0 {
                    probe - 2.0 * (probe.dot(n) - d) * n
                } else {
                    probe
                }
            }
            Fold::Abs { c } => {
                let c = c.resolve(registry);
                let mut q = probe;
                for i in 0..3 {
                    if xyz[i] < c[i] {
                        q[i] = 2.0 * c[i] - q[i];
                    }
                }
                q
            }
            Fold::Sierpinski => {
                let (_, taken) = sierpinski(xyz);
                let mut q = probe;
                if taken[2] {
                    (q.y, q.z) = (-q.z, -q.y);
                }
                if taken[1] {
                    (q.x, q.z) = (-q.z, -q.x);
                }
                if taken[0] {
                    (q.x, q.y) = (-q.y, -q.x);
                }
                q
            }
            Fold::Menger => {
                let (_, taken) = menger(xyz);
                let mut q = probe;
                if taken[2] {
                    (q.y, q.z) = (q.z, q.y);
                }
                if taken[1] {
                    (q.x, q.z) = (q.z, q.x);
                }
                if taken[0] {
                    (q.x, q.y) = (q.y, q.x);
                }
                q
            }
            Fold::ScaleTranslate { s, t } => (probe - t.resolve(registry)) / s.resolve(registry),
            Fold::ScaleOrigin { s } => (probe - origin.truncate()) / s.resolve(registry),
            Fold::Box { r } => {
                let r = r.resolve(registry);
                let mut q = probe;
                for i in 0..3 {
                    if xyz[i] < -r[i] {
                        q[i] = -2.0 * r[i] - q[i];
                    } else if xyz[i] > r[i] {
                        q[i] = 2.0 * r[i] - q[i];
                    }
                }
                q
            }
            Fold::Sphere { min_r, max_r } => {
                probe / sphere_factor(xyz, min_r.resolve(registry), max_r.resolve(registry))
            }
            Fold::Inversion => probe * (xyz.length_squared() + INVERSION_EPSILON),
            Fold::Rotate { axis, a } => rotate(probe, *axis, -a.resolve(registry)),
            Fold::Repeat { axis, m } => {
                let i = axis.index();
                let local = tile_local(xyz[i], m.resolve(registry));
                let mut q = probe;
                if local < 0.0 {
                    q[i] = -q[i];
                }
                q[i] += xyz[i] - local;
                q
            }
        }
    }

    // ========================================================================
    // Shader path
    // ========================================================================

    /// GLSL statements performing the same fold on `vec4 p`.
    ///
    /// Literal identity values pick shorter statements; each shortcut is
    /// algebraically identical to the general form.
    pub fn emit(&self) -> String {
        let mut code = String::new();
        match self {
            Fold::Plane { n, d } => {
                let d = d.glsl();
                let axis_aligned = [
                    (Vec3::X, Axis::X),
                    (Vec3::Y, Axis::Y),
                    (Vec3::Z, Axis::Z),
                ]
                .into_iter()
                .find_map(|(unit, axis)| {
                    if n.is_literal(unit) {
                        Some((axis, true))
                    } else if n.is_literal(-unit) {
                        Some((axis, false))
                    } else {
                        None
                    }
                });
                match axis_aligned {
                    Some((axis, true)) => {
                        let c = axis.swizzle();
                        writeln!(code, "\tp.{c} = abs(p.{c} - {d}) + {d};").unwrap();
                    }
                    Some((axis, false)) => {
                        let c = axis.swizzle();
                        writeln!(code, "\tp.{c} = -abs(p.{c} + {d}) - {d};").unwrap();
                    }
                    None => {
                        writeln!(code, "\tplaneFold(p, {}, {});", n.glsl(), d).unwrap();
                    }
                }
            }
            Fold::Abs { c } => {
                if c.is_literal(Vec3::ZERO) {
                    writeln!(code, "\tp.xyz = abs(p.xyz);").unwrap();
                } else {
                    writeln!(code, "\tabsFold(p, {});", c.glsl()).unwrap();
                }
            }
            Fold::Sierpinski => writeln!(code, "\tsierpinskiFold(p);").unwrap(),
            Fold::Menger => writeln!(code, "\tmengerFold(p);").unwrap(),
            Fold::ScaleTranslate { s, t } => {
                match s.literal() {
                    Some(v) if v == 1.0 => {}
                    // w * s == w * |s| when s is non-negative
                    Some(v) if v >= 0.0 => writeln!(code, "\tp *= {};", s.glsl()).unwrap(),
                    _ => {
                        writeln!(code, "\tp.xyz *= {};", s.glsl()).unwrap();
                        writeln!(code, "\tp.w *= abs({});", s.glsl()).unwrap();
                    }
                }
                if !t.is_literal(Vec3::ZERO) {
                    writeln!(code, "\tp.xyz += {};", t.glsl()).unwrap();
                }
            }
            Fold::ScaleOrigin { s } => match s.literal() {
                // w never goes negative, so abs(w) == w
                Some(v) if v == 1.0 => writeln!(code, "\tp += o;").unwrap(),
                _ => writeln!(code, "\tp = p*{}; p.w = abs(p.w); p += o;", s.glsl()).unwrap(),
            },
            Fold::Box { r } => writeln!(code, "\tboxFold(p, {});", r.glsl()).unwrap(),
            Fold::Sphere { min_r, max_r } => {
                writeln!(code, "\tsphereFold(p, {}, {});", min_r.glsl(), max_r.glsl()).unwrap();
            }
            Fold::Inversion => {
                writeln!(
                    code,
                    "\tp /= dot(p.xyz, p.xyz) + {};",
                    glsl::float(INVERSION_EPSILON)
                )
                .unwrap();
            }
            Fold::Rotate { axis, a } => match a.literal() {
                // Precompute sin/cos at generation time
                Some(v) => writeln!(
                    code,
                    "\trot{}(p, {}, {});",
                    axis.upper(),
                    glsl::float(v.sin()),
                    glsl::float(v.cos())
                )
                .unwrap(),
                None => writeln!(code, "\trot{}(p, {});", axis.upper(), a.glsl()).unwrap(),
            },
            Fold::Repeat { axis, m } => {
                let c = axis.swizzle();
                let half = match m.literal() {
                    Some(v) => glsl::float(v * 0.5),
                    None => format!("{}*0.5", m.glsl()),
                };
                writeln!(
                    code,
                    "\tp.{c} = abs(mod(p.{c} - {half}, {m}) - {half});",
                    m = m.glsl()
                )
                .unwrap();
            }
        }
        code
    }
}

/// Forward Sierpinski fold and which of its three swap-negations fired
fn sierpinski(p: Vec3) -> (Vec3, [bool; 3]) {
    let mut p = p;
    let mut taken = [false; 3];
    if p.x + p.y < 0.0 {
        (p.x, p.y) = (-p.y, -p.x);
        taken[0] = true;
    }
    if p.x + p.z < 0.0 {
        (p.x, p.z) = (-p.z, -p.x);
        taken[1] = true;
    }
    if p.y + p.z < 0.0 {
        (p.y, p.z) = (-p.z, -p.y);
        taken[2] = true;
    }
    (p, taken)
}

/// Forward Menger fold and which of its three swaps fired
fn menger(p: Vec3) -> (Vec3, [bool; 3]) {
    let mut p = p;
    let mut taken = [false; 3];
    if p.x < p.y {
        (p.x, p.y) = (p.y, p.x);
        taken[0] = true;
    }
    if p.x < p.z {
        (p.x, p.z) = (p.z, p.x);
        taken[1] = true;
    }
    if p.y < p.z {
        (p.y, p.z) = (p.z, p.y);
        taken[2] = true;
    }
    (p, taken)
}

fn sphere_factor(p: Vec3, min_r: f32, max_r: f32) -> f32 {
    (max_r / min_r.max(p.length_squared())).max(1.0)
}

fn rotate(v: Vec3, axis: Axis, a: f32) -> Vec3 {
    let (s, c) = a.sin_cos();
    let (i, j) = axis.rotation_plane();
    let (u, w) = (v[i], v[j]);
    let mut out = v;
    out[i] = c * u + s * w;
    out[j] = c * w - s * u;
    out
}

/// Offset of `x` from the center of its tile, in `[-m/2, m/2)`. Uses GLSL's
/// floored `mod` so both paths pick the same tile.
fn tile_local(x: f32, m: f32) -> f32 {
    let half = m * 0.5;
    let y = x - half;
    y - m * (y / m).floor() - half
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_3;

    fn apply(fold: &Fold, p: Vec4) -> Vec4 {
        fold.fold(p, p, &Registry::new())
    }

    fn all_folds() -> Vec<Fold> {
        vec![
            Fold::plane([1.0, 1.0, 0.0], 0.3),
            Fold::plane([0.0, 0.0, -1.0], -1.0),
            Fold::abs(),
            Fold::abs_about([0.5, -0.5, 1.0]),
            Fold::sierpinski(),
            Fold::menger(),
            Fold::scale_translate(2.0, [1.0, 0.0, 0.0]),
            Fold::scale_translate(-1.5, [-1.0, -0.5, -0.2]),
            Fold::scale_origin(2.0),
            Fold::box_fold(1.0),
            Fold::box_fold([0.34, 0.5, 2.0]),
            Fold::sphere(0.5, 1.0),
            Fold::inversion(),
            Fold::rotate_x(0.7),
            Fold::rotate_y(3.61),
            Fold::rotate_z(-2.03),
            Fold::repeat_x(2.0),
            Fold::repeat_y(1.5),
            Fold::repeat_z(3.0),
        ]
    }

    fn sample_points() -> Vec<Vec4> {
        vec![
            Vec4::new(-3.0, 4.0, -5.0, 1.0),
            Vec4::new(0.2, -0.7, 0.1, 1.0),
            Vec4::new(2.0, 0.5, 0.5, 1.0),
            Vec4::new(-0.3, -0.4, 0.9, 2.0),
            Vec4::new(1.3, -2.6, -0.05, 1.0),
            Vec4::new(0.6, 0.1, -0.2, 1.0),
        ]
    }

    #[test]
    fn plane_is_noop_on_positive_side() {
        let fold = Fold::plane([0.0, 1.0, 0.0], 0.5);
        let p = Vec4::new(0.3, 2.0, -1.0, 1.0);
        assert_eq!(apply(&fold, p), p);
    }

    #[test]
    fn plane_moves_negative_side_to_positive() {
        let fold = Fold::plane([1.0, 2.0, -0.5], 0.25);
        let Fold::Plane { n, .. } = &fold else {
            unreachable!()
        };
        let n = n.literal().unwrap();
        let p = Vec4::new(-1.0, -1.0, 0.0, 1.0);
        let once = apply(&fold, p);
        let twice = apply(&fold, once);
        assert!(once.truncate().dot(n) - 0.25 >= -1e-6);
        assert!(twice.truncate().dot(n) - 0.25 >= -1e-6);
        assert_relative_eq!(once, twice, epsilon = 1e-6);
    }

    #[test]
    fn abs_about_origin() {
        let p = apply(&Fold::abs(), Vec4::new(-3.0, 4.0, -5.0, 1.0));
        assert_eq!(p, Vec4::new(3.0, 4.0, 5.0, 1.0));
    }

    #[test]
    fn box_reflects_outside_coordinates() {
        let p = apply(&Fold::box_fold(1.0), Vec4::new(2.0, 0.5, 0.5, 1.0));
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, 0.5);
    }

    #[test]
    fn scale_translate_scales_w() {
        let p = apply(&Fold::scale_translate(2.0, [1.0, 0.0, 0.0]), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(p, Vec4::new(1.0, 0.0, 0.0, 2.0));
    }

    #[test]
    fn negative_scale_keeps_w_positive() {
        let p = apply(&Fold::scale(-2.0), Vec4::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(p, Vec4::new(-2.0, -2.0, -2.0, 2.0));
    }

    #[test]
    fn scale_origin_adds_query_point() {
        let origin = Vec4::new(0.5, 0.0, -1.0, 1.0);
        let p = Vec4::new(1.0, 2.0, 3.0, 2.0);
        let out = Fold::scale_origin(2.0).fold(p, origin, &Registry::new());
        assert_eq!(out, Vec4::new(2.5, 4.0, 5.0, 5.0));
    }

    #[test]
    fn sphere_fold_regions() {
        let fold = Fold::sphere(0.5, 1.0);
        // Inside min radius: scaled by max/min
        let inner = apply(&fold, Vec4::new(0.1, 0.0, 0.0, 1.0));
        assert_relative_eq!(inner, Vec4::new(0.2, 0.0, 0.0, 2.0), epsilon = 1e-6);
        // Between: scaled by max/r^2
        let mid = apply(&fold, Vec4::new(0.8, 0.0, 0.0, 1.0));
        assert_relative_eq!(mid.w, 1.0 / 0.64, epsilon = 1e-5);
        // Outside: untouched
        let outer = Vec4::new(2.0, 0.0, 0.0, 1.0);
        assert_eq!(apply(&fold, outer), outer);
    }

    #[test]
    fn menger_sorts_descending() {
        let p = apply(&Fold::menger(), Vec4::new(1.0, 3.0, 2.0, 1.0));
        assert_eq!(p, Vec4::new(3.0, 2.0, 1.0, 1.0));
    }

    #[test]
    fn repeat_tiles_axis() {
        let fold = Fold::repeat_x(2.0);
        // Tile centers sit on multiples of the period
        assert_relative_eq!(apply(&fold, Vec4::new(0.25, 0.0, 0.0, 1.0)).x, 0.25);
        assert_relative_eq!(apply(&fold, Vec4::new(2.25, 0.0, 0.0, 1.0)).x, 0.25, epsilon = 1e-6);
        assert_relative_eq!(apply(&fold, Vec4::new(-1.75, 0.0, 0.0, 1.0)).x, 0.25, epsilon = 1e-6);
        assert_relative_eq!(apply(&fold, Vec4::new(0.9, 0.0, 0.0, 1.0)).x, 0.9, epsilon = 1e-6);
    }

    #[test]
    fn rotation_quarter_turns() {
        let p = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let z = apply(&Fold::rotate_z(std::f32::consts::FRAC_PI_2), p);
        assert_relative_eq!(z, Vec4::new(0.0, -1.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn unfold_inverts_fold_for_every_variant() {
        let reg = Registry::new();
        for fold in all_folds() {
            for p in sample_points() {
                let folded = fold.fold(p, p, &reg);
                let back = fold.unfold(p, folded.truncate(), p, &reg);
                assert_relative_eq!(back, p.truncate(), epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn symbolic_parameters_follow_the_registry() {
        let mut reg = Registry::new();
        let fold = Fold::rotate_z("angle");
        fold.declare(&mut reg).unwrap();
        reg.set("angle", FRAC_PI_3).unwrap();
        let p = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let literal = Fold::rotate_z(FRAC_PI_3).fold(p, p, &reg);
        assert_eq!(fold.fold(p, p, &reg), literal);
    }

    #[test]
    fn plane_emits_axis_shortcuts() {
        assert_eq!(
            Fold::plane([1.0, 0.0, 0.0], 0.5).emit(),
            "\tp.x = abs(p.x - 0.5) + 0.5;\n"
        );
        assert_eq!(
            Fold::plane([0.0, 0.0, -1.0], -1.0).emit(),
            "\tp.z = -abs(p.z + -1.0) - -1.0;\n"
        );
        assert!(Fold::plane([1.0, 1.0, 0.0], 0.0).emit().starts_with("\tplaneFold(p, vec3("));
        assert_eq!(Fold::plane("n", "d").emit(), "\tplaneFold(p, _n, _d);\n");
    }

    #[test]
    fn scale_translate_emission_forms() {
        assert_eq!(Fold::scale_translate(1.0, 0.0).emit(), "");
        assert_eq!(Fold::scale(2.0).emit(), "\tp *= 2.0;\n");
        assert_eq!(
            Fold::scale_translate(-2.0, [1.0, 0.0, 0.0]).emit(),
            "\tp.xyz *= -2.0;\n\tp.w *= abs(-2.0);\n\tp.xyz += vec3(1.0, 0.0, 0.0);\n"
        );
        assert_eq!(Fold::scale("s").emit(), "\tp.xyz *= _s;\n\tp.w *= abs(_s);\n");
    }

    #[test]
    fn rotation_emits_precomputed_or_symbolic() {
        assert_eq!(Fold::rotate_x(0.0).emit(), "\trotX(p, 0.0, 1.0);\n");
        assert_eq!(Fold::rotate_y("0").emit(), "\trotY(p, _0);\n");
    }

    #[test]
    fn repeat_and_inversion_emission() {
        assert_eq!(
            Fold::repeat_y(2.0).emit(),
            "\tp.y = abs(mod(p.y - 1.0, 2.0) - 1.0);\n"
        );
        assert_eq!(
            Fold::repeat_z("m").emit(),
            "\tp.z = abs(mod(p.z - _m*0.5, _m) - _m*0.5);\n"
        );
        assert_eq!(Fold::inversion().emit(), "\tp /= dot(p.xyz, p.xyz) + 1e-12;\n");
    }

    #[test]
    fn abs_and_scale_origin_shortcuts() {
        assert_eq!(Fold::abs().emit(), "\tp.xyz = abs(p.xyz);\n");
        assert_eq!(Fold::abs_about("c").emit(), "\tabsFold(p, _c);\n");
        assert_eq!(Fold::scale_origin(1.0).emit(), "\tp += o;\n");
        assert_eq!(
            Fold::scale_origin(2.0).emit(),
            "\tp = p*2.0; p.w = abs(p.w); p += o;\n"
        );
    }
}
