//! GLSL literal formatting shared by every emitter

use glam::Vec3;

use crate::param::Vector;

/// Stand-in for infinity; GLSL has no infinity literal
pub const BIG: f32 = 1e20;

/// Format a float so GLSL parses it as a float literal.
///
/// `{:?}` always keeps a decimal point or exponent and prints the shortest
/// representation that round-trips, so the output is deterministic.
pub fn float(v: f32) -> String {
    if v.is_nan() {
        tracing::warn!("NaN has no GLSL literal, emitting 0.0");
        return "0.0".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { format!("{:?}", BIG) } else { format!("{:?}", -BIG) };
    }
    format!("{:?}", v)
}

pub fn vec3(v: Vec3) -> String {
    format!("vec3({}, {}, {})", float(v.x), float(v.y), float(v.z))
}

/// Argument expression for a primitive centered at `c`
pub fn centered(c: &Vector) -> String {
    if c.is_literal(Vec3::ZERO) {
        "p".to_string()
    } else {
        format!("p - vec4({}, 0.0)", c.glsl())
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*` without `__`, which GLSL reserves
pub fn is_ident(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !name.contains("__")
}

/// Registry keys only need to be valid after the uniform prefix, so digits
/// may lead. A leading `_` would form a reserved `__` with the prefix.
pub fn is_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('_')
        && !key.contains("__")
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Object names follow `de_`/`col_`, so they obey both rules
pub fn is_object_name(name: &str) -> bool {
    is_ident(name) && is_key(name)
}
