//! Shader templates and marker splicing

use crate::{Error, Result};

/// Generated `#define` lines go before this marker
pub const DEFINES_MARKER: &str = "// [/defines]";

/// Generated uniform declarations go before this marker
pub const UNIFORMS_MARKER: &str = "// [/uniforms]";

/// Generated distance and color functions go before this marker
pub const SCENE_MARKER: &str = "// [/scene]";

/// Bundled fragment template: fold/primitive helpers and a ray marcher
pub const FRAGMENT: &str = include_str!("shaders/frag.glsl");

/// Bundled vertex template: full-screen quad
pub const VERTEX: &str = include_str!("shaders/vert.glsl");

/// Fail with the first of the three markers missing from `template`
pub fn check_markers(template: &str) -> Result<()> {
    for marker in [DEFINES_MARKER, UNIFORMS_MARKER, SCENE_MARKER] {
        if !template.contains(marker) {
            return Err(Error::MissingMarker(marker));
        }
    }
    Ok(())
}

/// Insert `code` immediately before the first occurrence of `marker`
pub fn splice(template: &str, marker: &'static str, code: &str) -> Result<String> {
    let pos = template.find(marker).ok_or(Error::MissingMarker(marker))?;
    let mut out = String::with_capacity(template.len() + code.len());
    out.push_str(&template[..pos]);
    out.push_str(code);
    out.push_str(&template[pos..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn splice_inserts_before_marker() {
        let out = splice("a\n// [/scene]\nb\n", SCENE_MARKER, "float x;\n").unwrap();
        assert_eq!(out, "a\nfloat x;\n// [/scene]\nb\n");
    }

    #[test]
    fn missing_marker_is_reported() {
        assert!(matches!(
            splice("no markers", UNIFORMS_MARKER, ""),
            Err(Error::MissingMarker(UNIFORMS_MARKER))
        ));
        assert!(matches!(
            check_markers("// [/defines]\n// [/scene]\n"),
            Err(Error::MissingMarker(m)) if m == UNIFORMS_MARKER
        ));
    }

    #[test]
    fn bundled_fragment_has_every_marker() {
        check_markers(FRAGMENT).unwrap();
        assert!(VERTEX.starts_with("#version"));
    }
}
