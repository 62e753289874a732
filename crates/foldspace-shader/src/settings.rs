//! Render settings and parameter files
//!
//! Render settings become `#define` lines at the top of the fragment shader.
//! Defaults match the bundled template; JSON files override or extend them.
//!
//! ```json
//! { "ANTIALIASING_SAMPLES": 2, "FOG_ENABLED": true, "BACKGROUND_COLOR": [0.1, 0.1, 0.2] }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use foldspace_core::glsl;
use foldspace_core::{Registry, Value};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One render setting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    Vec3([f32; 3]),
}

impl SettingValue {
    /// Preprocessor text for the value
    pub fn glsl(&self) -> String {
        match self {
            SettingValue::Bool(b) => u8::from(*b).to_string(),
            SettingValue::Int(i) => i.to_string(),
            SettingValue::Float(f) => glsl::float(*f),
            SettingValue::Vec3(v) => glsl::vec3(Vec3::from_array(*v)),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        SettingValue::Bool(b)
    }
}

impl From<i64> for SettingValue {
    fn from(i: i64) -> Self {
        SettingValue::Int(i)
    }
}

impl From<f32> for SettingValue {
    fn from(f: f32) -> Self {
        SettingValue::Float(f)
    }
}

impl From<[f32; 3]> for SettingValue {
    fn from(v: [f32; 3]) -> Self {
        SettingValue::Vec3(v)
    }
}

/// Flat, name-ordered table of render settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderSettings {
    values: BTreeMap<String, SettingValue>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        let defaults: [(&str, SettingValue); 34] = [
            ("ANTIALIASING_SAMPLES", 1.into()),
            ("AMBIENT_OCCLUSION_STRENGTH", 0.01.into()),
            ("AMBIENT_OCCLUSION_COLOR_DELTA", [0.8, 0.8, 0.8].into()),
            ("BACKGROUND_COLOR", [0.6, 0.6, 0.9].into()),
            ("DEPTH_OF_FIELD_STRENGTH", 0.0.into()),
            ("DEPTH_OF_FIELD_DISTANCE", 1.0.into()),
            ("DIFFUSE_ENABLED", false.into()),
            ("DIFFUSE_ENHANCED_ENABLED", true.into()),
            ("EXPOSURE", 1.0.into()),
            ("FIELD_OF_VIEW", 60.0.into()),
            ("FOG_ENABLED", false.into()),
            ("GLOW_ENABLED", false.into()),
            ("GLOW_COLOR_DELTA", [-0.2, 0.5, -0.2].into()),
            ("GLOW_SHARPNESS", 4.0.into()),
            ("LIGHT_COLOR", [1.0, 0.9, 0.6].into()),
            ("LIGHT_DIRECTION", [-0.36, 0.48, 0.80].into()),
            ("MOTION_BLUR_LEVEL", 0.into()),
            ("MAX_MARCHES", 1000.into()),
            ("MAX_DIST", 50.0.into()),
            ("MIN_DIST", 0.00001.into()),
            ("ODS", false.into()),
            ("ORTHOGONAL_PROJECTION", false.into()),
            ("ORTHOGONAL_ZOOM", 5.0.into()),
            ("REFLECTION_LEVEL", 0.into()),
            ("REFLECTION_ATTENUATION", 0.6.into()),
            ("SHADOWS_ENABLED", true.into()),
            ("SHADOW_DARKNESS", 0.8.into()),
            ("SHADOW_SHARPNESS", 16.0.into()),
            ("SPECULAR_HIGHLIGHT", 40.into()),
            ("SUN_ENABLED", true.into()),
            ("SUN_SIZE", 0.005.into()),
            ("SUN_SHARPNESS", 2.0.into()),
            ("VIGNETTE_FOREGROUND", false.into()),
            ("VIGNETTE_STRENGTH", 0.5.into()),
        ];
        Self {
            values: defaults
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}

impl RenderSettings {
    /// A table with no settings at all
    pub fn empty() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).copied()
    }

    /// Replace or add a setting
    pub fn set(&mut self, key: &str, value: impl Into<SettingValue>) -> Result<()> {
        if !glsl::is_ident(key) {
            return Err(Error::InvalidSetting(key.to_string()));
        }
        self.values.insert(key.to_string(), value.into());
        Ok(())
    }

    /// Apply overrides from a JSON object; unknown keys are added
    pub fn merge_json(&mut self, json: &str) -> Result<()> {
        let overrides: BTreeMap<String, SettingValue> = serde_json::from_str(json)?;
        for (key, value) in overrides {
            self.set(&key, value)?;
        }
        Ok(())
    }

    /// Defaults overridden by the JSON file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let mut settings = Self::default();
        settings.merge_json(&fs::read_to_string(path)?)?;
        Ok(settings)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// One `#define KEY value` line per setting
    pub fn defines(&self) -> String {
        self.values
            .iter()
            .map(|(key, value)| format!("#define {} {}\n", key, value.glsl()))
            .collect()
    }
}

/// Apply a JSON object of parameter values (numbers or 3-arrays) to a registry
pub fn apply_params_json(json: &str, registry: &mut Registry) -> Result<usize> {
    let params: BTreeMap<String, Value> = serde_json::from_str(json)?;
    let count = params.len();
    for (key, value) in params {
        registry.set(&key, value)?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn defaults_render_as_defines() {
        let defines = RenderSettings::default().defines();
        assert!(defines.contains("#define ANTIALIASING_SAMPLES 1\n"));
        assert!(defines.contains("#define FOG_ENABLED 0\n"));
        assert!(defines.contains("#define SHADOWS_ENABLED 1\n"));
        assert!(defines.contains("#define MAX_DIST 50.0\n"));
        assert!(defines.contains("#define MIN_DIST 1e-5\n"));
        assert!(defines.contains("#define LIGHT_COLOR vec3(1.0, 0.9, 0.6)\n"));
    }

    #[test]
    fn json_overrides_keep_value_kinds() {
        let mut settings = RenderSettings::default();
        settings
            .merge_json(r#"{ "MAX_MARCHES": 250, "EXPOSURE": 1.5, "FOG_ENABLED": true, "TINT": [1, 0, 0] }"#)
            .unwrap();
        assert_eq!(settings.get("MAX_MARCHES"), Some(SettingValue::Int(250)));
        assert_eq!(settings.get("EXPOSURE"), Some(SettingValue::Float(1.5)));
        assert_eq!(settings.get("FOG_ENABLED"), Some(SettingValue::Bool(true)));
        assert_eq!(settings.get("TINT"), Some(SettingValue::Vec3([1.0, 0.0, 0.0])));
    }

    #[test]
    fn bad_setting_names_are_rejected() {
        let mut settings = RenderSettings::empty();
        assert!(matches!(
            settings.set("NOT A NAME", true),
            Err(Error::InvalidSetting(_))
        ));
        assert!(matches!(
            settings.merge_json("[1, 2]"),
            Err(Error::Settings(_))
        ));
    }

    #[test]
    fn param_files_go_through_registry() {
        let mut reg = Registry::new();
        reg.declare("v", foldspace_core::ParamKind::Vec3).unwrap();
        let n = apply_params_json(r#"{ "0": 0.25, "v": 2.0, "pos": [1, 2, 3] }"#, &mut reg).unwrap();
        assert_eq!(n, 3);
        assert_eq!(reg.get("0"), Some(Value::Float(0.25)));
        assert_eq!(reg.get("v"), Some(Value::Vec3(Vec3::splat(2.0))));
        assert_eq!(reg.get("pos"), Some(Value::Vec3(Vec3::new(1.0, 2.0, 3.0))));
    }
}
