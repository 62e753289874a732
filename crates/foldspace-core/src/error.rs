//! Error types for foldspace

use thiserror::Error;

use crate::param::ParamKind;

/// Result type alias using foldspace's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or evaluating a pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A registry key was declared or written with a different kind than it already has
    #[error("Parameter '{key}' is {declared:?} but was used as {requested:?}")]
    ParamKindConflict {
        key: String,
        declared: ParamKind,
        requested: ParamKind,
    },

    /// A nearest-point query reached a primitive without a closed-form projection
    #[error("Nearest point is not implemented for {0}")]
    NearestPointUnsupported(&'static str),

    /// A nearest-point query on something with no primitive to project onto
    #[error("'{0}' contains no primitive")]
    NoPrimitive(String),

    /// An orbit step or orbit-colored primitive was appended before any orbit init step
    #[error("'{object}' reads the orbit trap before an orbit init step")]
    OrbitUninitialized { object: String },

    /// A second orbit init step in one object would redeclare the trap
    #[error("'{object}' already has an orbit init step")]
    OrbitRedeclared { object: String },

    /// A literal parameter is NaN and has no shader representation
    #[error("NaN literal parameter")]
    NanLiteral,

    /// A name or key that cannot be used as a generated identifier
    #[error("Invalid identifier: '{0}'")]
    InvalidName(String),

    /// Two distinct objects in one graph share a name
    #[error("Duplicate object name in scene graph: '{0}'")]
    DuplicateName(String),

    /// Requested a scene that is not in the gallery
    #[error("Unknown scene: '{0}'")]
    UnknownScene(String),
}
