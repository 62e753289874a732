//! Error types for shader assembly

use thiserror::Error;

use crate::backend::Stage;

/// Result type alias using foldspace-shader's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling or compiling a shader
#[derive(Error, Debug)]
pub enum Error {
    /// A splice marker is absent from the template
    #[error("Template is missing the '{0}' marker")]
    MissingMarker(&'static str),

    /// The backend rejected one shader stage
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: Stage, log: String },

    /// The backend failed to link the program
    #[error("Program failed to link:\n{0}")]
    Link(String),

    /// Settings or parameter file could not be parsed
    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    /// A setting name that cannot be used as a preprocessor define
    #[error("Invalid setting name: '{0}'")]
    InvalidSetting(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] foldspace_core::Error),
}
