//! Error types for acdc-viz

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModeError>;

#[derive(Error, Debug)]
pub enum ModeError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot {path}: {message}")]
    MalformedSnapshot { path: PathBuf, message: String },

    #[error("component {component} in {path}: {reason}")]
    ComponentParse {
        path: PathBuf,
        component: String,
        reason: String,
    },
}

impl ModeError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            ModeError::Io { path, .. }
            | ModeError::MalformedSnapshot { path, .. }
            | ModeError::ComponentParse { path, .. } => path,
        }
    }
}
