//! Script bridge errors
//!
//! `InitError` is fatal to the context it came from. `CallError` only fails
//! the one call; the render loop carries on next frame.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to create script runtime: {0}")]
    Runtime(#[from] rquickjs::Error),

    #[error("cannot read boot script {path}: {source}")]
    BootScriptUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("boot script {path} failed: {message}")]
    BootFailed { path: PathBuf, message: String },

    #[error("script context was already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("script context is not ready")]
    NotReady,

    #[error("entry point `{path}` is missing")]
    MissingEntryPoint { path: String },

    #[error("`{entry_point}` raised: {message}")]
    Raised { entry_point: String, message: String },
}

impl CallError {
    pub(crate) fn missing(path: &[&str]) -> Self {
        CallError::MissingEntryPoint {
            path: path.join("."),
        }
    }

    pub(crate) fn raised(path: &[&str], message: impl fmt::Display) -> Self {
        CallError::Raised {
            entry_point: path.join("."),
            message: message.to_string(),
        }
    }
}
