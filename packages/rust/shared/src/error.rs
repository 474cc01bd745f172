//! Error types for pipeverb.
//!
//! Library crates use [`PipeVerbError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all pipeverb operations.
#[derive(Debug, thiserror::Error)]
pub enum PipeVerbError {
    /// No specialization of a verb matches the runtime type of its input.
    #[error("{verb} is not implemented for data of type {type_name}")]
    Unimplemented { verb: String, type_name: String },

    /// A value of a type that was never pipe-enabled was used as a pipe source.
    #[error("values of type {type_name} are not pipe-enabled")]
    NotPipeable { type_name: String },

    /// A pipeline step names a verb that is not in the registry.
    #[error("unknown verb: {0}")]
    UnknownVerb(String),

    /// Missing or ill-typed argument supplied to a verb.
    #[error("argument error: {message}")]
    Argument { message: String },

    /// A datum was unwrapped as the wrong concrete type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Input parsing error (JSON input, step syntax).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (ragged rows, unknown column, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PipeVerbError>;

impl PipeVerbError {
    /// Create an unimplemented-operation error for `verb` on `type_name`.
    pub fn unimplemented(verb: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::Unimplemented {
            verb: verb.into(),
            type_name: type_name.into(),
        }
    }

    /// Create an argument error from any displayable message.
    pub fn argument(msg: impl Into<String>) -> Self {
        Self::Argument {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
