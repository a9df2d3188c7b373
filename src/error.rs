//! Error taxonomy for scanning and module metadata extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the scanning engine.
#[derive(Error, Debug)]
pub enum ScanError {
    /// A root or file path does not exist or cannot be read.
    #[error("cannot access {}: {source}", path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file is not valid Go.
    #[error("parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// The build toolchain program could not be located.
    #[error("toolchain program {program:?} not found in PATH")]
    ToolchainNotFound { program: String },

    /// The build toolchain ran but failed.
    #[error("toolchain command failed: {0}")]
    Toolchain(String),

    /// Manifest output was malformed or missing required fields.
    #[error("cannot decode module manifest: {0}")]
    Decode(String),

    /// Invalid scan configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ScanError {
    pub(crate) fn path(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::Path {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ScanError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True for errors that only affect a single file during a directory scan.
    pub fn is_file_local(&self) -> bool {
        matches!(self, ScanError::Parse { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
