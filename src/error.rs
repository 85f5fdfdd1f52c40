//! Defines the toolbox's primary error type `ToolboxError` and a convenience `Result` alias.
//!
//! Uses the `thiserror` crate for ergonomic error definition and provides `From`
//! implementations to convert common external errors into `ToolboxError` variants.
//! Errors that do not implement `Clone` are wrapped in `Arc` to allow `ToolboxError` to be cloneable.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// The primary error enumeration for everything the toolbox can report.
#[derive(Error, Debug, Clone)]
pub enum ToolboxError {
    /// Error related to standard I/O operations on the session streams.
    #[error("I/O Error: {0}")]
    Io(Arc<std::io::Error>),

    /// The input stream reached end-of-file while a line was expected.
    #[error("Input stream closed")]
    InputClosed,

    /// The capability module file does not exist.
    #[error("Module not found: {}", .0.display())]
    ModuleNotFound(PathBuf),

    /// The interpreter ran but could not import the capability module.
    #[error("failed to load module {}: {message}", .path.display())]
    ModuleLoad { path: PathBuf, message: String },

    /// The interpreter itself could not be started.
    #[error("failed to launch '{interpreter}': {error}")]
    Launch {
        interpreter: String,
        error: Arc<std::io::Error>,
    },

    /// The module operation ran and exited unsuccessfully.
    #[error("{function} exited with {status}")]
    Operation {
        function: String,
        status: String,
        stderr: Option<String>,
    },

    /// Error related to progress spinner style templating (`indicatif`).
    #[error("Progress Style Template Error: {0}")]
    Template(Arc<indicatif::style::TemplateError>),
}

impl ToolboxError {
    /// Standard-error text captured from a failed operation, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            ToolboxError::Operation { stderr, .. } => stderr.as_deref(),
            _ => None,
        }
    }
}

/// A specialized `Result` type using the toolbox's `ToolboxError`.
pub type Result<T> = std::result::Result<T, ToolboxError>;

// --- From implementations ---

impl From<std::io::Error> for ToolboxError {
    fn from(err: std::io::Error) -> Self {
        ToolboxError::Io(Arc::new(err))
    }
}

impl From<indicatif::style::TemplateError> for ToolboxError {
    fn from(err: indicatif::style::TemplateError) -> Self {
        ToolboxError::Template(Arc::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_error_exposes_captured_stderr() {
        let err = ToolboxError::Operation {
            function: "Remove-Accounts".to_string(),
            status: "exit status: 1".to_string(),
            stderr: Some("Access is denied".to_string()),
        };
        assert_eq!(err.stderr(), Some("Access is denied"));
        assert_eq!(err.to_string(), "Remove-Accounts exited with exit status: 1");
    }

    #[test]
    fn launch_error_has_no_stderr() {
        let err = ToolboxError::Launch {
            interpreter: "pwsh".to_string(),
            error: Arc::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "program not found",
            )),
        };
        assert!(err.stderr().is_none());
        assert!(err.to_string().contains("failed to launch 'pwsh'"));
    }
}
