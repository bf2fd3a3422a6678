// File: ./src/error.rs
// Failure taxonomy shared by every planner operation.
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Setting '{setting}' is not configured")]
    ConfigMissing { setting: &'static str },

    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unexpected structure in {}: {detail}", path.display())]
    MalformedStructure { path: PathBuf, detail: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type PlannerResult<T> = Result<T, PlannerError>;

impl PlannerError {
    /// Wraps an I/O error, turning `NotFound` into the dedicated variant.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == std::io::ErrorKind::NotFound {
            PlannerError::NotFound(path)
        } else {
            PlannerError::Io { path, source }
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        PlannerError::InvalidInput(msg.into())
    }

    /// Short category name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            PlannerError::ConfigMissing { .. } => "configuration-missing",
            PlannerError::NotFound(_) => "not-found",
            PlannerError::MalformedStructure { .. } => "malformed-structure",
            PlannerError::InvalidInput(_) => "invalid-input",
            PlannerError::AlreadyExists(_) => "already-exists",
            PlannerError::Io { .. } => "io",
            PlannerError::Config(_) => "config",
        }
    }
}

/// Extension trait to attach the failing path to raw `io::Result`s.
pub trait IoContext<T> {
    fn at(self, path: impl AsRef<Path>) -> PlannerResult<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: impl AsRef<Path>) -> PlannerResult<T> {
        self.map_err(|e| PlannerError::io(path, e))
    }
}
