use shared::ConfigError;
use std::path::PathBuf;

pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    /// Validation, detection or swap failure reported by the session.
    pub const SESSION: i32 = 1;
    pub const CONFIG: i32 = 2;
    pub const IO: i32 = 3;
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
    #[error("{0}")]
    Session(String),
    #[error("{count} faces detected; pass --face <1-{count}> to choose one")]
    FaceSelectionRequired { count: usize },
    #[error("Face {requested} does not exist ({available} detected)")]
    NoSuchFace { requested: usize, available: usize },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ReadFile { .. } | CliError::WriteFile { .. } => exit_codes::IO,
            CliError::Config(_) | CliError::Client(_) => exit_codes::CONFIG,
            CliError::Session(_)
            | CliError::FaceSelectionRequired { .. }
            | CliError::NoSuchFace { .. } => exit_codes::SESSION,
        }
    }
}

impl From<shared::SessionError> for CliError {
    fn from(err: shared::SessionError) -> Self {
        CliError::Session(err.to_string())
    }
}
