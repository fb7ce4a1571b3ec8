use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read source document {}: {source}", .path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String, reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ScaffoldError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScaffoldError::InputRead { .. } => 3,
            ScaffoldError::CreateDirectory { .. } | ScaffoldError::WriteFile { .. } => 4,
            ScaffoldError::InvalidPath { .. } => 5,
            _ => 1,
        }
    }

    /// Path of the file or directory the error is about, if any.
    pub fn path(&self) -> Option<String> {
        match self {
            ScaffoldError::InputRead { path, .. }
            | ScaffoldError::CreateDirectory { path, .. }
            | ScaffoldError::WriteFile { path, .. } => Some(path.display().to_string()),
            ScaffoldError::InvalidPath { path, .. } => Some(path.clone()),
            _ => None,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ScaffoldError {
    fn user_message(&self) -> String {
        match self {
            ScaffoldError::InputRead { path, source } => {
                format!("Cannot read source document {}: {}", path.display(), source)
            }
            ScaffoldError::CreateDirectory { path, source } => {
                format!("Cannot create directory {}: {}", path.display(), source)
            }
            ScaffoldError::WriteFile { path, source } => {
                format!("Cannot write file {}: {}", path.display(), source)
            }
            ScaffoldError::InvalidPath { path, reason } => {
                format!("Refusing to write {}: {}", path, reason)
            }
            ScaffoldError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ScaffoldError::InputRead { .. } => Some(
                "Run from the directory containing the pattern document or pass its location with --input.".to_string()
            ),
            ScaffoldError::CreateDirectory { .. } | ScaffoldError::WriteFile { .. } => Some(
                "Check write permissions and that no directory occupies the target path, then rerun. Files written before the failure were kept.".to_string()
            ),
            ScaffoldError::InvalidPath { .. } => Some(
                "Labeled paths must be relative and stay inside the output directory; fix the path in the document.".to_string()
            ),
            ScaffoldError::Config { .. } => Some(
                "Check your configuration file syntax or regenerate one with --generate-config.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ScaffoldError {
    fn from(error: toml::de::Error) -> Self {
        ScaffoldError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;
