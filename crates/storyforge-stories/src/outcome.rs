//! Generation outcomes and errors.

use std::fmt;
use std::path::{Path, PathBuf};

use storyforge_compiler::AssembleError;

use crate::renderer::RenderError;

/// Why an artifact was not generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The regeneration policy declined
    UpToDate,
    /// The component declares no props or slots
    NoArguments,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpToDate => f.write_str("up to date"),
            Self::NoArguments => f.write_str("no props or slots"),
        }
    }
}

/// Result of a successful generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Generated { destination: PathBuf },
    Skipped { destination: PathBuf, reason: SkipReason },
}

impl GenerationOutcome {
    pub fn destination(&self) -> &Path {
        match self {
            Self::Generated { destination } | Self::Skipped { destination, .. } => destination,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated { .. })
    }
}

/// A document that could not be turned into its persisted text.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error(transparent)]
    Document(#[from] AssembleError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while generating artifacts.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Failed to serialize stories for {destination}: {source}")]
    Serialization {
        destination: PathBuf,
        #[source]
        source: SerializationError,
    },

    #[error("Failed to render stories for {destination}: {source}")]
    Render {
        destination: PathBuf,
        #[source]
        source: RenderError,
    },

    #[error("Failed to write {destination}: {source}")]
    Write {
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read metadata of {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to prepare stories directory {path}: {source}")]
    StoriesDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid template path for the stories \"{0}\"")]
    InvalidTemplatePath(PathBuf),

    #[error("Invalid template name for the stories \"{0}\": paths outside the application root are not allowed")]
    OutsideRoot(PathBuf),
}
