//! Error types
//!
//! `ConfigError` is raised while building the runtime objects, before any
//! file is touched. `ProcessingError` is the single failure surface of a
//! processing call.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A chunk failed while its words were being filtered
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("chunk {index} failed: {cause}")]
pub struct ChunkError {
    /// Position of the chunk in the word stream
    pub index: usize,
    /// Description of the underlying fault
    pub cause: String,
}

/// Failure of a `process_file` call
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// The line source could not open or read the file
    #[error("cannot read '{}'", .path.display())]
    SourceAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Filtering one of the chunks failed
    #[error("processing '{}' failed at chunk {}", .path.display(), .source.index)]
    ChunkProcessing {
        path: PathBuf,
        #[source]
        source: ChunkError,
    },

    /// The caller cancelled the operation
    #[error("processing '{}' was cancelled", .path.display())]
    Cancelled { path: PathBuf },
}

/// Discriminant of a [`ProcessingError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SourceAccess,
    ChunkProcessing,
    Cancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::SourceAccess => "source access",
            ErrorKind::ChunkProcessing => "chunk processing",
            ErrorKind::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

impl ProcessingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessingError::SourceAccess { .. } => ErrorKind::SourceAccess,
            ProcessingError::ChunkProcessing { .. } => ErrorKind::ChunkProcessing,
            ProcessingError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Path of the file being processed
    pub fn path(&self) -> &Path {
        match self {
            ProcessingError::SourceAccess { path, .. }
            | ProcessingError::ChunkProcessing { path, .. }
            | ProcessingError::Cancelled { path } => path,
        }
    }

    /// Index of the failing chunk, for chunk failures only
    pub fn chunk_index(&self) -> Option<usize> {
        match self {
            ProcessingError::ChunkProcessing { source, .. } => Some(source.index),
            _ => None,
        }
    }

    /// True when the file does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ProcessingError::SourceAccess { source, .. } if source.kind() == io::ErrorKind::NotFound
        )
    }
}

/// Invalid settings, detected at construction time
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("filter letter must be a letter or digit, got '{0}'")]
    InvalidLetter(String),

    #[error("invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("cannot read settings file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed settings file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
