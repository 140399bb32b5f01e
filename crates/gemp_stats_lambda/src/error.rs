use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of one step of the query, serialize, upload pipeline.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("query `{query}` failed: {message}")]
    Query { query: String, message: String },

    #[error("failed to serialize export document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write scratch file {}: {source}", path.display())]
    WriteScratch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read scratch file {}: {source}", path.display())]
    ReadScratch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to upload {key}: {message}")]
    Upload { key: String, message: String },
}

impl ExportError {
    pub fn step(&self) -> &'static str {
        match self {
            Self::Query { .. } => "run_query",
            Self::Serialize(_) | Self::WriteScratch { .. } => "serialize",
            Self::ReadScratch { .. } | Self::Upload { .. } => "upload",
        }
    }
}
