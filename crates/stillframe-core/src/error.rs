//! Error kinds for the thumbnail pipeline.
//!
//! Each pipeline stage converts its failure into exactly one of these kinds
//! at the stage boundary; the kind then propagates unmodified to the request
//! handler, which renders it into the failure envelope. Nothing is retried
//! and nothing escapes the handler.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// The request payload is missing or has empty required fields.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The source object could not be read from the object store.
    #[error("failed to read source object: {0}")]
    StorageRead(String),

    /// The thumbnail could not be written to the object store.
    #[error("failed to write thumbnail object: {0}")]
    StorageWrite(String),

    /// A staged file could not be written to the local filesystem.
    #[error("failed to write staged file: {0}")]
    LocalWrite(String),

    /// ffprobe could not read stream metadata from the staged video.
    #[error("failed to probe video: {0}")]
    Probe(String),

    /// ffmpeg could not render the thumbnail frame.
    #[error("failed to extract frame: {0}")]
    Extraction(String),
}

impl ThumbnailError {
    /// Stable kind name, used in the failure envelope and in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ThumbnailError::Validation(_) => "ValidationError",
            ThumbnailError::StorageRead(_) => "StorageReadError",
            ThumbnailError::StorageWrite(_) => "StorageWriteError",
            ThumbnailError::LocalWrite(_) => "LocalWriteError",
            ThumbnailError::Probe(_) => "ProbeError",
            ThumbnailError::Extraction(_) => "ExtractionError",
        }
    }

    /// True when the fault lies with the request rather than the pipeline.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, ThumbnailError::Validation(_))
    }
}
