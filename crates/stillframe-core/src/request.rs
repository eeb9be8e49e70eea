//! Inbound request model and destination-key derivation.

use crate::error::ThumbnailError;
use serde::Deserialize;

/// Suffix that replaces the source key's extension on the derived key.
pub const THUMBNAIL_SUFFIX: &str = "_thumbnail.jpg";

/// A request to generate a thumbnail for one video object.
#[derive(Debug, Clone, Deserialize)]
pub struct ThumbnailRequest {
    pub bucket: String,
    pub filepath: String,
}

impl ThumbnailRequest {
    /// Parse a request from an inbound JSON payload. The payload may be the
    /// request object itself, or a JSON string wrapping it (some invokers
    /// deliver the body pre-serialized).
    pub fn parse(payload: &serde_json::Value) -> Result<Self, ThumbnailError> {
        let request: ThumbnailRequest = match payload {
            serde_json::Value::String(raw) => serde_json::from_str(raw)
                .map_err(|e| ThumbnailError::Validation(format!("malformed request body: {e}")))?,
            value => serde_json::from_value(value.clone())
                .map_err(|e| ThumbnailError::Validation(format!("malformed request body: {e}")))?,
        };
        request.validate()?;
        Ok(request)
    }

    fn validate(&self) -> Result<(), ThumbnailError> {
        if self.bucket.trim().is_empty() {
            return Err(ThumbnailError::Validation(
                "missing required field: bucket".to_string(),
            ));
        }
        if self.filepath.trim().is_empty() {
            return Err(ThumbnailError::Validation(
                "missing required field: filepath".to_string(),
            ));
        }
        Ok(())
    }
}

/// Derive the destination key from a source key by replacing its file
/// extension with [`THUMBNAIL_SUFFIX`]. Keys without an extension in their
/// final path segment get the suffix appended. The result never equals the
/// source key.
pub fn thumbnail_key(source_key: &str) -> String {
    let segment_start = source_key.rfind('/').map_or(0, |idx| idx + 1);
    let stem_end = match source_key.rfind('.') {
        // A leading dot in the final segment is a hidden file, not an extension.
        Some(idx) if idx > segment_start => idx,
        _ => source_key.len(),
    };
    format!("{}{}", &source_key[..stem_end], THUMBNAIL_SUFFIX)
}
