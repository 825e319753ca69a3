//! Error types for the frame pipeline.
//!
//! Exactly one of `Store`, `Extract`, or `Upload` can escape a pipeline
//! invocation. `ProbeError` is recovered internally via the fallback
//! sampling policy, and cleanup failures are logged, never raised.

use std::time::Duration;
use thiserror::Error;

use framegrab_storage::StorageError;

/// Duration probing failure. Never fatal to the pipeline.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to execute ffprobe: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("ffprobe exited with an error: {0}")]
    Decode(String),

    #[error("could not parse ffprobe output: {0}")]
    Parse(String),

    #[error("reported duration is not positive: {0}")]
    NonPositiveDuration(f64),

    #[error("probe timed out after {0:?}")]
    Timeout(Duration),
}

/// Frame-decoding failure. Fatal to the pipeline.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to execute ffmpeg: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("ffmpeg failed at {timestamp_secs}s: {stderr}")]
    Decode { timestamp_secs: u64, stderr: String },

    #[error("expected output frame missing: {0}")]
    MissingOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction timed out after {0:?}")]
    Timeout(Duration),
}

/// Frame-group upload failure. Fatal; frames from groups completed before
/// the failure remain persisted.
#[derive(Debug, Error)]
#[error("failed to upload frame {key}: {source}")]
pub struct UploadError {
    pub key: String,
    #[source]
    pub source: StorageError,
}

/// The single error class a pipeline invocation can surface.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("content store operation failed: {0}")]
    Store(#[from] StorageError),

    #[error("frame extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("frame upload failed: {0}")]
    Upload(#[from] UploadError),
}
