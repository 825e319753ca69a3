//! Domain models shared across the pipeline.

use serde::Serialize;
use std::path::PathBuf;

/// MIME type of every extracted frame. The extractor always emits JPEG.
pub const FRAME_CONTENT_TYPE: &str = "image/jpeg";

/// One extracted still frame on local disk, pending upload.
///
/// Artifacts live inside a working frame directory owned by a single
/// pipeline invocation; the path is invalid once that invocation ends.
#[derive(Clone, Debug)]
pub struct FrameArtifact {
    pub path: PathBuf,
    /// Zero-based position in the sample schedule.
    pub index: usize,
    /// Sample timestamp this frame was captured at, in whole seconds.
    pub timestamp_secs: u64,
    pub size_bytes: u64,
    pub content_type: &'static str,
}

impl FrameArtifact {
    /// File name of the artifact inside its working directory.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Source video handed to the pipeline entry point.
#[derive(Clone, Debug)]
pub enum VideoSource {
    /// Raw bytes plus the uploader-supplied display name.
    Bytes { data: Vec<u8>, filename: String },
    /// A video already persisted in the content store under this key.
    Stored { key: String },
}

/// Per-frame observation from the analysis stage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameObservation {
    pub frame_key: String,
    pub detected: bool,
    pub confidence: f64,
}

/// Aggregate brand-exposure report over a frame set.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub total_exposure_secs: u64,
    pub exposure_percentage: f64,
    pub frames: Vec<FrameObservation>,
}
