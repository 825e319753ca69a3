//! Framegrab Processing Library
//!
//! The frame-extraction pipeline: duration probing, sampling-schedule
//! computation, ffmpeg frame extraction, batched frame upload, and the
//! orchestrator that ties them together with guaranteed cleanup of all
//! working resources.

pub mod error;
pub mod extract;
pub mod pipeline;
pub mod probe;
pub mod schedule;
pub mod uploader;

// Re-export commonly used types
pub use error::{ExtractError, PipelineError, ProbeError, UploadError};
pub use extract::{FfmpegExtractor, FrameExtractor};
pub use pipeline::{FramePipeline, PipelineConfig, PipelineOptions};
pub use probe::{DurationProber, FfprobeProber};
pub use schedule::{SamplePolicy, SampleSchedule};
pub use uploader::BatchUploader;
