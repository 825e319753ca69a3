//! Frame extraction via ffmpeg.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use framegrab_core::{FrameArtifact, FRAME_CONTENT_TYPE};

use crate::error::ExtractError;
use crate::probe::validate_binary_path;

/// External capability that samples a video at given timestamps into image
/// files.
#[async_trait]
pub trait FrameExtractor: Send + Sync {
    /// Produce one JPEG per timestamp into `output_dir`, named
    /// `frame-<n>.jpg` with `n` starting at 1 in timestamp order. The
    /// returned artifacts preserve timestamp order.
    async fn extract(
        &self,
        video_path: &Path,
        timestamps: &[u64],
        output_dir: &Path,
    ) -> Result<Vec<FrameArtifact>, ExtractError>;
}

/// Extractor shelling out to ffmpeg, one seek-and-grab per timestamp.
///
/// The ffmpeg binary path is injected configuration; nothing here touches
/// process-global state.
pub struct FfmpegExtractor {
    ffmpeg_path: String,
    frame_width: u32,
    frame_height: u32,
}

impl FfmpegExtractor {
    pub fn new(ffmpeg_path: String, frame_width: u32, frame_height: u32) -> anyhow::Result<Self> {
        validate_binary_path(&ffmpeg_path)?;
        Ok(Self {
            ffmpeg_path,
            frame_width,
            frame_height,
        })
    }

    async fn grab_frame(
        &self,
        video_path: &Path,
        timestamp_secs: u64,
        output_path: &Path,
    ) -> Result<(), ExtractError> {
        let seek = timestamp_secs.to_string();
        let scale = format!("scale={}:{}", self.frame_width, self.frame_height);

        let output = Command::new(&self.ffmpeg_path)
            .args(["-y", "-ss", seek.as_str(), "-i"])
            .arg(video_path)
            .args(["-frames:v", "1", "-vf", scale.as_str(), "-q:v", "2"])
            .arg(output_path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(ExtractError::Spawn)?;

        if !output.status.success() {
            return Err(ExtractError::Decode {
                timestamp_secs,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl FrameExtractor for FfmpegExtractor {
    async fn extract(
        &self,
        video_path: &Path,
        timestamps: &[u64],
        output_dir: &Path,
    ) -> Result<Vec<FrameArtifact>, ExtractError> {
        let start = std::time::Instant::now();
        let mut artifacts = Vec::with_capacity(timestamps.len());

        for (index, &timestamp_secs) in timestamps.iter().enumerate() {
            let file_name = format!("frame-{}.jpg", index + 1);
            let output_path = output_dir.join(&file_name);

            self.grab_frame(video_path, timestamp_secs, &output_path)
                .await?;

            // A seek past the end of the stream can exit cleanly without
            // writing anything; treat that as a decode failure.
            let metadata = tokio::fs::metadata(&output_path)
                .await
                .map_err(|_| ExtractError::MissingOutput(file_name.clone()))?;

            tracing::debug!(
                frame = %file_name,
                timestamp_secs = timestamp_secs,
                size_bytes = metadata.len(),
                "Frame written"
            );

            artifacts.push(FrameArtifact {
                path: output_path,
                index,
                timestamp_secs,
                size_bytes: metadata.len(),
                content_type: FRAME_CONTENT_TYPE,
            });
        }

        tracing::info!(
            frame_count = artifacts.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Frame extraction completed"
        );

        Ok(artifacts)
    }
}
