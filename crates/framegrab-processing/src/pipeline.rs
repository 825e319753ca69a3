//! Pipeline orchestration: persist source video, derive frames, upload
//! them, clean up.
//!
//! Every local resource created during a run (the working video file and
//! the working frame directory) is owned by that invocation and removed on
//! every exit path. Cleanup failures are logged and never mask a pipeline
//! error.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::StreamExt;
use rand::{distr::Alphanumeric, Rng};
use tokio::io::AsyncWriteExt;

use framegrab_core::{Config, FrameArtifact, VideoSource};
use framegrab_storage::{keys, ContentStore, StorageError};

use crate::error::{ExtractError, PipelineError, ProbeError};
use crate::extract::{FfmpegExtractor, FrameExtractor};
use crate::probe::{DurationProber, FfprobeProber};
use crate::schedule::{SamplePolicy, SampleSchedule};
use crate::uploader::BatchUploader;

const SOURCE_CONTENT_TYPE: &str = "video/mp4";

/// Tunables for one pipeline instance.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub interval_secs: u64,
    pub fallback_sample_count: usize,
    pub upload_batch_size: usize,
    pub presign_expiry: Duration,
    /// Bound on the duration probe; a timeout is treated as a probe failure.
    pub probe_timeout: Option<Duration>,
    /// Bound on frame extraction; a timeout is fatal.
    pub extract_timeout: Option<Duration>,
    /// Directory working files are allocated under.
    pub temp_root: PathBuf,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval_secs: config.frame_interval_secs,
            fallback_sample_count: config.fallback_sample_count,
            upload_batch_size: config.upload_batch_size,
            presign_expiry: config.presign_expiry(),
            probe_timeout: Some(config.probe_timeout()),
            extract_timeout: Some(config.extract_timeout()),
            temp_root: std::env::temp_dir(),
        }
    }
}

/// Per-call options.
#[derive(Clone, Copy, Debug, Default)]
pub struct PipelineOptions {
    pub interval_override: Option<u64>,
}

/// Orchestrates the full frame pipeline for one video: persist-then-fetch
/// the source, probe its duration (with fallback), extract frames, upload
/// them in batches, and clean up all working resources.
pub struct FramePipeline {
    store: Arc<dyn ContentStore>,
    prober: Arc<dyn DurationProber>,
    extractor: Arc<dyn FrameExtractor>,
    uploader: BatchUploader,
    http: reqwest::Client,
    config: PipelineConfig,
}

impl FramePipeline {
    pub fn new(
        store: Arc<dyn ContentStore>,
        prober: Arc<dyn DurationProber>,
        extractor: Arc<dyn FrameExtractor>,
        config: PipelineConfig,
    ) -> Self {
        let uploader = BatchUploader::new(config.upload_batch_size);
        Self {
            store,
            prober,
            extractor,
            uploader,
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Build a pipeline with the ffprobe/ffmpeg collaborators from
    /// application configuration.
    pub fn from_config(config: &Config, store: Arc<dyn ContentStore>) -> anyhow::Result<Self> {
        let prober = FfprobeProber::new(config.ffprobe_path.clone())?;
        let extractor = FfmpegExtractor::new(
            config.ffmpeg_path.clone(),
            config.frame_width,
            config.frame_height,
        )?;
        Ok(Self::new(
            store,
            Arc::new(prober),
            Arc::new(extractor),
            PipelineConfig::from_config(config),
        ))
    }

    /// Run the full pipeline for one video.
    ///
    /// Returns the durable frame keys in timestamp order, or the first
    /// fatal error. Probe failures are recovered via the fallback sampling
    /// policy and never surface here.
    pub async fn process(
        &self,
        source: VideoSource,
        options: PipelineOptions,
    ) -> Result<Vec<String>, PipelineError> {
        let video_key = match source {
            VideoSource::Bytes { data, filename } => {
                let key = keys::video_key(Utc::now().timestamp_millis(), &filename);
                tracing::info!(key = %key, size_bytes = data.len(), "Persisting source video");
                self.store
                    .put(&key, data, SOURCE_CONTENT_TYPE)
                    .await
                    .map_err(PipelineError::Store)?
            }
            VideoSource::Stored { key } => key,
        };

        let interval_secs = options
            .interval_override
            .unwrap_or(self.config.interval_secs)
            .max(1);

        // From here on a cleanup obligation exists for the working set.
        let work = WorkingSet::allocate(&self.config.temp_root);
        let result = self.run(&video_key, interval_secs, &work).await;
        work.cleanup().await;

        result
    }

    async fn run(
        &self,
        video_key: &str,
        interval_secs: u64,
        work: &WorkingSet,
    ) -> Result<Vec<String>, PipelineError> {
        self.materialize(video_key, &work.video_path).await?;

        let policy = SamplePolicy::new(interval_secs, self.config.fallback_sample_count);
        let timestamps = self.sample_schedule(&policy, &work.video_path).await;

        if timestamps.is_empty() {
            // Shorter than one interval: zero frames is a valid outcome.
            tracing::info!(video_key = %video_key, "Sample schedule is empty, nothing to extract");
            return Ok(Vec::new());
        }

        tokio::fs::create_dir_all(&work.frame_dir)
            .await
            .map_err(ExtractError::Io)?;

        let artifacts = self
            .extract_frames(&work.video_path, &timestamps, &work.frame_dir)
            .await?;

        // One timestamp for the whole run so the frame set shares a prefix.
        let run_ms = Utc::now().timestamp_millis();
        let items: Vec<(String, FrameArtifact)> = artifacts
            .into_iter()
            .map(|artifact| (keys::frame_key(run_ms, &artifact.file_name()), artifact))
            .collect();

        tracing::info!(frame_count = items.len(), "Uploading extracted frames");
        let frame_keys = self.uploader.upload_all(&self.store, items).await?;

        tracing::info!(
            video_key = %video_key,
            frame_count = frame_keys.len(),
            "Frame pipeline completed"
        );

        Ok(frame_keys)
    }

    /// Materialize the durable video into the working file.
    ///
    /// The store hands out a time-limited URL rather than bytes, so the
    /// fetch is performed here and streamed to disk.
    async fn materialize(&self, video_key: &str, video_path: &Path) -> Result<(), PipelineError> {
        let url = self
            .store
            .presigned_get_url(video_key, self.config.presign_expiry)
            .await
            .map_err(PipelineError::Store)?;

        let response = self.http.get(&url).send().await.map_err(|e| {
            PipelineError::Store(StorageError::DownloadFailed(format!(
                "Failed to fetch video: {}",
                e
            )))
        })?;

        if !response.status().is_success() {
            return Err(PipelineError::Store(StorageError::DownloadFailed(format!(
                "Failed to fetch video: HTTP {}",
                response.status()
            ))));
        }

        let mut file = tokio::fs::File::create(video_path)
            .await
            .map_err(|e| PipelineError::Store(StorageError::IoError(e)))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                PipelineError::Store(StorageError::DownloadFailed(format!(
                    "Failed to read video stream: {}",
                    e
                )))
            })?;
            file.write_all(&chunk)
                .await
                .map_err(|e| PipelineError::Store(StorageError::IoError(e)))?;
        }

        file.flush()
            .await
            .map_err(|e| PipelineError::Store(StorageError::IoError(e)))?;

        tracing::debug!(
            key = %video_key,
            path = %video_path.display(),
            "Working video materialized"
        );

        Ok(())
    }

    /// Probe the working video and compute the schedule, falling back to
    /// the fixed window when probing fails. The probe error is absorbed.
    async fn sample_schedule(&self, policy: &SamplePolicy, video_path: &Path) -> SampleSchedule {
        match self.probe_whole_seconds(video_path).await {
            Ok(duration_secs) => {
                tracing::info!(duration_secs, "Probed video duration");
                policy.schedule(duration_secs)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Duration probe failed, using fallback sampling window"
                );
                policy.fallback_schedule()
            }
        }
    }

    async fn probe_whole_seconds(&self, video_path: &Path) -> Result<u64, ProbeError> {
        let duration = match self.config.probe_timeout {
            Some(limit) => tokio::time::timeout(limit, self.prober.probe(video_path))
                .await
                .map_err(|_| ProbeError::Timeout(limit))??,
            None => self.prober.probe(video_path).await?,
        };

        let whole = duration.floor() as u64;
        if whole == 0 {
            return Err(ProbeError::NonPositiveDuration(duration));
        }
        Ok(whole)
    }

    async fn extract_frames(
        &self,
        video_path: &Path,
        timestamps: &[u64],
        output_dir: &Path,
    ) -> Result<Vec<FrameArtifact>, ExtractError> {
        match self.config.extract_timeout {
            Some(limit) => tokio::time::timeout(
                limit,
                self.extractor.extract(video_path, timestamps, output_dir),
            )
            .await
            .map_err(|_| ExtractError::Timeout(limit))?,
            None => self.extractor.extract(video_path, timestamps, output_dir).await,
        }
    }
}

/// Local working resources owned by a single pipeline invocation.
///
/// Paths are uniquified with a millisecond timestamp and a random suffix so
/// concurrent invocations on the same host never collide.
struct WorkingSet {
    video_path: PathBuf,
    frame_dir: PathBuf,
}

impl WorkingSet {
    fn allocate(temp_root: &Path) -> Self {
        let unix_ms = Utc::now().timestamp_millis();
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();

        Self {
            video_path: temp_root.join(format!("video-{}-{}.mp4", unix_ms, suffix)),
            frame_dir: temp_root.join(format!("frames-{}-{}", unix_ms, suffix)),
        }
    }

    /// Remove both working resources. Failures are logged, never raised.
    async fn cleanup(&self) {
        if let Err(e) = tokio::fs::remove_file(&self.video_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.video_path.display(),
                    error = %e,
                    "Failed to remove working video file"
                );
            }
        }

        if let Err(e) = tokio::fs::remove_dir_all(&self.frame_dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.frame_dir.display(),
                    error = %e,
                    "Failed to remove working frame directory"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_set_paths_are_unique() {
        let root = std::env::temp_dir();
        let a = WorkingSet::allocate(&root);
        let b = WorkingSet::allocate(&root);
        assert_ne!(a.video_path, b.video_path);
        assert_ne!(a.frame_dir, b.frame_dir);
    }

    #[tokio::test]
    async fn test_cleanup_tolerates_missing_resources() {
        let root = tempfile::tempdir().unwrap();
        let work = WorkingSet::allocate(root.path());
        // Nothing was ever created; cleanup must not panic or error.
        work.cleanup().await;
    }
}
