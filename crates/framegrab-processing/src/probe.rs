//! Duration probing via ffprobe.

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

use crate::error::ProbeError;

/// Inspects a video file and reports its duration. Read-only.
#[async_trait]
pub trait DurationProber: Send + Sync {
    /// Return the duration of the video at `video_path` in seconds.
    ///
    /// Fails when the container metadata cannot be parsed or the reported
    /// duration is not positive.
    async fn probe(&self, video_path: &Path) -> Result<f64, ProbeError>;
}

/// Prober shelling out to ffprobe with JSON output.
pub struct FfprobeProber {
    ffprobe_path: String,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: String) -> anyhow::Result<Self> {
        validate_binary_path(&ffprobe_path)?;
        Ok(Self { ffprobe_path })
    }
}

#[async_trait]
impl DurationProber for FfprobeProber {
    #[tracing::instrument(skip(self), fields(
        process.executable.path = %self.ffprobe_path,
    ))]
    async fn probe(&self, video_path: &Path) -> Result<f64, ProbeError> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(video_path)
            .output()
            .await
            .map_err(ProbeError::Spawn)?;

        if !output.status.success() {
            return Err(ProbeError::Decode(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        let probe_data: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| ProbeError::Parse(e.to_string()))?;

        let duration = probe_data["format"]["duration"]
            .as_str()
            .and_then(|d| d.parse::<f64>().ok())
            .ok_or_else(|| ProbeError::Parse("missing format.duration".to_string()))?;

        if !duration.is_finite() || duration <= 0.0 {
            return Err(ProbeError::NonPositiveDuration(duration));
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis() as u64,
            video_duration = duration,
            "Video probe completed"
        );

        Ok(duration)
    }
}

/// Validate that a binary path doesn't contain shell metacharacters.
pub(crate) fn validate_binary_path(path: &str) -> anyhow::Result<()> {
    if !path.chars().all(|c| {
        c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\'
    }) {
        return Err(anyhow::anyhow!(
            "Invalid binary path: contains unsafe characters: {}",
            path
        ));
    }

    if path.contains("..") {
        return Err(anyhow::anyhow!(
            "Invalid binary path: contains directory traversal: {}",
            path
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_binary_path_accepts_plain_names() {
        assert!(validate_binary_path("ffprobe").is_ok());
        assert!(validate_binary_path("/usr/local/bin/ffprobe").is_ok());
    }

    #[test]
    fn test_validate_binary_path_rejects_metacharacters() {
        assert!(validate_binary_path("ffprobe; rm -rf /").is_err());
        assert!(validate_binary_path("ffprobe|cat").is_err());
        assert!(validate_binary_path("../ffprobe").is_err());
    }

    #[tokio::test]
    async fn test_probe_fails_on_unreadable_input() {
        // A file of zero bytes can't carry container metadata; ffprobe is
        // expected to either be absent (spawn error) or report a decode or
        // parse failure. All of those are ProbeError.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.mp4");
        std::fs::write(&path, b"").unwrap();

        let prober = FfprobeProber::new("ffprobe".to_string()).unwrap();
        assert!(prober.probe(&path).await.is_err());
    }
}
