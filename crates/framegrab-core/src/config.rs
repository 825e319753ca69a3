//! Configuration module
//!
//! Environment-driven configuration for the API server, storage backends,
//! and the frame-extraction pipeline. Sampling-policy values (interval,
//! fallback window, batch size) are deployment-tunable rather than
//! hardcoded.

use std::env;
use std::time::Duration;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 3000;
const FRAME_INTERVAL_SECS: u64 = 10;
const FALLBACK_SAMPLE_COUNT: usize = 60;
const UPLOAD_BATCH_SIZE: usize = 500;
const FRAME_WIDTH: u32 = 1280;
const FRAME_HEIGHT: u32 = 720;
const PRESIGN_EXPIRY_SECS: u64 = 900;
const PROBE_TIMEOUT_SECS: u64 = 30;
const EXTRACT_TIMEOUT_SECS: u64 = 600;
const MAX_VIDEO_SIZE_GB: u64 = 15;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub presign_expiry_secs: u64,
    // External decoder binaries
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    // Sampling policy
    pub frame_interval_secs: u64,
    pub fallback_sample_count: usize,
    pub frame_width: u32,
    pub frame_height: u32,
    // Upload policy
    pub upload_batch_size: usize,
    pub max_video_size_bytes: u64,
    // Timeouts for external decoder calls
    pub probe_timeout_secs: u64,
    pub extract_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let storage_backend =
            env::var("STORAGE_BACKEND")
                .ok()
                .and_then(|s| match s.to_lowercase().as_str() {
                    "s3" => Some(StorageBackend::S3),
                    "local" => Some(StorageBackend::Local),
                    _ => None,
                });

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            presign_expiry_secs: env::var("PRESIGN_EXPIRY_SECS")
                .unwrap_or_else(|_| PRESIGN_EXPIRY_SECS.to_string())
                .parse()
                .unwrap_or(PRESIGN_EXPIRY_SECS),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            frame_interval_secs: env::var("FRAME_INTERVAL_SECS")
                .unwrap_or_else(|_| FRAME_INTERVAL_SECS.to_string())
                .parse()
                .unwrap_or(FRAME_INTERVAL_SECS),
            fallback_sample_count: env::var("FALLBACK_SAMPLE_COUNT")
                .unwrap_or_else(|_| FALLBACK_SAMPLE_COUNT.to_string())
                .parse()
                .unwrap_or(FALLBACK_SAMPLE_COUNT),
            frame_width: env::var("FRAME_WIDTH")
                .unwrap_or_else(|_| FRAME_WIDTH.to_string())
                .parse()
                .unwrap_or(FRAME_WIDTH),
            frame_height: env::var("FRAME_HEIGHT")
                .unwrap_or_else(|_| FRAME_HEIGHT.to_string())
                .parse()
                .unwrap_or(FRAME_HEIGHT),
            upload_batch_size: env::var("UPLOAD_BATCH_SIZE")
                .unwrap_or_else(|_| UPLOAD_BATCH_SIZE.to_string())
                .parse()
                .unwrap_or(UPLOAD_BATCH_SIZE),
            max_video_size_bytes: env::var("MAX_VIDEO_SIZE_GB")
                .unwrap_or_else(|_| MAX_VIDEO_SIZE_GB.to_string())
                .parse::<u64>()
                .unwrap_or(MAX_VIDEO_SIZE_GB)
                * 1024
                * 1024
                * 1024,
            probe_timeout_secs: env::var("PROBE_TIMEOUT_SECS")
                .unwrap_or_else(|_| PROBE_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(PROBE_TIMEOUT_SECS),
            extract_timeout_secs: env::var("EXTRACT_TIMEOUT_SECS")
                .unwrap_or_else(|_| EXTRACT_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(EXTRACT_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn presign_expiry(&self) -> Duration {
        Duration::from_secs(self.presign_expiry_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn extract_timeout(&self) -> Duration {
        Duration::from_secs(self.extract_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.frame_interval_secs == 0 {
            return Err(anyhow::anyhow!("FRAME_INTERVAL_SECS must be at least 1"));
        }

        if self.fallback_sample_count == 0 {
            return Err(anyhow::anyhow!("FALLBACK_SAMPLE_COUNT must be at least 1"));
        }

        if self.upload_batch_size == 0 {
            return Err(anyhow::anyhow!("UPLOAD_BATCH_SIZE must be at least 1"));
        }

        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(anyhow::anyhow!(
                "FRAME_WIDTH and FRAME_HEIGHT must be at least 1"
            ));
        }

        // Validate storage backend configuration
        let backend = self.storage_backend.unwrap_or(StorageBackend::S3);
        match backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_port: 3000,
            environment: "test".to_string(),
            storage_backend: Some(StorageBackend::Local),
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: Some("/tmp/framegrab".to_string()),
            local_storage_base_url: Some("http://localhost:3000/media".to_string()),
            presign_expiry_secs: 900,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            frame_interval_secs: 10,
            fallback_sample_count: 60,
            frame_width: 1280,
            frame_height: 720,
            upload_batch_size: 500,
            max_video_size_bytes: 15 * 1024 * 1024 * 1024,
            probe_timeout_secs: 30,
            extract_timeout_secs: 600,
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = base_config();
        config.frame_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_batch_size() {
        let mut config = base_config();
        config.upload_batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_s3_bucket() {
        let mut config = base_config();
        config.storage_backend = Some(StorageBackend::S3);
        config.s3_bucket = None;
        assert!(config.validate().is_err());

        config.s3_bucket = Some("frames".to_string());
        config.s3_region = Some("us-east-1".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_local_path() {
        let mut config = base_config();
        config.local_storage_path = None;
        assert!(config.validate().is_err());
    }
}
