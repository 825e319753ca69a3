//! Framegrab Core Library
//!
//! This crate provides the domain models, configuration, and shared types
//! used across all framegrab components.

pub mod config;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use models::{AnalysisReport, FrameArtifact, FrameObservation, VideoSource};
pub use models::FRAME_CONTENT_TYPE;
pub use storage_types::StorageBackend;
