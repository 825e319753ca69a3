//! Upload endpoints: source videos and brand reference images.

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use framegrab_core::{AnalysisReport, VideoSource};
use framegrab_processing::PipelineOptions;
use framegrab_storage::keys;

use crate::error::HttpError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VideoUploadQuery {
    /// Override for the sampling interval, in seconds.
    pub interval: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoUploadResponse {
    pub video_file_name: String,
    pub frame_file_names: Vec<String>,
    pub analysis_result: AnalysisReport,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandImageResponse {
    pub file_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub video_file_name: String,
    pub analysis_result: AnalysisReport,
}

struct UploadedFile {
    data: Vec<u8>,
    filename: String,
    content_type: String,
}

/// Pull the `file` field (and optional named text fields) out of a
/// multipart payload.
async fn read_multipart(
    mut multipart: Multipart,
    text_field: &str,
) -> Result<(UploadedFile, Option<String>), HttpError> {
    let mut file: Option<UploadedFile> = None;
    let mut text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| HttpError::BadRequest(format!("Failed to read file: {}", e)))?;
                file = Some(UploadedFile {
                    data: data.to_vec(),
                    filename,
                    content_type,
                });
            }
            Some(name) if name == text_field => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| HttpError::BadRequest(format!("Failed to read field: {}", e)))?;
                if !value.is_empty() {
                    text = Some(value);
                }
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| HttpError::BadRequest("Missing 'file' field".to_string()))?;
    if file.data.is_empty() {
        return Err(HttpError::BadRequest("Uploaded file is empty".to_string()));
    }

    Ok((file, text))
}

/// Upload a video, run the frame pipeline over it, and analyze the frames.
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VideoUploadQuery>,
    multipart: Multipart,
) -> Result<Json<VideoUploadResponse>, HttpError> {
    let (file, brand_image_file_name) = read_multipart(multipart, "brandImageFileName").await?;

    let video_key = keys::video_key(Utc::now().timestamp_millis(), &file.filename);
    let video_key = state
        .store
        .put(&video_key, file.data, &file.content_type)
        .await?;

    let frame_keys = state
        .pipeline
        .process(
            VideoSource::Stored {
                key: video_key.clone(),
            },
            PipelineOptions {
                interval_override: query.interval,
            },
        )
        .await?;

    let analysis_result = state
        .analysis
        .analyze_video_frames(&frame_keys, brand_image_file_name.as_deref())
        .await?;

    Ok(Json(VideoUploadResponse {
        video_file_name: video_key,
        frame_file_names: frame_keys,
        analysis_result,
    }))
}

/// Upload a brand reference image for later detection runs.
pub async fn upload_brand_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<BrandImageResponse>, HttpError> {
    let (file, _) = read_multipart(multipart, "").await?;

    let key = keys::brand_image_key(Utc::now().timestamp_millis(), &file.filename);
    let key = state.store.put(&key, file.data, &file.content_type).await?;

    Ok(Json(BrandImageResponse { file_name: key }))
}

/// Placeholder report for a previously processed video.
pub async fn get_analysis(
    Path(video_file_name): Path<String>,
) -> Json<AnalysisResponse> {
    Json(AnalysisResponse {
        video_file_name,
        analysis_result: AnalysisReport {
            total_exposure_secs: 0,
            exposure_percentage: 0.0,
            frames: Vec::new(),
        },
    })
}
