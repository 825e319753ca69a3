use std::sync::Arc;

use framegrab_core::Config;
use framegrab_processing::FramePipeline;
use framegrab_storage::{create_store, ContentStore};

use crate::services::analysis::AnalysisService;

/// Shared application state for handlers.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ContentStore>,
    pub pipeline: FramePipeline,
    pub analysis: AnalysisService,
}

impl AppState {
    pub async fn from_config(config: Config) -> anyhow::Result<Arc<Self>> {
        let store = create_store(&config).await?;
        let pipeline = FramePipeline::from_config(&config, store.clone())?;
        let analysis = AnalysisService::new(
            store.clone(),
            config.frame_interval_secs,
            config.presign_expiry(),
        );

        Ok(Arc::new(Self {
            config,
            store,
            pipeline,
            analysis,
        }))
    }
}
