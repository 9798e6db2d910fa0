use ns_core::{ScanConfig, ScanStorage};
use ns_feeds::ScanPipeline;
use std::sync::Arc;

pub struct AppState {
    pub pipeline: Arc<ScanPipeline>,
    pub storage: Arc<dyn ScanStorage>,
}

impl AppState {
    /// Reads go to the same store the pipeline writes to.
    pub fn new(pipeline: Arc<ScanPipeline>) -> Self {
        let storage = pipeline.storage();
        Self { pipeline, storage }
    }

    pub fn config(&self) -> &ScanConfig {
        self.pipeline.config()
    }
}
