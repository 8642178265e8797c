use std::sync::Arc;

use utoipa::openapi::OpenApi;

use crate::config::AppConfig;
use crate::database::Store;

/// Shared handles every handler receives through `State`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
    /// OpenAPI document, built once at startup
    pub docs: Arc<OpenApi>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig, docs: OpenApi) -> Self {
        Self {
            store,
            config: Arc::new(config),
            docs: Arc::new(docs),
        }
    }
}
