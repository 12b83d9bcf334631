use std::sync::Arc;

use resizer_core::ImagePipeline;

use crate::config::ServerConfig;

/// 全ハンドラで共有する状態（Clone は安価）
#[derive(Clone)]
pub struct AppState {
    pub pipeline: ImagePipeline,
    pub config: Arc<ServerConfig>,
}
