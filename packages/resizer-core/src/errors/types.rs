use thiserror::Error;

/// パイプライン全体の統合エラー型
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("transform error: {0}")]
    Transform(#[from] TransformError),
}

impl PipelineError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

/// コンテンツ取得エラー
///
/// タイムアウト・接続失敗と「存在しない」を区別する
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("content not found: {content_id}")]
    NotFound { content_id: String },

    #[error("fetch of {content_id} timed out after {timeout_ms}ms")]
    Timeout { content_id: String, timeout_ms: u64 },

    #[error("content store unreachable: {0}")]
    Unavailable(String),

    #[error("content store returned {status}: {message}")]
    Rpc { status: u16, message: String },

    #[error("content is too large ({size} bytes, max {max})")]
    TooLarge { size: u64, max: u64 },

    #[error("fetch failed: {0}")]
    Internal(String),
}

/// 画像変換エラー
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("image resolution exceeds maximum ({width}x{height})")]
    ResolutionTooLarge { width: u32, height: u32 },

    #[error("encode failed: {0}")]
    Encode(String),

    #[error("transform worker failed: {0}")]
    Worker(String),
}
