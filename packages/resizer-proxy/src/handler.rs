use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::state::AppState;
use resizer_core::{FetchError, PipelineError, TransformError};

/// 変換結果はコンテンツ ID と寸法で一意に決まるので 1 日キャッシュさせる
const CACHE_CONTROL_PUBLIC: &str = "public, max-age=86400";

/// ユーザーに返すサーバーエラーのメッセージ（原因はログにのみ出す）
const GENERIC_ERROR: &str = "something went wrong";

/// 数値の検証はパイプラインに任せるので文字列のまま受け取る
#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub cid: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn image(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, AppError> {
    let (Some(cid), Some(width), Some(height)) = (query.cid, query.width, query.height) else {
        tracing::warn!("missing query parameters");
        return Err(AppError::BadRequest(
            "cid, width and height query parameters are required".to_string(),
        ));
    };

    tracing::info!(cid = %cid, width = %width, height = %height, "image requested");

    let entry = state.pipeline.get_image(&cid, &width, &height).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, entry.format.content_type()),
            (header::CACHE_CONTROL, CACHE_CONTROL_PUBLIC),
        ],
        entry.bytes,
    )
        .into_response())
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidParameter { field, reason } => {
                tracing::warn!(field, reason = %reason, "invalid parameter");
                AppError::BadRequest(format!("invalid {field}: {reason}"))
            }
            PipelineError::Fetch(fetch_err) => fetch_err.into(),
            PipelineError::Transform(transform_err) => transform_err.into(),
        }
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match &err {
            FetchError::NotFound { content_id } => {
                tracing::warn!(cid = %content_id, "content not found in IPFS");
            }
            FetchError::Timeout { .. } | FetchError::Unavailable(_) => {
                tracing::error!(error = %err, "IPFS node did not respond");
            }
            _ => {
                tracing::error!(error = %err, "failed to fetch content");
            }
        }
        AppError::Internal(err.to_string())
    }
}

impl From<TransformError> for AppError {
    fn from(err: TransformError) -> Self {
        match &err {
            TransformError::Decode(_) | TransformError::UnsupportedFormat(_) => {
                tracing::error!(error = %err, "content is not a supported image");
            }
            _ => {
                tracing::error!(error = %err, "image processing failed");
            }
        }
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
