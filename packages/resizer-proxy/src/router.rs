use axum::Router;
use axum::http::{HeaderName, StatusCode};
use axum::routing::get;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handler;
use crate::state::AppState;

/// ルーターとミドルウェアを組み立てる
///
/// `main.rs` と結合テストで同じスタックを使う。ミドルウェアは下から順に適用される:
///
/// 1. リクエスト ID の付与
/// 2. リクエスト/レスポンスのトレース
/// 3. リクエスト ID のレスポンスへの伝播
/// 4. タイムアウト (408)
/// 5. パニック捕捉 (500)
pub fn build_router(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");
    let request_timeout = state.config.request_timeout;

    Router::new()
        .route("/health", get(handler::health))
        .route("/image", get(handler::image))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state)
}
