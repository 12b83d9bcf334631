pub mod client;

use async_trait::async_trait;
use bytes::Bytes;

pub use client::IpfsClient;
// FetchError は errors モジュールで定義済み
pub use crate::errors::FetchError;

/// コンテンツアドレス型ストアからオリジナルのバイト列を取得する
///
/// 実装はタイムアウトを持ち、タイムアウト・接続失敗・未検出を区別して返すこと
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, content_id: &str) -> Result<Bytes, FetchError>;
}
