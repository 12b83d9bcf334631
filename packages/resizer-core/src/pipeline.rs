use std::sync::Arc;

use crate::cache::{CacheEntry, CacheKey, ResultCache};
use crate::errors::{PipelineError, TransformError};
use crate::storage::ContentFetcher;
use crate::transform::{TransformParams, transform};
use crate::validation::{parse_dimension, validate_content_id};

/// 取得 → 変換 → キャッシュを束ねるオーケストレータ
///
/// リクエスト単位の状態は持たないので、Clone してハンドラ間で共有してよい。
#[derive(Clone)]
pub struct ImagePipeline {
    fetcher: Arc<dyn ContentFetcher>,
    cache: ResultCache,
}

impl ImagePipeline {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, cache: ResultCache) -> Self {
        Self { fetcher, cache }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// `content_id` の画像を `width` x `height` に収めた変換結果を返す
    ///
    /// 寸法は生のクエリ文字列で受け取り、ここで検証する。
    /// キャッシュヒット時は取得も変換も行わない。失敗時はキャッシュを変更しない。
    pub async fn get_image(
        &self,
        content_id: &str,
        width: &str,
        height: &str,
    ) -> Result<CacheEntry, PipelineError> {
        validate_content_id(content_id)?;
        let width = parse_dimension("width", width)?;
        let height = parse_dimension("height", height)?;

        let key = CacheKey::new(content_id, width, height);

        if let Some(entry) = self.cache.get(&key) {
            tracing::debug!(key = %key, format = %entry.format, "cache hit");
            return Ok(entry);
        }
        tracing::debug!(key = %key, "cache miss");

        let original = self.fetcher.fetch(content_id).await?;

        tracing::debug!(
            cid = %content_id,
            width,
            height,
            bytes = original.len(),
            "transforming image"
        );

        let params = TransformParams::new(width, height);
        let (bytes, format) = tokio::task::spawn_blocking(move || transform(&original, &params))
            .await
            .map_err(|e| TransformError::Worker(e.to_string()))??;

        let entry = CacheEntry::new(bytes, format);
        self.cache.set(key, entry.clone());

        Ok(entry)
    }
}
