use bytes::Bytes;

use crate::transform::OutputFormat;

/// キャッシュされる変換結果（保存後は不変）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub bytes: Bytes,
    pub format: OutputFormat,
}

impl CacheEntry {
    pub fn new(bytes: Bytes, format: OutputFormat) -> Self {
        Self { bytes, format }
    }
}
