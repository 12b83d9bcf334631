use std::fmt;

/// キャッシュキー `"{content_id}_{width}x{height}"`
///
/// 正規化は行わない（アスペクト比が同じでも寸法が違えば別キー）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(content_id: &str, width: u32, height: u32) -> Self {
        Self(format!("{content_id}_{width}x{height}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
