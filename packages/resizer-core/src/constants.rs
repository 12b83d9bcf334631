use std::time::Duration;

/// デコード後のソース画像の最大ピクセル数（極端な入力によるメモリ枯渇のみ防止）
pub const MAX_PIXELS: u64 = 100_000_000;

/// デコーダに許可する最大アロケーション（1GiB）
pub const MAX_DECODE_ALLOC: u64 = 1024 * 1024 * 1024;

/// 取得するオリジナル画像の最大バイト数（100MiB）
pub const MAX_INPUT_SIZE: u64 = 100 * 1024 * 1024;

/// JPEG 再エンコード時の品質（1-100）
pub const JPEG_QUALITY: u8 = 85;

/// コンテンツ ID の最大長
pub const MAX_CONTENT_ID_LEN: usize = 512;

/// キャッシュエントリの有効期間（最終アクセスから）
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// 期限切れエントリを掃除する間隔
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// IPFS からの取得タイムアウト
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(45);
