use std::time::Duration;

use resizer_core::{DEFAULT_CACHE_TTL, DEFAULT_FETCH_TIMEOUT, DEFAULT_SWEEP_INTERVAL};
use thiserror::Error;

/// 秒数で指定する設定値の上限（1年）
const MAX_SECS: u64 = 365 * 24 * 60 * 60;

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// 環境変数から読み込むサーバー設定
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// キャッシュの TTL（最終アクセスから）
    pub cache_ttl: Duration,
    /// 掃除間隔。0 なら掃除タスクを起動しない
    pub cache_sweep_interval: Duration,
    /// kubo RPC のベース URL
    pub ipfs_api_url: String,
    pub fetch_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9191,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_sweep_interval: DEFAULT_SWEEP_INTERVAL,
            ipfs_api_url: "http://127.0.0.1:5001".to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl ServerConfig {
    /// 環境変数から設定を読み込む（未設定はデフォルト値）
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `9191`                  |
    /// | `CACHE_TTL_SECS`            | `43200`                 |
    /// | `CACHE_SWEEP_INTERVAL_SECS` | `86400`                 |
    /// | `IPFS_API_URL`              | `http://127.0.0.1:5001` |
    /// | `FETCH_TIMEOUT_SECS`        | `45`                    |
    /// | `REQUEST_TIMEOUT_SECS`      | `120`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// 任意の参照関数から設定を組み立てる
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                expected: "a valid port number",
                value: raw,
            })?,
            None => defaults.port,
        };

        let cache_ttl = secs(var("CACHE_TTL_SECS"), "CACHE_TTL_SECS", false)?
            .unwrap_or(defaults.cache_ttl);
        let cache_sweep_interval =
            secs(var("CACHE_SWEEP_INTERVAL_SECS"), "CACHE_SWEEP_INTERVAL_SECS", true)?
                .unwrap_or(defaults.cache_sweep_interval);
        let fetch_timeout = secs(var("FETCH_TIMEOUT_SECS"), "FETCH_TIMEOUT_SECS", false)?
            .unwrap_or(defaults.fetch_timeout);
        let request_timeout = secs(var("REQUEST_TIMEOUT_SECS"), "REQUEST_TIMEOUT_SECS", false)?
            .unwrap_or(defaults.request_timeout);

        let ipfs_api_url = var("IPFS_API_URL").unwrap_or(defaults.ipfs_api_url);
        if !ipfs_api_url.starts_with("http://") && !ipfs_api_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                var: "IPFS_API_URL",
                expected: "an http(s) URL",
                value: ipfs_api_url,
            });
        }

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            cache_ttl,
            cache_sweep_interval,
            ipfs_api_url,
            fetch_timeout,
            request_timeout,
        })
    }
}

fn secs(
    raw: Option<String>,
    name: &'static str,
    allow_zero: bool,
) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    match raw.parse::<u64>() {
        Ok(0) if !allow_zero => Err(ConfigError::Invalid {
            var: name,
            expected: "a positive number of seconds",
            value: raw,
        }),
        Ok(n) if n > MAX_SECS => Err(ConfigError::Invalid {
            var: name,
            expected: "at most 31536000 seconds (one year)",
            value: raw,
        }),
        Ok(n) => Ok(Some(Duration::from_secs(n))),
        Err(_) => Err(ConfigError::Invalid {
            var: name,
            expected: "a number of seconds",
            value: raw,
        }),
    }
}
