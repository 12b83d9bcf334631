use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use crate::constants::MAX_INPUT_SIZE;
use crate::errors::FetchError;
use crate::storage::ContentFetcher;

/// kubo が `cat` の応答に付ける本来のサイズ（ボディはチャンク転送）
const X_CONTENT_LENGTH: &str = "x-content-length";

/// IPFS (kubo) RPC クライアント
///
/// ローカルノードの `/api/v0/cat` を叩いてコンテンツを取得する
#[derive(Clone)]
pub struct IpfsClient {
    client: Client,
    api_url: String,
    timeout: Duration,
    max_input_size: u64,
}

/// kubo がエラー時に返す JSON ボディ
#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    #[serde(rename = "Message")]
    message: String,
}

impl IpfsClient {
    /// 新しい IpfsClient を作成する
    ///
    /// `timeout` はリクエスト全体（ボディの読み込みを含む）に適用される
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Internal(format!("failed to build RPC client: {e}")))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout,
            max_input_size: MAX_INPUT_SIZE,
        })
    }

    /// 取得するコンテンツの上限バイト数を変更する（デフォルトは MAX_INPUT_SIZE）
    pub fn with_max_input_size(mut self, max_input_size: u64) -> Self {
        self.max_input_size = max_input_size;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn transport_error(&self, content_id: &str, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                content_id: content_id.to_string(),
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else if err.is_connect() {
            FetchError::Unavailable(err.to_string())
        } else {
            FetchError::Internal(err.to_string())
        }
    }

    fn too_large(&self, size: u64) -> FetchError {
        FetchError::TooLarge {
            size,
            max: self.max_input_size,
        }
    }

    /// 申告サイズが上限を超えていれば、ボディを読む前に打ち切る
    fn check_declared_size(&self, response: &Response) -> Result<(), FetchError> {
        let declared = response.content_length().or_else(|| {
            response
                .headers()
                .get(X_CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
        });

        match declared {
            Some(size) if size > self.max_input_size => Err(self.too_large(size)),
            _ => Ok(()),
        }
    }

    /// ボディをチャンク単位で読み、上限を超えた時点で打ち切る
    async fn read_body(&self, content_id: &str, mut response: Response) -> Result<Bytes, FetchError> {
        let mut body = BytesMut::new();

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.transport_error(content_id, e))?
        {
            let total = (body.len() + chunk.len()) as u64;
            if total > self.max_input_size {
                return Err(self.too_large(total));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body.freeze())
    }
}

#[async_trait]
impl ContentFetcher for IpfsClient {
    async fn fetch(&self, content_id: &str) -> Result<Bytes, FetchError> {
        let url = format!("{}/api/v0/cat", self.api_url);

        let response = self
            .client
            .post(&url)
            .query(&[("arg", content_id)])
            .send()
            .await
            .map_err(|e| self.transport_error(content_id, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(cid = %content_id, error = %e, "failed to read RPC error body");
                    Bytes::new()
                }
            };
            return Err(classify_rpc_error(content_id, status, &body));
        }

        self.check_declared_size(&response)?;
        let data = self.read_body(content_id, response).await?;

        tracing::debug!(cid = %content_id, bytes = data.len(), "fetched content from IPFS");

        Ok(data)
    }
}

/// 非 2xx 応答を FetchError に振り分ける
///
/// kubo は存在しないブロックやパスも 500 で返すため、メッセージで判定する
fn classify_rpc_error(content_id: &str, status: StatusCode, body: &[u8]) -> FetchError {
    if status == StatusCode::NOT_FOUND {
        return FetchError::NotFound {
            content_id: content_id.to_string(),
        };
    }

    let message = serde_json::from_slice::<RpcErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_string());

    let lowered = message.to_lowercase();
    let missing = ["not found", "no link named", "invalid path", "invalid cid"]
        .iter()
        .any(|needle| lowered.contains(needle));

    if missing {
        FetchError::NotFound {
            content_id: content_id.to_string(),
        }
    } else {
        FetchError::Rpc {
            status: status.as_u16(),
            message,
        }
    }
}
