#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use bytes::Bytes;
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, RgbImage};
use tower::ServiceExt;

use resizer_core::{ContentFetcher, FetchError, ImagePipeline, ResultCache};
use resizer_proxy::{AppState, ServerConfig, build_router};

/// メモリ上のコンテンツを返すフェイク fetcher（呼び出し回数を記録する）
#[derive(Default)]
pub struct FakeFetcher {
    contents: HashMap<String, Bytes>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn with(mut self, content_id: &str, data: Vec<u8>) -> Self {
        self.contents.insert(content_id.to_string(), Bytes::from(data));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentFetcher for FakeFetcher {
    async fn fetch(&self, content_id: &str) -> Result<Bytes, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.contents
            .get(content_id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                content_id: content_id.to_string(),
            })
    }
}

pub struct TestApp {
    pub router: Router,
    pub fetcher: Arc<FakeFetcher>,
    pub cache: ResultCache,
}

/// 本番と同じミドルウェアスタックでアプリを組み立てる
pub fn build_test_app(fetcher: FakeFetcher) -> TestApp {
    let fetcher = Arc::new(fetcher);
    let cache = ResultCache::new(Duration::from_secs(60));

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout: Duration::from_secs(30),
        ..ServerConfig::default()
    };

    let state = AppState {
        pipeline: ImagePipeline::new(fetcher.clone(), cache.clone()),
        config: Arc::new(config),
    };

    TestApp {
        router: build_router(state),
        fetcher,
        cache,
    }
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 90])
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// 単色フレームを並べたアニメーション GIF
pub fn animated_gif(width: u16, height: u16, delays: &[u16]) -> Vec<u8> {
    let colors = [[255u8, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]];
    let mut out = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut out, width, height, &[]).unwrap();
        encoder.set_repeat(gif::Repeat::Infinite).unwrap();
        for (i, delay) in delays.iter().enumerate() {
            let mut pixels: Vec<u8> = colors[i % colors.len()]
                .iter()
                .copied()
                .cycle()
                .take(width as usize * height as usize * 4)
                .collect();
            let mut frame = gif::Frame::from_rgba_speed(width, height, &mut pixels, 10);
            frame.delay = *delay;
            encoder.write_frame(&frame).unwrap();
        }
    }
    out
}
