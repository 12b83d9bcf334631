use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::cache::entry::CacheEntry;
use crate::cache::key::CacheKey;

/// 加算が溢れる場合の期限（実質無期限）
const FAR_FUTURE: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

fn deadline(now: Instant, after: Duration) -> Instant {
    now.checked_add(after)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

struct Slot {
    entry: CacheEntry,
    expires_at: Instant,
}

struct Store {
    entries: Mutex<HashMap<CacheKey, Slot>>,
    ttl: Duration,
}

impl Store {
    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Slot>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sweep(&self, now: Instant) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, slot| slot.expires_at > now);
        before - entries.len()
    }
}

/// 変換結果のインメモリキャッシュ
///
/// 有効期限は作成時刻ではなく最終アクセスから数える（スライディング有効期限）。
/// `get` が成功するたびに期限が TTL いっぱいまで延びる。期限切れで未掃除の
/// エントリは `get` からは存在しないものとして扱う。
///
/// Clone は同じストアを共有する。
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<Store>,
    cancel: CancellationToken,
    sweeper: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ResultCache {
    /// 掃除タスクなしでキャッシュを作成する
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: Arc::new(Store {
                entries: Mutex::new(HashMap::new()),
                ttl,
            }),
            cancel: CancellationToken::new(),
            sweeper: Arc::new(Mutex::new(None)),
        }
    }

    /// キャッシュを作成し、`sweep_interval` ごとの掃除タスクを起動する
    ///
    /// tokio ランタイム内で呼ぶこと。`sweep_interval` が 0 なら掃除タスクは起動しない。
    pub fn start(ttl: Duration, sweep_interval: Duration) -> Self {
        let cache = Self::new(ttl);

        if sweep_interval.is_zero() {
            tracing::info!("cache sweeper disabled");
            return cache;
        }

        let handle = tokio::spawn(run_sweeper(
            Arc::downgrade(&cache.store),
            sweep_interval,
            cache.cancel.clone(),
        ));
        *cache.sweeper.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);

        cache
    }

    /// エントリを取得し、有効期限を TTL いっぱいまでリセットする
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let now = Instant::now();
        let mut entries = self.store.lock();

        match entries.get_mut(key) {
            Some(slot) if slot.expires_at > now => {
                slot.expires_at = deadline(now, self.store.ttl);
                Some(slot.entry.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// エントリを保存する（既存エントリは上書き）
    pub fn set(&self, key: CacheKey, entry: CacheEntry) {
        let expires_at = deadline(Instant::now(), self.store.ttl);
        self.store.lock().insert(key, Slot { entry, expires_at });
    }

    /// 期限切れエントリを削除し、削除件数を返す
    pub fn sweep(&self) -> usize {
        self.store.sweep(Instant::now())
    }

    /// 保持しているエントリ数（期限切れで未掃除のものを含む）
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 掃除タスクを停止し、終了を待つ
    pub async fn shutdown(&self) {
        self.cancel.cancel();

        let handle = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle
            && let Err(e) = handle.await
        {
            tracing::warn!(error = %e, "cache sweeper ended abnormally");
        }
    }
}

async fn run_sweeper(store: Weak<Store>, period: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = period.as_secs(), "cache sweeper started");

    let mut interval = tokio::time::interval_at(deadline(Instant::now(), period), period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("cache sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                // キャッシュ本体が破棄されていれば終了
                let Some(store) = store.upgrade() else {
                    break;
                };
                let purged = store.sweep(Instant::now());
                if purged > 0 {
                    tracing::info!(purged, remaining = store.lock().len(), "cache sweep: purged expired entries");
                } else {
                    tracing::debug!("cache sweep: nothing to purge");
                }
            }
        }
    }
}
