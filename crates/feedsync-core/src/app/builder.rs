//! FeedSchedulerBuilder - スケジューラの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use super::driver_loop::FeedDriver;
use super::handle::FeedHandle;
use super::poll_loop::poll_loop;
use crate::config::{DEFAULT_RESET_HIGH_WATER_MARK, FeedConfig};
use crate::domain::FeedState;
use crate::ports::{StorageReset, TweetSource};
use crate::store::FeedStore;

/// FeedSchedulerBuilder はデータソースと設定からスケジューラを起動する
///
/// # 使用例
/// ```ignore
/// let source = Arc::new(InMemoryTweetSource::new(20));
/// let handle = FeedSchedulerBuilder::from_source(source)
///     .with_config(&cfg)
///     .spawn()?;
/// ```
pub struct FeedSchedulerBuilder {
    source: Arc<dyn TweetSource>,
    resetter: Option<Arc<dyn StorageReset>>,
    poll_interval: Option<Duration>,
    high_water_mark: u64,
    initial: FeedState,
}

/// BuildError はスケジューラ起動時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no storage reset primitive was provided")]
    MissingStorageReset,

    #[error("poll interval must be non-zero (use None to disable polling)")]
    ZeroPollInterval,

    #[error("reset high-water mark must be non-zero")]
    ZeroHighWaterMark,
}

impl FeedSchedulerBuilder {
    pub fn new(source: Arc<dyn TweetSource>) -> Self {
        let defaults = FeedConfig::default();
        Self {
            source,
            resetter: None,
            poll_interval: defaults.poll_interval(),
            high_water_mark: DEFAULT_RESET_HIGH_WATER_MARK,
            initial: FeedState::initial(),
        }
    }

    /// For sources that also own the storage they page over.
    pub fn from_source<T>(source: Arc<T>) -> Self
    where
        T: TweetSource + StorageReset + 'static,
    {
        let resetter: Arc<dyn StorageReset> = source.clone();
        Self::new(source).storage_reset(resetter)
    }

    pub fn storage_reset(mut self, resetter: Arc<dyn StorageReset>) -> Self {
        self.resetter = Some(resetter);
        self
    }

    pub fn with_config(mut self, cfg: &FeedConfig) -> Self {
        self.poll_interval = cfg.poll_interval();
        self.high_water_mark = cfg.reset_high_water_mark;
        self
    }

    pub fn poll_interval(mut self, interval: Option<Duration>) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn high_water_mark(mut self, mark: u64) -> Self {
        self.high_water_mark = mark;
        self
    }

    /// Start from a state other than the empty, fetching one.
    pub fn initial_state(mut self, state: FeedState) -> Self {
        self.initial = state;
        self
    }

    /// Validate and spawn the driver and poll loops on the current runtime.
    pub fn spawn(self) -> Result<FeedHandle, BuildError> {
        let resetter = self.resetter.ok_or(BuildError::MissingStorageReset)?;
        if self.poll_interval == Some(Duration::ZERO) {
            return Err(BuildError::ZeroPollInterval);
        }
        if self.high_water_mark == 0 {
            return Err(BuildError::ZeroHighWaterMark);
        }

        let store = FeedStore::with_state(self.initial);
        let snapshots = store.subscribe();
        let (tx, rx) = mpsc::unbounded_channel();
        let (interval_tx, interval_rx) = watch::channel(self.poll_interval);
        let shutdown = CancellationToken::new();

        let driver = FeedDriver::new(
            store,
            self.source,
            resetter,
            self.high_water_mark,
            rx,
            tx.clone(),
            shutdown.clone(),
        );
        let joins = vec![
            tokio::spawn(driver.run()),
            tokio::spawn(poll_loop(tx.clone(), interval_rx, shutdown.clone())),
        ];

        Ok(FeedHandle::new(tx, snapshots, interval_tx, shutdown, joins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::InMemoryTweetSource;

    #[test]
    fn build_without_storage_reset_fails() {
        let source = Arc::new(InMemoryTweetSource::new(5));
        let result = FeedSchedulerBuilder::new(source).spawn();
        assert!(matches!(result, Err(BuildError::MissingStorageReset)));
    }

    #[test]
    fn build_with_zero_interval_fails() {
        let source = Arc::new(InMemoryTweetSource::new(5));
        let result = FeedSchedulerBuilder::from_source(source)
            .poll_interval(Some(Duration::ZERO))
            .spawn();
        assert!(matches!(result, Err(BuildError::ZeroPollInterval)));
    }

    #[test]
    fn build_with_zero_high_water_mark_fails() {
        let source = Arc::new(InMemoryTweetSource::new(5));
        let result = FeedSchedulerBuilder::from_source(source)
            .high_water_mark(0)
            .spawn();
        assert!(matches!(result, Err(BuildError::ZeroHighWaterMark)));
    }

    #[test]
    fn config_overrides_defaults() {
        let source = Arc::new(InMemoryTweetSource::new(5));
        let cfg = FeedConfig {
            poll_interval_ms: None,
            reset_high_water_mark: 50,
            ..FeedConfig::default()
        };
        let builder = FeedSchedulerBuilder::from_source(source).with_config(&cfg);
        assert_eq!(builder.poll_interval, None);
        assert_eq!(builder.high_water_mark, 50);
    }

    #[tokio::test(start_paused = true)]
    async fn in_memory_source_runs_end_to_end() {
        let source = Arc::new(InMemoryTweetSource::new(5).growth_per_fetch(3).seeded(2));
        let handle = FeedSchedulerBuilder::from_source(source.clone())
            .poll_interval(Some(Duration::from_millis(100)))
            .spawn()
            .unwrap();

        tokio::time::sleep(Duration::from_millis(250)).await;

        // 初回 5 件 + tick 2 回分（3 件ずつ）
        let snapshot = handle.snapshot();
        let ids: Vec<u64> = snapshot.records.iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);
        assert!(!snapshot.is_fetching);

        handle.shutdown().await;
    }
}
