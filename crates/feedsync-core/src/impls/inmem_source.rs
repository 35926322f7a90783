//! InMemoryTweetSource - 開発用のデータソース
//!
//! # 学習ポイント
//! - `std::sync::Mutex` は await を跨がない範囲でだけロックする
//! - 呼ばれるたびにツイートが増える「ライブ」なソースを再現する
//!
//! `TweetSource` と `StorageReset` の両方を実装します。

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rand::seq::SliceRandom;

use crate::domain::{SourceError, Tweet, TweetId};
use crate::ports::{Clock, StorageReset, SystemClock, TweetSource};

const USERNAMES: &[&str] = &["ada", "grace", "linus", "barbara", "ken", "margaret"];
const TEXTS: &[&str] = &[
    "shipping it",
    "who broke main?",
    "coffee first",
    "reading the docs, finally",
    "it works on my machine",
    "one more test",
];

struct Inner {
    /// 古い順（id 昇順）
    tweets: Vec<Tweet>,
    next_id: u64,
    available: bool,
}

/// InMemoryTweetSource は呼ばれるたびに成長するデータソース
///
/// # ページング
/// - `fetch(None)`: 最新 `page_size` 件
/// - `fetch(Some(c))`: `c` より新しいもののうち古い側から `page_size` 件（取りこぼしなし）
/// - `fetch_reverse(c)`: `c` より古いもののうち新しい側から `page_size` 件
///
/// どのバッチも新しい順で返します。
pub struct InMemoryTweetSource<C = SystemClock> {
    inner: Mutex<Inner>,
    clock: C,
    page_size: usize,
    growth_per_fetch: usize,
}

impl InMemoryTweetSource<SystemClock> {
    pub fn new(page_size: usize) -> Self {
        Self::with_clock(page_size, SystemClock)
    }
}

impl<C: Clock> InMemoryTweetSource<C> {
    pub fn with_clock(page_size: usize, clock: C) -> Self {
        Self {
            inner: Mutex::new(Inner {
                tweets: Vec::new(),
                next_id: 1,
                available: true,
            }),
            clock,
            page_size,
            growth_per_fetch: 1,
        }
    }

    /// New tweets generated on every forward fetch (default 1).
    pub fn growth_per_fetch(mut self, n: usize) -> Self {
        self.growth_per_fetch = n;
        self
    }

    /// Pre-populate `n` tweets.
    pub fn seeded(self, n: usize) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            self.grow(&mut inner, n);
        }
        self
    }

    /// Simulate an outage: while unavailable every call fails.
    pub fn set_available(&self, available: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.available = available;
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.tweets.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, SourceError> {
        let inner = self
            .inner
            .lock()
            .map_err(|e| SourceError::Unavailable(format!("source lock poisoned: {e}")))?;
        if !inner.available {
            return Err(SourceError::Unavailable("in-memory source is offline".to_string()));
        }
        Ok(inner)
    }

    fn grow(&self, inner: &mut Inner, n: usize) {
        let mut rng = rand::thread_rng();
        for _ in 0..n {
            let username = USERNAMES.choose(&mut rng).copied().unwrap_or("anon");
            let text = TEXTS.choose(&mut rng).copied().unwrap_or("...");
            let tweet = Tweet::new(inner.next_id, username, text, self.clock.now())
                .with_image(format!("https://i.pravatar.cc/48?u={username}"));
            inner.tweets.push(tweet);
            inner.next_id += 1;
        }
    }
}

#[async_trait]
impl<C: Clock> TweetSource for InMemoryTweetSource<C> {
    async fn fetch(&self, cursor: Option<TweetId>) -> Result<Vec<Tweet>, SourceError> {
        let mut inner = self.lock()?;
        self.grow(&mut inner, self.growth_per_fetch);

        let page: Vec<Tweet> = match cursor {
            None => inner
                .tweets
                .iter()
                .rev()
                .take(self.page_size)
                .cloned()
                .collect(),
            Some(cursor) => {
                let mut newer: Vec<Tweet> = inner
                    .tweets
                    .iter()
                    .filter(|t| t.id > cursor)
                    .take(self.page_size)
                    .cloned()
                    .collect();
                newer.reverse();
                newer
            }
        };
        Ok(page)
    }

    async fn fetch_reverse(&self, cursor: TweetId) -> Result<Vec<Tweet>, SourceError> {
        let inner = self.lock()?;
        Ok(inner
            .tweets
            .iter()
            .rev()
            .filter(|t| t.id < cursor)
            .take(self.page_size)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl<C: Clock> StorageReset for InMemoryTweetSource<C> {
    async fn reset_storage(&self) -> Result<(), SourceError> {
        let mut inner = self.lock()?;
        inner.tweets.clear();
        inner.next_id = 1;
        Ok(())
    }
}
