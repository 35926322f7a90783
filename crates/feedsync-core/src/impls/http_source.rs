//! HttpTweetSource - HTTP API をデータソースにする実装
//!
//! # エンドポイント
//! - `GET {base}/api?count=N`             最新ページ
//! - `GET {base}/api?count=N&afterId=C`   C より新しいページ
//! - `GET {base}/api?count=N&beforeId=C`  C より古いページ
//! - `GET {base}/reset`                   ストアのリセット
//!
//! レスポンスは新しい順のツイート配列（JSON）です。

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{SourceError, Tweet, TweetId};
use crate::ports::{StorageReset, TweetSource};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpTweetSource {
    client: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl HttpTweetSource {
    pub fn new(base_url: impl Into<String>, page_size: u32) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, base_url, page_size))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>, page_size: u32) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            page_size,
        }
    }

    fn page_url(&self, cursor: PageCursor) -> String {
        let mut url = format!("{}/api?count={}", self.base_url, self.page_size);
        match cursor {
            PageCursor::Latest => {}
            PageCursor::After(id) => url.push_str(&format!("&afterId={}", id.get())),
            PageCursor::Before(id) => url.push_str(&format!("&beforeId={}", id.get())),
        }
        url
    }

    fn reset_url(&self) -> String {
        format!("{}/reset", self.base_url)
    }

    async fn get_page(&self, cursor: PageCursor) -> Result<Vec<Tweet>, SourceError> {
        let url = self.page_url(cursor);
        debug!(%url, "GET page");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        resp.json::<Vec<Tweet>>()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
enum PageCursor {
    Latest,
    After(TweetId),
    Before(TweetId),
}

#[async_trait]
impl TweetSource for HttpTweetSource {
    async fn fetch(&self, cursor: Option<TweetId>) -> Result<Vec<Tweet>, SourceError> {
        let cursor = cursor.map_or(PageCursor::Latest, PageCursor::After);
        self.get_page(cursor).await
    }

    async fn fetch_reverse(&self, cursor: TweetId) -> Result<Vec<Tweet>, SourceError> {
        self.get_page(PageCursor::Before(cursor)).await
    }
}

#[async_trait]
impl StorageReset for HttpTweetSource {
    async fn reset_storage(&self) -> Result<(), SourceError> {
        let url = self.reset_url();
        debug!(%url, "GET reset");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }
        Ok(())
    }
}
