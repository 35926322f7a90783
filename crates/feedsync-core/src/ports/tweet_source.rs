//! TweetSource port - ページング付きデータソースの抽象化
//!
//! # 実装
//! - **InMemoryTweetSource**: 開発・テスト用（impls/inmem_source.rs）
//! - **HttpTweetSource**: HTTP API 用（impls/http_source.rs）

use async_trait::async_trait;

use crate::domain::{SourceError, Tweet, TweetId};

/// TweetSource は 2 方向のページ取得を提供
///
/// # 契約
/// - 返すバッチは常に新しい順（id 降順）
/// - `fetch(None)` は最新ページ
/// - `fetch(Some(c))` は `c` より新しいレコード（重複を含んでもよい。Store 側で除外）
/// - `fetch_reverse(c)` は `c` より厳密に古いレコード
#[async_trait]
pub trait TweetSource: Send + Sync {
    async fn fetch(&self, cursor: Option<TweetId>) -> Result<Vec<Tweet>, SourceError>;

    async fn fetch_reverse(&self, cursor: TweetId) -> Result<Vec<Tweet>, SourceError>;
}
