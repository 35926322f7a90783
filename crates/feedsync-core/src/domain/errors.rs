//! Errors - エラー型と分類
//!
//! どのエラーもプロセスにとって致命的ではありません。
//! - fetch の失敗は `EndFetch` に変換され、次の poll で自然にリトライされる
//! - reset の失敗は握りつぶされる（ログのみ）

use thiserror::Error;

/// SourceError はデータソース（fetch / reset）側のエラー
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status: {0}")]
    Status(u16),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// FeedError はアプリケーション層のエラー
#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("feed driver is no longer running")]
    Closed,
}
