//! Impls - ports の実装
//!
//! - **InMemoryTweetSource**: 開発・デモ用（呼ばれるたびに成長する）
//! - **HttpTweetSource**: HTTP API 用

pub mod http_source;
pub mod inmem_source;

pub use self::http_source::HttpTweetSource;
pub use self::inmem_source::InMemoryTweetSource;
