//! feedsync-core
//!
//! Live tweet feed synchronization: a pure reducer over the loaded window and
//! a scheduler that decides when and in which direction to fetch.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, tweet, state, events, errors）
//! - **store**: 純粋な遷移関数と状態の所有者（FeedStore）
//! - **ports**: 抽象化レイヤー（TweetSource, StorageReset, Clock）
//! - **app**: スケジューラ（builder, driver_loop, poll_loop, handle, render_loop）
//! - **impls**: 実装（InMemoryTweetSource, HttpTweetSource）
//! - **config**: 設定の読み込みと検証

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod store;
