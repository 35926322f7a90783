//! Ports - 抽象化レイヤー
//!
//! スケジューラが依存する外部コラボレータのインターフェースです。
//! ネットワークや永続化の実装詳細はここには現れません。

pub mod clock;
pub mod storage_reset;
pub mod tweet_source;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::storage_reset::StorageReset;
pub use self::tweet_source::TweetSource;
