//! App - アプリケーション層
//!
//! ports と store を組み合わせてフィード同期のスケジューリングを実装します。
//!
//! # 主要コンポーネント
//! - **FeedSchedulerBuilder**: 構築とワイヤリング（起動時検証）
//! - **FeedDriver**: Store の所有者。fetch の方向・タイミングと reset を決める
//! - **PollLoop**: 一定間隔で `BeginFetch` を送るタイマー
//! - **FeedHandle**: 購読・モード切替・poll 間隔変更・shutdown の窓口
//! - **RenderLoop**: 描画コラボレータへの配送

pub mod builder;
mod driver_loop;
pub mod handle;
mod poll_loop;
pub mod render_loop;

pub use self::builder::{BuildError, FeedSchedulerBuilder};
pub use self::handle::FeedHandle;
pub use self::render_loop::{FeedRenderer, render_loop};
