//! Events - Store に渡すイベント
//!
//! Store の状態を変える唯一の手段です。

use super::tweet::Tweet;

/// FeedEvent は Store の遷移関数への入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// A fetch was requested (poll tick). Re-asserting while already
    /// fetching is a no-op.
    BeginFetch,
    /// The in-flight fetch failed.
    EndFetch,
    /// Newest-first batch from the forward endpoint.
    AppendForward(Vec<Tweet>),
    /// Newest-first batch of records older than the current oldest.
    AppendBackward(Vec<Tweet>),
    /// `true` switches to reverse (backward) paging.
    SetMode(bool),
    /// Storage was reset upstream; the next forward append reloads the window.
    Reset,
}

impl FeedEvent {
    /// Short name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedEvent::BeginFetch => "begin_fetch",
            FeedEvent::EndFetch => "end_fetch",
            FeedEvent::AppendForward(_) => "append_forward",
            FeedEvent::AppendBackward(_) => "append_backward",
            FeedEvent::SetMode(_) => "set_mode",
            FeedEvent::Reset => "reset",
        }
    }
}
