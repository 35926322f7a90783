//! Store - フィード状態の所有者
//!
//! `FeedStore` は `FeedState` を排他的に所有し、`transition` を通してのみ更新します。
//! 更新のたびにスナップショットを watch チャネルへ publish するので、
//! 描画側（購読者）はロックなしで最新の状態を読めます。

mod reducer;

pub use reducer::transition;

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::{FeedEvent, FeedState, FetchKey};

/// Read-only view handed to subscribers.
pub type FeedSnapshot = Arc<FeedState>;

/// Single owner of the feed state.
///
/// Not `Clone`: exactly one task (the scheduler's driver) applies events.
pub struct FeedStore {
    state: FeedState,
    tx: watch::Sender<FeedSnapshot>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::with_state(FeedState::initial())
    }

    pub fn with_state(state: FeedState) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(state.clone()));
        Self { state, tx }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn fetch_key(&self) -> FetchKey {
        self.state.fetch_key()
    }

    /// Reduce one event and publish the resulting snapshot.
    ///
    /// Events that leave the state unchanged (e.g. `BeginFetch` while a
    /// fetch is in flight) publish nothing and wake no subscriber.
    pub fn apply(&mut self, event: FeedEvent) -> &FeedState {
        let current = std::mem::take(&mut self.state);
        self.state = transition(current, event);

        let state = &self.state;
        self.tx.send_if_modified(|snapshot| {
            if snapshot.as_ref() == state {
                return false;
            }
            *snapshot = Arc::new(state.clone());
            true
        });
        &self.state
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for FeedStore {
    fn default() -> Self {
        Self::new()
    }
}
