//! FeedHandle - 起動済みスケジューラへの窓口
//!
//! 描画側はここからスナップショットを購読し、`set_mode` でモードを切り替えます。
//! 埋め込み側のアプリケーションは `set_poll_interval` で poll 間隔を変更できます。

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::driver_loop::DriverMsg;
use crate::domain::{FeedError, FeedEvent};
use crate::store::FeedSnapshot;

/// Handle to a running feed scheduler.
///
/// - `shutdown()` でタイマー・fetch・reset を全て止めて終了を待つ
/// - shutdown せずに drop した場合もキャンセルだけは行う
pub struct FeedHandle {
    tx: mpsc::UnboundedSender<DriverMsg>,
    snapshots: watch::Receiver<FeedSnapshot>,
    interval_tx: watch::Sender<Option<Duration>>,
    shutdown: CancellationToken,
    joins: Vec<JoinHandle<()>>,
}

impl FeedHandle {
    pub(crate) fn new(
        tx: mpsc::UnboundedSender<DriverMsg>,
        snapshots: watch::Receiver<FeedSnapshot>,
        interval_tx: watch::Sender<Option<Duration>>,
        shutdown: CancellationToken,
        joins: Vec<JoinHandle<()>>,
    ) -> Self {
        Self {
            tx,
            snapshots,
            interval_tx,
            shutdown,
            joins,
        }
    }

    /// Receiver that observes every applied event.
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.snapshots.clone()
    }

    /// Latest published state.
    pub fn snapshot(&self) -> FeedSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Switch paging direction. Does not trigger a fetch by itself.
    pub fn set_mode(&self, reverse: bool) -> Result<(), FeedError> {
        self.send(FeedEvent::SetMode(reverse))
    }

    /// Same as a poll tick. Useful when polling is disabled.
    pub fn request_fetch(&self) -> Result<(), FeedError> {
        self.send(FeedEvent::BeginFetch)
    }

    /// `None` disables polling. Takes effect immediately; the next tick is
    /// one full interval away.
    pub fn set_poll_interval(&self, interval: Option<Duration>) {
        self.interval_tx.send_replace(interval);
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        *self.interval_tx.borrow()
    }

    pub fn is_running(&self) -> bool {
        !self.shutdown.is_cancelled()
    }

    /// Token cancelled on shutdown; lets collaborators (e.g. a render loop)
    /// stop together with the scheduler.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Cancel the timer, pending fetches and any pending reset, then wait for
    /// all scheduler tasks to finish.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        for join in std::mem::take(&mut self.joins) {
            let _ = join.await;
        }
    }

    fn send(&self, event: FeedEvent) -> Result<(), FeedError> {
        if self.shutdown.is_cancelled() {
            return Err(FeedError::Closed);
        }
        self.tx
            .send(DriverMsg::Event(event))
            .map_err(|_| FeedError::Closed)
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
