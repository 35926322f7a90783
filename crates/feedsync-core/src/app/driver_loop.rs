//! DriverLoop - Store の唯一の所有者とスケジューリング
//!
//! # フロー
//! 1. mpsc から届いたメッセージを 1 件ずつ Store に適用する
//! 2. 適用後に `FetchKey`（is_fetching, last_id, first_id, reverse_mode）を比較する
//! 3. 変化していれば前のサイクルを破棄し、`is_fetching` なら新しい fetch を起動する
//! 4. `last_id` が変化してしきい値以上なら storage reset を 1 回だけ起動する
//!
//! fetch / reset は spawn したタスクで走り、結果はメッセージとして戻ってきます。
//! 各サイクルは CancellationToken（子トークン）とサイクル番号を持ち、
//! 置き換えられたサイクルの結果は適用されません。

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{FeedEvent, FetchDirection, FetchKey, SourceError, Tweet, TweetId};
use crate::ports::{StorageReset, TweetSource};
use crate::store::FeedStore;

/// Messages consumed by the driver.
#[derive(Debug)]
pub(crate) enum DriverMsg {
    /// External or timer-originated event, applied unconditionally.
    Event(FeedEvent),
    /// Outcome of fetch cycle `cycle`; dropped if that cycle was superseded.
    FetchDone { cycle: u64, event: FeedEvent },
    ResetDone,
    ResetFailed,
}

struct FetchCycle {
    id: u64,
    token: CancellationToken,
}

pub(crate) struct FeedDriver {
    store: FeedStore,
    source: Arc<dyn TweetSource>,
    resetter: Arc<dyn StorageReset>,
    high_water_mark: u64,
    rx: mpsc::UnboundedReceiver<DriverMsg>,
    tx: mpsc::UnboundedSender<DriverMsg>,
    shutdown: CancellationToken,
    tasks: JoinSet<()>,
    observed: Option<FetchKey>,
    cycle: Option<FetchCycle>,
    next_cycle: u64,
    reset_in_flight: bool,
}

impl FeedDriver {
    pub(crate) fn new(
        store: FeedStore,
        source: Arc<dyn TweetSource>,
        resetter: Arc<dyn StorageReset>,
        high_water_mark: u64,
        rx: mpsc::UnboundedReceiver<DriverMsg>,
        tx: mpsc::UnboundedSender<DriverMsg>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            source,
            resetter,
            high_water_mark,
            rx,
            tx,
            shutdown,
            tasks: JoinSet::new(),
            observed: None,
            cycle: None,
            next_cycle: 1,
            reset_in_flight: false,
        }
    }

    pub(crate) async fn run(mut self) {
        info!(high_water_mark = self.high_water_mark, "feed driver started");
        self.reevaluate();

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                msg = self.rx.recv() => match msg {
                    Some(msg) => self.handle(msg),
                    None => break,
                },
                // 終わったタスクを回収する
                Some(_) = self.tasks.join_next(), if !self.tasks.is_empty() => {}
            }
        }

        // 以降は何も dispatch しない
        self.shutdown.cancel();
        self.rx.close();
        while self.tasks.join_next().await.is_some() {}
        info!("feed driver stopped");
    }

    fn handle(&mut self, msg: DriverMsg) {
        match msg {
            DriverMsg::Event(event) => self.apply(event),
            DriverMsg::FetchDone { cycle, event } => {
                if self.cycle.as_ref().map(|c| c.id) == Some(cycle) {
                    self.apply(event);
                } else {
                    debug!(cycle, event = event.kind(), "discarding result of superseded cycle");
                }
            }
            DriverMsg::ResetDone => {
                self.reset_in_flight = false;
                info!("storage reset completed");
                self.apply(FeedEvent::Reset);
            }
            DriverMsg::ResetFailed => {
                self.reset_in_flight = false;
            }
        }
    }

    fn apply(&mut self, event: FeedEvent) {
        let prev_last_id = self.store.state().last_id;
        debug!(event = event.kind(), "apply");
        self.store.apply(event);
        self.reevaluate();

        let last_id = self.store.state().last_id;
        if last_id != prev_last_id {
            self.maybe_reset(last_id);
        }
    }

    /// Re-run the fetch decision if the observed key changed.
    fn reevaluate(&mut self) {
        let key = self.store.fetch_key();
        if self.observed == Some(key) {
            return;
        }
        self.observed = Some(key);

        if let Some(prev) = self.cycle.take() {
            prev.token.cancel();
        }
        if key.is_fetching {
            self.start_cycle(key);
        }
    }

    fn start_cycle(&mut self, key: FetchKey) {
        let direction = key.direction();
        let cursor = match direction {
            FetchDirection::Forward => key.last_id,
            FetchDirection::Backward => match key.first_id {
                Some(first_id) => Some(first_id),
                None => {
                    debug!("reverse mode without an oldest boundary; skipping cycle");
                    return;
                }
            },
        };

        let id = self.next_cycle;
        self.next_cycle += 1;
        let token = self.shutdown.child_token();
        self.cycle = Some(FetchCycle {
            id,
            token: token.clone(),
        });

        debug!(cycle = id, ?direction, cursor = ?cursor.map(TweetId::get), "fetch cycle started");

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.tasks.spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => return,
                outcome = fetch(source.as_ref(), direction, cursor) => outcome,
            };

            let event = match outcome {
                Ok(batch) => match direction {
                    FetchDirection::Forward => FeedEvent::AppendForward(batch),
                    FetchDirection::Backward => FeedEvent::AppendBackward(batch),
                },
                Err(e) => {
                    warn!(cycle = id, ?direction, error = %e, "fetch failed");
                    FeedEvent::EndFetch
                }
            };

            if token.is_cancelled() {
                return;
            }
            let _ = tx.send(DriverMsg::FetchDone { cycle: id, event });
        });
    }

    fn maybe_reset(&mut self, last_id: Option<TweetId>) {
        let Some(last_id) = last_id else {
            return;
        };
        if last_id.get() < self.high_water_mark {
            return;
        }
        if self.reset_in_flight {
            debug!(last_id = last_id.get(), "storage reset already in flight");
            return;
        }
        self.reset_in_flight = true;
        info!(
            last_id = last_id.get(),
            high_water_mark = self.high_water_mark,
            "high-water mark crossed; resetting storage"
        );

        let resetter = Arc::clone(&self.resetter);
        let tx = self.tx.clone();
        let token = self.shutdown.child_token();
        self.tasks.spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => return,
                outcome = resetter.reset_storage() => outcome,
            };
            let msg = match outcome {
                Ok(()) => DriverMsg::ResetDone,
                Err(e) => {
                    warn!(error = %e, "storage reset failed");
                    DriverMsg::ResetFailed
                }
            };
            if token.is_cancelled() {
                return;
            }
            let _ = tx.send(msg);
        });
    }
}

async fn fetch(
    source: &dyn TweetSource,
    direction: FetchDirection,
    cursor: Option<TweetId>,
) -> Result<Vec<Tweet>, SourceError> {
    match (direction, cursor) {
        (FetchDirection::Forward, cursor) => source.fetch(cursor).await,
        (FetchDirection::Backward, Some(cursor)) => source.fetch_reverse(cursor).await,
        (FetchDirection::Backward, None) => Ok(Vec::new()),
    }
}
