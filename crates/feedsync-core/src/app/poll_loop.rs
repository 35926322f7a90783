//! PollLoop - 一定間隔で `BeginFetch` を送るタイマー
//!
//! fetch の結果とは独立して動きます。fetch 中に届いた `BeginFetch` は
//! `FetchKey` を変えないので、ドライバは 2 本目の fetch を起動しません。
//!
//! 間隔は watch チャネル経由で実行時に変更できます（`None` で停止）。
//! 変更されるとタイマーを張り直し、最初の tick は新しい間隔の経過後です。

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::driver_loop::DriverMsg;
use crate::domain::FeedEvent;

pub(crate) async fn poll_loop(
    tx: mpsc::UnboundedSender<DriverMsg>,
    mut interval_rx: watch::Receiver<Option<Duration>>,
    shutdown: CancellationToken,
) {
    loop {
        let period = *interval_rx.borrow_and_update();

        let Some(period) = period else {
            debug!("polling disabled");
            tokio::select! {
                _ = shutdown.cancelled() => break,
                changed = interval_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
            continue;
        };

        info!(interval_ms = period.as_millis() as u64, "polling");
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => return,
                changed = interval_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    // 新しい間隔で張り直す
                    break;
                }
                _ = ticker.tick() => {
                    if tx.send(DriverMsg::Event(FeedEvent::BeginFetch)).is_err() {
                        return;
                    }
                }
            }
        }
    }
    debug!("poll loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_begin_fetch(rx: &mut mpsc::UnboundedReceiver<DriverMsg>) -> usize {
        let mut n = 0;
        while let Ok(msg) = rx.try_recv() {
            if matches!(msg, DriverMsg::Event(FeedEvent::BeginFetch)) {
                n += 1;
            }
        }
        n
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_at_configured_interval() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_interval_tx, interval_rx) = watch::channel(Some(Duration::from_millis(100)));
        let shutdown = CancellationToken::new();
        let join = tokio::spawn(poll_loop(tx, interval_rx, shutdown.clone()));

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(count_begin_fetch(&mut rx), 3);

        shutdown.cancel();
        join.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn none_disables_and_some_resumes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (interval_tx, interval_rx) = watch::channel(None);
        let shutdown = CancellationToken::new();
        let join = tokio::spawn(poll_loop(tx, interval_rx, shutdown.clone()));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count_begin_fetch(&mut rx), 0);

        interval_tx.send_replace(Some(Duration::from_millis(200)));
        tokio::time::sleep(Duration::from_millis(450)).await;
        assert_eq!(count_begin_fetch(&mut rx), 2);

        interval_tx.send_replace(None);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count_begin_fetch(&mut rx), 0);

        shutdown.cancel();
        join.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_interval_tx, interval_rx) = watch::channel(Some(Duration::from_millis(50)));
        let shutdown = CancellationToken::new();
        let join = tokio::spawn(poll_loop(tx, interval_rx, shutdown.clone()));

        shutdown.cancel();
        join.await.unwrap();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(count_begin_fetch(&mut rx), 0);
    }
}
