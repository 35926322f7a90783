//! RenderLoop - 描画コラボレータへのスナップショット配送
//!
//! 描画そのものはこのクレートの責務ではありません。
//! `FeedRenderer` を実装した側がレコード列を受け取って表示します。
//! レコードが 1 件もない間は何も描画しません。

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::domain::{FetchDirection, Tweet};
use crate::store::FeedSnapshot;

/// Presentation seam.
pub trait FeedRenderer: Send {
    fn render(&mut self, records: &[Tweet], direction: FetchDirection);
}

/// Feed every published snapshot to `renderer` until shutdown or until the
/// publisher goes away. Returns the renderer.
pub async fn render_loop<R: FeedRenderer>(
    mut snapshots: watch::Receiver<FeedSnapshot>,
    mut renderer: R,
    shutdown: CancellationToken,
) -> R {
    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        if !snapshot.records.is_empty() {
            renderer.render(&snapshot.records, snapshot.direction());
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    renderer
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{FeedEvent, FeedState};
    use crate::store::transition;
    use chrono::Utc;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Vec<u64>>,
    }

    impl FeedRenderer for Recorder {
        fn render(&mut self, records: &[Tweet], _direction: FetchDirection) {
            self.frames.push(records.iter().map(|t| t.id.get()).collect());
        }
    }

    #[tokio::test]
    async fn skips_empty_feed_and_renders_updates() {
        let (tx, rx) = watch::channel(Arc::new(FeedState::initial()));
        let shutdown = CancellationToken::new();
        let join = tokio::spawn(render_loop(rx, Recorder::default(), shutdown.clone()));

        tokio::task::yield_now().await;
        let loaded = transition(
            FeedState::initial(),
            FeedEvent::AppendForward(vec![
                Tweet::new(2, "u", "b", Utc::now()),
                Tweet::new(1, "u", "a", Utc::now()),
            ]),
        );
        tx.send_replace(Arc::new(loaded));

        drop(tx);
        let recorder = join.await.unwrap();
        assert_eq!(recorder.frames, vec![vec![2, 1]]);
    }

    #[tokio::test]
    async fn stops_on_shutdown() {
        let (_tx, rx) = watch::channel(Arc::new(FeedState::initial()));
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let recorder = render_loop(rx, Recorder::default(), shutdown).await;
        assert!(recorder.frames.is_empty());
    }
}
