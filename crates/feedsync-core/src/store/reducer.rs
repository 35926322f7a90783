//! Reducer - フィード状態の純粋な遷移関数
//!
//! `(state, event) -> state'`。I/O を持たず、失敗もしません。
//! 空のバッチや既知のレコードだけのバッチは no-op に縮退します。

use crate::domain::{FeedEvent, FeedState, Tweet};

/// Apply one event to the feed state.
///
/// # Forward merge
/// - empty batch: only clears `is_fetching`
/// - `last_id == None` (first load, or after `Reset`): the batch replaces the
///   whole window
/// - otherwise only records with `id > last_id` are kept and prepended;
///   `first_id` does not move
///
/// # Backward append
/// The batch is appended to the tail as-is. No floor filter is applied: the
/// reverse endpoint is trusted to return strictly older, non-overlapping
/// records. `is_fetching` is left untouched.
pub fn transition(mut state: FeedState, event: FeedEvent) -> FeedState {
    match event {
        FeedEvent::BeginFetch => {
            state.is_fetching = true;
        }
        FeedEvent::EndFetch => {
            state.is_fetching = false;
        }
        FeedEvent::AppendForward(batch) => {
            merge_forward(&mut state, batch);
            state.is_fetching = false;
        }
        FeedEvent::AppendBackward(batch) => {
            // TODO: overlap with the loaded window is not filtered here; revisit
            // if the reverse endpoint is ever observed returning ids >= first_id.
            if let Some(oldest) = batch.last().map(|t| t.id) {
                state.first_id = Some(oldest);
                state.records.extend(batch);
            }
        }
        FeedEvent::SetMode(reverse) => {
            state.reverse_mode = reverse;
        }
        FeedEvent::Reset => {
            state.last_id = None;
        }
    }
    state
}

fn merge_forward(state: &mut FeedState, batch: Vec<Tweet>) {
    let Some((newest, oldest)) = batch.first().zip(batch.last()).map(|(n, o)| (n.id, o.id))
    else {
        return;
    };

    let Some(last_id) = state.last_id else {
        state.last_id = Some(newest);
        state.first_id = Some(oldest);
        state.records = batch;
        return;
    };

    let mut fresh: Vec<Tweet> = batch.into_iter().filter(|t| t.id > last_id).collect();
    let Some(newest) = fresh.first().map(|t| t.id) else {
        return;
    };

    fresh.append(&mut state.records);
    state.records = fresh;
    state.last_id = Some(newest);
}
