//! FeedState - Store が排他的に所有するフィード状態
//!
//! # 不変条件
//! - `records` は id の降順（新しい順）で、id の重複を含まない
//! - `records` が空でなければ `last_id` は先頭、`first_id` は末尾の id
//! - `records` が空なら `last_id` / `first_id` はどちらも `None`
//!
//! 例外: `Reset` 直後は `last_id` だけが `None` になり、次の非空の
//! forward append で records が丸ごと置き換わるまでその状態が続きます。

use super::ids::TweetId;
use super::tweet::Tweet;

/// Which end of the loaded window the next fetch pages from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchDirection {
    /// Newer than `last_id` (polling the live end).
    Forward,
    /// Older than `first_id`.
    Backward,
}

impl FetchDirection {
    pub fn from_reverse_mode(reverse_mode: bool) -> Self {
        if reverse_mode {
            FetchDirection::Backward
        } else {
            FetchDirection::Forward
        }
    }
}

/// The feed window plus fetch/mode flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedState {
    pub records: Vec<Tweet>,
    pub is_fetching: bool,
    pub last_id: Option<TweetId>,
    pub first_id: Option<TweetId>,
    pub reverse_mode: bool,
}

impl FeedState {
    /// Empty feed with `is_fetching = true`, so the first cycle loads
    /// immediately without waiting for a poll tick.
    pub fn initial() -> Self {
        Self {
            records: Vec::new(),
            is_fetching: true,
            last_id: None,
            first_id: None,
            reverse_mode: false,
        }
    }

    pub fn direction(&self) -> FetchDirection {
        FetchDirection::from_reverse_mode(self.reverse_mode)
    }

    /// The values the scheduler re-evaluates on.
    pub fn fetch_key(&self) -> FetchKey {
        FetchKey {
            is_fetching: self.is_fetching,
            last_id: self.last_id,
            first_id: self.first_id,
            reverse_mode: self.reverse_mode,
        }
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self::initial()
    }
}

/// FetchKey はスケジューラが監視する値の組
///
/// この組が変化したときだけ fetch サイクルを張り直します。
/// 同じ値のまま `BeginFetch` が届いても新しい fetch は起動しません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub is_fetching: bool,
    pub last_id: Option<TweetId>,
    pub first_id: Option<TweetId>,
    pub reverse_mode: bool,
}

impl FetchKey {
    pub fn direction(&self) -> FetchDirection {
        FetchDirection::from_reverse_mode(self.reverse_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_requests_a_fetch() {
        let state = FeedState::initial();
        assert!(state.is_fetching);
        assert!(state.records.is_empty());
        assert_eq!(state.last_id, None);
        assert_eq!(state.first_id, None);
        assert_eq!(state.direction(), FetchDirection::Forward);
    }

    #[test]
    fn fetch_key_tracks_mode() {
        let mut state = FeedState::initial();
        let before = state.fetch_key();
        state.reverse_mode = true;
        let after = state.fetch_key();

        assert_ne!(before, after);
        assert_eq!(after.direction(), FetchDirection::Backward);
    }
}
