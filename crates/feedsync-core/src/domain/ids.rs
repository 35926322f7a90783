//! Tweet identifiers.
//!
//! データソースが払い出す整数 ID をそのまま使います。
//! ID は単調増加で一意なので、フィードの並び順と重複判定は ID だけで決まります。

use serde::{Deserialize, Serialize};
use std::fmt;

/// TweetId はデータソースが採番したツイート ID
///
/// ページングのカーソルとしても使います（afterId / beforeId）。
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TweetId(u64);

impl TweetId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TweetId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for TweetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tweet-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_order_by_value() {
        assert!(TweetId::new(4) < TweetId::new(5));
        assert_eq!(TweetId::from(7u64).get(), 7);
    }

    #[test]
    fn ids_serialize_as_bare_integers() {
        let id = TweetId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");

        let parsed: TweetId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn display_has_prefix() {
        assert_eq!(TweetId::new(3).to_string(), "tweet-3");
    }
}
