//! Tweet - フィードに流れるレコード
//!
//! 生成後は変更しない値オブジェクトです。同一性と順序は `id` だけで決まります。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::TweetId;

/// A single record in the feed.
///
/// Wire shape follows the data source: camelCase keys and `timeStamp` as
/// epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: TweetId,
    pub username: String,
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub time_stamp: DateTime<Utc>,
}

impl Tweet {
    pub fn new(
        id: u64,
        username: impl Into<String>,
        text: impl Into<String>,
        time_stamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TweetId::new(id),
            username: username.into(),
            text: text.into(),
            image: None,
            time_stamp,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}
