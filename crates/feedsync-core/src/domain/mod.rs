//! Domain model (ids, tweets, feed state, events, errors).

pub mod errors;
pub mod events;
pub mod ids;
pub mod state;
pub mod tweet;

pub use self::errors::{FeedError, SourceError};
pub use self::events::FeedEvent;
pub use self::ids::TweetId;
pub use self::state::{FeedState, FetchDirection, FetchKey};
pub use self::tweet::Tweet;
