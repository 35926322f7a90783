//! Terminal renderer: prints each tweet once, as it enters the window.

use std::collections::HashSet;

use feedsync_core::app::FeedRenderer;
use feedsync_core::domain::{FetchDirection, Tweet, TweetId};

#[derive(Default)]
pub struct TerminalRenderer {
    seen: HashSet<TweetId>,
    newest_seen: Option<TweetId>,
    printed: usize,
}

impl TerminalRenderer {
    pub fn printed(&self) -> usize {
        self.printed
    }

    fn line(tweet: &Tweet, direction: FetchDirection) -> String {
        let marker = match direction {
            FetchDirection::Forward => "+",
            FetchDirection::Backward => "<",
        };
        format!(
            "{marker} [{}] @{}: {} ({})",
            tweet.id.get(),
            tweet.username,
            tweet.text,
            tweet.time_stamp.format("%H:%M:%S")
        )
    }

    /// Lines for records not printed before, oldest first.
    fn fresh_lines(&mut self, records: &[Tweet], direction: FetchDirection) -> Vec<String> {
        // storage reset 後は id が振り直されるので、表示済み集合を捨てる
        if let (Some(newest), Some(seen)) = (records.first(), self.newest_seen)
            && newest.id < seen
        {
            self.seen.clear();
        }
        if let Some(newest) = records.first() {
            self.newest_seen = Some(newest.id);
        }

        let mut lines = Vec::new();
        let ordered: Box<dyn Iterator<Item = &Tweet>> = match direction {
            FetchDirection::Forward => Box::new(records.iter().rev()),
            FetchDirection::Backward => Box::new(records.iter()),
        };
        for tweet in ordered {
            if self.seen.insert(tweet.id) {
                lines.push(Self::line(tweet, direction));
            }
        }
        lines
    }
}

impl FeedRenderer for TerminalRenderer {
    fn render(&mut self, records: &[Tweet], direction: FetchDirection) {
        for line in self.fresh_lines(records, direction) {
            println!("{line}");
            self.printed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tweets(ids: &[u64]) -> Vec<Tweet> {
        ids.iter()
            .map(|&id| Tweet::new(id, "ada", "hi", Utc::now()))
            .collect()
    }

    fn ids_in(lines: &[String]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.split(']').next().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn prints_only_new_records_oldest_first() {
        let mut r = TerminalRenderer::default();
        let first = r.fresh_lines(&tweets(&[2, 1]), FetchDirection::Forward);
        assert_eq!(ids_in(&first), vec!["+ [1", "+ [2"]);

        let second = r.fresh_lines(&tweets(&[4, 3, 2, 1]), FetchDirection::Forward);
        assert_eq!(ids_in(&second), vec!["+ [3", "+ [4"]);
    }

    #[test]
    fn backward_records_are_printed_newest_first() {
        let mut r = TerminalRenderer::default();
        r.fresh_lines(&tweets(&[5, 4]), FetchDirection::Forward);
        let lines = r.fresh_lines(&tweets(&[5, 4, 3, 2]), FetchDirection::Backward);
        assert_eq!(ids_in(&lines), vec!["< [3", "< [2"]);
    }

    #[test]
    fn reload_after_reset_prints_again() {
        let mut r = TerminalRenderer::default();
        r.fresh_lines(&tweets(&[12, 11]), FetchDirection::Forward);
        r.fresh_lines(&tweets(&[2, 1]), FetchDirection::Forward);
        let lines = r.fresh_lines(&tweets(&[12, 2, 1]), FetchDirection::Forward);
        assert_eq!(ids_in(&lines), vec!["+ [12"]);
    }
}
