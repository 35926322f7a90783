//! Config - フィード同期の設定
//!
//! JSON ファイルから読み込みます。すべてのフィールドにデフォルト値があるので、
//! 空のオブジェクト `{}` でも有効な設定になります。

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_RESET_HIGH_WATER_MARK: u64 = 10_000;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config read error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where tweets come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Memory,
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub base_url: Option<String>,
    pub page_size: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Memory,
            base_url: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// `None` (JSON `null`) disables polling.
    pub poll_interval_ms: Option<u64>,
    /// `last_id` at or above this value triggers a storage reset.
    pub reset_high_water_mark: u64,
    pub source: SourceConfig,
    pub log_level: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: Some(DEFAULT_POLL_INTERVAL_MS),
            reset_high_water_mark: DEFAULT_RESET_HIGH_WATER_MARK,
            source: SourceConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl FeedConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: FeedConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval_ms.map(Duration::from_millis)
    }

    /// Semantic checks that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be > 0 (use null to disable polling)".to_string(),
            ));
        }
        if self.reset_high_water_mark == 0 {
            return Err(ConfigError::Invalid(
                "reset_high_water_mark must be > 0".to_string(),
            ));
        }
        if self.source.page_size == 0 {
            return Err(ConfigError::Invalid(
                "source.page_size must be > 0".to_string(),
            ));
        }
        if self.source.kind == SourceKind::Http
            && self.source.base_url.as_deref().is_none_or(str::is_empty)
        {
            return Err(ConfigError::Invalid(
                "source.base_url is required for the http source".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_object_uses_defaults() {
        let cfg = FeedConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, FeedConfig::default());
        assert_eq!(cfg.poll_interval(), Some(Duration::from_millis(2000)));
        assert_eq!(cfg.reset_high_water_mark, 10_000);
    }

    #[test]
    fn null_interval_disables_polling() {
        let cfg = FeedConfig::from_json_str(r#"{"poll_interval_ms": null}"#).unwrap();
        assert_eq!(cfg.poll_interval(), None);
    }

    #[test]
    fn http_source_parses() {
        let cfg = FeedConfig::from_json_str(
            r#"{"source": {"kind": "http", "base_url": "http://localhost:3000", "page_size": 5}}"#,
        )
        .unwrap();
        assert_eq!(cfg.source.kind, SourceKind::Http);
        assert_eq!(cfg.source.page_size, 5);
    }

    #[rstest]
    #[case::zero_interval(r#"{"poll_interval_ms": 0}"#)]
    #[case::zero_high_water(r#"{"reset_high_water_mark": 0}"#)]
    #[case::zero_page(r#"{"source": {"page_size": 0}}"#)]
    #[case::http_without_url(r#"{"source": {"kind": "http"}}"#)]
    fn invalid_configs_are_rejected(#[case] raw: &str) {
        let err = FeedConfig::from_json_str(raw).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err}");
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = FeedConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
