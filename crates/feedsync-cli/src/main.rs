mod logging;
mod render;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use feedsync_core::app::{BuildError, FeedSchedulerBuilder, render_loop};
use feedsync_core::config::{ConfigError, FeedConfig, SourceKind};
use feedsync_core::domain::FeedError;
use feedsync_core::impls::{HttpTweetSource, InMemoryTweetSource};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::render::TerminalRenderer;

/// New tweets generated per fetch by the in-memory demo source.
const DEMO_GROWTH_PER_FETCH: usize = 3;

#[derive(Parser)]
#[command(author, version, about = "Follow a live tweet feed in the terminal")]
struct Args {
    /// JSON config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Poll interval in milliseconds.
    #[arg(long, conflicts_with = "no_poll")]
    interval_ms: Option<u64>,

    /// Disable polling; only the initial page is loaded.
    #[arg(long)]
    no_poll: bool,

    /// Use the HTTP source at this base URL instead of the in-memory one.
    #[arg(long)]
    http: Option<String>,

    #[arg(long)]
    page_size: Option<u32>,

    /// `last_id` that triggers a storage reset.
    #[arg(long)]
    high_water_mark: Option<u64>,

    /// Switch to reverse paging after this many seconds.
    #[arg(long)]
    reverse_after_secs: Option<u64>,

    /// Stop after this many seconds instead of waiting for Ctrl-C.
    #[arg(long)]
    run_for_secs: Option<u64>,

    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Feed(#[from] FeedError),
}

fn load_config(args: &Args) -> Result<FeedConfig, ConfigError> {
    let mut cfg = match &args.config {
        Some(path) => FeedConfig::load(path)?,
        None => FeedConfig::default(),
    };

    if let Some(ms) = args.interval_ms {
        cfg.poll_interval_ms = Some(ms);
    }
    if args.no_poll {
        cfg.poll_interval_ms = None;
    }
    if let Some(base_url) = &args.http {
        cfg.source.kind = SourceKind::Http;
        cfg.source.base_url = Some(base_url.clone());
    }
    if let Some(page_size) = args.page_size {
        cfg.source.page_size = page_size;
    }
    if let Some(mark) = args.high_water_mark {
        cfg.reset_high_water_mark = mark;
    }
    if let Some(level) = &args.log_level {
        cfg.log_level = level.clone();
    }

    cfg.validate()?;
    Ok(cfg)
}

fn scheduler_for(cfg: &FeedConfig) -> Result<FeedSchedulerBuilder, CliError> {
    let builder = match cfg.source.kind {
        SourceKind::Memory => {
            let page_size = cfg.source.page_size as usize;
            let source = InMemoryTweetSource::new(page_size)
                .growth_per_fetch(DEMO_GROWTH_PER_FETCH)
                .seeded(page_size);
            FeedSchedulerBuilder::from_source(Arc::new(source))
        }
        SourceKind::Http => {
            let base_url = cfg.source.base_url.clone().ok_or_else(|| {
                ConfigError::Invalid("source.base_url is required for the http source".to_string())
            })?;
            let source =
                HttpTweetSource::new(base_url, cfg.source.page_size).map_err(FeedError::from)?;
            FeedSchedulerBuilder::from_source(Arc::new(source))
        }
    };
    Ok(builder.with_config(cfg))
}

/// Resolves `run_for` after `started`, or on Ctrl-C when no duration is set.
async fn wait_for_stop(started: Instant, run_for: Option<Duration>) {
    match run_for {
        Some(after) => tokio::time::sleep_until(started + after).await,
        None => {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "cannot listen for Ctrl-C; stopping");
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let args = Args::parse();
    let cfg = load_config(&args)?;
    logging::init_logging(&cfg.log_level);

    info!(
        source = ?cfg.source.kind,
        poll_interval_ms = ?cfg.poll_interval_ms,
        high_water_mark = cfg.reset_high_water_mark,
        "starting feed"
    );

    let handle = scheduler_for(&cfg)?.spawn()?;
    let renderer = tokio::spawn(render_loop(
        handle.subscribe(),
        TerminalRenderer::default(),
        handle.shutdown_token(),
    ));

    let reverse_at = args.reverse_after_secs.map(Duration::from_secs);
    let run_for = args.run_for_secs.map(Duration::from_secs);
    let started = Instant::now();

    {
        let reverse = async {
            match reverse_at {
                Some(after) => {
                    tokio::time::sleep_until(started + after).await;
                    info!("switching to reverse mode");
                    handle.set_mode(true)?;
                    handle.request_fetch()
                }
                None => Ok::<(), FeedError>(()),
            }
        };
        let stop = wait_for_stop(started, run_for);

        tokio::pin!(reverse);
        tokio::pin!(stop);
        let mut reverse_done = false;
        loop {
            tokio::select! {
                _ = &mut stop => break,
                result = &mut reverse, if !reverse_done => {
                    reverse_done = true;
                    result?;
                }
            }
        }
    }

    info!("shutting down");
    handle.shutdown().await;
    if let Ok(renderer) = renderer.await {
        info!(printed = renderer.printed(), "feed closed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_source_without_base_url_is_config_error() {
        let mut cfg = FeedConfig::default();
        cfg.source.kind = SourceKind::Http;
        assert!(matches!(
            scheduler_for(&cfg),
            Err(CliError::Config(ConfigError::Invalid(_)))
        ));
    }

    #[test]
    fn memory_source_builds_from_defaults() {
        assert!(scheduler_for(&FeedConfig::default()).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn run_for_stops_at_deadline() {
        let started = Instant::now();
        wait_for_stop(started, Some(Duration::from_secs(3))).await;

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(3));
        assert!(elapsed < Duration::from_secs(4));
    }
}
