use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::domain::{Feed, FeedDocument};
use crate::errors::{GatorError, GatorResult};
use crate::fetcher::{FeedFetcher, FetchContext};
use crate::storage::traits::FeedRepository;

/// Outcome of one scheduler tick
#[derive(Debug, Clone)]
pub struct PollResult {
    /// The claimed feed, with its cursor already moved to the claim time
    pub feed: Feed,
    pub document: FeedDocument,
}

impl PollResult {
    pub fn item_titles(&self) -> Vec<String> {
        self.document.item_titles()
    }
}

/// Polls feeds one at a time, least recently fetched first.
///
/// Selecting and claiming a feed are two separate store calls. Two schedulers
/// sharing one database can both select the same feed before either claims it;
/// a single process never overlaps ticks, so it never double-fetches.
pub struct FeedScheduler<R: FeedRepository, F: FeedFetcher> {
    feeds: R,
    fetcher: F,
    ctx: FetchContext,
}

impl<R: FeedRepository, F: FeedFetcher> FeedScheduler<R, F> {
    pub fn new(feeds: R, fetcher: F, ctx: FetchContext) -> Self {
        Self { feeds, fetcher, ctx }
    }

    pub fn context(&self) -> &FetchContext {
        &self.ctx
    }

    /// Select, claim and fetch the next feed
    pub fn poll_once(&self) -> GatorResult<PollResult> {
        self.poll_once_at(Utc::now())
    }

    /// Same as [`poll_once`](Self::poll_once) with an explicit claim time
    pub fn poll_once_at(&self, now: DateTime<Utc>) -> GatorResult<PollResult> {
        let feed = self.feeds.next_to_fetch()?.ok_or(GatorError::NoFeeds)?;

        self.feeds.mark_fetched(feed.id, now)?;
        tracing::debug!(feed = %feed.name, at = %now, "claimed feed");

        tracing::info!(feed = %feed.name, url = %feed.url, "fetching feed");
        let document = self.fetcher.fetch(&self.ctx, &feed.url).map_err(|e| {
            tracing::warn!(feed = %feed.name, url = %feed.url, error = %e, "fetch failed");
            e
        })?;
        tracing::info!(feed = %feed.name, items = document.items.len(), "fetched feed");

        Ok(PollResult {
            feed: Feed {
                updated_at: now,
                last_fetched_at: Some(now),
                ..feed
            },
            document,
        })
    }

    /// Poll immediately, then once per `interval`, handing each result to `on_poll`.
    ///
    /// Returns the first error from any tick. Returns `Ok(())` only when the
    /// context's cancel token fires between ticks. A tick that overruns the
    /// interval delays the next one instead of overlapping it.
    pub fn run_forever<H>(&self, interval: Duration, mut on_poll: H) -> GatorResult<()>
    where
        H: FnMut(&PollResult),
    {
        if interval.is_zero() {
            return Err(GatorError::InvalidInput(
                "interval must be greater than zero".to_string(),
            ));
        }

        loop {
            if self.ctx.is_cancelled() {
                tracing::info!("scheduler stopped");
                return Ok(());
            }

            let started = Instant::now();
            let result = self.poll_once()?;
            on_poll(&result);

            let wait = interval.saturating_sub(started.elapsed());
            if self.ctx.cancel_token().wait_timeout(wait) {
                tracing::info!("scheduler stopped");
                return Ok(());
            }
        }
    }
}
