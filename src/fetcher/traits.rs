use crate::domain::FeedDocument;
use crate::errors::GatorResult;
use crate::fetcher::FetchContext;

#[cfg_attr(test, mockall::automock)]
pub trait FeedFetcher: Send + Sync {
    /// Download and decode the feed at `url`. One attempt, no retries.
    fn fetch(&self, ctx: &FetchContext, url: &str) -> GatorResult<FeedDocument>;
}
