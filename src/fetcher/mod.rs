pub mod context;
pub mod traits;
pub mod http;

pub use context::{CancelToken, FetchContext};
pub use traits::FeedFetcher;
pub use http::{HttpFeedFetcher, USER_AGENT};
