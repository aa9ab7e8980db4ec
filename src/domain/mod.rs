pub mod user;
pub mod feed;
pub mod feed_follow;
pub mod document;

pub use user::User;
pub use feed::Feed;
pub use feed_follow::{FeedFollow, FeedFollowView};
pub use document::{FeedDocument, FeedItem};
