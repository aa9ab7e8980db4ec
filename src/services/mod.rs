pub mod scheduler;
pub mod follow_service;
pub mod feed_service;
pub mod user_service;

pub use scheduler::{FeedScheduler, PollResult};
pub use follow_service::FollowService;
pub use feed_service::FeedService;
pub use user_service::UserService;
