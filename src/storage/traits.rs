use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Feed, FeedFollow, FeedFollowView, User};
use crate::errors::GatorResult;

#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    fn create(&self, user: &User) -> GatorResult<()>;
    fn get_by_name(&self, name: &str) -> GatorResult<Option<User>>;
    fn get_by_id(&self, id: Uuid) -> GatorResult<Option<User>>;
    fn list(&self) -> GatorResult<Vec<User>>;
    /// Delete every user; feeds and follows go with them
    fn reset(&self) -> GatorResult<()>;
}

#[cfg_attr(test, mockall::automock)]
pub trait FeedRepository: Send + Sync {
    fn create(&self, feed: &Feed) -> GatorResult<()>;
    fn get_by_url(&self, url: &str) -> GatorResult<Option<Feed>>;
    fn list(&self) -> GatorResult<Vec<Feed>>;
    /// Feed with the oldest `last_fetched_at`, never-fetched feeds first
    fn next_to_fetch(&self) -> GatorResult<Option<Feed>>;
    fn mark_fetched(&self, id: Uuid, at: DateTime<Utc>) -> GatorResult<()>;
}

#[cfg_attr(test, mockall::automock)]
pub trait FeedFollowRepository: Send + Sync {
    fn create(&self, follow: &FeedFollow) -> GatorResult<()>;
    fn delete_by_user_name_and_url(&self, user_name: &str, url: &str) -> GatorResult<()>;
    fn list_for_user(&self, user_id: Uuid) -> GatorResult<Vec<FeedFollowView>>;
}
