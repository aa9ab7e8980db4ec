use crate::domain::{FeedFollow, FeedFollowView, User};
use crate::errors::{GatorError, GatorResult};
use crate::storage::traits::{FeedFollowRepository, FeedRepository};

pub struct FollowService<F: FeedRepository, W: FeedFollowRepository> {
    feeds: F,
    follows: W,
}

impl<F: FeedRepository, W: FeedFollowRepository> FollowService<F, W> {
    pub fn new(feeds: F, follows: W) -> Self {
        Self { feeds, follows }
    }

    /// Follow the feed registered under `feed_url`
    pub fn follow(&self, user: &User, feed_url: &str) -> GatorResult<FeedFollowView> {
        let feed = self
            .feeds
            .get_by_url(feed_url)?
            .ok_or_else(|| GatorError::NotFound(format!("feed {}", feed_url)))?;

        let follow = FeedFollow::new(user.id, feed.id);
        self.follows.create(&follow).map_err(|e| match e {
            GatorError::Conflict(_) => {
                GatorError::Conflict(format!("{} already follows {}", user.name, feed.url))
            }
            other => other,
        })?;

        tracing::debug!(user = %user.name, feed = %feed.name, "followed feed");
        Ok(FeedFollowView {
            follow,
            user_name: user.name.clone(),
            feed_name: feed.name,
            feed_url: feed.url,
        })
    }

    /// Remove the follow edge for this user name and feed URL
    pub fn unfollow(&self, user_name: &str, feed_url: &str) -> GatorResult<()> {
        self.follows.delete_by_user_name_and_url(user_name, feed_url)?;
        tracing::debug!(user = %user_name, url = %feed_url, "unfollowed feed");
        Ok(())
    }

    /// Names of the feeds a user follows, oldest follow first
    pub fn list_followed(&self, user: &User) -> GatorResult<impl Iterator<Item = String>> {
        let follows = self.follows.list_for_user(user.id)?;
        Ok(follows.into_iter().map(|view| view.feed_name))
    }
}
