use url::Url;

use crate::domain::{Feed, FeedFollow, User};
use crate::errors::{GatorError, GatorResult};
use crate::storage::traits::{FeedFollowRepository, FeedRepository, UserRepository};

pub struct FeedService<F: FeedRepository, W: FeedFollowRepository, U: UserRepository> {
    feeds: F,
    follows: W,
    users: U,
}

impl<F: FeedRepository, W: FeedFollowRepository, U: UserRepository> FeedService<F, W, U> {
    pub fn new(feeds: F, follows: W, users: U) -> Self {
        Self {
            feeds,
            follows,
            users,
        }
    }

    /// Register a new feed owned by `user` and follow it on their behalf
    pub fn add(&self, user: &User, name: &str, url: &str) -> GatorResult<Feed> {
        let parsed = Url::parse(url)
            .map_err(|e| GatorError::InvalidInput(format!("invalid feed URL {}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatorError::InvalidInput(format!(
                "feed URL must use http or https: {}",
                url
            )));
        }

        let feed = Feed::new(name.to_string(), url.to_string(), Some(user.id));
        self.feeds.create(&feed)?;
        self.follows.create(&FeedFollow::new(user.id, feed.id))?;

        tracing::info!(user = %user.name, feed = %feed.name, url = %feed.url, "added feed");
        Ok(feed)
    }

    /// Every feed with the name of the user who added it, if still known
    pub fn list_with_creators(&self) -> GatorResult<Vec<(Feed, Option<String>)>> {
        self.feeds
            .list()?
            .into_iter()
            .map(|feed| {
                let creator = match feed.user_id {
                    Some(id) => self.users.get_by_id(id)?.map(|u| u.name),
                    None => None,
                };
                Ok((feed, creator))
            })
            .collect()
    }
}
