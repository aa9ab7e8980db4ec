use crate::cli::interval::parse_interval;
use crate::cli::registry::{Command, State};
use crate::domain::User;
use crate::errors::GatorResult;
use crate::fetcher::{FetchContext, HttpFeedFetcher};
use crate::services::{FeedScheduler, FeedService, FollowService, UserService};
use crate::storage::sqlite::{
    SqliteFeedFollowRepository, SqliteFeedRepository, SqliteStorage, SqliteUserRepository,
};

fn user_service(storage: &SqliteStorage) -> UserService<SqliteUserRepository> {
    UserService::new(SqliteUserRepository::new(storage.clone()))
}

fn follow_service(
    storage: &SqliteStorage,
) -> FollowService<SqliteFeedRepository, SqliteFeedFollowRepository> {
    FollowService::new(
        SqliteFeedRepository::new(storage.clone()),
        SqliteFeedFollowRepository::new(storage.clone()),
    )
}

fn feed_service(
    storage: &SqliteStorage,
) -> FeedService<SqliteFeedRepository, SqliteFeedFollowRepository, SqliteUserRepository> {
    FeedService::new(
        SqliteFeedRepository::new(storage.clone()),
        SqliteFeedFollowRepository::new(storage.clone()),
        SqliteUserRepository::new(storage.clone()),
    )
}

pub fn register(state: &mut State, cmd: &Command) -> GatorResult<()> {
    let name = cmd.arg(0, "name")?;
    let user = user_service(&state.storage).register(name)?;
    state.config.set_user(&user.name)?;

    println!("User {} created, current user is now {}.", user.name, user.name);
    Ok(())
}

pub fn login(state: &mut State, cmd: &Command) -> GatorResult<()> {
    let name = cmd.arg(0, "name")?;
    let user = user_service(&state.storage).get(name)?;
    state.config.set_user(&user.name)?;

    println!("User has been set to {}", user.name);
    Ok(())
}

pub fn users(state: &mut State, _cmd: &Command) -> GatorResult<()> {
    let users = user_service(&state.storage).list()?;
    let current = state.config.current_user_name.as_deref();

    for user in users {
        if current == Some(user.name.as_str()) {
            println!("* {} (current)", user.name);
        } else {
            println!("* {}", user.name);
        }
    }
    Ok(())
}

pub fn reset(state: &mut State, _cmd: &Command) -> GatorResult<()> {
    user_service(&state.storage).reset()?;
    println!("User data has been reset.");
    Ok(())
}

pub fn feeds(state: &mut State, _cmd: &Command) -> GatorResult<()> {
    let feeds = feed_service(&state.storage).list_with_creators()?;

    if feeds.is_empty() {
        println!("No feeds yet.");
        return Ok(());
    }

    for (feed, creator) in feeds {
        println!("* {}", feed.name);
        println!("    URL: {}", feed.url);
        println!("    Creator: {}", creator.as_deref().unwrap_or("unknown"));
    }
    Ok(())
}

pub fn agg(state: &mut State, cmd: &Command) -> GatorResult<()> {
    let raw = cmd.arg(0, "interval")?;
    let interval = parse_interval(raw)?;

    // Nothing cancels this context. The loop ends on the first failed tick or when the
    // process is killed.
    let ctx = FetchContext::new().with_timeout(state.config.request_timeout());
    let scheduler = FeedScheduler::new(
        SqliteFeedRepository::new(state.storage.clone()),
        HttpFeedFetcher::new()?,
        ctx,
    );

    println!("Collecting feeds every {}", raw);
    scheduler.run_forever(interval, |poll| {
        println!();
        println!("{} ({})", poll.feed.name, poll.feed.url);
        for title in poll.item_titles() {
            println!("  * {}", title);
        }
    })
}

pub fn add_feed(state: &mut State, cmd: &Command, user: &User) -> GatorResult<()> {
    let name = cmd.arg(0, "name")?;
    let url = cmd.arg(1, "url")?;
    let feed = feed_service(&state.storage).add(user, name, url)?;

    println!("Feed {} has been added.", feed.name);
    println!("    URL: {}", feed.url);
    println!("{} now follows {}", user.name, feed.name);
    Ok(())
}

pub fn follow(state: &mut State, cmd: &Command, user: &User) -> GatorResult<()> {
    let url = cmd.arg(0, "url")?;
    let view = follow_service(&state.storage).follow(user, url)?;

    println!("{} now follows {}", view.user_name, view.feed_name);
    Ok(())
}

pub fn unfollow(state: &mut State, cmd: &Command, user: &User) -> GatorResult<()> {
    let url = cmd.arg(0, "url")?;
    follow_service(&state.storage).unfollow(&user.name, url)?;

    println!("{} unfollowed {}", user.name, url);
    Ok(())
}

pub fn following(state: &mut State, _cmd: &Command, user: &User) -> GatorResult<()> {
    let mut names = follow_service(&state.storage).list_followed(user)?.peekable();

    if names.peek().is_none() {
        println!("{} is not following any feeds.", user.name);
        return Ok(());
    }

    println!("{} follows:", user.name);
    for name in names {
        println!("* {}", name);
    }
    Ok(())
}
