//! Listing endpoints for subreddits, redditors and post comment trees.

use super::{RedditClient, Result, Target};
use crate::models::{
    Comment, DecodeError, EntityKind, FromThing, ListingPage, Post, Response, ThingId,
};
use log::debug;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Targets that have post and comment listings.
pub const LISTABLE: &[EntityKind] = &[EntityKind::Subreddit, EntityKind::Redditor];

/// Maximum page size the API honours.
pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sort {
    #[default]
    Hot,
    New,
    Top,
    Rising,
    Controversial,
    Random,
}

impl Sort {
    pub fn as_str(self) -> &'static str {
        match self {
            Sort::Hot => "hot",
            Sort::New => "new",
            Sort::Top => "top",
            Sort::Rising => "rising",
            Sort::Controversial => "controversial",
            Sort::Random => "random",
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sort {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hot" => Ok(Sort::Hot),
            "new" => Ok(Sort::New),
            "top" => Ok(Sort::Top),
            "rising" => Ok(Sort::Rising),
            "controversial" => Ok(Sort::Controversial),
            "random" => Ok(Sort::Random),
            other => Err(format!("unknown sort {:?}", other)),
        }
    }
}

/// Time window for `top` and `controversial` listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    Hour,
    Day,
    Week,
    Month,
    Year,
    #[default]
    All,
}

impl TimeWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hour" => Ok(TimeWindow::Hour),
            "day" => Ok(TimeWindow::Day),
            "week" => Ok(TimeWindow::Week),
            "month" => Ok(TimeWindow::Month),
            "year" => Ok(TimeWindow::Year),
            "all" => Ok(TimeWindow::All),
            other => Err(format!("unknown time window {:?}", other)),
        }
    }
}

impl RedditClient {
    /// GET a Listing and keep the children of type `T`.
    pub(crate) async fn listing<T: FromThing>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<ListingPage<T>> {
        match self.get_response(path, params).await? {
            Response::Listing(listing) => {
                let page = listing.into_page::<T>();
                debug!("Fetched {} items from {}", page.items.len(), path);
                Ok(page)
            }
            other => Err(DecodeError::UnknownKind(other.kind().to_string()).into()),
        }
    }

    /// Posts of the next queued subreddit or redditor.
    pub async fn posts(
        &self,
        sort: Sort,
        window: TimeWindow,
        limit: u32,
    ) -> Result<ListingPage<Post>> {
        self.selected_for("posts", LISTABLE)
            .await?
            .posts(sort, window, limit)
            .await
    }

    /// Comments of the next queued subreddit or redditor.
    pub async fn comments(
        &self,
        sort: Sort,
        window: TimeWindow,
        limit: u32,
    ) -> Result<ListingPage<Comment>> {
        self.selected_for("comments", LISTABLE)
            .await?
            .comments(sort, window, limit)
            .await
    }

    /// Comment tree of the next queued post.
    pub async fn post_comments(
        &self,
        sort: Sort,
        window: TimeWindow,
        limit: u32,
    ) -> Result<ListingPage<Comment>> {
        self.selected_for("post_comments", &[EntityKind::Post])
            .await?
            .post_comments(sort, window, limit)
            .await
    }
}

impl Target {
    fn posts_path(&self, sort: Sort) -> Result<String> {
        let name = self.check("posts", LISTABLE)?;
        Ok(match self.kind() {
            EntityKind::Redditor => format!("/u/{}/submitted/{}.json", name, sort),
            _ => format!("/r/{}/{}.json", name, sort),
        })
    }

    fn comments_path(&self) -> Result<String> {
        let name = self.check("comments", LISTABLE)?;
        Ok(match self.kind() {
            EntityKind::Redditor => format!("/u/{}/comments.json", name),
            _ => format!("/r/{}/comments.json", name),
        })
    }

    pub async fn posts(
        &self,
        sort: Sort,
        window: TimeWindow,
        limit: u32,
    ) -> Result<ListingPage<Post>> {
        let path = self.posts_path(sort)?;
        self.client
            .listing(&path, &[("limit", limit.to_string()), ("t", window.to_string())])
            .await
    }

    /// The page of posts following `after`.
    pub async fn posts_after(
        &self,
        sort: Sort,
        window: TimeWindow,
        limit: u32,
        after: &ThingId,
    ) -> Result<ListingPage<Post>> {
        let path = self.posts_path(sort)?;
        self.client
            .listing(
                &path,
                &[
                    ("limit", limit.to_string()),
                    ("t", window.to_string()),
                    ("after", after.to_string()),
                ],
            )
            .await
    }

    /// Newest posts published after `cursor`. An empty cursor asks for the
    /// newest page.
    pub async fn posts_newer_than(
        &self,
        cursor: &ThingId,
        limit: u32,
    ) -> Result<ListingPage<Post>> {
        let path = self.posts_path(Sort::New)?;
        self.client
            .listing(
                &path,
                &[("limit", limit.to_string()), ("before", cursor.to_string())],
            )
            .await
    }

    pub async fn comments(
        &self,
        sort: Sort,
        window: TimeWindow,
        limit: u32,
    ) -> Result<ListingPage<Comment>> {
        let path = self.comments_path()?;
        self.client
            .listing(
                &path,
                &[
                    ("sort", sort.to_string()),
                    ("limit", limit.to_string()),
                    ("t", window.to_string()),
                ],
            )
            .await
    }

    /// The page of comments following `after`.
    pub async fn comments_after(
        &self,
        sort: Sort,
        window: TimeWindow,
        limit: u32,
        after: &ThingId,
    ) -> Result<ListingPage<Comment>> {
        let path = self.comments_path()?;
        self.client
            .listing(
                &path,
                &[
                    ("sort", sort.to_string()),
                    ("limit", limit.to_string()),
                    ("t", window.to_string()),
                    ("after", after.to_string()),
                ],
            )
            .await
    }

    pub async fn comments_newer_than(
        &self,
        cursor: &ThingId,
        limit: u32,
    ) -> Result<ListingPage<Comment>> {
        let path = self.comments_path()?;
        self.client
            .listing(
                &path,
                &[
                    ("sort", Sort::New.to_string()),
                    ("limit", limit.to_string()),
                    ("before", cursor.to_string()),
                ],
            )
            .await
    }

    /// Top-level comments of a post.
    ///
    /// The endpoint answers with `[post listing, comment listing]`; anything
    /// shorter means there are no comments and no cursors.
    pub async fn post_comments(
        &self,
        sort: Sort,
        window: TimeWindow,
        limit: u32,
    ) -> Result<ListingPage<Comment>> {
        let name = self.check("post_comments", &[EntityKind::Post])?;
        let path = format!("/comments/{}", ThingId::from(name).base36());
        let value = self
            .client
            .get(
                &path,
                &[
                    ("sort", sort.to_string()),
                    ("limit", limit.to_string()),
                    ("showmore", "true".to_string()),
                    ("t", window.to_string()),
                ],
            )
            .await?;

        let mut parts: Vec<Value> = serde_json::from_value(value)?;
        if parts.len() < 2 {
            return Ok(ListingPage::default());
        }
        match Response::from_value(parts.swap_remove(1))? {
            Response::Listing(listing) => Ok(listing.into_page()),
            other => Err(DecodeError::UnknownKind(other.kind().to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[test]
    fn parses_sorts_and_windows() {
        assert_eq!("NEW".parse::<Sort>().unwrap(), Sort::New);
        assert_eq!("controversial".parse::<Sort>().unwrap().to_string(), "controversial");
        assert!("best".parse::<Sort>().is_err());
        assert_eq!("week".parse::<TimeWindow>().unwrap(), TimeWindow::Week);
        assert_eq!(TimeWindow::default(), TimeWindow::All);
    }

    #[test]
    fn builds_listing_paths() {
        let client = RedditClient::anonymous(ClientConfig::default()).unwrap();
        let sr = client.target(EntityKind::Subreddit, "rust+golang");
        assert_eq!(sr.posts_path(Sort::Top).unwrap(), "/r/rust+golang/top.json");
        assert_eq!(sr.comments_path().unwrap(), "/r/rust+golang/comments.json");

        let user = client.target(EntityKind::Redditor, "spez");
        assert_eq!(user.posts_path(Sort::New).unwrap(), "/u/spez/submitted/new.json");
        assert_eq!(user.comments_path().unwrap(), "/u/spez/comments.json");

        let post = client.target(EntityKind::Post, "t3_abc");
        assert!(matches!(
            post.posts_path(Sort::New),
            Err(super::super::RedditClientError::InvalidTarget { .. })
        ));
    }
}
