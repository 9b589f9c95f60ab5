//! GitHub REST API client.
//!
//! This module provides the small slice of the GitHub API the bot needs:
//! the authenticated user, paginated followers/following lists, and the
//! follow/unfollow endpoints. Requests go through `octocrab`; the page
//! numbers of its `next`/`last` links become the [`PageCursor`].
//!
//! # Examples
//!
//! ```no_run
//! use github_follow_bot::github::{Collection, GitHubClient, SocialGraph};
//!
//! # async fn demo(client: GitHubClient) -> github_follow_bot::error::Result<()> {
//! let me = client.current_user().await?;
//! let page = client.list_users(Collection::Followers, &me.login, 1, 30).await?;
//! println!("{} followers on page 1", page.items.len());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::time::Instant;

use async_trait::async_trait;
use http::Uri;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};

/// A GitHub account as it appears in followers/following listings.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Login handle, unique per account.
    pub login: String,
    /// Numeric account id.
    pub id: u64,
    /// Profile page URL.
    #[serde(default)]
    pub html_url: String,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id={}) {}", self.login, self.id, self.html_url)
    }
}

/// Which relationship list of a user to walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Followers,
    Following,
}

impl Collection {
    fn path_segment(self) -> &'static str {
        match self {
            Collection::Followers => "followers",
            Collection::Following => "following",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Pagination state reported alongside one page of results.
///
/// `next_page` and `last_page` are `0` when the API did not advertise them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCursor {
    pub page: u32,
    pub per_page: u32,
    pub next_page: u32,
    pub last_page: u32,
}

impl PageCursor {
    /// True when no further page should be requested.
    pub fn is_exhausted(&self) -> bool {
        self.next_page == 0 || self.page == self.last_page
    }
}

/// One page of a listing plus its cursor.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub cursor: PageCursor,
}

/// The social-graph operations the walker and actions rely on.
#[async_trait]
pub trait SocialGraph: Send + Sync {
    /// Returns the account the token belongs to.
    async fn current_user(&self) -> Result<User>;

    /// Fetches one page of `username`'s followers or following.
    async fn list_users(
        &self,
        collection: Collection,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<User>>;

    /// Follows `login` as the authenticated user.
    async fn follow(&self, login: &str) -> Result<()>;

    /// Unfollows `login` as the authenticated user.
    async fn unfollow(&self, login: &str) -> Result<()>;
}

/// Query string of the followers/following listings.
#[derive(Serialize)]
struct ListParams {
    page: u32,
    per_page: u32,
}

/// Client for the GitHub REST API authenticated with a personal token.
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    /// Creates a client for `config.api_url` authenticated with `config.token`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the API URL cannot be parsed, or
    /// `Error::Request` if the underlying client fails to build.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Octocrab::builder()
            .base_uri(config.api_url.as_str())
            .map_err(|_| Error::Config(format!("Invalid GitHub API URL: {}", config.api_url)))?
            .personal_token(config.token.clone())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl SocialGraph for GitHubClient {
    async fn current_user(&self) -> Result<User> {
        log::debug!("Fetching authenticated user");

        let start = Instant::now();
        let user: User = self
            .client
            .get("/user", None::<&()>)
            .await
            .map_err(|e| request_failed("GET /user", e))?;
        log::debug!(
            "GET /user completed duration_ms={} user={}",
            start.elapsed().as_millis(),
            user.login
        );

        Ok(user)
    }

    async fn list_users(
        &self,
        collection: Collection,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<User>> {
        log::debug!(
            "Listing users collection={} user={} page={} per_page={}",
            collection,
            username,
            page,
            per_page
        );

        let start = Instant::now();
        let listing: octocrab::Page<User> = self
            .client
            .get(
                format!("/users/{username}/{collection}"),
                Some(&ListParams { page, per_page }),
            )
            .await
            .map_err(|e| request_failed("GET listing", e))?;
        log::debug!(
            "List request completed collection={} user={} page={} items={} duration_ms={}",
            collection,
            username,
            page,
            listing.items.len(),
            start.elapsed().as_millis()
        );

        Ok(Page {
            cursor: PageCursor {
                page,
                per_page,
                next_page: page_number(listing.next.as_ref()),
                last_page: page_number(listing.last.as_ref()),
            },
            items: listing.items,
        })
    }

    async fn follow(&self, login: &str) -> Result<()> {
        let start = Instant::now();
        let response = self
            .client
            ._put(format!("/user/following/{login}"), None::<&()>)
            .await
            .map_err(|e| request_failed("PUT follow", e))?;
        let response = octocrab::map_github_error(response)
            .await
            .map_err(|e| request_failed("PUT follow", e))?;
        log::debug!(
            "PUT follow completed user={} duration_ms={} status={:?}",
            login,
            start.elapsed().as_millis(),
            response.status()
        );
        Ok(())
    }

    async fn unfollow(&self, login: &str) -> Result<()> {
        let start = Instant::now();
        let response = self
            .client
            ._delete(format!("/user/following/{login}"), None::<&()>)
            .await
            .map_err(|e| request_failed("DELETE follow", e))?;
        let response = octocrab::map_github_error(response)
            .await
            .map_err(|e| request_failed("DELETE follow", e))?;
        log::debug!(
            "DELETE follow completed user={} duration_ms={} status={:?}",
            login,
            start.elapsed().as_millis(),
            response.status()
        );
        Ok(())
    }
}

/// Logs a failed request and converts the octocrab error.
fn request_failed(request: &str, e: octocrab::Error) -> Error {
    let err = Error::from(e);
    log::error!("GitHub request failed request={} error={}", request, err);
    err
}

/// Reads the `page` query parameter of a pagination link, `0` when absent.
fn page_number(link: Option<&Uri>) -> u32 {
    link.and_then(Uri::query)
        .and_then(|query| query.split('&').find_map(|pair| pair.strip_prefix("page=")))
        .and_then(|page| page.parse().ok())
        .unwrap_or(0)
}
