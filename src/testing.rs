//! In-memory `SocialGraph` used by the walker and action tests.

use std::collections::BTreeSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::github::{Collection, Page, PageCursor, SocialGraph, User};

pub fn user(login: &str) -> User {
    User {
        login: login.to_string(),
        id: login.bytes().map(u64::from).sum(),
        html_url: format!("https://github.com/{login}"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub collection: Collection,
    pub username: String,
    pub page: u32,
    pub per_page: u32,
}

/// Serves scripted pages and records every call made against it.
#[derive(Default)]
pub struct FakeGraph {
    pages: Vec<(Vec<User>, u32, u32)>,
    fail_page: Option<u32>,
    page_delay: Option<Duration>,
    fail_follow: Option<String>,
    list_requests: Mutex<Vec<ListRequest>>,
    follow_calls: Mutex<Vec<String>>,
    unfollow_calls: Mutex<Vec<String>>,
    following: Mutex<BTreeSet<String>>,
}

impl FakeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the next page with its advertised `next` and `last` page numbers.
    pub fn with_page(mut self, items: Vec<User>, next_page: u32, last_page: u32) -> Self {
        self.pages.push((items, next_page, last_page));
        self
    }

    /// Makes every page request take `delay` before answering.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = Some(delay);
        self
    }

    pub fn failing_on_page(mut self, page: u32) -> Self {
        self.fail_page = Some(page);
        self
    }

    pub fn failing_follow_of(mut self, login: &str) -> Self {
        self.fail_follow = Some(login.to_string());
        self
    }

    pub fn already_following(self, login: &str) -> Self {
        self.following.lock().unwrap().insert(login.to_string());
        self
    }

    pub fn list_requests(&self) -> Vec<ListRequest> {
        self.list_requests.lock().unwrap().clone()
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.list_requests().into_iter().map(|r| r.page).collect()
    }

    pub fn requested_page_sizes(&self) -> Vec<u32> {
        self.list_requests().into_iter().map(|r| r.per_page).collect()
    }

    pub fn follow_calls(&self) -> Vec<String> {
        self.follow_calls.lock().unwrap().clone()
    }

    pub fn unfollow_calls(&self) -> Vec<String> {
        self.unfollow_calls.lock().unwrap().clone()
    }

    pub fn following(&self) -> BTreeSet<String> {
        self.following.lock().unwrap().clone()
    }
}

#[async_trait]
impl SocialGraph for FakeGraph {
    async fn current_user(&self) -> Result<User> {
        Ok(user("me"))
    }

    async fn list_users(
        &self,
        collection: Collection,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<User>> {
        self.list_requests.lock().unwrap().push(ListRequest {
            collection,
            username: username.to_string(),
            page,
            per_page,
        });

        if let Some(delay) = self.page_delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_page == Some(page) {
            return Err(Error::Api {
                status: 500,
                message: "Server Error".to_string(),
            });
        }

        let (items, next_page, last_page) = self
            .pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default();

        Ok(Page {
            items,
            cursor: PageCursor {
                page,
                per_page,
                next_page,
                last_page,
            },
        })
    }

    async fn follow(&self, login: &str) -> Result<()> {
        self.follow_calls.lock().unwrap().push(login.to_string());
        if self.fail_follow.as_deref() == Some(login) {
            return Err(Error::Api {
                status: 422,
                message: "Validation Failed".to_string(),
            });
        }
        self.following.lock().unwrap().insert(login.to_string());
        Ok(())
    }

    async fn unfollow(&self, login: &str) -> Result<()> {
        self.unfollow_calls.lock().unwrap().push(login.to_string());
        self.following.lock().unwrap().remove(login);
        Ok(())
    }
}
