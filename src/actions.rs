//! The four action functions: the page walker paired with a per-item effect.
//!
//! | Action      | Listing walked            | Per-item effect            |
//! |-------------|---------------------------|----------------------------|
//! | `Followers` | followers of the bot user | append to `followers.txt`  |
//! | `Following` | following of the bot user | append to `following.txt`  |
//! | `Follow`    | following of a target     | follow the user            |
//! | `Unfollow`  | following of the bot user | unfollow the user          |
//!
//! Every run starts again from page 1. A failed follow or unfollow aborts
//! the run instead of skipping to the next user.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::github::{Collection, SocialGraph, User};
use crate::results::{FOLLOWERS_FILE, FOLLOWING_FILE, ResultLog};
use crate::walker::{self, ItemAction, WalkSummary};

/// First page of every traversal.
const FIRST_PAGE: u32 = 1;

/// An action function selected by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Record the bot user's followers.
    Followers,
    /// Record the accounts the bot user follows.
    Following,
    /// Follow everyone `target` follows.
    Follow { target: String },
    /// Unfollow everyone the bot user follows.
    Unfollow,
}

impl Action {
    /// Runs one full traversal for the authenticated user `me`.
    ///
    /// # Errors
    ///
    /// Returns the first API, follow/unfollow or file error encountered.
    pub async fn run(
        &self,
        api: &dyn SocialGraph,
        me: &str,
        per_page: u32,
        results_dir: &Path,
    ) -> Result<WalkSummary> {
        let summary = match self {
            Action::Followers => {
                let mut record = RecordUsers::open(results_dir, FOLLOWERS_FILE)?;
                walker::walk(api, Collection::Followers, me, FIRST_PAGE, per_page, &mut record)
                    .await?
            }
            Action::Following => {
                let mut record = RecordUsers::open(results_dir, FOLLOWING_FILE)?;
                walker::walk(api, Collection::Following, me, FIRST_PAGE, per_page, &mut record)
                    .await?
            }
            Action::Follow { target } => {
                walker::walk(
                    api,
                    Collection::Following,
                    target,
                    FIRST_PAGE,
                    per_page,
                    &mut FollowUsers,
                )
                .await?
            }
            Action::Unfollow => {
                walker::walk(
                    api,
                    Collection::Following,
                    me,
                    FIRST_PAGE,
                    per_page,
                    &mut UnfollowUsers,
                )
                .await?
            }
        };

        log::info!(
            "Traversal finished action={} pages={} users={}",
            self.name(),
            summary.pages,
            summary.items
        );
        Ok(summary)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Followers => "followers",
            Action::Following => "following",
            Action::Follow { .. } => "follow",
            Action::Unfollow => "unfollow",
        }
    }
}

/// Writes each user to a result log and echoes it to stdout.
struct RecordUsers {
    log: ResultLog,
}

impl RecordUsers {
    fn open(dir: &Path, file_name: &str) -> Result<Self> {
        let log = ResultLog::open(dir, file_name)?;
        log::info!("Recording users file={}", log.path().display());
        Ok(Self { log })
    }
}

#[async_trait]
impl ItemAction for RecordUsers {
    async fn apply(&mut self, _api: &dyn SocialGraph, user: &User) -> Result<()> {
        self.log.append(user)?;
        println!("{user}");
        Ok(())
    }
}

struct FollowUsers;

#[async_trait]
impl ItemAction for FollowUsers {
    async fn apply(&mut self, api: &dyn SocialGraph, user: &User) -> Result<()> {
        api.follow(&user.login).await.inspect_err(|e| {
            log::error!("Follow failed user={}: {}", user.login, e);
        })?;
        log::info!("Followed user={}", user.login);
        Ok(())
    }
}

struct UnfollowUsers;

#[async_trait]
impl ItemAction for UnfollowUsers {
    async fn apply(&mut self, api: &dyn SocialGraph, user: &User) -> Result<()> {
        api.unfollow(&user.login).await.inspect_err(|e| {
            log::error!("Unfollow failed user={}: {}", user.login, e);
        })?;
        log::info!("Unfollowed user={}", user.login);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testing::{FakeGraph, user};
    use std::fs;

    #[tokio::test]
    async fn followers_are_written_to_followers_log() {
        let tmp = tempfile::tempdir().unwrap();
        let api = FakeGraph::new()
            .with_page(vec![user("a"), user("b")], 2, 2)
            .with_page(vec![user("c")], 0, 0);

        let summary = Action::Followers.run(&api, "me", 30, tmp.path()).await.unwrap();

        assert_eq!(summary.items, 3);
        let requests = api.list_requests();
        assert!(requests.iter().all(|r| r.collection == Collection::Followers));
        assert!(requests.iter().all(|r| r.username == "me"));

        let contents = fs::read_to_string(tmp.path().join(FOLLOWERS_FILE)).unwrap();
        let logins: Vec<&str> = contents
            .lines()
            .map(|l| l.split('\t').nth(1).unwrap())
            .collect();
        assert_eq!(logins, vec!["a", "b", "c"]);
        assert!(!tmp.path().join(FOLLOWING_FILE).exists());
    }

    #[tokio::test]
    async fn following_is_written_to_following_log() {
        let tmp = tempfile::tempdir().unwrap();
        let api = FakeGraph::new().with_page(vec![user("x")], 0, 0);

        Action::Following.run(&api, "me", 30, tmp.path()).await.unwrap();

        assert_eq!(api.list_requests()[0].collection, Collection::Following);
        let contents = fs::read_to_string(tmp.path().join(FOLLOWING_FILE)).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }

    #[tokio::test]
    async fn follow_walks_the_target_following_list() {
        let tmp = tempfile::tempdir().unwrap();
        let api = FakeGraph::new()
            .with_page(vec![user("a"), user("b")], 2, 2)
            .with_page(vec![user("c")], 0, 0);
        let action = Action::Follow {
            target: "octocat".to_string(),
        };

        action.run(&api, "me", 30, tmp.path()).await.unwrap();

        let requests = api.list_requests();
        assert!(requests.iter().all(|r| r.username == "octocat"));
        assert!(requests.iter().all(|r| r.collection == Collection::Following));
        assert_eq!(api.follow_calls(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn following_an_already_followed_user_completes() {
        let tmp = tempfile::tempdir().unwrap();
        let api = FakeGraph::new()
            .with_page(vec![user("a"), user("b")], 0, 0)
            .already_following("a");
        let before: Vec<String> = vec!["a".to_string()];
        assert_eq!(api.following().into_iter().collect::<Vec<_>>(), before);

        let action = Action::Follow {
            target: "octocat".to_string(),
        };
        let summary = action.run(&api, "me", 30, tmp.path()).await.unwrap();

        assert_eq!(summary.items, 2);
        assert_eq!(
            api.following().into_iter().collect::<Vec<_>>(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[tokio::test]
    async fn follow_failure_aborts_the_run() {
        let tmp = tempfile::tempdir().unwrap();
        let api = FakeGraph::new()
            .with_page(vec![user("a"), user("blocked"), user("c")], 2, 2)
            .with_page(vec![user("d")], 0, 0)
            .failing_follow_of("blocked");
        let action = Action::Follow {
            target: "octocat".to_string(),
        };

        let err = action.run(&api, "me", 30, tmp.path()).await.unwrap_err();

        assert!(matches!(err, Error::Api { status: 422, .. }));
        assert_eq!(api.follow_calls(), vec!["a", "blocked"]);
        assert_eq!(api.requested_pages(), vec![1]);
    }

    #[tokio::test]
    async fn unfollow_walks_own_following_list() {
        let tmp = tempfile::tempdir().unwrap();
        let api = FakeGraph::new()
            .with_page(vec![user("a")], 2, 2)
            .with_page(vec![user("b")], 0, 0)
            .already_following("a")
            .already_following("b");

        Action::Unfollow.run(&api, "me", 30, tmp.path()).await.unwrap();

        assert!(api.list_requests().iter().all(|r| r.username == "me"));
        assert_eq!(api.unfollow_calls(), vec!["a", "b"]);
        assert!(api.following().is_empty());
    }

    #[tokio::test]
    async fn every_run_restarts_at_page_one() {
        let tmp = tempfile::tempdir().unwrap();
        let api = FakeGraph::new()
            .with_page(vec![user("a")], 2, 2)
            .with_page(vec![user("b")], 0, 0);

        Action::Followers.run(&api, "me", 30, tmp.path()).await.unwrap();
        Action::Followers.run(&api, "me", 30, tmp.path()).await.unwrap();

        assert_eq!(api.requested_pages(), vec![1, 2, 1, 2]);
        let contents = fs::read_to_string(tmp.path().join(FOLLOWERS_FILE)).unwrap();
        assert_eq!(contents.lines().count(), 4);
    }
}
