//! Page walker: drives a per-item action over a paginated user listing.
//!
//! The walker requests page after page, strictly one at a time, and stops
//! when the cursor reports no next page or the current page is the last
//! one. Any error from the API or from the action ends the walk at once;
//! work already done on earlier items stays done.

use async_trait::async_trait;

use crate::config::MAX_PER_PAGE;
use crate::error::Result;
use crate::github::{Collection, Page, SocialGraph, User};

/// Side effect applied to every user a walk visits.
#[async_trait]
pub trait ItemAction: Send {
    /// Handles one user. Returning an error aborts the walk.
    async fn apply(&mut self, api: &dyn SocialGraph, user: &User) -> Result<()>;
}

/// Counters for a finished walk, used for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkSummary {
    pub pages: u32,
    pub items: u64,
}

/// Walks `collection` of `username` starting at `start_page`.
///
/// `start_page` values below 1 start at 1 and `per_page` is clamped to the
/// range the API accepts. A cursor whose next page does not move forward is
/// treated as the end of the listing, so no page is ever requested twice.
///
/// # Errors
///
/// Propagates the first error returned by the API or by `action`.
pub async fn walk(
    api: &dyn SocialGraph,
    collection: Collection,
    username: &str,
    start_page: u32,
    per_page: u32,
    action: &mut dyn ItemAction,
) -> Result<WalkSummary> {
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    let mut page = start_page.max(1);
    let mut summary = WalkSummary::default();

    loop {
        let Page { items, cursor } = api.list_users(collection, username, page, per_page).await?;
        summary.pages += 1;
        log::debug!(
            "Fetched page collection={} user={} page={} per_page={} items={} next={} last={}",
            collection,
            username,
            page,
            cursor.per_page,
            items.len(),
            cursor.next_page,
            cursor.last_page
        );

        for user in &items {
            action.apply(api, user).await?;
            summary.items += 1;
        }

        if cursor.is_exhausted() || cursor.next_page <= page {
            break;
        }
        page = cursor.next_page;
    }

    Ok(summary)
}
