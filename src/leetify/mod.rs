//! Read-only adapter to the Leetify stats API.

use async_trait::async_trait;

use crate::error::FeedError;

mod client;
pub mod types;

pub use client::LeetifyClient;
pub use types::{MatchSummary, PlayerStat, Profile};

/// External collaborator contract for the upstream stats feed.
///
/// `list_recent` returns matches most-recent-first; the poller and every
/// command rely on that ordering.
#[async_trait]
pub trait MatchFeed: Send + Sync {
    async fn list_recent(&self, steam_id: &str) -> Result<Vec<MatchSummary>, FeedError>;

    async fn get_detail(&self, match_id: &str) -> Result<MatchSummary, FeedError>;

    async fn get_profile(&self, steam_id: &str) -> Result<Profile, FeedError>;
}
