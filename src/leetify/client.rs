use std::fmt::Debug;
use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::MatchFeed;
use super::types::{MatchSummary, Profile};
use crate::error::FeedError;

const BASE_URL: &str = "https://api-public.cs-prod.leetify.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct LeetifyClient {
    client: reqwest::Client,
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    /// Leetify API key, sent as the `_leetify_key` header.
    key: String,
}

impl Debug for LeetifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeetifyClient").finish_non_exhaustive()
    }
}

impl LeetifyClient {
    pub fn new(key: String, rate_limit_per_second: NonZeroU32) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            limiter: RateLimiter::direct(Quota::per_second(rate_limit_per_second)),
            key,
        }
    }

    async fn get<T: DeserializeOwned + Debug>(&self, path: String) -> Result<T, FeedError> {
        self.limiter.until_ready().await;

        let res = self
            .client
            .get(path)
            .header("_leetify_key", &self.key)
            .send()
            .await
            .map_err(FeedError::Transport)?;
        match res.status() {
            StatusCode::OK => res.json().await.map_err(FeedError::Transport),
            status => Err(FeedError::Status(status)),
        }
    }
}

#[async_trait]
impl MatchFeed for LeetifyClient {
    async fn list_recent(&self, steam_id: &str) -> Result<Vec<MatchSummary>, FeedError> {
        tracing::trace!(steam_id, "🌐 list_recent");

        let path = format!("{BASE_URL}/v3/profile/matches?steam64_id={steam_id}");
        self.get(path).await
    }

    async fn get_detail(&self, match_id: &str) -> Result<MatchSummary, FeedError> {
        tracing::trace!(match_id, "🌐 get_detail");

        let path = format!("{BASE_URL}/v2/matches/{match_id}");
        self.get(path).await
    }

    async fn get_profile(&self, steam_id: &str) -> Result<Profile, FeedError> {
        tracing::trace!(steam_id, "🌐 get_profile");

        let path = format!("{BASE_URL}/v3/profile?steam64_id={steam_id}");
        self.get(path).await
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::LeetifyClient;
    use crate::error::FeedError;
    use crate::leetify::MatchFeed;

    fn api_key() -> String {
        dotenvy::dotenv().ok();
        std::env::var("LEETIFY_TOKEN").unwrap()
    }

    fn test_client(key: String) -> LeetifyClient {
        LeetifyClient::new(key, NonZeroU32::new(5).unwrap())
    }

    #[tokio::test]
    #[ignore = "API key required"]
    async fn list_recent_works() {
        let client = test_client(api_key());

        let matches = client
            .list_recent("76561198000000000")
            .await
            .unwrap();

        println!("Fetched {} matches", matches.len());
    }

    #[tokio::test]
    async fn get_propagates_transport_error() {
        let client = test_client("invalid-key".to_string());

        let res: Result<(), FeedError> = client.get("ht!tp://invalid-url".to_string()).await;

        assert!(matches!(res, Err(FeedError::Transport(_))));
    }

    #[test]
    fn retryable_classification() {
        let server = FeedError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let client_side = FeedError::Status(reqwest::StatusCode::NOT_FOUND);

        assert!(server.is_retryable());
        assert!(!client_side.is_retryable());
    }
}
