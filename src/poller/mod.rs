//! Background loops: the match poller and the engagement/broadcast loop.

use std::sync::Arc;

use async_trait::async_trait;

use crate::leetify::types::MatchSummary;

mod engagement;
mod match_poller;

pub use engagement::EngagementLoop;
pub use match_poller::MatchPoller;

/// A freshly detected match for one registered user, ready to be rendered
/// by the presentation layer. Plain data only.
#[derive(Debug, Clone)]
pub struct MatchAlert {
    pub discord_id: String,
    pub steam_id: String,
    pub detail: MatchSummary,
    /// Display names of other registered players who were in the match.
    pub registered_teammates: Vec<String>,
}

/// One row of the daily top-players summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryEntry {
    pub discord_id: String,
    pub avg_kd: f64,
    pub avg_rating: f64,
    pub win_rate: f64,
}

/// Sink for everything the background loops want to say. The Discord
/// implementation renders embeds and posts them to the configured
/// notification channel; delivery failures stay inside the implementation.
#[async_trait]
pub trait AlertDispatch: Send + Sync {
    async fn dispatch_match_alert(&self, alert: MatchAlert);

    async fn dispatch_engagement(&self, message: &str);

    async fn dispatch_daily_summary(&self, entries: Vec<SummaryEntry>);
}

#[async_trait]
impl<T: AlertDispatch + ?Sized> AlertDispatch for Arc<T> {
    async fn dispatch_match_alert(&self, alert: MatchAlert) {
        (**self).dispatch_match_alert(alert).await
    }

    async fn dispatch_engagement(&self, message: &str) {
        (**self).dispatch_engagement(message).await
    }

    async fn dispatch_daily_summary(&self, entries: Vec<SummaryEntry>) {
        (**self).dispatch_daily_summary(entries).await
    }
}
