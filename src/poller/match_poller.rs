use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::{StreamExt, stream};
use tracing::{debug, error, info, warn};

use super::{AlertDispatch, MatchAlert};
use crate::error::AppError;
use crate::leetify::MatchFeed;
use crate::store::{CursorSource, IdentitySource};

/// How many users a single tick checks at once. Users are independent, so
/// any fan-out is valid; this just keeps the burst against the API small.
const USER_FANOUT: usize = 4;

/// Periodic novelty detector over the per-user match feed.
///
/// Each tick compares the newest feed entry (`feed[0]`) against the stored
/// per-user cursor and dispatches exactly one alert per newly observed
/// match. Only position 0 is ever consulted: if a user finishes two matches
/// between ticks, or the upstream feed reorders, older entries are skipped
/// silently once the cursor moves past them. Known limitation, kept on
/// purpose.
///
/// The cursor is advanced only after the detail fetch and the dispatch
/// succeeded. A failed detail fetch leaves the cursor alone so the exact
/// same comparison reruns next tick and the alert is not lost.
pub struct MatchPoller<F, S, D> {
    feed: Arc<F>,
    store: Arc<S>,
    dispatcher: D,
    poll_interval: Duration,
}

impl<F, S, D> MatchPoller<F, S, D>
where
    F: MatchFeed + 'static,
    S: IdentitySource + CursorSource + 'static,
    D: AlertDispatch + 'static,
{
    pub fn new(feed: Arc<F>, store: Arc<S>, dispatcher: D, poll_interval: Duration) -> Self {
        Self {
            feed,
            store,
            dispatcher,
            poll_interval,
        }
    }

    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval_secs = self.poll_interval.as_secs(), "🔄 Match poller started");

            let mut interval = tokio::time::interval(self.poll_interval);

            loop {
                interval.tick().await;
                self.poll_once().await;
            }
        })
    }

    /// One tick across all registered users. Per-user failures are logged
    /// and isolated; they never abort the rest of the tick.
    async fn poll_once(&self) {
        let links = self.store.get_all_links().await;

        if links.is_empty() {
            debug!("🔄 No users registered, skipping poll cycle");
            return;
        }

        debug!(count = links.len(), "🔄 Polling {} user(s)", links.len());

        stream::iter(links)
            .for_each_concurrent(USER_FANOUT, |(discord_id, steam_id)| async move {
                if let Err(e) = self.check_user(&discord_id, &steam_id).await {
                    let retryable = match &e {
                        AppError::Feed(fe) => fe.is_retryable(),
                        _ => false,
                    };
                    warn!(
                        error = %e,
                        discord_id,
                        retryable,
                        "🔄 ⚠️ Failed to check user, retrying next tick"
                    );
                }
            })
            .await;
    }

    async fn check_user(&self, discord_id: &str, steam_id: &str) -> Result<(), AppError> {
        let matches = self.feed.list_recent(steam_id).await?;

        let Some(latest) = matches.first() else {
            debug!(discord_id, "🔄 Empty feed, nothing to compare");
            return Ok(());
        };

        let last_seen = self.store.get_last_seen(discord_id).await;
        if last_seen.as_deref() == Some(latest.id.as_str()) {
            debug!(discord_id, "🔄 No new match");
            return Ok(());
        }

        // Detail fetch failures bubble up before the cursor is touched, so
        // this match is retried on the next tick instead of being lost.
        let detail = self.feed.get_detail(&latest.id).await?;

        info!(
            discord_id,
            match_id = %latest.id,
            map = %detail.map_name,
            "🔄 ✅ New match detected"
        );

        let registered_teammates = self.registered_teammates(&detail, steam_id).await;

        self.dispatcher
            .dispatch_match_alert(MatchAlert {
                discord_id: discord_id.to_string(),
                steam_id: steam_id.to_string(),
                detail,
                registered_teammates,
            })
            .await;

        // Best-effort durability: a failed write means the alert may repeat
        // next tick, which beats losing it.
        if let Err(e) = self.store.set_last_seen(discord_id, &latest.id).await {
            error!(error = %e, discord_id, "🔄 ❌ Failed to persist cursor");
        }

        Ok(())
    }

    /// Display names of other registered players who appear on the match
    /// scoreboard, regardless of team.
    async fn registered_teammates(
        &self,
        detail: &crate::leetify::types::MatchSummary,
        steam_id: &str,
    ) -> Vec<String> {
        let links = self.store.get_all_links().await;
        let registered: HashSet<&str> = links.values().map(|s| s.as_str()).collect();

        detail
            .stats
            .iter()
            .filter(|s| s.steam64_id != steam_id && registered.contains(s.steam64_id.as_str()))
            .map(|s| s.display_name().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::MatchPoller;
    use crate::error::{FeedError, StoreError};
    use crate::leetify::types::{MatchSummary, PlayerStat};
    use crate::leetify::{MatchFeed, Profile};
    use crate::poller::{AlertDispatch, MatchAlert, SummaryEntry};
    use crate::store::{CursorSource, IdentitySource};

    fn summary(id: &str) -> MatchSummary {
        MatchSummary {
            id: id.to_string(),
            map_name: "de_inferno".to_string(),
            finished_at: None,
            winner_team_number: 2,
            has_banned_player: false,
            replay_url: None,
            team_scores: Vec::new(),
            stats: vec![PlayerStat {
                steam64_id: "steam-1".to_string(),
                name: Some("one".to_string()),
                initial_team_number: 2,
                total_kills: 10,
                total_deaths: 5,
                total_hs_kills: 5,
                total_damage: 1000,
                kd_ratio: 2.0,
                leetify_rating: 1.2,
                ct_leetify_rating: 0.0,
                t_leetify_rating: 0.0,
                mvps: 2,
                dpr: 80.0,
            }],
        }
    }

    #[derive(Default)]
    struct MockFeed {
        feeds: Mutex<HashMap<String, Vec<MatchSummary>>>,
        details: Mutex<HashMap<String, MatchSummary>>,
        fail_detail: Mutex<bool>,
        fail_feed_for: Mutex<Option<String>>,
    }

    impl MockFeed {
        async fn set_feed(&self, steam_id: &str, matches: Vec<MatchSummary>) {
            self.feeds
                .lock()
                .await
                .insert(steam_id.to_string(), matches);
        }

        async fn set_detail(&self, detail: MatchSummary) {
            self.details.lock().await.insert(detail.id.clone(), detail);
        }
    }

    #[async_trait]
    impl MatchFeed for MockFeed {
        async fn list_recent(&self, steam_id: &str) -> Result<Vec<MatchSummary>, FeedError> {
            if self.fail_feed_for.lock().await.as_deref() == Some(steam_id) {
                return Err(FeedError::Status(
                    reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                ));
            }
            Ok(self
                .feeds
                .lock()
                .await
                .get(steam_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn get_detail(&self, match_id: &str) -> Result<MatchSummary, FeedError> {
            if *self.fail_detail.lock().await {
                return Err(FeedError::Status(
                    reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                ));
            }
            Ok(self
                .details
                .lock()
                .await
                .get(match_id)
                .cloned()
                .unwrap_or_else(|| summary(match_id)))
        }

        async fn get_profile(&self, _steam_id: &str) -> Result<Profile, FeedError> {
            Err(FeedError::Status(reqwest::StatusCode::NOT_FOUND))
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        links: Mutex<HashMap<String, String>>,
        cursors: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl IdentitySource for MemoryStore {
        async fn get_steam_id(&self, discord_id: &str) -> Option<String> {
            self.links.lock().await.get(discord_id).cloned()
        }

        async fn link_steam_id(&self, discord_id: &str, steam_id: &str) -> Result<(), StoreError> {
            self.links
                .lock()
                .await
                .insert(discord_id.to_string(), steam_id.to_string());
            Ok(())
        }

        async fn get_all_links(&self) -> HashMap<String, String> {
            self.links.lock().await.clone()
        }
    }

    #[async_trait]
    impl CursorSource for MemoryStore {
        async fn get_last_seen(&self, discord_id: &str) -> Option<String> {
            self.cursors.lock().await.get(discord_id).cloned()
        }

        async fn set_last_seen(&self, discord_id: &str, match_id: &str) -> Result<(), StoreError> {
            self.cursors
                .lock()
                .await
                .insert(discord_id.to_string(), match_id.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingDispatcher {
        alerts: Mutex<Vec<MatchAlert>>,
    }

    #[async_trait]
    impl AlertDispatch for RecordingDispatcher {
        async fn dispatch_match_alert(&self, alert: MatchAlert) {
            self.alerts.lock().await.push(alert);
        }

        async fn dispatch_engagement(&self, _message: &str) {}

        async fn dispatch_daily_summary(&self, _entries: Vec<SummaryEntry>) {}
    }

    type TestPoller = MatchPoller<MockFeed, MemoryStore, Arc<RecordingDispatcher>>;

    fn poller() -> (Arc<MockFeed>, Arc<MemoryStore>, Arc<RecordingDispatcher>, TestPoller) {
        let feed = Arc::new(MockFeed::default());
        let store = Arc::new(MemoryStore::default());
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let poller = MatchPoller::new(
            feed.clone(),
            store.clone(),
            dispatcher.clone(),
            Duration::from_secs(60),
        );
        (feed, store, dispatcher, poller)
    }

    #[tokio::test]
    async fn first_poll_notifies_newest_match_and_sets_cursor() {
        let (feed, store, dispatcher, poller) = poller();
        store.link_steam_id("user-1", "steam-1").await.unwrap();
        feed.set_feed("steam-1", vec![summary("m2"), summary("m1")])
            .await;

        poller.poll_once().await;

        let alerts = dispatcher.alerts.lock().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].detail.id, "m2");
        assert_eq!(alerts[0].discord_id, "user-1");
        assert_eq!(store.get_last_seen("user-1").await, Some("m2".to_string()));
    }

    #[tokio::test]
    async fn unchanged_feed_produces_no_alert() {
        let (feed, store, dispatcher, poller) = poller();
        store.link_steam_id("user-1", "steam-1").await.unwrap();
        store.set_last_seen("user-1", "m2").await.unwrap();
        feed.set_feed("steam-1", vec![summary("m2")]).await;

        poller.poll_once().await;
        poller.poll_once().await;

        assert!(dispatcher.alerts.lock().await.is_empty());
        assert_eq!(store.get_last_seen("user-1").await, Some("m2".to_string()));
    }

    #[tokio::test]
    async fn empty_feed_is_skipped_without_state_change() {
        let (feed, store, dispatcher, poller) = poller();
        store.link_steam_id("user-1", "steam-1").await.unwrap();
        feed.set_feed("steam-1", vec![]).await;

        poller.poll_once().await;

        assert!(dispatcher.alerts.lock().await.is_empty());
        assert_eq!(store.get_last_seen("user-1").await, None);
    }

    #[tokio::test]
    async fn detail_failure_keeps_cursor_and_retries_next_tick() {
        let (feed, store, dispatcher, poller) = poller();
        store.link_steam_id("user-1", "steam-1").await.unwrap();
        feed.set_feed("steam-1", vec![summary("m3")]).await;

        *feed.fail_detail.lock().await = true;
        poller.poll_once().await;

        // Tick N: nothing delivered, cursor untouched.
        assert!(dispatcher.alerts.lock().await.is_empty());
        assert_eq!(store.get_last_seen("user-1").await, None);

        *feed.fail_detail.lock().await = false;
        poller.poll_once().await;

        // Tick N+1: exactly one alert for the same match, cursor advanced.
        let alerts = dispatcher.alerts.lock().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].detail.id, "m3");
        assert_eq!(store.get_last_seen("user-1").await, Some("m3".to_string()));
    }

    #[tokio::test]
    async fn one_user_failure_does_not_block_others() {
        let (feed, store, dispatcher, poller) = poller();
        store.link_steam_id("user-1", "steam-1").await.unwrap();
        store.link_steam_id("user-2", "steam-2").await.unwrap();
        feed.set_feed("steam-2", vec![summary("m7")]).await;
        *feed.fail_feed_for.lock().await = Some("steam-1".to_string());

        poller.poll_once().await;

        let alerts = dispatcher.alerts.lock().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].discord_id, "user-2");
    }

    #[tokio::test]
    async fn cursor_change_triggers_single_alert_for_feed_head_only() {
        let (feed, store, dispatcher, poller) = poller();
        store.link_steam_id("user-1", "steam-1").await.unwrap();
        store.set_last_seen("user-1", "m1").await.unwrap();
        // Two matches played between ticks: only the head is notified.
        feed.set_feed("steam-1", vec![summary("m3"), summary("m2"), summary("m1")])
            .await;

        poller.poll_once().await;

        let alerts = dispatcher.alerts.lock().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].detail.id, "m3");
        assert_eq!(store.get_last_seen("user-1").await, Some("m3".to_string()));
    }

    #[tokio::test]
    async fn alert_lists_other_registered_players_in_match() {
        let (feed, store, dispatcher, poller) = poller();
        store.link_steam_id("user-1", "steam-1").await.unwrap();
        store.link_steam_id("user-2", "steam-2").await.unwrap();

        let mut m = summary("m1");
        m.stats.push(PlayerStat {
            steam64_id: "steam-2".to_string(),
            name: Some("two".to_string()),
            initial_team_number: 3,
            total_kills: 1,
            total_deaths: 1,
            total_hs_kills: 0,
            total_damage: 100,
            kd_ratio: 1.0,
            leetify_rating: 0.9,
            ct_leetify_rating: 0.0,
            t_leetify_rating: 0.0,
            mvps: 0,
            dpr: 50.0,
        });
        feed.set_feed("steam-1", vec![m.clone()]).await;
        feed.set_detail(m).await;

        poller.poll_once().await;

        let alerts = dispatcher.alerts.lock().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].registered_teammates, vec!["two".to_string()]);
    }
}
