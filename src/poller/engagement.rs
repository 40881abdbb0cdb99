use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use super::{AlertDispatch, SummaryEntry};
use crate::leetify::MatchFeed;
use crate::stats;
use crate::store::IdentitySource;

/// Chance of actually posting an engagement message on a given tick, so the
/// channel does not get spammed on a fixed rhythm.
const ENGAGEMENT_CHANCE: f64 = 0.2;

/// How many of a user's newest matches feed the daily summary.
const SUMMARY_MATCH_WINDOW: usize = 5;

/// How many players the daily summary shows.
const SUMMARY_TOP_N: usize = 3;

const ENGAGEMENT_MESSAGES: &[&str] = &[
    "Anyone up for a comp?",
    "Time to climb that rating, or are we just going to cry about it?",
    "Your stats are slipping... come play!",
    "Nobody reaches Global alone (okay, the good ones do).",
    "Tip of the day: smokes exist. Use them.",
    "Practiced your spray today?",
    "Missing Mirage already...",
    "Who's in? 🔫",
    "I'm bored, someone feed me a match to analyze.",
    "That 1v3 yesterday was pure luck, by the way...",
];

/// Broadcast loop, independent from the match poller. Shares nothing with
/// it but the read-only notification channel setting (inside the
/// dispatcher). Posts occasional engagement messages and a daily top-player
/// summary.
pub struct EngagementLoop<F, S, D> {
    feed: Arc<F>,
    store: Arc<S>,
    dispatcher: D,
    engagement_interval: Duration,
    summary_interval: Duration,
}

impl<F, S, D> EngagementLoop<F, S, D>
where
    F: MatchFeed + 'static,
    S: IdentitySource + 'static,
    D: AlertDispatch + 'static,
{
    pub fn new(
        feed: Arc<F>,
        store: Arc<S>,
        dispatcher: D,
        engagement_interval: Duration,
        summary_interval: Duration,
    ) -> Self {
        Self {
            feed,
            store,
            dispatcher,
            engagement_interval,
            summary_interval,
        }
    }

    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                engagement_secs = self.engagement_interval.as_secs(),
                summary_secs = self.summary_interval.as_secs(),
                "📣 Engagement loop started"
            );

            let mut engagement = tokio::time::interval(self.engagement_interval);
            let mut summary = tokio::time::interval(self.summary_interval);
            // Skip the immediate first tick of both intervals.
            engagement.tick().await;
            summary.tick().await;

            loop {
                tokio::select! {
                    _ = engagement.tick() => self.maybe_send_engagement().await,
                    _ = summary.tick() => self.send_daily_summary().await,
                }
            }
        })
    }

    async fn maybe_send_engagement(&self) {
        let message = {
            let mut rng = rand::thread_rng();
            if rng.r#gen::<f64>() > ENGAGEMENT_CHANCE {
                None
            } else {
                ENGAGEMENT_MESSAGES.choose(&mut rng).copied()
            }
        };

        match message {
            Some(msg) => {
                info!("📣 Posting engagement message");
                self.dispatcher.dispatch_engagement(msg).await;
            }
            None => debug!("📣 Engagement roll failed, staying quiet"),
        }
    }

    async fn send_daily_summary(&self) {
        let entries = self.build_summary().await;

        if entries.is_empty() {
            debug!("📣 No users with data, skipping daily summary");
            return;
        }

        info!(count = entries.len(), "📣 Posting daily summary");
        self.dispatcher.dispatch_daily_summary(entries).await;
    }

    /// Top registered players by mean rating over their newest matches.
    /// Users whose feed fails or yields no data are left out.
    async fn build_summary(&self) -> Vec<SummaryEntry> {
        let links = self.store.get_all_links().await;
        let mut entries = Vec::new();

        for (discord_id, steam_id) in links {
            let matches = match self.feed.list_recent(&steam_id).await {
                Ok(matches) => matches,
                Err(e) => {
                    warn!(error = %e, discord_id, "📣 ⚠️ Feed failed for summary, skipping user");
                    continue;
                }
            };

            let window = &matches[..matches.len().min(SUMMARY_MATCH_WINDOW)];
            if let Some(agg) = stats::average_stats(window, &steam_id) {
                entries.push(SummaryEntry {
                    discord_id,
                    avg_kd: agg.avg_kd,
                    avg_rating: agg.avg_rating,
                    win_rate: agg.win_rate,
                });
            }
        }

        entries.sort_by(|a, b| {
            b.avg_rating
                .partial_cmp(&a.avg_rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        entries.truncate(SUMMARY_TOP_N);
        entries
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::EngagementLoop;
    use crate::error::{FeedError, StoreError};
    use crate::leetify::types::{MatchSummary, PlayerStat};
    use crate::leetify::{MatchFeed, Profile};
    use crate::poller::{AlertDispatch, MatchAlert, SummaryEntry};
    use crate::store::IdentitySource;

    struct RatedFeed {
        feeds: HashMap<String, Vec<MatchSummary>>,
    }

    #[async_trait]
    impl MatchFeed for RatedFeed {
        async fn list_recent(&self, steam_id: &str) -> Result<Vec<MatchSummary>, FeedError> {
            Ok(self.feeds.get(steam_id).cloned().unwrap_or_default())
        }

        async fn get_detail(&self, _match_id: &str) -> Result<MatchSummary, FeedError> {
            Err(FeedError::Status(reqwest::StatusCode::NOT_FOUND))
        }

        async fn get_profile(&self, _steam_id: &str) -> Result<Profile, FeedError> {
            Err(FeedError::Status(reqwest::StatusCode::NOT_FOUND))
        }
    }

    struct FixedLinks(HashMap<String, String>);

    #[async_trait]
    impl IdentitySource for FixedLinks {
        async fn get_steam_id(&self, discord_id: &str) -> Option<String> {
            self.0.get(discord_id).cloned()
        }

        async fn link_steam_id(&self, _: &str, _: &str) -> Result<(), StoreError> {
            Ok(())
        }

        async fn get_all_links(&self) -> HashMap<String, String> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct RecordingDispatcher {
        summaries: Mutex<Vec<Vec<SummaryEntry>>>,
    }

    #[async_trait]
    impl AlertDispatch for RecordingDispatcher {
        async fn dispatch_match_alert(&self, _alert: MatchAlert) {}

        async fn dispatch_engagement(&self, _message: &str) {}

        async fn dispatch_daily_summary(&self, entries: Vec<SummaryEntry>) {
            self.summaries.lock().await.push(entries);
        }
    }

    fn rated_match(id: &str, steam_id: &str, rating: f64) -> MatchSummary {
        MatchSummary {
            id: id.to_string(),
            map_name: "de_nuke".to_string(),
            finished_at: None,
            winner_team_number: 2,
            has_banned_player: false,
            replay_url: None,
            team_scores: Vec::new(),
            stats: vec![PlayerStat {
                steam64_id: steam_id.to_string(),
                name: None,
                initial_team_number: 2,
                total_kills: 10,
                total_deaths: 10,
                total_hs_kills: 5,
                total_damage: 900,
                kd_ratio: 1.0,
                leetify_rating: rating,
                ct_leetify_rating: 0.0,
                t_leetify_rating: 0.0,
                mvps: 0,
                dpr: 70.0,
            }],
        }
    }

    #[tokio::test]
    async fn summary_ranks_by_rating_and_truncates_to_top_three() {
        let mut feeds = HashMap::new();
        for (steam, rating) in [("s1", 0.9), ("s2", 1.4), ("s3", 1.1), ("s4", 1.2)] {
            feeds.insert(steam.to_string(), vec![rated_match("m", steam, rating)]);
        }
        // s5 has no matches at all and must be excluded.
        feeds.insert("s5".to_string(), vec![]);

        let links: HashMap<String, String> = (1..=5)
            .map(|i| (format!("u{i}"), format!("s{i}")))
            .collect();

        let dispatcher = Arc::new(RecordingDispatcher::default());
        let engagement = EngagementLoop::new(
            Arc::new(RatedFeed { feeds }),
            Arc::new(FixedLinks(links)),
            dispatcher.clone(),
            Duration::from_secs(1),
            Duration::from_secs(1),
        );

        engagement.send_daily_summary().await;

        let summaries = dispatcher.summaries.lock().await;
        assert_eq!(summaries.len(), 1);
        let top = &summaries[0];
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].discord_id, "u2");
        assert_eq!(top[1].discord_id, "u4");
        assert_eq!(top[2].discord_id, "u3");
    }

    #[tokio::test]
    async fn summary_with_no_eligible_users_dispatches_nothing() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let engagement = EngagementLoop::new(
            Arc::new(RatedFeed {
                feeds: HashMap::new(),
            }),
            Arc::new(FixedLinks(HashMap::new())),
            dispatcher.clone(),
            Duration::from_secs(1),
            Duration::from_secs(1),
        );

        engagement.send_daily_summary().await;

        assert!(dispatcher.summaries.lock().await.is_empty());
    }
}
