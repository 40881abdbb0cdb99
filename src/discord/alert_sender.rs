use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, CreateMessage, Http};
use tracing::{debug, error, warn};

use super::embeds;
use crate::poller::{AlertDispatch, MatchAlert, SummaryEntry};
use crate::stats;
use crate::store::SettingSource;

/// Delivers poller output to the configured Discord notification channel.
/// When no channel is configured everything is dropped quietly; send
/// failures are logged and swallowed so the loops keep running.
pub struct DiscordAlertSender<S> {
    http: Arc<Http>,
    settings: Arc<S>,
}

impl<S: SettingSource> DiscordAlertSender<S> {
    pub fn new(http: Arc<Http>, settings: Arc<S>) -> Self {
        Self { http, settings }
    }

    async fn notification_channel(&self) -> Option<ChannelId> {
        let channel = self.settings.get_notification_channel().await;
        if channel.is_none() {
            debug!("🎮 No notification channel configured, dropping broadcast");
        }
        channel
    }

    async fn send(&self, channel: ChannelId, message: CreateMessage) {
        if let Err(e) = channel.send_message(&self.http, message).await {
            error!(error = %e, channel_id = %channel, "🎮 ❌ Failed to send notification");
        }
    }
}

#[async_trait]
impl<S: SettingSource> AlertDispatch for DiscordAlertSender<S> {
    async fn dispatch_match_alert(&self, alert: MatchAlert) {
        let Some(channel) = self.notification_channel().await else {
            return;
        };

        let Some(stat) = stats::extract_player_stat(&alert.detail, &alert.steam_id) else {
            warn!(
                discord_id = %alert.discord_id,
                match_id = %alert.detail.id,
                "🎮 ⚠️ Player missing from match detail, skipping alert"
            );
            return;
        };

        let embed = embeds::notification_embed(&alert, stat);
        self.send(channel, CreateMessage::new().embed(embed)).await;
    }

    async fn dispatch_engagement(&self, message: &str) {
        let Some(channel) = self.notification_channel().await else {
            return;
        };

        self.send(channel, CreateMessage::new().content(message))
            .await;
    }

    async fn dispatch_daily_summary(&self, entries: Vec<SummaryEntry>) {
        let Some(channel) = self.notification_channel().await else {
            return;
        };

        let embed = embeds::daily_summary_embed(&entries);
        self.send(channel, CreateMessage::new().embed(embed)).await;
    }
}
