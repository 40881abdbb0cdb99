use std::sync::Arc;
use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::info;

use crate::config::Config;
use crate::discord::{Data, DiscordAlertSender, create_framework};
use crate::error::AppError;
use crate::leetify::LeetifyClient;
use crate::poller::{EngagementLoop, MatchPoller};
use crate::store::JsonStore;

mod config;
mod discord;
mod error;
mod leetify;
mod logging;
mod poller;
mod stats;
mod store;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    logging::init();

    let config = Config::from_env()?;

    info!("🎮 Starting up");

    let store = Arc::new(JsonStore::new(&config.data_dir));
    let feed = Arc::new(LeetifyClient::new(
        config.leetify_token.clone(),
        config.leetify_rate_limit_per_second,
    ));

    let framework = create_framework(Data {
        store: store.clone(),
        feed: feed.clone(),
    });

    let mut client = serenity::ClientBuilder::new(
        &config.discord_token,
        serenity::GatewayIntents::non_privileged(),
    )
    .framework(framework)
    .await?;

    let sender = Arc::new(DiscordAlertSender::new(client.http.clone(), store.clone()));

    MatchPoller::new(
        feed.clone(),
        store.clone(),
        sender.clone(),
        Duration::from_secs(config.poll_interval_secs),
    )
    .start();

    EngagementLoop::new(
        feed,
        store,
        sender,
        Duration::from_secs(config.engagement_interval_secs),
        Duration::from_secs(config.summary_interval_secs),
    )
    .start();

    client.start().await?;

    Ok(())
}
