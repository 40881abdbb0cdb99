//! Persistence seams and the JSON-file backed implementation.
//!
//! Each store is a single-key-atomic get/set surface: last writer wins,
//! no cross-key transactions. The scheduler and the command handlers only
//! ever see these traits.

use std::collections::HashMap;

use async_trait::async_trait;
use poise::serenity_prelude::ChannelId;

use crate::error::StoreError;

mod json;

pub use json::JsonStore;

/// Maps a Discord user id to the Steam64 id used by the stats provider.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    async fn get_steam_id(&self, discord_id: &str) -> Option<String>;

    /// Links a Steam ID to a Discord user, replacing any previous link.
    async fn link_steam_id(&self, discord_id: &str, steam_id: &str) -> Result<(), StoreError>;

    /// All registered links, keyed by Discord user id.
    async fn get_all_links(&self) -> HashMap<String, String>;
}

/// Per-user cursor over the match feed: the most recently seen match id.
#[async_trait]
pub trait CursorSource: Send + Sync {
    async fn get_last_seen(&self, discord_id: &str) -> Option<String>;

    /// Idempotent overwrite. Only the polling loop writes this, and only
    /// after a match has been fully processed.
    async fn set_last_seen(&self, discord_id: &str, match_id: &str) -> Result<(), StoreError>;
}

/// Process-wide broadcast destination, set by an admin command.
#[async_trait]
pub trait SettingSource: Send + Sync {
    async fn get_notification_channel(&self) -> Option<ChannelId>;

    async fn set_notification_channel(&self, channel_id: ChannelId) -> Result<(), StoreError>;
}
