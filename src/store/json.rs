use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use poise::serenity_prelude::ChannelId;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{CursorSource, IdentitySource, SettingSource};
use crate::error::StoreError;

const USERS_FILE: &str = "users.json";
const CURSORS_FILE: &str = "last_matches.json";
const CONFIG_FILE: &str = "config.json";

const NOTIFICATION_CHANNEL_KEY: &str = "notification_channel_id";

/// Store backed by three independent JSON documents under a data directory:
/// `users.json`, `last_matches.json` and `config.json`. Each document is a
/// flat string-to-string map rewritten whole on every set; fine for the
/// handful of users a Discord server registers.
#[derive(Debug)]
pub struct JsonStore {
    users: JsonDocument,
    cursors: JsonDocument,
    config: JsonDocument,
}

impl JsonStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self {
            users: JsonDocument::new(dir.join(USERS_FILE)),
            cursors: JsonDocument::new(dir.join(CURSORS_FILE)),
            config: JsonDocument::new(dir.join(CONFIG_FILE)),
        }
    }
}

/// One JSON document with single-key get/set semantics. A mutex serializes
/// the read-modify-write cycle so concurrent sets cannot drop each other's
/// keys.
#[derive(Debug)]
struct JsonDocument {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonDocument {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Loads the whole document. A missing file is an empty map; a corrupt
    /// or unreadable one degrades to empty with a warning so the rest of
    /// the bot keeps working.
    async fn load(&self) -> HashMap<String, String> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "💾 ⚠️ Corrupt store document, treating as empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "💾 Store document not found yet");
                HashMap::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "💾 ⚠️ Failed to read store document, treating as empty");
                HashMap::new()
            }
        }
    }

    async fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().await;
        self.load().await.remove(key)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let mut map = self.load().await;
        map.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(&map)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl IdentitySource for JsonStore {
    async fn get_steam_id(&self, discord_id: &str) -> Option<String> {
        self.users.get(discord_id).await
    }

    async fn link_steam_id(&self, discord_id: &str, steam_id: &str) -> Result<(), StoreError> {
        self.users.set(discord_id, steam_id).await?;
        debug!(discord_id, steam_id, "💾 Identity link saved");
        Ok(())
    }

    async fn get_all_links(&self) -> HashMap<String, String> {
        let _guard = self.users.lock.lock().await;
        self.users.load().await
    }
}

#[async_trait]
impl CursorSource for JsonStore {
    async fn get_last_seen(&self, discord_id: &str) -> Option<String> {
        self.cursors.get(discord_id).await
    }

    async fn set_last_seen(&self, discord_id: &str, match_id: &str) -> Result<(), StoreError> {
        self.cursors.set(discord_id, match_id).await?;
        debug!(discord_id, match_id, "💾 Cursor advanced");
        Ok(())
    }
}

#[async_trait]
impl SettingSource for JsonStore {
    async fn get_notification_channel(&self) -> Option<ChannelId> {
        self.config
            .get(NOTIFICATION_CHANNEL_KEY)
            .await
            .and_then(|v| v.parse::<u64>().ok())
            .map(ChannelId::new)
    }

    async fn set_notification_channel(&self, channel_id: ChannelId) -> Result<(), StoreError> {
        self.config
            .set(NOTIFICATION_CHANNEL_KEY, &channel_id.get().to_string())
            .await
    }
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude::ChannelId;

    use super::*;

    fn store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn identity_link_roundtrip_last_write_wins() {
        let (_dir, store) = store();

        assert_eq!(store.get_steam_id("42").await, None);

        store.link_steam_id("42", "765611980001").await.unwrap();
        store.link_steam_id("42", "765611980002").await.unwrap();

        assert_eq!(
            store.get_steam_id("42").await,
            Some("765611980002".to_string())
        );

        let links = store.get_all_links().await;
        assert_eq!(links.len(), 1);
    }

    #[tokio::test]
    async fn cursor_set_is_idempotent() {
        let (_dir, store) = store();

        store.set_last_seen("42", "match-x").await.unwrap();
        store.set_last_seen("42", "match-x").await.unwrap();

        assert_eq!(store.get_last_seen("42").await, Some("match-x".to_string()));
    }

    #[tokio::test]
    async fn documents_are_independent() {
        let (_dir, store) = store();

        store.link_steam_id("42", "765611980001").await.unwrap();
        store.set_last_seen("42", "match-x").await.unwrap();

        // A cursor write must not leak into the identity document.
        assert_eq!(
            store.get_steam_id("42").await,
            Some("765611980001".to_string())
        );
        assert_eq!(store.get_last_seen("42").await, Some("match-x".to_string()));
    }

    #[tokio::test]
    async fn corrupt_document_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("users.json"), b"{not json").unwrap();
        let store = JsonStore::new(dir.path());

        assert_eq!(store.get_steam_id("42").await, None);
        assert!(store.get_all_links().await.is_empty());

        // Writing repairs the document.
        store.link_steam_id("42", "765611980001").await.unwrap();
        assert_eq!(
            store.get_steam_id("42").await,
            Some("765611980001".to_string())
        );
    }

    #[tokio::test]
    async fn notification_channel_roundtrip() {
        let (_dir, store) = store();

        assert_eq!(store.get_notification_channel().await, None);

        store
            .set_notification_channel(ChannelId::new(123456789))
            .await
            .unwrap();

        assert_eq!(
            store.get_notification_channel().await,
            Some(ChannelId::new(123456789))
        );
    }
}
