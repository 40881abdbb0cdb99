use std::env;
use std::num::NonZeroU32;
use std::path::PathBuf;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub leetify_token: String,
    pub data_dir: PathBuf,
    pub poll_interval_secs: u64,
    pub engagement_interval_secs: u64,
    pub summary_interval_secs: u64,
    pub leetify_rate_limit_per_second: NonZeroU32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        const DEFAULT_POLL_INTERVAL_SECS: u64 = 2700; // 45 min
        const DEFAULT_ENGAGEMENT_INTERVAL_SECS: u64 = 14400; // 4 h
        const DEFAULT_SUMMARY_INTERVAL_SECS: u64 = 86400; // 24 h
        const DEFAULT_LEETIFY_RATE_LIMIT_PER_SECOND: u32 = 5;

        let discord_token = env::var("DISCORD_TOKEN")
            .map_err(|_| AppError::Config("DISCORD_TOKEN must be set".into()))?;

        let leetify_token = env::var("LEETIFY_TOKEN")
            .map_err(|_| AppError::Config("LEETIFY_TOKEN must be set".into()))?;

        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".into()).into();

        let poll_interval_secs = env::var("POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        let engagement_interval_secs = env::var("ENGAGEMENT_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_ENGAGEMENT_INTERVAL_SECS);

        let summary_interval_secs = env::var("SUMMARY_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SUMMARY_INTERVAL_SECS);

        let leetify_rate_limit_per_second = env::var("LEETIFY_RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|v| v.parse().ok())
            .and_then(NonZeroU32::new)
            .unwrap_or_else(|| {
                NonZeroU32::new(DEFAULT_LEETIFY_RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN)
            });

        Ok(Self {
            discord_token,
            leetify_token,
            data_dir,
            poll_interval_secs,
            engagement_interval_secs,
            summary_interval_secs,
            leetify_rate_limit_per_second,
        })
    }
}
