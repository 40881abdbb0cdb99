use poise::serenity_prelude::{self as serenity, Mentionable};
use tracing::{info, instrument};

use crate::discord::bot::Context;
use crate::error::AppError;
use crate::store::SettingSource;

/// Configure the bot for this server
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR",
    subcommands("channel")
)]
pub async fn config(_ctx: Context<'_>) -> Result<(), AppError> {
    // Parent command, subcommands handle the actual work
    Ok(())
}

/// Set the channel for match notifications and broadcasts
#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
#[instrument(skip(ctx), fields(author_id = %ctx.author().id))]
pub async fn channel(
    ctx: Context<'_>,
    #[description = "Channel for notifications (defaults to this one)"]
    #[channel_types("Text")]
    channel: Option<serenity::GuildChannel>,
) -> Result<(), AppError> {
    let channel_id = channel.map(|c| c.id).unwrap_or_else(|| ctx.channel_id());

    ctx.data()
        .store
        .set_notification_channel(channel_id)
        .await?;

    ctx.say(format!(
        "✅ {} will now receive match notifications!",
        channel_id.mention()
    ))
    .await?;

    info!(channel_id = %channel_id, "Notification channel configured");

    Ok(())
}
