use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::AppError;
use crate::leetify::LeetifyClient;
use crate::store::JsonStore;

use super::commands;
use super::embeds;

/// Shared data accessible in all commands.
#[derive(Debug)]
pub struct Data {
    pub store: Arc<JsonStore>,
    pub feed: Arc<LeetifyClient>,
}

pub type Context<'a> = poise::Context<'a, Data, AppError>;

pub fn create_framework(data: Data) -> poise::Framework<Data, AppError> {
    poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::register(),
                commands::performance(),
                commands::match_detail(),
                commands::profile(),
                commands::cheaters(),
                commands::recent(),
                commands::leaderboard(),
                commands::config(),
            ],
            on_error: |error| {
                Box::pin(async move {
                    handle_error(error).await;
                })
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!(
                    bot_name = %ready.user.name,
                    guild_count = ready.guilds.len(),
                    "🎮 Bot is ready"
                );
                Ok(data)
            })
        })
        .build()
}

/// Command errors become friendly messages where the failure is the user's
/// to fix, and a generic line where it is not.
fn user_facing_message(error: &AppError) -> String {
    match error {
        AppError::NotRegistered => {
            "This user has no linked Steam ID. Use `/register` first.".to_string()
        }
        AppError::NoData => "No recent match data found for this user.".to_string(),
        AppError::Feed(_) => "The stats service is unavailable right now, try again later.".to_string(),
        other => format!("Something went wrong: {other}"),
    }
}

async fn handle_error(error: poise::FrameworkError<'_, Data, AppError>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            let command_name = ctx.command().name.as_str();
            error!(
                error = %error,
                command = command_name,
                user_id = %ctx.author().id,
                "🎮 ❌ Command execution failed"
            );
            let reply = poise::CreateReply::default()
                .embed(embeds::error_embed(&user_facing_message(&error)));
            let _ = ctx.send(reply).await;
        }
        poise::FrameworkError::ArgumentParse { error, ctx, .. } => {
            warn!(
                error = %error,
                command = ctx.command().name.as_str(),
                "🎮 ⚠️ Invalid command argument"
            );
            let _ = ctx.say(format!("Invalid argument: {}", error)).await;
        }
        poise::FrameworkError::MissingUserPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            if let Some(perms) = missing_permissions {
                warn!(
                    permissions = %perms,
                    user_id = %ctx.author().id,
                    command = ctx.command().name.as_str(),
                    "🎮 ⚠️ User missing permissions"
                );
                let _ = ctx
                    .say(format!("You need these permissions: {}", perms))
                    .await;
            }
        }
        other => {
            error!(error = ?other, "🎮 ❌ Unhandled framework error");
        }
    }
}
