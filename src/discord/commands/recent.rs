use poise::serenity_prelude as serenity;
use tracing::instrument;

use crate::discord::bot::Context;
use crate::discord::commands::resolve_target;
use crate::discord::embeds;
use crate::error::AppError;
use crate::leetify::MatchFeed;

const RECENT_MATCH_WINDOW: usize = 5;

/// Show the latest matches with personal stats
#[poise::command(slash_command)]
#[instrument(skip(ctx), fields(author_id = %ctx.author().id))]
pub async fn recent(
    ctx: Context<'_>,
    #[description = "User to inspect (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), AppError> {
    let (target, steam_id) = resolve_target(&ctx, user).await?;

    ctx.defer().await?;

    let matches = ctx.data().feed.list_recent(&steam_id).await?;
    if matches.is_empty() {
        return Err(AppError::NoData);
    }

    let window = &matches[..matches.len().min(RECENT_MATCH_WINDOW)];

    let embed = embeds::recent_matches_embed(target.display_name(), window, &steam_id);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
