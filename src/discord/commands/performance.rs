use poise::serenity_prelude as serenity;
use tracing::instrument;

use crate::discord::bot::Context;
use crate::discord::commands::resolve_target;
use crate::discord::embeds;
use crate::error::AppError;
use crate::leetify::MatchFeed;
use crate::stats;

/// How many of the newest matches feed the performance averages.
const PERFORMANCE_MATCH_WINDOW: usize = 10;

/// Show recent performance stats (K/D, HS%, rating, win rate)
#[poise::command(slash_command)]
#[instrument(skip(ctx), fields(author_id = %ctx.author().id))]
pub async fn performance(
    ctx: Context<'_>,
    #[description = "User to inspect (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), AppError> {
    let (target, steam_id) = resolve_target(&ctx, user).await?;

    ctx.defer().await?;

    let matches = ctx.data().feed.list_recent(&steam_id).await?;
    if matches.is_empty() {
        return Err(AppError::NoData);
    }

    let window = &matches[..matches.len().min(PERFORMANCE_MATCH_WINDOW)];
    let agg = stats::average_stats(window, &steam_id).ok_or(AppError::NoData)?;

    let embed = embeds::performance_embed(target.display_name(), &agg);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
