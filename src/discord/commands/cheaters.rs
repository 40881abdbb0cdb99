use poise::serenity_prelude as serenity;
use tracing::instrument;

use crate::discord::bot::Context;
use crate::discord::commands::resolve_target;
use crate::discord::embeds;
use crate::error::AppError;
use crate::leetify::MatchFeed;
use crate::stats;

/// Count cheaters detected in recent matches
#[poise::command(slash_command)]
#[instrument(skip(ctx), fields(author_id = %ctx.author().id))]
pub async fn cheaters(
    ctx: Context<'_>,
    #[description = "User to inspect (defaults to you)"] user: Option<serenity::User>,
    #[description = "How many matches to analyze (1-100, default 20)"] limit: Option<u32>,
) -> Result<(), AppError> {
    let (target, steam_id) = resolve_target(&ctx, user).await?;

    ctx.defer().await?;

    let matches = ctx.data().feed.list_recent(&steam_id).await?;
    if matches.is_empty() {
        return Err(AppError::NoData);
    }

    let limit = limit.unwrap_or(20).clamp(1, 100) as usize;
    let window = &matches[..matches.len().min(limit)];
    let report = stats::analyze_cheaters(window);

    let embed = embeds::cheater_report_embed(target.display_name(), &report);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
