use poise::serenity_prelude as serenity;
use tracing::{instrument, warn};

use crate::discord::bot::Context;
use crate::discord::embeds;
use crate::error::AppError;
use crate::leetify::MatchFeed;
use crate::stats;
use crate::store::IdentitySource;

const LEADERBOARD_MATCH_WINDOW: usize = 10;
const LEADERBOARD_SIZE: usize = 10;

/// Rank all registered users by mean K/D over their last 10 matches
#[poise::command(slash_command)]
#[instrument(skip(ctx), fields(author_id = %ctx.author().id))]
pub async fn leaderboard(ctx: Context<'_>) -> Result<(), AppError> {
    let links = ctx.data().store.get_all_links().await;
    if links.is_empty() {
        return Err(AppError::NoData);
    }

    ctx.defer().await?;

    let mut rows = Vec::new();
    for (discord_id, steam_id) in links {
        let matches = match ctx.data().feed.list_recent(&steam_id).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!(error = %e, discord_id, "🎮 ⚠️ Feed failed for leaderboard, skipping user");
                continue;
            }
        };

        let window = &matches[..matches.len().min(LEADERBOARD_MATCH_WINDOW)];
        // Users with no available matches are excluded, not ranked last.
        let Some(agg) = stats::average_stats(window, &steam_id) else {
            continue;
        };

        let name = match discord_id.parse::<u64>() {
            Ok(id) => match serenity::UserId::new(id).to_user(ctx).await {
                Ok(user) => user.display_name().to_string(),
                Err(_) => discord_id.clone(),
            },
            Err(_) => discord_id.clone(),
        };

        rows.push((name, agg));
    }

    if rows.is_empty() {
        return Err(AppError::NoData);
    }

    rows.sort_by(|a, b| {
        b.1.avg_kd
            .partial_cmp(&a.1.avg_kd)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows.truncate(LEADERBOARD_SIZE);

    let embed = embeds::leaderboard_embed(&rows);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
