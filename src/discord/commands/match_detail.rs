use std::collections::HashMap;

use tracing::instrument;

use crate::discord::bot::Context;
use crate::discord::embeds;
use crate::error::AppError;
use crate::leetify::MatchFeed;
use crate::store::IdentitySource;

/// Show a detailed breakdown of one match
#[poise::command(slash_command)]
#[instrument(skip(ctx), fields(author_id = %ctx.author().id, match_id = %match_id))]
pub async fn match_detail(
    ctx: Context<'_>,
    #[description = "Match ID"] match_id: String,
) -> Result<(), AppError> {
    ctx.defer().await?;

    let detail = ctx.data().feed.get_detail(&match_id).await?;

    // Only registered players get a scoreboard field, mentioned by their
    // Discord account.
    let links = ctx.data().store.get_all_links().await;
    let steam_to_discord: HashMap<&str, &str> = links
        .iter()
        .map(|(discord_id, steam_id)| (steam_id.as_str(), discord_id.as_str()))
        .collect();

    let registered_rows: Vec<_> = detail
        .stats
        .iter()
        .filter_map(|stat| {
            steam_to_discord
                .get(stat.steam64_id.as_str())
                .map(|discord_id| (format!("<@{discord_id}>"), stat))
        })
        .collect();

    let embed = embeds::match_embed(&detail, &registered_rows);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
