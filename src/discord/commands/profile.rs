use std::collections::HashMap;

use poise::serenity_prelude as serenity;
use tracing::instrument;

use crate::discord::bot::Context;
use crate::discord::commands::resolve_target;
use crate::discord::embeds;
use crate::error::AppError;
use crate::leetify::MatchFeed;
use crate::stats;
use crate::store::IdentitySource;

const SQUAD_SIZE: usize = 3;

/// Show the full profile: ranks, general stats and frequent squad
#[poise::command(slash_command)]
#[instrument(skip(ctx), fields(author_id = %ctx.author().id))]
pub async fn profile(
    ctx: Context<'_>,
    #[description = "User to inspect (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), AppError> {
    let (target, steam_id) = resolve_target(&ctx, user).await?;

    ctx.defer().await?;

    let profile = ctx.data().feed.get_profile(&steam_id).await?;

    let links = ctx.data().store.get_all_links().await;
    let steam_to_discord: HashMap<String, String> = links
        .into_iter()
        .map(|(discord_id, steam_id)| (steam_id, discord_id))
        .collect();

    let squad = if profile.recent_teammates.is_empty() {
        // The profile endpoint sometimes omits the teammates hint; derive
        // the squad from the recent matches instead.
        let matches = ctx.data().feed.list_recent(&steam_id).await.unwrap_or_default();
        let teammates = stats::top_teammates(&matches, &steam_id, SQUAD_SIZE);
        embeds::squad_rows(&teammates, &steam_to_discord)
    } else {
        profile
            .recent_teammates
            .iter()
            .take(SQUAD_SIZE)
            .map(|t| {
                let name = match steam_to_discord.get(&t.steam64_id) {
                    Some(discord_id) => format!("<@{discord_id}>"),
                    None => {
                        let short: String = t.steam64_id.chars().take(8).collect();
                        format!("Steam: {short}...")
                    }
                };
                (name, t.recent_matches_count)
            })
            .collect()
    };

    let embed = embeds::profile_embed(target.display_name(), &profile, &squad);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
