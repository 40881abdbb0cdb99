use poise::serenity_prelude::{self as serenity, Mentionable};
use tracing::{info, instrument};

use crate::discord::bot::Context;
use crate::discord::embeds;
use crate::error::AppError;
use crate::store::IdentitySource;

/// Link a Steam ID to a Discord user
#[poise::command(slash_command)]
#[instrument(
    skip(ctx),
    fields(
        author_id = %ctx.author().id,
        target_id = %user.id,
        steam_id = %steam_id
    )
)]
pub async fn register(
    ctx: Context<'_>,
    #[description = "User to link"] user: serenity::User,
    #[description = "Steam64 ID"] steam_id: String,
) -> Result<(), AppError> {
    ctx.data()
        .store
        .link_steam_id(&user.id.to_string(), &steam_id)
        .await?;

    let embed = embeds::registration_embed(&user.mention().to_string(), &steam_id);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    info!("Identity linked");

    Ok(())
}
