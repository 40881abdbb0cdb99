use poise::serenity_prelude as serenity;

use crate::discord::bot::Context;
use crate::error::AppError;
use crate::store::IdentitySource;

mod cheaters;
mod config;
mod leaderboard;
mod match_detail;
mod performance;
mod profile;
mod recent;
mod register;

pub use cheaters::cheaters;
pub use config::config;
pub use leaderboard::leaderboard;
pub use match_detail::match_detail;
pub use performance::performance;
pub use profile::profile;
pub use recent::recent;
pub use register::register;

/// Resolves the command target (explicit user or the author) together with
/// their linked Steam ID.
pub(crate) async fn resolve_target(
    ctx: &Context<'_>,
    user: Option<serenity::User>,
) -> Result<(serenity::User, String), AppError> {
    let target = user.unwrap_or_else(|| ctx.author().clone());
    let steam_id = ctx
        .data()
        .store
        .get_steam_id(&target.id.to_string())
        .await
        .ok_or(AppError::NotRegistered)?;
    Ok((target, steam_id))
}
