//! Embed rendering. Pure data-to-`CreateEmbed` functions, no I/O.

use poise::serenity_prelude::{CreateEmbed, CreateEmbedFooter};

use crate::leetify::types::{MatchSummary, PlayerStat, Profile};
use crate::poller::{MatchAlert, SummaryEntry};
use crate::stats::{self, AggregateStats, CheaterReport, TeammateCount};

const COLOR_INFO: u32 = 0x0099ff;
const COLOR_SUCCESS: u32 = 0x00ff00;
const COLOR_DANGER: u32 = 0xff0000;
const COLOR_GOLD: u32 = 0xffd700;
const COLOR_HISTORY: u32 = 0x9900ff;
const COLOR_PROFILE: u32 = 0x00d9ff;

/// The commentary ladder the notification and performance embeds attach to
/// a K/D value.
pub fn kd_comment(kd: f64) -> &'static str {
    if kd < 0.6 {
        "💀 **Playing with the monitor off?**"
    } else if kd < 0.8 {
        "🥔 **Certified paperweight.**"
    } else if kd < 1.0 {
        "📉 **Going negative hurts, huh.**"
    } else if kd < 1.2 {
        "😐 **Honest work. At least it's not negative.**"
    } else if kd < 1.5 {
        "🔥 **On fire!**"
    } else if kd < 2.0 {
        "👽 **Definitely smurfing.**"
    } else {
        "🤖 **SPINBOT ENGAGED?**"
    }
}

pub fn error_embed(message: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("❌ Error")
        .description(message)
        .color(COLOR_DANGER)
}

pub fn registration_embed(mention: &str, steam_id: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("✅ Registration Complete")
        .description(format!("{mention} linked successfully!"))
        .color(COLOR_SUCCESS)
        .field("Steam ID", format!("`{steam_id}`"), false)
}

pub fn performance_embed(display_name: &str, agg: &AggregateStats) -> CreateEmbed {
    let comment = kd_comment(agg.avg_kd);

    CreateEmbed::new()
        .title(format!("📊 Performance of {display_name}"))
        .description(format!(
            "Based on the last **{}** matches\n\n{comment}",
            agg.matches_count
        ))
        .color(COLOR_INFO)
        .field("K/D", format!("**{:.2}**", agg.avg_kd), true)
        .field("HS%", format!("🎯 **{:.1}%**", agg.avg_hs_pct), true)
        .field("Rating", format!("⭐ **{:.2}**", agg.avg_rating), true)
        .field("Win Rate", format!("🏆 **{:.1}%**", agg.win_rate), true)
        .field("Wins", format!("{}/{}", agg.wins, agg.matches_count), true)
        .field(
            "Total K/D",
            format!("💀 {}/{}", agg.total_kills, agg.total_deaths),
            true,
        )
}

/// Detailed view of one match; `registered_rows` pairs a display name with
/// that player's scoreboard row.
pub fn match_embed(detail: &MatchSummary, registered_rows: &[(String, &PlayerStat)]) -> CreateEmbed {
    let mut description = format!("**Score**: {} x {}", detail.score_of(2), detail.score_of(3));
    if detail.has_banned_player {
        description = format!("⚠️ **Banned player detected in this match**\n{description}");
    }

    let mut embed = CreateEmbed::new()
        .title(format!("🎮 Match Analysis - {}", detail.map_display()))
        .description(description)
        .color(if detail.has_banned_player {
            COLOR_DANGER
        } else {
            COLOR_INFO
        })
        .footer(CreateEmbedFooter::new(format!("Match ID: {}", detail.id)));

    for (display_name, stat) in registered_rows {
        embed = embed.field(
            format!("👤 {display_name}"),
            format!(
                "**K/D**: {:.2} ({} / {}) | 🎯 **HS**: {}\n⭐ **MVPs**: {} | 💥 **DPR**: {:.1}\n📊 **Rating**: {:.3} (CT: {:.3} / T: {:.3})\n💢 **Damage**: {}",
                stat.kd_ratio,
                stat.total_kills,
                stat.total_deaths,
                stat.total_hs_kills,
                stat.mvps,
                stat.dpr,
                stat.leetify_rating,
                stat.ct_leetify_rating,
                stat.t_leetify_rating,
                stat.total_damage,
            ),
            false,
        );
    }

    if let Some(url) = &detail.replay_url {
        embed = embed.field("🎬 Watch Replay", format!("[Click here]({url})"), false);
    }

    embed
}

/// `squad` pairs a display name with a shared-match count.
pub fn profile_embed(
    display_name: &str,
    profile: &Profile,
    squad: &[(String, i64)],
) -> CreateEmbed {
    let mut rank_text = format!(
        "**Premier**: {} ⭐\n**Leetify**: {}",
        profile
            .ranks
            .premier
            .map(|r| r.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        profile
            .ranks
            .leetify
            .map(|r| format!("{r:.2}"))
            .unwrap_or_else(|| "N/A".to_string()),
    );

    let mut best_maps = profile.ranks.competitive.clone();
    best_maps.sort_by(|a, b| b.rank.cmp(&a.rank));
    if !best_maps.is_empty() {
        rank_text.push_str("\n**Best Maps:**");
        for m in best_maps.iter().take(3) {
            rank_text.push_str(&format!(
                "\n  • {}: Rank {}",
                m.map_name.trim_start_matches("de_"),
                m.rank
            ));
        }
    }

    let winrate_pct = profile.winrate * 100.0;
    let wins = (profile.total_matches as f64 * profile.winrate).round() as i64;
    let stats_text = format!(
        "**Win Rate**: {winrate_pct:.1}% ({wins}W/{}L)\n**HS%**: 🎯 {:.1}%\n**Pre-Aim**: {:.1}ms\n**Total**: {} matches",
        profile.total_matches - wins,
        profile.stats.accuracy_head,
        profile.stats.preaim,
        profile.total_matches,
    );

    let mut embed = CreateEmbed::new()
        .title(format!("📋 Profile of {display_name}"))
        .description(format!(
            "Steam: {}",
            profile.name.as_deref().unwrap_or("Unknown")
        ))
        .color(COLOR_PROFILE)
        .field("🏆 Ranks", rank_text, false)
        .field("📊 General Stats", stats_text, false);

    if !squad.is_empty() {
        let medals = ["🥇", "🥈", "🥉"];
        let mut squad_text = String::new();
        for (idx, (name, count)) in squad.iter().enumerate() {
            let medal = medals
                .get(idx)
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{}.", idx + 1));
            squad_text.push_str(&format!("{medal} {name} - {count} matches\n"));
        }
        embed = embed.field("👥 Frequent Squad", squad_text, false);
    }

    embed
}

pub fn cheater_report_embed(display_name: &str, report: &CheaterReport) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(format!("⚠️ Cheater Report - {display_name}"))
        .description("Recent match analysis")
        .color(if report.total > 0 {
            COLOR_DANGER
        } else {
            COLOR_SUCCESS
        })
        .field(
            "📊 Summary",
            format!(
                "**{}** matches with cheaters ({:.1}%)",
                report.total, report.percentage
            ),
            false,
        );

    if report.matches.is_empty() {
        embed = embed.field("✅ Good news!", "No cheaters detected.", false);
    } else {
        let mut text = String::new();
        for m in report.matches.iter().take(10) {
            let short_id: String = m.id.chars().take(8).collect();
            text.push_str(&format!(
                "• {} - `{short_id}...`\n",
                m.map_name.trim_start_matches("de_")
            ));
        }
        if report.matches.len() > 10 {
            text.push_str(&format!(
                "\n_...and {} more matches_",
                report.matches.len() - 10
            ));
        }
        embed = embed.field("🎮 Affected Matches", text, false);
    }

    embed
}

pub fn recent_matches_embed(
    display_name: &str,
    matches: &[MatchSummary],
    steam_id: &str,
) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(format!("🕰️ Recent Matches of {display_name}"))
        .description("Latest history:")
        .color(COLOR_HISTORY);

    for m in matches {
        let (result, value) = match stats::extract_player_stat(m, steam_id) {
            Some(stat) => {
                let result = if m.winner_team_number == 0 {
                    "🤝"
                } else if m.winner_team_number == stat.initial_team_number {
                    "✅"
                } else {
                    "❌"
                };
                let date = m
                    .finished_at
                    .as_deref()
                    .map(|d| d.chars().take(10).collect::<String>())
                    .unwrap_or_default();
                (
                    result,
                    format!(
                        "💀 K/D: **{:.2}** | ⭐ Rating: **{:.2}**\n🎯 HS%: {:.0}% | 💥 Damage: {}\n📅 {date}",
                        stat.kd_ratio,
                        stat.leetify_rating,
                        stat.hs_percentage(),
                        stat.total_damage,
                    ),
                )
            }
            None => ("❓", format!("`{}`", m.id)),
        };

        embed = embed.field(format!("{result} {}", m.map_display()), value, false);
    }

    embed
}

/// `rows` are already sorted descending by mean K/D.
pub fn leaderboard_embed(rows: &[(String, AggregateStats)]) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title("🏆 CS2 Leaderboard")
        .description("Ranked by mean K/D over the last 10 matches")
        .color(COLOR_GOLD);

    for (idx, (name, agg)) in rows.iter().enumerate() {
        let medal = match idx {
            0 => "🥇".to_string(),
            1 => "🥈".to_string(),
            2 => "🥉".to_string(),
            n => format!("**{}.**", n + 1),
        };
        embed = embed.field(
            format!("{medal} {name}"),
            format!(
                "📊 K/D: **{:.2}** | 🎮 {} matches",
                agg.avg_kd, agg.matches_count
            ),
            false,
        );
    }

    embed
}

pub fn notification_embed(alert: &MatchAlert, stat: &PlayerStat) -> CreateEmbed {
    let comment = kd_comment(stat.kd_ratio);

    let mut embed = CreateEmbed::new()
        .title("🆕 New Match Detected!")
        .description(format!(
            "<@{}> played on **{}**\n\n{comment}",
            alert.discord_id,
            alert.detail.map_display()
        ))
        .color(COLOR_SUCCESS)
        .field(
            "📊 Performance",
            format!(
                "K/D: {:.2} ({}/{})",
                stat.kd_ratio, stat.total_kills, stat.total_deaths
            ),
            false,
        )
        .footer(CreateEmbedFooter::new(format!(
            "Use /match_detail {} for the full breakdown",
            alert.detail.id
        )));

    if !alert.registered_teammates.is_empty() {
        embed = embed.field(
            "👥 Registered Players",
            alert.registered_teammates.join(", "),
            false,
        );
    }

    embed
}

pub fn daily_summary_embed(entries: &[SummaryEntry]) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title("📅 Daily Summary - Top Players")
        .description("Who's carrying and who's sinking (based on the last 5 matches):")
        .color(COLOR_GOLD);

    let medals = ["🥇", "🥈", "🥉"];
    for (idx, entry) in entries.iter().enumerate() {
        let medal = medals.get(idx).copied().unwrap_or("•");
        embed = embed.field(
            format!("{medal} <@{}>", entry.discord_id),
            format!(
                "⭐ Rating: {:.2} | 💀 KD: {:.2} | 🏆 WR: {:.0}%",
                entry.avg_rating, entry.avg_kd, entry.win_rate
            ),
            false,
        );
    }

    embed
}

/// Squad helper shared by `/profile`: turns teammate counts into display
/// rows, mentioning registered users by Discord id.
pub fn squad_rows(
    teammates: &[TeammateCount],
    steam_to_discord: &std::collections::HashMap<String, String>,
) -> Vec<(String, i64)> {
    teammates
        .iter()
        .map(|t| {
            let name = match steam_to_discord.get(&t.steam_id) {
                Some(discord_id) => format!("<@{discord_id}>"),
                None => {
                    let short: String = t.steam_id.chars().take(8).collect();
                    format!("Steam: {short}...")
                }
            };
            (name, t.count as i64)
        })
        .collect()
}
