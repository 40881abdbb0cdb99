//! Pure aggregation over raw match records. No I/O, no state.

use std::collections::HashMap;

use crate::leetify::types::{MatchSummary, PlayerStat};

/// Averages over the matches where the player actually appeared.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateStats {
    pub matches_count: usize,
    pub avg_kd: f64,
    pub avg_hs_pct: f64,
    pub avg_rating: f64,
    pub win_rate: f64,
    pub wins: usize,
    pub losses: usize,
    pub total_kills: i64,
    pub total_deaths: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheaterReport {
    pub total: usize,
    pub percentage: f64,
    pub matches: Vec<CheaterMatch>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheaterMatch {
    pub id: String,
    pub map_name: String,
    pub finished_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeammateCount {
    pub steam_id: String,
    pub name: Option<String>,
    pub count: usize,
}

/// First per-player row matching the given Steam ID, if the player took
/// part in this match.
pub fn extract_player_stat<'a>(
    match_data: &'a MatchSummary,
    steam_id: &str,
) -> Option<&'a PlayerStat> {
    match_data.stats.iter().find(|s| s.steam64_id == steam_id)
}

/// Averages the player's per-match stats, skipping matches they did not
/// play in. Returns `None` when no match yields data: that is "not enough
/// data", not an error.
///
/// K/D is the mean of per-match `kd_ratio` values, not a ratio of summed
/// kills over summed deaths, so every match weighs the same. HS% likewise
/// averages per-match percentages, with zero-kill matches contributing 0.
pub fn average_stats(matches: &[MatchSummary], steam_id: &str) -> Option<AggregateStats> {
    let mut total_kills = 0i64;
    let mut total_deaths = 0i64;
    let mut total_kd = 0.0;
    let mut total_hs_pct = 0.0;
    let mut total_rating = 0.0;
    let mut wins = 0usize;
    let mut matches_with_data = 0usize;

    for m in matches {
        let Some(stat) = extract_player_stat(m, steam_id) else {
            continue;
        };
        matches_with_data += 1;
        total_kills += stat.total_kills;
        total_deaths += stat.total_deaths;
        total_kd += stat.kd_ratio;
        total_hs_pct += stat.hs_percentage();
        total_rating += stat.leetify_rating;

        if m.winner_team_number == stat.initial_team_number {
            wins += 1;
        }
    }

    if matches_with_data == 0 {
        return None;
    }

    let count = matches_with_data as f64;
    Some(AggregateStats {
        matches_count: matches_with_data,
        avg_kd: total_kd / count,
        avg_hs_pct: total_hs_pct / count,
        avg_rating: total_rating / count,
        win_rate: (wins as f64 / count) * 100.0,
        wins,
        losses: matches_with_data - wins,
        total_kills,
        total_deaths,
    })
}

/// Counts the matches flagged upstream as containing a banned player.
/// Percentage is 0 for an empty input.
pub fn analyze_cheaters(matches: &[MatchSummary]) -> CheaterReport {
    let cheater_matches: Vec<CheaterMatch> = matches
        .iter()
        .filter(|m| m.has_banned_player)
        .map(|m| CheaterMatch {
            id: m.id.clone(),
            map_name: m.map_name.clone(),
            finished_at: m.finished_at.clone(),
        })
        .collect();

    let total = cheater_matches.len();
    let percentage = if matches.is_empty() {
        0.0
    } else {
        (total as f64 / matches.len() as f64) * 100.0
    };

    CheaterReport {
        total,
        percentage,
        matches: cheater_matches,
    }
}

/// Most frequent same-team teammates across the given matches, excluding
/// the querying player. Sorted descending by count; ties keep first-seen
/// order; truncated to `limit`.
pub fn top_teammates(
    matches: &[MatchSummary],
    steam_id: &str,
    limit: usize,
) -> Vec<TeammateCount> {
    let mut counts: Vec<TeammateCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for m in matches {
        let Some(user_stat) = extract_player_stat(m, steam_id) else {
            continue;
        };
        let user_team = user_stat.initial_team_number;

        for stat in &m.stats {
            if stat.steam64_id == steam_id || stat.initial_team_number != user_team {
                continue;
            }
            match index.get(&stat.steam64_id) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(stat.steam64_id.clone(), counts.len());
                    counts.push(TeammateCount {
                        steam_id: stat.steam64_id.clone(),
                        name: stat.name.clone(),
                        count: 1,
                    });
                }
            }
        }
    }

    // Stable sort keeps first-seen order between equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}
