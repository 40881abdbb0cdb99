use serde::Deserialize;

// ============================================================================
// /v3/profile/matches and /v2/matches/{id}
// ============================================================================

/// One match as returned by the Leetify API. The list endpoint and the
/// detail endpoint share this shape; the list variant may carry fewer
/// per-player rows.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchSummary {
    pub id: String,
    #[serde(default)]
    pub map_name: String,
    #[serde(default)]
    pub finished_at: Option<String>,
    /// Winning team number, 0 on a draw.
    #[serde(default)]
    pub winner_team_number: i32,
    #[serde(default)]
    pub has_banned_player: bool,
    #[serde(default)]
    pub replay_url: Option<String>,
    #[serde(default)]
    pub team_scores: Vec<TeamScore>,
    #[serde(default)]
    pub stats: Vec<PlayerStat>,
}

impl MatchSummary {
    /// Score of a given team, 0 when the API omitted it.
    pub fn score_of(&self, team_number: i32) -> i32 {
        self.team_scores
            .iter()
            .find(|s| s.team_number == team_number)
            .map(|s| s.score)
            .unwrap_or(0)
    }

    /// Map name without the `de_` prefix, capitalized for display.
    pub fn map_display(&self) -> String {
        let name = self.map_name.trim_start_matches("de_");
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => "Unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamScore {
    pub team_number: i32,
    pub score: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerStat {
    pub steam64_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub initial_team_number: i32,
    #[serde(default)]
    pub total_kills: i64,
    #[serde(default)]
    pub total_deaths: i64,
    #[serde(default)]
    pub total_hs_kills: i64,
    #[serde(default)]
    pub total_damage: i64,
    #[serde(default)]
    pub kd_ratio: f64,
    #[serde(default)]
    pub leetify_rating: f64,
    #[serde(default)]
    pub ct_leetify_rating: f64,
    #[serde(default)]
    pub t_leetify_rating: f64,
    #[serde(default)]
    pub mvps: i64,
    /// Damage per round.
    #[serde(default)]
    pub dpr: f64,
}

impl PlayerStat {
    pub fn hs_percentage(&self) -> f64 {
        if self.total_kills > 0 {
            (self.total_hs_kills as f64 / self.total_kills as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }
}

// ============================================================================
// /v3/profile
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ranks: ProfileRanks,
    #[serde(default)]
    pub stats: ProfileStats,
    #[serde(default)]
    pub total_matches: i64,
    /// Fraction in [0, 1].
    #[serde(default)]
    pub winrate: f64,
    #[serde(default)]
    pub recent_teammates: Vec<RecentTeammate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileRanks {
    #[serde(default)]
    pub premier: Option<i64>,
    #[serde(default)]
    pub leetify: Option<f64>,
    #[serde(default)]
    pub competitive: Vec<MapRank>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapRank {
    #[serde(default)]
    pub map_name: String,
    #[serde(default)]
    pub rank: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileStats {
    #[serde(default)]
    pub accuracy_head: f64,
    #[serde(default)]
    pub preaim: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentTeammate {
    pub steam64_id: String,
    #[serde(default)]
    pub recent_matches_count: i64,
}
