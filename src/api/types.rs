use serde::{Deserialize, Serialize};

use crate::standings::TeamRecord;
use crate::standings::leaderboard::{ChartPoint, RankedRating};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TeamDto {
    pub id: i32,
    pub name: String,
    pub group_name: Option<String>,
    pub coach: Option<String>,
    pub badge: Option<String>,
    pub year_established: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct PlayerDto {
    pub id: i32,
    pub name: String,
    pub team_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    pub goals: i32,
    pub yellow_cards: i32,
    pub red_cards: i32,
}

/// One fixture composed for display. `team_a`/`team_b` carry the resolved
/// names; the raw ids ride along for the edit form.
#[derive(Debug, Serialize)]
pub struct MatchDto {
    pub id: i32,
    pub year: i32,
    pub team_a_id: i32,
    pub team_b_id: i32,
    pub team_a: String,
    pub team_b: String,
    pub score_a: i32,
    pub score_b: i32,
    pub stage: Option<String>,
    pub venue: Option<String>,
    pub date: Option<String>,
    pub yellow_a: i32,
    pub red_a: i32,
    pub yellow_b: i32,
    pub red_b: i32,
    pub team_a_scorers: Vec<String>,
    pub team_b_scorers: Vec<String>,
}

/// The matches page payload: filtered fixtures plus the year choices that
/// drive the filter dropdown.
#[derive(Debug, Serialize)]
pub struct MatchListDto {
    pub years: Vec<i32>,
    pub matches: Vec<MatchDto>,
}

/// The leaderboard dashboard payload for one selected year.
#[derive(Debug, Serialize)]
pub struct LeaderboardDto {
    /// Selected (or defaulted) year; `None` when no ratings exist at all.
    pub year: Option<i32>,
    pub years: Vec<i32>,
    pub table: Vec<RankedRating>,
    pub chart: Vec<ChartPoint>,
}

#[derive(Debug, Serialize)]
pub struct PerformanceDto {
    pub standings: Vec<TeamRecord>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct NewPlayerRequest {
    pub name: String,
    pub team_id: i32,
    #[serde(default)]
    pub goals: i32,
    #[serde(default)]
    pub yellow_cards: i32,
    #[serde(default)]
    pub red_cards: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlayerRequest {
    pub name: Option<String>,
    pub team_id: Option<i32>,
    #[serde(default)]
    pub goals: i32,
    #[serde(default)]
    pub yellow_cards: i32,
    #[serde(default)]
    pub red_cards: i32,
}

#[derive(Debug, Deserialize)]
pub struct ScorerRequest {
    pub player_id: i32,
    #[serde(default = "default_one_goal")]
    pub goals: i32,
}

const fn default_one_goal() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct NewMatchRequest {
    pub team_a: i32,
    pub team_b: i32,
    #[serde(default)]
    pub score_a: i32,
    #[serde(default)]
    pub score_b: i32,
    #[serde(default)]
    pub yellow_a: i32,
    #[serde(default)]
    pub yellow_b: i32,
    #[serde(default)]
    pub red_a: i32,
    #[serde(default)]
    pub red_b: i32,
    pub venue: Option<String>,
    pub date: Option<String>,
    pub stage: Option<String>,
    pub year: Option<i32>,
    #[serde(default)]
    pub scorers: Vec<ScorerRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMatchRequest {
    pub team_a: i32,
    pub team_b: i32,
    pub score_a: i32,
    pub score_b: i32,
    pub venue: Option<String>,
    pub date: Option<String>,
    pub stage: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub team_name: String,
    pub year: i32,
    pub points: f64,
}
