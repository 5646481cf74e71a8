use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState, MatchDto, MatchListDto, NewMatchRequest, UpdateMatchRequest,
};
use crate::db::{MatchDetail, MatchUpdate, NewMatch, ScorerEntry};

#[derive(Deserialize)]
pub struct MatchFilter {
    pub year: Option<i32>,
    pub stage: Option<String>,
}

fn match_dto(detail: MatchDetail) -> MatchDto {
    MatchDto {
        id: detail.row.id,
        year: detail.row.year,
        team_a_id: detail.row.team_a,
        team_b_id: detail.row.team_b,
        team_a: detail.team_a_name,
        team_b: detail.team_b_name,
        score_a: detail.row.score_a,
        score_b: detail.row.score_b,
        stage: detail.row.stage,
        venue: detail.row.venue,
        date: detail.row.date,
        yellow_a: detail.row.yellow_a,
        red_a: detail.row.red_a,
        yellow_b: detail.row.yellow_b,
        red_b: detail.row.red_b,
        team_a_scorers: detail.team_a_scorers,
        team_b_scorers: detail.team_b_scorers,
    }
}

/// GET /matches?year=&stage=
/// Fixtures newest first, filters AND-combined, scorer lists attached.
pub async fn list_matches(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<MatchFilter>,
) -> Result<Json<ApiResponse<MatchListDto>>, ApiError> {
    let stage = filter.stage.as_deref().filter(|s| !s.is_empty());
    let details = state
        .store()
        .list_matches_detailed(filter.year, stage)
        .await?;
    let years = state.store().match_years().await?;

    Ok(Json(ApiResponse::success(MatchListDto {
        years,
        matches: details.into_iter().map(match_dto).collect(),
    })))
}

async fn ensure_team_exists(state: &AppState, team_id: i32) -> Result<(), ApiError> {
    if state.store().get_team(team_id).await?.is_none() {
        return Err(ApiError::validation(format!("Unknown team id {team_id}")));
    }
    Ok(())
}

/// POST /matches
/// Records a fixture and its goal scorers in one transaction.
pub async fn create_match(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewMatchRequest>,
) -> Result<Json<ApiResponse<MatchDto>>, ApiError> {
    ensure_team_exists(&state, payload.team_a).await?;
    ensure_team_exists(&state, payload.team_b).await?;

    let mut scorers = Vec::with_capacity(payload.scorers.len());
    for scorer in &payload.scorers {
        if state.store().get_player(scorer.player_id).await?.is_none() {
            return Err(ApiError::validation(format!(
                "Unknown player id {}",
                scorer.player_id
            )));
        }
        scorers.push(ScorerEntry {
            player_id: scorer.player_id,
            goals: scorer.goals,
        });
    }

    let row = state
        .store()
        .add_match_with_scorers(
            NewMatch {
                team_a: payload.team_a,
                team_b: payload.team_b,
                score_a: payload.score_a,
                score_b: payload.score_b,
                yellow_a: payload.yellow_a,
                yellow_b: payload.yellow_b,
                red_a: payload.red_a,
                red_b: payload.red_b,
                venue: payload.venue,
                date: payload.date,
                stage: payload.stage,
                year: payload.year,
            },
            &scorers,
        )
        .await?;

    // Re-read through the composer so the response carries names and
    // scorer lists in the same shape the listing uses.
    let details = state
        .store()
        .list_matches_detailed(Some(row.year), None)
        .await?;
    let detail = details
        .into_iter()
        .find(|d| d.row.id == row.id)
        .ok_or_else(|| ApiError::internal("Recorded match vanished"))?;

    Ok(Json(ApiResponse::success(match_dto(detail))))
}

/// PUT /matches/{id}
pub async fn update_match(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMatchRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    ensure_team_exists(&state, payload.team_a).await?;
    ensure_team_exists(&state, payload.team_b).await?;

    state
        .store()
        .update_match(
            id,
            MatchUpdate {
                team_a: payload.team_a,
                team_b: payload.team_b,
                score_a: payload.score_a,
                score_b: payload.score_b,
                venue: payload.venue,
                date: payload.date,
                stage: payload.stage,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found("Match", id))?;

    Ok(Json(ApiResponse::success(())))
}

/// DELETE /matches/{id}
pub async fn delete_match(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store().remove_match(id).await? {
        return Err(ApiError::not_found("Match", id));
    }

    Ok(Json(ApiResponse::success(())))
}
