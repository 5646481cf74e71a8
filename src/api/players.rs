use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, NewPlayerRequest, PlayerDto, UpdatePlayerRequest};
use crate::db::PlayerUpdate;

/// GET /players
/// Full roster with team names, for the admin dashboard.
pub async fn list_players(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<PlayerDto>>>, ApiError> {
    let players = state.store().list_players_with_teams().await?;

    Ok(Json(ApiResponse::success(
        players
            .into_iter()
            .map(|p| PlayerDto {
                id: p.player.id,
                name: p.player.name,
                team_id: p.player.team_id,
                team_name: p.team_name,
                goals: p.player.goals,
                yellow_cards: p.player.yellow_cards,
                red_cards: p.player.red_cards,
            })
            .collect(),
    )))
}

/// POST /players
pub async fn create_player(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewPlayerRequest>,
) -> Result<Json<ApiResponse<PlayerDto>>, ApiError> {
    if payload.name.is_empty() {
        return Err(ApiError::validation("Player name is required"));
    }

    if state.store().get_team(payload.team_id).await?.is_none() {
        return Err(ApiError::validation(format!(
            "Unknown team id {}",
            payload.team_id
        )));
    }

    let player = state
        .store()
        .add_player(
            &payload.name,
            payload.team_id,
            payload.goals,
            payload.yellow_cards,
            payload.red_cards,
        )
        .await?;

    Ok(Json(ApiResponse::success(PlayerDto {
        id: player.id,
        name: player.name,
        team_id: player.team_id,
        team_name: None,
        goals: player.goals,
        yellow_cards: player.yellow_cards,
        red_cards: player.red_cards,
    })))
}

/// PUT /players/{id}
/// Updates the disciplinary/goal counters; name and team move when given.
pub async fn update_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePlayerRequest>,
) -> Result<Json<ApiResponse<PlayerDto>>, ApiError> {
    if let Some(team_id) = payload.team_id
        && state.store().get_team(team_id).await?.is_none()
    {
        return Err(ApiError::validation(format!("Unknown team id {team_id}")));
    }

    let player = state
        .store()
        .update_player(
            id,
            PlayerUpdate {
                name: payload.name,
                team_id: payload.team_id,
                goals: payload.goals,
                yellow_cards: payload.yellow_cards,
                red_cards: payload.red_cards,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found("Player", id))?;

    Ok(Json(ApiResponse::success(PlayerDto {
        id: player.id,
        name: player.name,
        team_id: player.team_id,
        team_name: None,
        goals: player.goals,
        yellow_cards: player.yellow_cards,
        red_cards: player.red_cards,
    })))
}

/// DELETE /players/{id}
pub async fn delete_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store().remove_player(id).await? {
        return Err(ApiError::not_found("Player", id));
    }

    Ok(Json(ApiResponse::success(())))
}
