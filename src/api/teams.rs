use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, PerformanceDto, PlayerDto, TeamDto};
use crate::db::TeamUpdate;
use crate::entities::teams;
use crate::standings::{self, MatchScore, TeamRecord};

#[derive(Deserialize)]
pub struct SummaryQuery {
    pub team: Option<String>,
}

fn team_dto(team: teams::Model) -> TeamDto {
    TeamDto {
        id: team.id,
        name: team.name,
        group_name: team.group_name,
        coach: team.coach,
        badge: team.badge,
        year_established: team.year_established,
    }
}

/// GET /teams
pub async fn list_teams(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TeamDto>>>, ApiError> {
    let teams = state.store().list_teams().await?;
    Ok(Json(ApiResponse::success(
        teams.into_iter().map(team_dto).collect(),
    )))
}

/// GET /teams/performance
/// Win/loss/draw standings over every stored match, best win rate first.
pub async fn get_performance(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<PerformanceDto>>, ApiError> {
    let teams: Vec<(i32, String)> = state
        .store()
        .list_teams()
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();

    let matches: Vec<MatchScore> = state
        .store()
        .list_all_matches()
        .await?
        .iter()
        .map(MatchScore::from)
        .collect();

    Ok(Json(ApiResponse::success(PerformanceDto {
        standings: standings::performance_table(&teams, &matches),
    })))
}

/// GET /teams/summary?team=<name>
/// Record of a single team, addressed by name.
pub async fn team_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<ApiResponse<TeamRecord>>, ApiError> {
    let Some(name) = query.team.filter(|t| !t.is_empty()) else {
        return Err(ApiError::validation("No team provided"));
    };

    let team = state
        .store()
        .get_team_by_name(&name)
        .await?
        .ok_or_else(|| ApiError::team_not_found(&name))?;

    let matches: Vec<MatchScore> = state
        .store()
        .list_all_matches()
        .await?
        .iter()
        .map(MatchScore::from)
        .collect();

    Ok(Json(ApiResponse::success(standings::team_record(
        &team.name, team.id, &matches,
    ))))
}

/// GET /teams/{id}/players
/// Roster feed for the scorer dropdowns.
pub async fn team_players(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<PlayerDto>>>, ApiError> {
    let team = state
        .store()
        .get_team(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Team", id))?;

    let players = state.store().list_players_for_team(team.id).await?;

    Ok(Json(ApiResponse::success(
        players
            .into_iter()
            .map(|p| PlayerDto {
                id: p.id,
                name: p.name,
                team_id: p.team_id,
                team_name: None,
                goals: p.goals,
                yellow_cards: p.yellow_cards,
                red_cards: p.red_cards,
            })
            .collect(),
    )))
}

/// Text and file fields accepted by the team forms.
#[derive(Default)]
struct TeamForm {
    name: Option<String>,
    coach: Option<String>,
    group_name: Option<String>,
    year_established: Option<String>,
    year: Option<String>,
    points: Option<String>,
    badge: Option<(String, Vec<u8>)>,
}

async fn read_team_form(mut multipart: Multipart) -> Result<TeamForm, ApiError> {
    let mut form = TeamForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed form data: {e}")))?
    {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };

        if field_name == "badge" {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::validation(format!("Failed to read badge upload: {e}")))?;

            // An empty file input still submits a nameless part; ignore it.
            if let Some(file_name) = file_name.filter(|n| !n.is_empty()) {
                form.badge = Some((file_name, bytes.to_vec()));
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::validation(format!("Malformed form field: {e}")))?;
        let value = Some(value).filter(|v| !v.is_empty());

        match field_name.as_str() {
            "name" => form.name = value,
            "coach" => form.coach = value,
            "group_name" => form.group_name = value,
            "year_established" => form.year_established = value,
            "year" => form.year = value,
            "points" => form.points = value,
            _ => {}
        }
    }

    Ok(form)
}

fn parse_i32(value: &str, field: &str) -> Result<i32, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::validation(format!("{field} must be a whole number")))
}

fn parse_f64(value: &str, field: &str) -> Result<f64, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::validation(format!("{field} must be a number")))
}

async fn store_badge(
    state: &AppState,
    badge: Option<(String, Vec<u8>)>,
) -> Result<Option<String>, ApiError> {
    let Some((file_name, bytes)) = badge else {
        return Ok(None);
    };

    let path = state
        .badges()
        .store(&file_name, &bytes)
        .await
        .map_err(|e| match e {
            crate::services::badge::BadgeError::Rejected(msg) => ApiError::validation(msg),
            crate::services::badge::BadgeError::Io(err) => {
                ApiError::internal(format!("Failed to store badge: {err}"))
            }
        })?;

    Ok(Some(path))
}

/// POST /teams  (multipart: name, year, points, optional badge)
/// Registers the team if its name is new and records its rating for the
/// given year, as one transaction.
pub async fn create_team(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<TeamDto>>, ApiError> {
    let form = read_team_form(multipart).await?;

    let name = form
        .name
        .ok_or_else(|| ApiError::validation("Team name is required"))?;
    let year = parse_i32(
        form.year
            .as_deref()
            .ok_or_else(|| ApiError::validation("Year is required"))?,
        "Year",
    )?;
    let points = parse_f64(
        form.points
            .as_deref()
            .ok_or_else(|| ApiError::validation("Points is required"))?,
        "Points",
    )?;

    let badge_path = store_badge(&state, form.badge).await?;

    let (team, created) = state
        .store()
        .register_team_with_rating(&name, badge_path.as_deref(), year, points)
        .await?;

    if created {
        tracing::info!("Team '{}' registered for {}", name, year);
    } else {
        tracing::info!("Rating updated for existing team '{}' / {}", name, year);
    }

    Ok(Json(ApiResponse::success(team_dto(team))))
}

/// PUT /teams/{id}  (multipart: name, coach, group_name, year_established,
/// optional replacement badge)
pub async fn update_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<TeamDto>>, ApiError> {
    let form = read_team_form(multipart).await?;

    let name = form
        .name
        .ok_or_else(|| ApiError::validation("Team name is required"))?;
    let year_established = form
        .year_established
        .as_deref()
        .map(|v| parse_i32(v, "Year established"))
        .transpose()?;

    let badge_path = store_badge(&state, form.badge).await?;

    let updated = state
        .store()
        .update_team(
            id,
            TeamUpdate {
                name,
                coach: form.coach,
                group_name: form.group_name,
                year_established,
                badge: badge_path,
            },
        )
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint") {
                ApiError::Conflict("A team with that name already exists".to_string())
            } else {
                ApiError::from(e)
            }
        })?
        .ok_or_else(|| ApiError::not_found("Team", id))?;

    Ok(Json(ApiResponse::success(team_dto(updated))))
}

/// DELETE /teams/{id}
pub async fn delete_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store().remove_team(id).await? {
        return Err(ApiError::not_found("Team", id));
    }

    Ok(Json(ApiResponse::success(())))
}
