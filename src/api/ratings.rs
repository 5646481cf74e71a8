use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, LeaderboardDto, MessageResponse, RatingRequest};
use crate::standings::leaderboard::{chart_series, distinct_years, latest_year, table_for_year};

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    pub year: Option<i32>,
}

/// GET /ratings/leaderboard?year=
/// Ranked table and chart series for one year; defaults to the most recent
/// year on record. An empty rating set yields an empty dashboard.
pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<ApiResponse<LeaderboardDto>>, ApiError> {
    let rows = state.store().list_ratings_with_badges().await?;

    let year = query.year.or_else(|| latest_year(&rows));
    let (table, chart) = match year {
        Some(year) => {
            let table = table_for_year(&rows, year);
            let chart = chart_series(&table);
            (table, chart)
        }
        None => (Vec::new(), Vec::new()),
    };

    Ok(Json(ApiResponse::success(LeaderboardDto {
        year,
        years: distinct_years(&rows),
        table,
        chart,
    })))
}

/// POST /ratings
/// Atomic insert-or-update on the (team_name, year) pair.
pub async fn upsert_rating(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RatingRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if payload.team_name.is_empty() {
        return Err(ApiError::validation("Team name is required"));
    }
    if !payload.points.is_finite() {
        return Err(ApiError::validation("Points must be a number"));
    }

    state
        .store()
        .upsert_rating(&payload.team_name, payload.year, payload.points)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!(
            "Rating stored for {} / {}",
            payload.team_name, payload.year
        ),
    })))
}
