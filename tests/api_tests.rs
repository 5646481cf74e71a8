//! End-to-end tests for the public and admin API, driven through the full
//! router against a throwaway SQLite database.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use ultimatecup::config::Config;

/// Default API key seeded by migration (must match m20251019_add_users.rs)
const DEFAULT_API_KEY: &str = "ultimatecup_default_api_key_please_rotate";

async fn spawn_app() -> Router {
    let suffix = uuid::Uuid::new_v4();
    let db_path = std::env::temp_dir().join(format!("ultimatecup-test-{suffix}.db"));
    let badges_path = std::env::temp_dir().join(format!("ultimatecup-test-badges-{suffix}"));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.general.badges_path = badges_path.display().to_string();

    let state = ultimatecup::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    ultimatecup::api::router(state).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn admin_json(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Api-Key", DEFAULT_API_KEY)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const BOUNDARY: &str = "ultimatecup-test-boundary";

fn team_form(fields: &[(&str, &str)], badge: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body: Vec<u8> = Vec::new();
    for (field, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = badge {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"badge\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn admin_multipart(method: &str, uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Api-Key", DEFAULT_API_KEY)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Registers a team with a rating year/points and returns its id.
async fn register_team(app: &Router, name: &str, year: &str, points: &str) -> i64 {
    let (status, json) = send(
        app,
        admin_multipart(
            "POST",
            "/api/teams",
            team_form(&[("name", name), ("year", year), ("points", points)], None),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "registering {name}: {json}");
    json["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn admin_routes_require_authentication() {
    let app = spawn_app().await;

    let (status, _) = send(&app, get("/api/players")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Request::builder()
            .uri("/api/players")
            .header("X-Api-Key", "wrong-key")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Request::builder()
            .uri("/api/players")
            .header("X-Api-Key", DEFAULT_API_KEY)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_opens_a_session_cookie() {
    let app = spawn_app().await;

    // Bad credentials stay out.
    let (status, _) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({"username": "admin", "password": "nope"}).to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The seeded admin account logs in and gets a session cookie.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"username": "admin", "password": "1234"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let (status, json) = send(
        &app,
        Request::builder()
            .uri("/api/auth/me")
            .header(header::COOKIE, cookie.clone())
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["username"], "admin");

    // Logout invalidates the session; the stale cookie no longer works.
    let (status, _) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/auth/logout")
            .header(header::COOKIE, cookie.clone())
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Request::builder()
            .uri("/api/auth/me")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn leaderboard_ranks_the_selected_year() {
    let app = spawn_app().await;

    register_team(&app, "X", "2024", "8.5").await;
    register_team(&app, "Y", "2024", "6.5").await;
    // Re-registering X for an earlier year only adds the rating row.
    register_team(&app, "X", "2023", "5.0").await;

    // No year selected: defaults to the latest on record.
    let (status, json) = send(&app, get("/api/ratings/leaderboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["year"], 2024);
    assert_eq!(json["data"]["years"], serde_json::json!([2024, 2023]));

    let table = json["data"]["table"].as_array().unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table[0]["rank"], 1);
    assert_eq!(table[0]["team_name"], "X");
    assert_eq!(table[0]["points"], 8.5);
    assert_eq!(table[1]["rank"], 2);
    assert_eq!(table[1]["team_name"], "Y");

    let chart = json["data"]["chart"].as_array().unwrap();
    assert_eq!(chart.len(), 2);
    assert_eq!(chart[0]["team_name"], "X");

    // Explicit year filter.
    let (status, json) = send(&app, get("/api/ratings/leaderboard?year=2023")).await;
    assert_eq!(status, StatusCode::OK);
    let table = json["data"]["table"].as_array().unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table[0]["team_name"], "X");
    assert_eq!(table[0]["points"], 5.0);
}

#[tokio::test]
async fn empty_rating_set_is_not_an_error() {
    let app = spawn_app().await;

    let (status, json) = send(&app, get("/api/ratings/leaderboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["year"], serde_json::Value::Null);
    assert!(json["data"]["table"].as_array().unwrap().is_empty());
    assert!(json["data"]["chart"].as_array().unwrap().is_empty());
    assert!(json["data"]["years"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn rating_upsert_is_idempotent() {
    let app = spawn_app().await;

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            admin_json(
                "POST",
                "/api/ratings",
                &serde_json::json!({"team_name": "X", "year": 2024, "points": 7.0}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, json) = send(&app, get("/api/ratings/leaderboard?year=2024")).await;
    let table = json["data"]["table"].as_array().unwrap();
    assert_eq!(table.len(), 1, "duplicate submits must not duplicate rows");
    assert_eq!(table[0]["points"], 7.0);

    // A later submit moves the points, still one row.
    let (status, _) = send(
        &app,
        admin_json(
            "POST",
            "/api/ratings",
            &serde_json::json!({"team_name": "X", "year": 2024, "points": 9.25}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app, get("/api/ratings/leaderboard?year=2024")).await;
    let table = json["data"]["table"].as_array().unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table[0]["points"], 9.25);
}

async fn record_match(app: &Router, body: serde_json::Value) {
    let (status, json) = send(app, admin_json("POST", "/api/matches", &body)).await;
    assert_eq!(status, StatusCode::OK, "recording match: {json}");
}

#[tokio::test]
async fn performance_table_folds_match_results() {
    let app = spawn_app().await;

    let a = register_team(&app, "A", "2025", "1.0").await;
    let b = register_team(&app, "B", "2025", "1.0").await;
    let c = register_team(&app, "C", "2025", "1.0").await;

    record_match(
        &app,
        serde_json::json!({"team_a": a, "team_b": b, "score_a": 3, "score_b": 1}),
    )
    .await;
    record_match(
        &app,
        serde_json::json!({"team_a": b, "team_b": c, "score_a": 2, "score_b": 2}),
    )
    .await;
    record_match(
        &app,
        serde_json::json!({"team_a": a, "team_b": c, "score_a": 1, "score_b": 0}),
    )
    .await;

    let (status, json) = send(&app, get("/api/teams/performance")).await;
    assert_eq!(status, StatusCode::OK);
    let standings = json["data"]["standings"].as_array().unwrap();
    assert_eq!(standings.len(), 3);

    // A wins both games and tops the table.
    assert_eq!(standings[0]["team"], "A");
    assert_eq!(standings[0]["wins"], 2);
    assert_eq!(standings[0]["losses"], 0);
    assert_eq!(standings[0]["draws"], 0);
    assert_eq!(standings[0]["total"], 2);
    assert_eq!(standings[0]["win_percent"], 100.0);

    // B and C are tied on 0.0 and fall back to name order.
    assert_eq!(standings[1]["team"], "B");
    assert_eq!(standings[2]["team"], "C");
    for row in &standings[1..] {
        assert_eq!(row["wins"], 0);
        assert_eq!(row["losses"], 1);
        assert_eq!(row["draws"], 1);
        assert_eq!(row["total"], 2);
        assert_eq!(row["win_percent"], 0.0);
    }
}

#[tokio::test]
async fn team_summary_is_addressed_by_name() {
    let app = spawn_app().await;

    let a = register_team(&app, "A", "2025", "1.0").await;
    let b = register_team(&app, "B", "2025", "1.0").await;
    record_match(
        &app,
        serde_json::json!({"team_a": a, "team_b": b, "score_a": 3, "score_b": 1}),
    )
    .await;

    let (status, json) = send(&app, get("/api/teams/summary?team=A")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["wins"], 1);
    assert_eq!(json["data"]["win_percent"], 100.0);

    // Unknown name is a structured not-found, not a crash.
    let (status, _) = send(&app, get("/api/teams/summary?team=Nobody")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Missing parameter is a validation failure.
    let (status, _) = send(&app, get("/api/teams/summary")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn match_filters_combine_year_and_stage() {
    let app = spawn_app().await;

    let a = register_team(&app, "A", "2025", "1.0").await;
    let b = register_team(&app, "B", "2025", "1.0").await;

    record_match(
        &app,
        serde_json::json!({
            "team_a": a, "team_b": b, "score_a": 1, "score_b": 0,
            "date": "2025-10-10", "stage": "Final"
        }),
    )
    .await;
    record_match(
        &app,
        serde_json::json!({
            "team_a": b, "team_b": a, "score_a": 2, "score_b": 2,
            "date": "2025-10-01", "stage": "Group Stage"
        }),
    )
    .await;
    record_match(
        &app,
        serde_json::json!({
            "team_a": a, "team_b": b, "score_a": 0, "score_b": 3,
            "date": "2024-11-01", "stage": "Final"
        }),
    )
    .await;

    // Both predicates AND-combined.
    let (status, json) = send(&app, get("/api/matches?year=2025&stage=Final")).await;
    assert_eq!(status, StatusCode::OK);
    let matches = json["data"]["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["year"], 2025);
    assert_eq!(matches[0]["stage"], "Final");

    // Unfiltered: everything, newest date first, with the year choices.
    let (_, json) = send(&app, get("/api/matches")).await;
    let matches = json["data"]["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0]["date"], "2025-10-10");
    assert_eq!(matches[1]["date"], "2025-10-01");
    assert_eq!(matches[2]["date"], "2024-11-01");
    assert_eq!(json["data"]["years"], serde_json::json!([2025, 2024]));

    // The year is derived from the date when not supplied.
    assert_eq!(matches[2]["year"], 2024);
}

#[tokio::test]
async fn scorer_lists_are_partitioned_per_side() {
    let app = spawn_app().await;

    let home = register_team(&app, "Home", "2025", "1.0").await;
    let away = register_team(&app, "Away", "2025", "1.0").await;
    let other = register_team(&app, "Other", "2025", "1.0").await;

    let mut player_ids = Vec::new();
    for (name, team) in [
        ("Home Striker", home),
        ("Away Winger", away),
        ("Stray Player", other),
    ] {
        let (status, json) = send(
            &app,
            admin_json(
                "POST",
                "/api/players",
                &serde_json::json!({"name": name, "team_id": team}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        player_ids.push(json["data"]["id"].as_i64().unwrap());
    }

    record_match(
        &app,
        serde_json::json!({
            "team_a": home, "team_b": away, "score_a": 2, "score_b": 1,
            "date": "2025-10-05", "stage": "Final",
            "scorers": [
                {"player_id": player_ids[0], "goals": 2},
                {"player_id": player_ids[1]},
                {"player_id": player_ids[2], "goals": 5}
            ]
        }),
    )
    .await;

    let (_, json) = send(&app, get("/api/matches")).await;
    let m = &json["data"]["matches"].as_array().unwrap()[0];

    assert_eq!(
        m["team_a_scorers"],
        serde_json::json!(["Home Striker (2)"])
    );
    assert_eq!(m["team_b_scorers"], serde_json::json!(["Away Winger (1)"]));
    // The stray contribution shows up on neither side.
    let rendered = m.to_string();
    assert!(!rendered.contains("Stray Player"));
}

#[tokio::test]
async fn badge_uploads_are_validated_and_served() {
    let app = spawn_app().await;

    // Disallowed extension is rejected outright.
    let (status, _) = send(
        &app,
        admin_multipart(
            "POST",
            "/api/teams",
            team_form(
                &[("name", "Evil FC"), ("year", "2025"), ("points", "1.0")],
                Some(("payload.exe", b"MZ")),
            ),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A real image is stored and the team carries its public path.
    let (status, json) = send(
        &app,
        admin_multipart(
            "POST",
            "/api/teams",
            team_form(
                &[
                    ("name", "Lafia Stars FC"),
                    ("year", "2025"),
                    ("points", "4.5"),
                ],
                Some(("lafia badge.png", b"fake-png-bytes")),
            ),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let badge = json["data"]["badge"].as_str().unwrap();
    assert!(badge.starts_with("/badges/"));

    let response = app
        .clone()
        .oneshot(get(badge))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let served = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&served[..], b"fake-png-bytes");
}

#[tokio::test]
async fn non_numeric_form_fields_fail_validation() {
    let app = spawn_app().await;

    let (status, _) = send(
        &app,
        admin_multipart(
            "POST",
            "/api/teams",
            team_form(
                &[("name", "A"), ("year", "not-a-year"), ("points", "1.0")],
                None,
            ),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        admin_multipart(
            "POST",
            "/api/teams",
            team_form(&[("name", "A"), ("year", "2025"), ("points", "lots")], None),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn player_crud_round_trip() {
    let app = spawn_app().await;

    // A player needs an existing team.
    let (status, _) = send(
        &app,
        admin_json(
            "POST",
            "/api/players",
            &serde_json::json!({"name": "Orphan", "team_id": 99}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let team = register_team(&app, "Lafia Stars FC", "2025", "4.5").await;

    let (status, json) = send(
        &app,
        admin_json(
            "POST",
            "/api/players",
            &serde_json::json!({"name": "John Musa", "team_id": team, "goals": 4}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let player_id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["goals"], 4);

    let (status, json) = send(
        &app,
        admin_json(
            "PUT",
            &format!("/api/players/{player_id}"),
            &serde_json::json!({"goals": 5, "yellow_cards": 1, "red_cards": 0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["goals"], 5);
    assert_eq!(json["data"]["yellow_cards"], 1);

    // Roster feed carries the update.
    let (status, json) = send(&app, get(&format!("/api/teams/{team}/players"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["goals"], 5);

    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/players/{player_id}"))
            .header("X-Api-Key", DEFAULT_API_KEY)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/players/{player_id}"))
            .header("X-Api-Key", DEFAULT_API_KEY)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn match_writes_validate_references() {
    let app = spawn_app().await;

    let team = register_team(&app, "A", "2025", "1.0").await;

    let (status, _) = send(
        &app,
        admin_json(
            "POST",
            "/api/matches",
            &serde_json::json!({"team_a": team, "team_b": 424242}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        admin_json(
            "POST",
            "/api/matches",
            &serde_json::json!({
                "team_a": team, "team_b": team,
                "scorers": [{"player_id": 424242}]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn match_update_and_delete() {
    let app = spawn_app().await;

    let a = register_team(&app, "A", "2025", "1.0").await;
    let b = register_team(&app, "B", "2025", "1.0").await;

    record_match(
        &app,
        serde_json::json!({
            "team_a": a, "team_b": b, "score_a": 1, "score_b": 1,
            "date": "2025-10-01", "stage": "Group Stage"
        }),
    )
    .await;

    let (_, json) = send(&app, get("/api/matches")).await;
    let match_id = json["data"]["matches"][0]["id"].as_i64().unwrap();

    // Move the fixture to a new date; the year follows the date.
    let (status, _) = send(
        &app,
        admin_json(
            "PUT",
            &format!("/api/matches/{match_id}"),
            &serde_json::json!({
                "team_a": a, "team_b": b, "score_a": 2, "score_b": 1,
                "date": "2026-01-10", "stage": "Final", "venue": "NASPOLY Stadium"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app, get("/api/matches")).await;
    let m = &json["data"]["matches"][0];
    assert_eq!(m["score_a"], 2);
    assert_eq!(m["stage"], "Final");
    assert_eq!(m["year"], 2026);

    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/matches/{match_id}"))
            .header("X-Api-Key", DEFAULT_API_KEY)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app, get("/api/matches")).await;
    assert!(json["data"]["matches"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn team_update_renames_and_fills_details() {
    let app = spawn_app().await;

    let id = register_team(&app, "Golden Boys FC", "2025", "3.5").await;

    let (status, json) = send(
        &app,
        admin_multipart(
            "PUT",
            &format!("/api/teams/{id}"),
            team_form(
                &[
                    ("name", "Golden Boys Academy"),
                    ("coach", "S. Adamu"),
                    ("group_name", "Group A"),
                    ("year_established", "2018"),
                ],
                None,
            ),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["data"]["name"], "Golden Boys Academy");
    assert_eq!(json["data"]["coach"], "S. Adamu");
    assert_eq!(json["data"]["year_established"], 2018);

    // Renaming over another team's name is refused.
    register_team(&app, "Kwandare United", "2025", "4.0").await;
    let (status, _) = send(
        &app,
        admin_multipart(
            "PUT",
            &format!("/api/teams/{id}"),
            team_form(&[("name", "Kwandare United")], None),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Unknown team id is not found.
    let (status, _) = send(
        &app,
        admin_multipart(
            "PUT",
            "/api/teams/424242",
            team_form(&[("name", "Ghost FC")], None),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The public listing reflects the rename.
    let (status, json) = send(&app, get("/api/teams")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Golden Boys Academy", "Kwandare United"]);
}
