use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use time;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, BadgeService, SeaOrmAuthService};

pub mod auth;
mod error;
mod matches;
mod players;
mod ratings;
mod teams;
mod types;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub badge_service: Arc<BadgeService>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<dyn AuthService> {
        &self.auth_service
    }

    #[must_use]
    pub fn badges(&self) -> &Arc<BadgeService> {
        &self.badge_service
    }
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let auth_service =
        Arc::new(SeaOrmAuthService::new(store.clone())) as Arc<dyn AuthService + 'static>;

    let badge_service = Arc::new(BadgeService::new(
        &config.general.badges_path,
        config.uploads.clone(),
    ));

    Ok(Arc::new(AppState {
        config: Arc::new(RwLock::new(config)),
        store,
        auth_service,
        badge_service,
    }))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (badges_path, cors_origins, secure_cookies, session_minutes, max_badge_bytes) = {
        let config = state.config().read().await;
        (
            config.general.badges_path.clone(),
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_minutes,
            config.uploads.max_badge_bytes,
        )
    };

    let protected_routes = create_protected_router(state.clone());

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            session_minutes,
        )));

    let api_router = Router::new()
        .merge(public_router())
        .merge(protected_routes)
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        // Leave headroom over the badge limit for the other form fields.
        .layer(DefaultBodyLimit::max(max_badge_bytes + 64 * 1024))
        .layer(session_layer)
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .nest_service("/badges", tower_http::services::ServeDir::new(badges_path))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/teams", get(teams::list_teams))
        .route("/teams/performance", get(teams::get_performance))
        .route("/teams/summary", get(teams::team_summary))
        .route("/teams/{id}/players", get(teams::team_players))
        .route("/matches", get(matches::list_matches))
        .route("/ratings/leaderboard", get(ratings::leaderboard))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/teams", post(teams::create_team))
        .route("/teams/{id}", put(teams::update_team))
        .route("/teams/{id}", delete(teams::delete_team))
        .route("/players", get(players::list_players))
        .route("/players", post(players::create_player))
        .route("/players/{id}", put(players::update_player))
        .route("/players/{id}", delete(players::delete_player))
        .route("/matches", post(matches::create_match))
        .route("/matches/{id}", put(matches::update_match))
        .route("/matches/{id}", delete(matches::delete_match))
        .route("/ratings", post(ratings::upsert_rating))
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/password", put(auth::change_password))
        .route("/auth/api-key/regenerate", post(auth::regenerate_api_key))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
