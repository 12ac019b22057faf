use askama::Template;
use axum::{
    middleware as axum_middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::storage::LocalStore;

pub mod assets;
pub mod auth;
pub mod health;
pub mod home;
pub mod landing;
pub mod legal;
pub mod lists;
pub mod plan;
pub mod profile;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::Config,
    pub pool: SqlitePool,
    pub store: LocalStore,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: crate::Config, pool: SqlitePool) -> Self {
        let store = LocalStore::new(pool.clone());
        Self {
            config,
            pool,
            store,
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Template)]
#[template(path = "404.html")]
struct NotFoundTemplate;

pub async fn fallback() -> impl IntoResponse {
    let body = NotFoundTemplate
        .render()
        .unwrap_or_else(|_| "404 Not Found".to_string());
    (axum::http::StatusCode::NOT_FOUND, Html(body))
}

/// Render a page template, turning render failures into [`AppError`]
pub(crate) fn render_template<T: Template>(template: T) -> Result<Response, AppError> {
    Ok(Html(template.render()?).into_response())
}

pub fn router(state: AppState) -> Router {
    // Pages behind the session gate
    let protected = Router::new()
        .route("/home", get(home::page))
        .route("/home/assign", post(home::assign))
        .route("/plan", get(plan::index))
        .route("/plan/{offset}", get(plan::page))
        .route("/plan/{offset}/assign", post(plan::assign))
        .route("/plan/{offset}/move", post(plan::move_slot))
        .route("/plan/{offset}/clear", post(plan::clear_week))
        .route("/profile", get(profile::page))
        .route("/profile/image", post(profile::upload_image))
        .route("/profile/image/delete", post(profile::delete_image))
        .route("/profile/theme", post(profile::toggle_theme))
        .route("/lists", get(lists::page).post(lists::create))
        .route("/lists/{id}/settings", get(lists::settings))
        .route("/lists/{id}/settings/invite", post(lists::create_invite))
        .route(
            "/lists/{id}/settings/members/{member_id}/remove",
            post(lists::remove_member),
        )
        .route("/lists/{id}/delete", post(lists::delete))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth_middleware,
        ));

    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(state.pool.clone())
        .merge(
            Router::new()
                .route("/", get(landing::page))
                // Auth flow (public)
                .route("/auth/signin", get(auth::signin))
                .route("/auth/error", get(auth::error_page))
                .route("/auth/keycloak", get(auth::keycloak_redirect))
                .route("/auth/callback", get(auth::callback))
                .route("/auth/logout", post(auth::logout))
                // Legal pages (public)
                .route("/legal/impressum", get(legal::impressum))
                .route("/legal/datenschutz", get(legal::datenschutz))
                .route("/legal/agb", get(legal::agb))
                .merge(protected)
                // Static assets (no auth)
                .route("/static/{*path}", get(assets::asset))
                .fallback(fallback)
                .with_state(state),
        )
}
