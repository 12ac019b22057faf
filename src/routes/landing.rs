use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use axum_extra::extract::CookieJar;

use crate::middleware::optional_user;
use crate::routes::AppState;

#[derive(Template)]
#[template(path = "landing.html")]
struct LandingTemplate {
    authenticated: bool,
    registration_url: String,
}

/// GET / - public landing page; the call-to-action changes with the
/// session state.
pub async fn page(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let authenticated = optional_user(&state, &jar).await.is_some();

    let template = LandingTemplate {
        authenticated,
        registration_url: state.config.oidc.registration_url(),
    };

    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Failed to render landing template: {}", e);
        format!("Error rendering template: {}", e)
    }))
}
