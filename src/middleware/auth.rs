use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use sqlx::prelude::FromRow;

use crate::auth::{verify_token, AUTH_COOKIE_NAME};
use crate::routes::AppState;

/// Authenticated user attached to the request by [`auth_middleware`].
#[derive(Clone, Debug, FromRow)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

async fn lookup_user(state: &AppState, user_id: &str) -> Result<Option<CurrentUser>, sqlx::Error> {
    sqlx::query_as::<_, CurrentUser>("SELECT id, name, email FROM users WHERE id = ?1")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await
}

/// Session gate for protected pages.
///
/// Validates the JWT from the session cookie and verifies the user still
/// exists, then attaches [`CurrentUser`] to the request. Redirects to the
/// sign-in page when the token is missing, invalid, or refers to an unknown
/// user.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(cookie) = jar.get(AUTH_COOKIE_NAME) else {
        return Redirect::to("/auth/signin").into_response();
    };

    let claims = match verify_token(cookie.value(), &state.config.jwt) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = %err, "invalid session token, redirecting to sign-in");
            return Redirect::to("/auth/signin").into_response();
        }
    };

    match lookup_user(&state, &claims.sub).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Ok(None) => {
            tracing::warn!(user = claims.sub, "session user not found, redirecting to sign-in");
            Redirect::to("/auth/signin").into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "user lookup failed, redirecting to sign-in");
            Redirect::to("/auth/signin").into_response()
        }
    }
}

/// Resolve the session without forcing one, for pages that render in both
/// states (landing page, sign-in redirect check).
pub async fn optional_user(state: &AppState, jar: &CookieJar) -> Option<CurrentUser> {
    let cookie = jar.get(AUTH_COOKIE_NAME)?;
    let claims = verify_token(cookie.value(), &state.config.jwt).ok()?;

    match lookup_user(state, &claims.sub).await {
        Ok(user) => user,
        Err(err) => {
            tracing::error!(error = %err, "user lookup failed");
            None
        }
    }
}
