use askama::Template;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use serde::Deserialize;

use crate::auth::{build_cookie, AUTH_COOKIE_NAME};
use crate::error::AppError;
use crate::middleware::optional_user;
use crate::oidc;
use crate::routes::{render_template, AppState};

const OAUTH_STATE_COOKIE_NAME: &str = "oauth_state";

/// Sign-in error messages keyed by the provider error code.
fn signin_error_message(code: &str) -> &'static str {
    match code {
        "Signin" | "OAuthSignin" | "OAuthCallback" | "OAuthCreateAccount"
        | "EmailCreateAccount" | "Callback" => "Versuche es mit einem anderen Account.",
        "OAuthAccountNotLinked" => {
            "Bitte melde dich mit dem Account an, den du ursprünglich verwendet hast."
        }
        "EmailSignin" => "Bitte überprüfe deine E-Mail-Adresse.",
        "CredentialsSignin" => "Anmeldung fehlgeschlagen. Überprüfe deine Zugangsdaten.",
        _ => "Anmeldung nicht möglich.",
    }
}

#[derive(Template)]
#[template(path = "auth/signin.html")]
struct SigninTemplate {
    registration_url: String,
}

/// GET /auth/signin - sign-in page
///
/// Already-authenticated visitors are sent to the app instead.
pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    if optional_user(&state, &jar).await.is_some() {
        return Ok(Redirect::to("/home").into_response());
    }

    render_template(SigninTemplate {
        registration_url: state.config.oidc.registration_url(),
    })
}

#[derive(Deserialize)]
pub struct ErrorQuery {
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/error.html")]
struct AuthErrorTemplate {
    message: &'static str,
}

/// GET /auth/error - static error page for failed sign-ins
pub async fn error_page(Query(query): Query<ErrorQuery>) -> Result<Response, AppError> {
    let message = signin_error_message(query.error.as_deref().unwrap_or_default());
    render_template(AuthErrorTemplate { message })
}

/// GET /auth/keycloak - redirect to the identity provider's authorization
/// endpoint, with a short-lived CSRF state cookie.
pub async fn keycloak_redirect(State(state): State<AppState>) -> impl IntoResponse {
    let oauth_state = uuid::Uuid::new_v4().simple().to_string();

    let cookie = Cookie::build((OAUTH_STATE_COOKIE_NAME, oauth_state.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(10))
        .build();

    let jar = CookieJar::new().add(cookie);
    (jar, Redirect::temporary(&state.config.oidc.authorize_url(&oauth_state)))
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// GET /auth/callback - accept the provider's redirect: verify the CSRF
/// state, exchange the code, read userinfo, upsert the user and establish
/// the session.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> Response {
    if let Some(error) = params.error.as_deref() {
        tracing::warn!(error, "identity provider returned an error");
        return Redirect::to("/auth/error?error=OAuthSignin").into_response();
    }

    let expected_state = jar
        .get(OAUTH_STATE_COOKIE_NAME)
        .map(Cookie::value)
        .unwrap_or_default();
    let callback_state = params.state.as_deref().unwrap_or_default();
    if expected_state.is_empty() || expected_state != callback_state {
        tracing::warn!("oauth state mismatch");
        return Redirect::to("/auth/error?error=OAuthCallback").into_response();
    }

    let Some(code) = params.code.as_deref() else {
        return Redirect::to("/auth/error?error=OAuthCallback").into_response();
    };

    // Exchange the code and read the userinfo claims
    let access_token = match oidc::exchange_code(&state.http, &state.config.oidc, code).await {
        Ok(token) => token,
        Err(err) => {
            tracing::error!(error = %err, "oauth code exchange failed");
            return Redirect::to("/auth/error?error=OAuthCallback").into_response();
        }
    };

    let userinfo = match oidc::fetch_userinfo(&state.http, &state.config.oidc, &access_token).await
    {
        Ok(info) => info,
        Err(err) => {
            tracing::error!(error = %err, "userinfo request failed");
            return Redirect::to("/auth/error?error=OAuthCallback").into_response();
        }
    };

    if let Err(err) = upsert_user(&state, &userinfo).await {
        tracing::error!(error = %err, "user upsert failed");
        return Redirect::to("/auth/error?error=OAuthCreateAccount").into_response();
    }

    let session_cookie = match build_cookie(&state.config.jwt, userinfo.sub.clone()) {
        Ok(cookie) => cookie,
        Err(err) => {
            tracing::error!(error = %err, "session token generation failed");
            return Redirect::to("/auth/error?error=Signin").into_response();
        }
    };

    tracing::info!(user = userinfo.sub, "user signed in");

    let jar = jar
        .remove(Cookie::from(OAUTH_STATE_COOKIE_NAME))
        .add(session_cookie);
    (jar, Redirect::to("/home")).into_response()
}

async fn upsert_user(state: &AppState, userinfo: &oidc::UserInfo) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO users (id, name, email, created_at)
         VALUES (?1, ?2, ?3, strftime('%s', 'now'))
         ON CONFLICT (id)
         DO UPDATE SET name = excluded.name, email = excluded.email,
                       updated_at = strftime('%s', 'now')",
    )
    .bind(&userinfo.sub)
    .bind(userinfo.display_name())
    .bind(userinfo.email.as_deref().unwrap_or_default())
    .execute(&state.pool)
    .await?;

    Ok(())
}

/// POST /auth/logout - clear session cookie
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.remove(Cookie::from(AUTH_COOKIE_NAME));
    (jar, Redirect::to("/"))
}
