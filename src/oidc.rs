//! OpenID Connect adapter: authorization redirect, code exchange, userinfo.
//!
//! The application's only obligations towards the provider: send the user to
//! the authorization endpoint with a callback URL, turn the returned code
//! into tokens, and read the userinfo claims to establish a session.

use serde::Deserialize;

use crate::config::OidcConfig;

#[derive(Debug, thiserror::Error)]
pub enum OidcError {
    #[error("token exchange failed: {0}")]
    TokenExchange(String),
    #[error("userinfo request failed: {0}")]
    Userinfo(String),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Claims returned by the provider's userinfo endpoint.
#[derive(Debug, Deserialize)]
pub struct UserInfo {
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserInfo {
    /// Best available display name, falling back through the claims.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.preferred_username.as_deref())
            .or(self.email.as_deref())
            .unwrap_or(&self.sub)
    }
}

impl OidcConfig {
    pub fn authorize_endpoint(&self) -> String {
        format!("{}/protocol/openid-connect/auth", self.issuer)
    }

    pub fn token_endpoint(&self) -> String {
        format!("{}/protocol/openid-connect/token", self.issuer)
    }

    pub fn userinfo_endpoint(&self) -> String {
        format!("{}/protocol/openid-connect/userinfo", self.issuer)
    }

    /// Self-service registration page of the realm, linked from the landing
    /// and sign-in pages.
    pub fn registration_url(&self) -> String {
        format!(
            "{}/protocol/openid-connect/registrations?client_id={}&response_type=code&scope=openid&redirect_uri={}",
            self.issuer,
            self.client_id,
            urlencoding::encode(&self.redirect_uri)
        )
    }

    /// Build the authorization URL the sign-in flow redirects to.
    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&response_type=code&scope=openid%20profile%20email&redirect_uri={}&state={}",
            self.authorize_endpoint(),
            self.client_id,
            urlencoding::encode(&self.redirect_uri),
            state
        )
    }
}

/// Exchange an authorization code for an access token.
pub async fn exchange_code(
    http: &reqwest::Client,
    config: &OidcConfig,
    code: &str,
) -> Result<String, OidcError> {
    let resp = http
        .post(config.token_endpoint())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await
        .map_err(|e| OidcError::TokenExchange(e.to_string()))?;

    let body = resp
        .text()
        .await
        .map_err(|e| OidcError::TokenExchange(e.to_string()))?;
    let token_resp: TokenResponse = serde_json::from_str(&body)
        .map_err(|_| OidcError::TokenExchange(format!("unexpected response: {body}")))?;
    Ok(token_resp.access_token)
}

/// Fetch the authenticated user's claims from the userinfo endpoint.
pub async fn fetch_userinfo(
    http: &reqwest::Client,
    config: &OidcConfig,
    access_token: &str,
) -> Result<UserInfo, OidcError> {
    let resp = http
        .get(config.userinfo_endpoint())
        .header("Authorization", format!("Bearer {access_token}"))
        .send()
        .await
        .map_err(|e| OidcError::Userinfo(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(OidcError::Userinfo(format!("{status}: {body}")));
    }

    resp.json::<UserInfo>()
        .await
        .map_err(|e| OidcError::Userinfo(e.to_string()))
}
