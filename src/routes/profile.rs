use askama::Template;
use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use std::io::Cursor;

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::routes::AppState;
use crate::storage::{Theme, PROFILE_IMAGE_KEY};

/// Largest avatar edge kept after upload; bigger images get downscaled.
const MAX_IMAGE_EDGE: u32 = 512;

const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

pub struct IntegrationView {
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub benefits: Vec<&'static str>,
    pub tag: &'static str,
    pub connected: bool,
}

fn integrations() -> Vec<IntegrationView> {
    vec![
        IntegrationView {
            name: "Bring",
            emoji: "🧺",
            description: "Einkaufsliste synchronisieren",
            benefits: vec![
                "Rezepte → Liste übernehmen",
                "Automatische Mengen",
                "Mehrere Listen teilen",
            ],
            tag: "Beliebt",
            connected: false,
        },
        IntegrationView {
            name: "Lidl",
            emoji: "🛒",
            description: "Produkte & Online-Shop",
            benefits: vec!["Preise direkt sehen", "Warenkorb füllen", "Filial-Verfügbarkeit"],
            tag: "Neu",
            connected: false,
        },
        IntegrationView {
            name: "Rewe",
            emoji: "🚚",
            description: "Liefer- & Abholservice",
            benefits: vec![
                "Lieferzeit wählen",
                "Alternativen vorschlagen",
                "Bon digital",
            ],
            tag: "Empfohlen",
            connected: false,
        },
        IntegrationView {
            name: "Aldi",
            emoji: "🏷️",
            description: "Wochenangebote & Aktionen",
            benefits: vec!["Spar-Tipps integrieren", "Preisverlauf", "Favoriten"],
            tag: "Angebote",
            connected: false,
        },
    ]
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub theme: &'static str,
    pub current_path: &'static str,
    pub user_name: String,
    pub user_email: String,
    pub profile_image: Option<String>,
    pub upload_error: Option<String>,
    pub integrations: Vec<IntegrationView>,
    pub next_theme: &'static str,
    pub theme_action_label: &'static str,
}

async fn render_page(
    state: &AppState,
    user: &CurrentUser,
    upload_error: Option<String>,
) -> Result<Response, AppError> {
    let theme = state.store.theme(&user.id).await;
    let profile_image = state.store.profile_image(&user.id).await;

    let template = ProfileTemplate {
        theme: theme.as_str(),
        current_path: "profile",
        user_name: user.name.clone(),
        user_email: user.email.clone(),
        profile_image,
        upload_error,
        integrations: integrations(),
        next_theme: theme.toggled().as_str(),
        theme_action_label: match theme {
            Theme::Light => "Dunkles Design",
            Theme::Dark => "Helles Design",
        },
    };

    crate::routes::render_template(template)
}

/// GET /profile
pub async fn page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, AppError> {
    render_page(&state, &user, None).await
}

/// Decode, downscale and re-encode an uploaded avatar as a PNG data URI.
fn image_to_data_uri(bytes: &[u8]) -> Result<String, image::ImageError> {
    let mut img = image::load_from_memory(bytes)?;
    if img.width() > MAX_IMAGE_EDGE || img.height() > MAX_IMAGE_EDGE {
        img = img.thumbnail(MAX_IMAGE_EDGE, MAX_IMAGE_EDGE);
    }

    let mut encoded = Vec::new();
    img.write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)?;

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&encoded)))
}

/// POST /profile/image - multipart avatar upload.
///
/// The file is read to completion, validated as an image, downscaled and
/// stored as a data URI; any failure re-renders the page with a message
/// instead of leaving a half-written record.
pub async fn upload_image(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => {
            return render_page(&state, &user, Some("Keine Datei ausgewählt.".to_owned())).await;
        }
        Err(err) => {
            tracing::warn!(error = %err, "multipart upload failed");
            return render_page(&state, &user, Some("Upload fehlgeschlagen.".to_owned())).await;
        }
    };

    let content_type = field.content_type().unwrap_or_default().to_owned();
    if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
        return render_page(
            &state,
            &user,
            Some("Bitte wähle ein Bild (PNG, JPEG oder WebP).".to_owned()),
        )
        .await;
    }

    let bytes = match field.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "reading upload failed");
            return render_page(&state, &user, Some("Upload fehlgeschlagen.".to_owned())).await;
        }
    };

    let data_uri = match image_to_data_uri(&bytes) {
        Ok(uri) => uri,
        Err(err) => {
            tracing::warn!(error = %err, "uploaded file is not a readable image");
            return render_page(
                &state,
                &user,
                Some("Die Datei konnte nicht als Bild gelesen werden.".to_owned()),
            )
            .await;
        }
    };

    state.store.write(&user.id, PROFILE_IMAGE_KEY, &data_uri).await;

    Ok(Redirect::to("/profile").into_response())
}

/// POST /profile/image/delete
pub async fn delete_image(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Redirect {
    state.store.remove(&user.id, PROFILE_IMAGE_KEY).await;
    Redirect::to("/profile")
}

#[derive(Deserialize)]
pub struct ThemeForm {
    theme: String,
}

/// POST /profile/theme - persist the light/dark preference.
pub async fn toggle_theme(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<ThemeForm>,
) -> Redirect {
    state
        .store
        .set_theme(&user.id, Theme::parse(&form.theme))
        .await;
    Redirect::to("/profile")
}
