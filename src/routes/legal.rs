use askama::Template;
use axum::response::{Html, IntoResponse};

#[derive(Template)]
#[template(path = "legal/impressum.html")]
struct ImpressumTemplate;

#[derive(Template)]
#[template(path = "legal/datenschutz.html")]
struct DatenschutzTemplate;

#[derive(Template)]
#[template(path = "legal/agb.html")]
struct AgbTemplate;

/// GET /legal/impressum (public)
pub async fn impressum() -> impl IntoResponse {
    render(ImpressumTemplate)
}

/// GET /legal/datenschutz (public)
pub async fn datenschutz() -> impl IntoResponse {
    render(DatenschutzTemplate)
}

/// GET /legal/agb (public)
pub async fn agb() -> impl IntoResponse {
    render(AgbTemplate)
}

fn render<T: Template>(template: T) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Failed to render legal template: {}", e);
        format!("Error rendering template: {}", e)
    }))
}
