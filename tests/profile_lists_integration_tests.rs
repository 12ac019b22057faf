use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use std::io::Cursor;
use tower::ServiceExt;

mod common;

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get_request(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn form_request(uri: &str, cookie: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn png_upload_request(uri: &str, cookie: &str, png: Vec<u8>) -> Request<Body> {
    let boundary = "test-boundary-7f9a";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; \
             filename=\"avatar.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(&png);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn tiny_png() -> Vec<u8> {
    let mut png = Vec::new();
    image::RgbaImage::from_pixel(4, 4, image::Rgba([120, 80, 40, 255]))
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    png
}

#[tokio::test]
async fn test_profile_shows_the_session_user() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;
    let cookie = common::signed_in_user(&pool).await;

    let response = app.oneshot(get_request("/profile", &cookie)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Jordi Isken"));
    assert!(body.contains("jordi@example.com"));
    assert!(body.contains("Authentifiziert via Keycloak"));
    assert!(body.contains("Bring"));
    assert!(body.contains("Rewe"));
}

#[tokio::test]
async fn test_profile_image_upload_and_delete() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;
    let cookie = common::signed_in_user(&pool).await;

    let response = app
        .clone()
        .oneshot(png_upload_request("/profile/image", &cookie, tiny_png()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .clone()
        .oneshot(get_request("/profile", &cookie))
        .await
        .unwrap();
    let body = body_string(response).await;
    assert!(body.contains("data:image/png;base64,"));
    assert!(body.contains("Entfernen"));

    let response = app
        .clone()
        .oneshot(form_request("/profile/image/delete", &cookie, ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .oneshot(get_request("/profile", &cookie))
        .await
        .unwrap();
    let body = body_string(response).await;
    assert!(!body.contains("data:image/png;base64,"));
}

#[tokio::test]
async fn test_garbage_upload_reports_an_error_and_stores_nothing() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;
    let cookie = common::signed_in_user(&pool).await;

    let response = app
        .clone()
        .oneshot(png_upload_request(
            "/profile/image",
            &cookie,
            b"not a png at all".to_vec(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("konnte nicht als Bild gelesen werden"));

    let stored: Option<String> = sqlx::query_scalar(
        "SELECT value FROM local_store WHERE user_id = ?1 AND key = 'profile-image'",
    )
    .bind(common::TEST_USER_ID)
    .fetch_optional(&pool)
    .await
    .unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
async fn test_lists_show_seeded_entities() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;
    let cookie = common::signed_in_user(&pool).await;

    let response = app.oneshot(get_request("/lists", &cookie)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Familienküche"));
    assert!(body.contains("WG Küche"));
    assert!(body.contains("Besitzer"));
    assert!(body.contains("Mitglied"));
}

#[tokio::test]
async fn test_created_list_persists_across_requests() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;
    let cookie = common::signed_in_user(&pool).await;

    let response = app
        .clone()
        .oneshot(form_request(
            "/lists",
            &cookie,
            "name=Camping-Trip&description=Essen+im+Zelt",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app.oneshot(get_request("/lists", &cookie)).await.unwrap();
    let body = body_string(response).await;
    assert!(body.contains("Camping-Trip"));
    assert!(body.contains("Essen im Zelt"));
}

#[tokio::test]
async fn test_blank_list_name_is_rejected() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;
    let cookie = common::signed_in_user(&pool).await;

    let body =
        serde_urlencoded::to_string([("name", "   "), ("description", "")]).unwrap();
    let response = app
        .oneshot(form_request("/lists", &cookie, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Name ist erforderlich"));
}

#[tokio::test]
async fn test_list_settings_show_the_member_roster() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;
    let cookie = common::signed_in_user(&pool).await;

    let response = app
        .oneshot(get_request("/lists/1/settings", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Jordi Isken"));
    assert!(body.contains("Anna Müller"));
    assert!(body.contains("Max Schmidt"));
}

#[tokio::test]
async fn test_settings_for_unknown_list_is_404() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;
    let cookie = common::signed_in_user(&pool).await;

    let response = app
        .oneshot(get_request("/lists/nope/settings", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_removed_member_stays_gone() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;
    let cookie = common::signed_in_user(&pool).await;

    let response = app
        .clone()
        .oneshot(form_request(
            "/lists/1/settings/members/3/remove",
            &cookie,
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .oneshot(get_request("/lists/1/settings", &cookie))
        .await
        .unwrap();
    let body = body_string(response).await;
    assert!(!body.contains("Max Schmidt"));
    assert!(body.contains("Anna Müller"));
}

#[tokio::test]
async fn test_invite_link_creation_shows_up_in_settings() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;
    let cookie = common::signed_in_user(&pool).await;

    app.clone()
        .oneshot(form_request("/lists/1/settings/invite", &cookie, "role=admin"))
        .await
        .unwrap();

    let response = app
        .oneshot(get_request("/lists/1/settings", &cookie))
        .await
        .unwrap();
    let body = body_string(response).await;
    assert!(body.contains("gültig bis"));
    assert!(body.contains("0/10 verwendet"));
}

#[tokio::test]
async fn test_deleted_list_disappears_from_the_overview() {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone()).await;
    let cookie = common::signed_in_user(&pool).await;

    let response = app
        .clone()
        .oneshot(form_request("/lists/1/delete", &cookie, ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/lists");

    let response = app.oneshot(get_request("/lists", &cookie)).await.unwrap();
    let body = body_string(response).await;
    assert!(!body.contains("Familienküche"));
    assert!(body.contains("WG Küche"));
}
