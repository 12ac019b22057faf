use askama::Template;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::routes::AppState;
use crate::storage::ENTITIES_KEY;

/// Role of the current user within a shared list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Member,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Owner => "Besitzer",
            Role::Admin => "Admin",
            Role::Member => "Mitglied",
        }
    }
}

/// A shared shopping/meal list. The backend for these is mocked: entries
/// live in the per-user record store, counts and activity are display data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub role: Role,
    pub member_count: u32,
    pub item_count: u32,
    pub created_at: String,
    pub last_activity: String,
}

fn default_entities() -> Vec<Entity> {
    vec![
        Entity {
            id: "1".to_owned(),
            name: "Familienküche".to_owned(),
            description: Some("Haupthaushalt Familie Mustermann".to_owned()),
            role: Role::Owner,
            member_count: 3,
            item_count: 47,
            created_at: "2024-01-15".to_owned(),
            last_activity: "vor 2 Stunden".to_owned(),
        },
        Entity {
            id: "2".to_owned(),
            name: "WG Küche".to_owned(),
            description: Some("Gemeinsame Essensliste für die WG".to_owned()),
            role: Role::Member,
            member_count: 5,
            item_count: 23,
            created_at: "2024-02-01".to_owned(),
            last_activity: "vor 1 Tag".to_owned(),
        },
    ]
}

/// A member of a list, seeded mock data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub joined_at: String,
    pub last_active: String,
}

fn default_members() -> Vec<Member> {
    vec![
        Member {
            id: "1".to_owned(),
            name: "Jordi Isken".to_owned(),
            email: "jordi@isken-ag.de".to_owned(),
            role: Role::Owner,
            joined_at: "2024-01-15".to_owned(),
            last_active: "vor 5 Minuten".to_owned(),
        },
        Member {
            id: "2".to_owned(),
            name: "Anna Müller".to_owned(),
            email: "anna@example.com".to_owned(),
            role: Role::Admin,
            joined_at: "2024-01-20".to_owned(),
            last_active: "vor 2 Stunden".to_owned(),
        },
        Member {
            id: "3".to_owned(),
            name: "Max Schmidt".to_owned(),
            email: "max@example.com".to_owned(),
            role: Role::Member,
            joined_at: "2024-02-01".to_owned(),
            last_active: "vor 1 Tag".to_owned(),
        },
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteLink {
    pub id: String,
    pub role: Role,
    pub expires_at: String,
    pub usage_count: u32,
    pub max_usage: u32,
}

fn members_key(list_id: &str) -> String {
    format!("list-members:{list_id}")
}

fn invites_key(list_id: &str) -> String {
    format!("list-invites:{list_id}")
}

/// Load a JSON record, falling back to `default` when absent or corrupt.
async fn load_json<T: serde::de::DeserializeOwned>(
    state: &AppState,
    user_id: &str,
    key: &str,
    default: impl FnOnce() -> T,
) -> T {
    match state.store.read(user_id, key).await {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
            tracing::warn!(key, error = %err, "stored record is corrupt, reseeding");
            default()
        }),
        None => default(),
    }
}

async fn save_json<T: Serialize>(state: &AppState, user_id: &str, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => state.store.write(user_id, key, &raw).await,
        Err(err) => tracing::warn!(key, error = %err, "record serialization failed"),
    }
}

/// The user's lists. The seed shows until the first write; after that the
/// saved record is authoritative, so created and deleted lists stick.
async fn merged_entities(state: &AppState, user_id: &str) -> Vec<Entity> {
    load_json(state, user_id, ENTITIES_KEY, default_entities).await
}

pub struct EntityView {
    pub name: String,
    pub description: Option<String>,
    pub role_label: &'static str,
    pub member_count: u32,
    pub item_count: u32,
    pub last_activity: String,
    pub is_owner: bool,
    pub settings_url: String,
}

#[derive(Template)]
#[template(path = "lists.html")]
pub struct ListsTemplate {
    pub theme: &'static str,
    pub current_path: &'static str,
    pub user_name: String,
    pub entities: Vec<EntityView>,
    pub create_error: Option<String>,
}

async fn render_lists(
    state: &AppState,
    user: &CurrentUser,
    create_error: Option<String>,
) -> Result<Response, AppError> {
    let theme = state.store.theme(&user.id).await;

    let entities = merged_entities(state, &user.id)
        .await
        .into_iter()
        .map(|entity| EntityView {
            settings_url: format!("/lists/{}/settings", entity.id),
            name: entity.name,
            description: entity.description,
            role_label: entity.role.label(),
            member_count: entity.member_count,
            item_count: entity.item_count,
            last_activity: entity.last_activity,
            is_owner: entity.role == Role::Owner,
        })
        .collect();

    let template = ListsTemplate {
        theme: theme.as_str(),
        current_path: "lists",
        user_name: user.name.clone(),
        entities,
        create_error,
    };

    crate::routes::render_template(template)
}

/// GET /lists
pub async fn page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, AppError> {
    render_lists(&state, &user, None).await
}

#[derive(Deserialize, Validate)]
pub struct CreateListForm {
    #[validate(length(min = 1, message = "Name ist erforderlich"))]
    name: String,
    #[serde(default)]
    description: String,
}

/// POST /lists - create a list owned by the current user.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<CreateListForm>,
) -> Result<Response, AppError> {
    let name = form.name.trim().to_owned();
    if form.validate().is_err() || name.is_empty() {
        return render_lists(&state, &user, Some("Name ist erforderlich".to_owned())).await;
    }

    let description = form.description.trim();
    let entity = Entity {
        id: uuid::Uuid::new_v4().to_string(),
        name,
        description: (!description.is_empty()).then(|| description.to_owned()),
        role: Role::Owner,
        member_count: 1,
        item_count: 0,
        created_at: Local::now().date_naive().format("%Y-%m-%d").to_string(),
        last_activity: "gerade erstellt".to_owned(),
    };

    let mut entities = merged_entities(&state, &user.id).await;
    entities.push(entity);
    save_json(&state, &user.id, ENTITIES_KEY, &entities).await;

    Ok(Redirect::to("/lists").into_response())
}

pub struct MemberView {
    pub name: String,
    pub email: String,
    pub role_label: &'static str,
    pub joined_at: String,
    pub last_active: String,
    pub is_owner: bool,
    pub remove_url: String,
}

pub struct InviteView {
    pub role_label: &'static str,
    pub expires_at: String,
    pub usage: String,
}

#[derive(Template)]
#[template(path = "list_settings.html")]
pub struct ListSettingsTemplate {
    pub theme: &'static str,
    pub current_path: &'static str,
    pub user_name: String,
    pub list_name: String,
    pub list_description: String,
    pub members: Vec<MemberView>,
    pub invites: Vec<InviteView>,
    pub invite_action: String,
    pub delete_action: String,
}

/// GET /lists/{id}/settings - settings mock with member roster, invite
/// links and danger zone.
pub async fn settings(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Some(entity) = merged_entities(&state, &user.id)
        .await
        .into_iter()
        .find(|e| e.id == id)
    else {
        return Ok(crate::routes::fallback().await.into_response());
    };

    let theme = state.store.theme(&user.id).await;
    let members: Vec<Member> =
        load_json(&state, &user.id, &members_key(&id), default_members).await;
    let invites: Vec<InviteLink> = load_json(&state, &user.id, &invites_key(&id), Vec::new).await;

    let template = ListSettingsTemplate {
        theme: theme.as_str(),
        current_path: "lists",
        user_name: user.name.clone(),
        list_name: entity.name.clone(),
        list_description: entity.description.clone().unwrap_or_default(),
        members: members
            .iter()
            .map(|member| MemberView {
                name: member.name.clone(),
                email: member.email.clone(),
                role_label: member.role.label(),
                joined_at: member.joined_at.clone(),
                last_active: member.last_active.clone(),
                is_owner: member.role == Role::Owner,
                remove_url: format!("/lists/{}/settings/members/{}/remove", id, member.id),
            })
            .collect(),
        invites: invites
            .iter()
            .map(|invite| InviteView {
                role_label: invite.role.label(),
                expires_at: invite.expires_at.clone(),
                usage: format!("{}/{}", invite.usage_count, invite.max_usage),
            })
            .collect(),
        invite_action: format!("/lists/{id}/settings/invite"),
        delete_action: format!("/lists/{id}/delete"),
    };

    crate::routes::render_template(template)
}

#[derive(Deserialize)]
pub struct InviteForm {
    role: String,
}

/// POST /lists/{id}/settings/invite - create an invite link (7 days, 10 uses).
pub async fn create_invite(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Form(form): Form<InviteForm>,
) -> Redirect {
    let role = match form.role.as_str() {
        "admin" => Role::Admin,
        _ => Role::Member,
    };

    let invite = InviteLink {
        id: uuid::Uuid::new_v4().to_string(),
        role,
        expires_at: (Local::now().date_naive() + chrono::Duration::days(7))
            .format("%Y-%m-%d")
            .to_string(),
        usage_count: 0,
        max_usage: 10,
    };

    let mut invites: Vec<InviteLink> =
        load_json(&state, &user.id, &invites_key(&id), Vec::new).await;
    invites.push(invite);
    save_json(&state, &user.id, &invites_key(&id), &invites).await;

    Redirect::to(&format!("/lists/{id}/settings"))
}

/// POST /lists/{id}/settings/members/{member_id}/remove
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((id, member_id)): Path<(String, String)>,
) -> Redirect {
    let mut members: Vec<Member> =
        load_json(&state, &user.id, &members_key(&id), default_members).await;
    members.retain(|member| member.id != member_id);
    save_json(&state, &user.id, &members_key(&id), &members).await;

    Redirect::to(&format!("/lists/{id}/settings"))
}

/// POST /lists/{id}/delete - remove the list and its per-list records.
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Redirect {
    let mut entities = merged_entities(&state, &user.id).await;
    entities.retain(|entity| entity.id != id);
    save_json(&state, &user.id, ENTITIES_KEY, &entities).await;

    state.store.remove(&user.id, &members_key(&id)).await;
    state.store.remove(&user.id, &invites_key(&id)).await;

    Redirect::to("/lists")
}
