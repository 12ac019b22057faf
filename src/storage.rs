//! Per-user keyed record store.
//!
//! Backs what the browser app kept in localStorage: a handful of
//! independent records per user (`theme`, `profile-image`, `food-plan`,
//! `user-entities`), each read in full at page render and rewritten in full
//! on every mutation. Storage failures never bubble into a response; reads
//! degrade to defaults and failed writes skip persistence.

use sqlx::SqlitePool;
use weekplan::PlanStore;

pub const THEME_KEY: &str = "theme";
pub const PROFILE_IMAGE_KEY: &str = "profile-image";
pub const PLAN_KEY: &str = "food-plan";
pub const ENTITIES_KEY: &str = "user-entities";

/// Color theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read one record, `None` when absent or unreadable.
    pub async fn read(&self, user_id: &str, key: &str) -> Option<String> {
        let result = sqlx::query_scalar::<_, String>(
            "SELECT value FROM local_store WHERE user_id = ?1 AND key = ?2",
        )
        .bind(user_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "local store read failed, using default");
                None
            }
        }
    }

    /// Rewrite one record in full. Failed writes are logged and skipped.
    pub async fn write(&self, user_id: &str, key: &str, value: &str) {
        let result = sqlx::query(
            "INSERT INTO local_store (user_id, key, value, updated_at)
             VALUES (?1, ?2, ?3, strftime('%s', 'now'))
             ON CONFLICT (user_id, key)
             DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(user_id)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await;

        if let Err(err) = result {
            tracing::warn!(key, error = %err, "local store write failed, skipping persistence");
        }
    }

    pub async fn remove(&self, user_id: &str, key: &str) {
        let result = sqlx::query("DELETE FROM local_store WHERE user_id = ?1 AND key = ?2")
            .bind(user_id)
            .bind(key)
            .execute(&self.pool)
            .await;

        if let Err(err) = result {
            tracing::warn!(key, error = %err, "local store delete failed");
        }
    }

    pub async fn theme(&self, user_id: &str) -> Theme {
        self.read(user_id, THEME_KEY)
            .await
            .map(|value| Theme::parse(&value))
            .unwrap_or_default()
    }

    pub async fn set_theme(&self, user_id: &str, theme: Theme) {
        self.write(user_id, THEME_KEY, theme.as_str()).await;
    }

    pub async fn profile_image(&self, user_id: &str) -> Option<String> {
        self.read(user_id, PROFILE_IMAGE_KEY).await
    }

    /// The user's full plan store; empty when nothing was persisted yet or
    /// the record is unreadable.
    pub async fn plan_store(&self, user_id: &str) -> PlanStore {
        match self.read(user_id, PLAN_KEY).await {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "stored plan is corrupt, starting empty");
                PlanStore::default()
            }),
            None => PlanStore::default(),
        }
    }

    /// Load, transform and persist the whole plan store as one unit, so a
    /// crash between read and write never leaves a partially-applied update
    /// behind.
    pub async fn update_plan_store<F>(&self, user_id: &str, mutate: F) -> PlanStore
    where
        F: FnOnce(&mut PlanStore),
    {
        let mut store = self.plan_store(user_id).await;
        mutate(&mut store);

        match serde_json::to_string(&store) {
            Ok(raw) => self.write(user_id, PLAN_KEY, &raw).await,
            Err(err) => {
                tracing::warn!(error = %err, "plan store serialization failed, skipping persistence")
            }
        }

        store
    }
}
