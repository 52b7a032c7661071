use crate::domain::{models::profile::Profile, ports::ProfileRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteProfileRepo {
    pool: SqlitePool,
}

impl SqliteProfileRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepo {
    async fn upsert(&self, profile: &Profile) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(
            r#"INSERT INTO profiles (id, full_name, avatar_url, role, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   full_name = excluded.full_name,
                   avatar_url = excluded.avatar_url,
                   updated_at = excluded.updated_at
               RETURNING *"#
        )
            .bind(&profile.id)
            .bind(&profile.full_name)
            .bind(&profile.avatar_url)
            .bind(&profile.role)
            .bind(profile.created_at)
            .bind(profile.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>, AppError> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_role(&self, id: &str, role: &str) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>("UPDATE profiles SET role = ?, updated_at = ? WHERE id = ? RETURNING *")
            .bind(role)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Profile not found".into()))
    }
}
