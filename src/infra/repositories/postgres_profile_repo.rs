use crate::domain::{models::profile::Profile, ports::ProfileRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresProfileRepo {
    pool: PgPool,
}

impl PostgresProfileRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepo {
    async fn upsert(&self, profile: &Profile) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(
            r#"INSERT INTO profiles (id, full_name, avatar_url, role, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6)
               ON CONFLICT (id) DO UPDATE SET
                   full_name = EXCLUDED.full_name,
                   avatar_url = EXCLUDED.avatar_url,
                   updated_at = EXCLUDED.updated_at
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
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_role(&self, id: &str, role: &str) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>("UPDATE profiles SET role = $1, updated_at = $2 WHERE id = $3 RETURNING *")
            .bind(role)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Profile not found".into()))
    }
}
