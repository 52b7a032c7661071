use crate::domain::{models::registration::{RegisteredEvent, Registration}, ports::RegistrationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

pub struct PostgresRegistrationRepo {
    pool: PgPool,
}

impl PostgresRegistrationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for PostgresRegistrationRepo {
    async fn create(&self, registration: &Registration) -> Result<Registration, AppError> {
        sqlx::query_as::<_, Registration>("INSERT INTO registrations (id, event_id, user_id, status, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *").bind(&registration.id).bind(&registration.event_id).bind(&registration.user_id).bind(&registration.status).bind(registration.created_at).fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_event_and_user(&self, event_id: &str, user_id: &str, status: &str) -> Result<Option<Registration>, AppError> {
        sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE event_id = $1 AND user_id = $2 AND status = $3").bind(event_id).bind(user_id).bind(status).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_user_with_events(&self, user_id: &str) -> Result<Vec<RegisteredEvent>, AppError> {
        sqlx::query_as::<_, RegisteredEvent>(
            r#"SELECT r.id AS registration_id, r.status AS registration_status, r.created_at AS registered_at, e.*
               FROM registrations r
               INNER JOIN events e ON e.id = r.event_id
               WHERE r.user_id = $1
               ORDER BY e.date ASC"#
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
    async fn count_by_event(&self, event_id: &str, status: &str) -> Result<i64, AppError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM registrations WHERE event_id = $1 AND status = $2").bind(event_id).bind(status).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count"))
    }
    async fn delete_by_event_and_user(&self, event_id: &str, user_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM registrations WHERE event_id = $1 AND user_id = $2").bind(event_id).bind(user_id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM registrations WHERE id = $1").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Registration not found".into())); }
        Ok(())
    }
}
