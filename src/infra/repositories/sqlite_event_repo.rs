use crate::domain::{models::event::Event, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, name, description, date, location, price, image_url, category,
                max_attendees, current_attendees, status, organizer_id, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *"#
        )
            .bind(&event.id)
            .bind(&event.name)
            .bind(&event.description)
            .bind(event.date)
            .bind(&event.location)
            .bind(event.price)
            .bind(&event.image_url)
            .bind(&event.category)
            .bind(event.max_attendees)
            .bind(event.current_attendees)
            .bind(&event.status)
            .bind(&event.organizer_id)
            .bind(event.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_status(&self, status: &str) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE status = ? ORDER BY date ASC")
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE organizer_id = ? ORDER BY date ASC")
            .bind(organizer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                name=?, description=?, date=?, location=?, price=?, image_url=?,
                category=?, max_attendees=?, status=?
               WHERE id=? RETURNING *"#
        )
            .bind(&event.name)
            .bind(&event.description)
            .bind(event.date)
            .bind(&event.location)
            .bind(event.price)
            .bind(&event.image_url)
            .bind(&event.category)
            .bind(event.max_attendees)
            .bind(&event.status)
            .bind(&event.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Event not found".into()))
    }

    async fn increment_attendees(&self, id: &str, respect_capacity: bool) -> Result<Option<Event>, AppError> {
        let sql = if respect_capacity {
            "UPDATE events SET current_attendees = current_attendees + 1
             WHERE id = ? AND (max_attendees IS NULL OR current_attendees < max_attendees)
             RETURNING *"
        } else {
            "UPDATE events SET current_attendees = current_attendees + 1 WHERE id = ? RETURNING *"
        };

        sqlx::query_as::<_, Event>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn decrement_attendees(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "UPDATE events SET current_attendees = current_attendees - 1
             WHERE id = ? AND current_attendees > 0 RETURNING *"
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_attendees(&self, id: &str, count: i32) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>("UPDATE events SET current_attendees = ? WHERE id = ? RETURNING *")
            .bind(count)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Event not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }
        Ok(())
    }
}
