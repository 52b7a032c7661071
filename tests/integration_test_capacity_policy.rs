mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{event_payload, AuthHeaders, TestApp};
use events_compass::{
    config::CapacityPolicy,
    domain::{models::event::Event, ports::EventRepository},
    error::AppError,
};
use serde_json::json;
use std::sync::Arc;

/// Delegates to the real repository but fails every attendee increment.
struct FailingIncrementEventRepo {
    inner: Arc<dyn EventRepository>,
}

#[async_trait]
impl EventRepository for FailingIncrementEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> { self.inner.create(event).await }
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> { self.inner.find_by_id(id).await }
    async fn list_by_status(&self, status: &str) -> Result<Vec<Event>, AppError> { self.inner.list_by_status(status).await }
    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError> { self.inner.list_by_organizer(organizer_id).await }
    async fn update(&self, event: &Event) -> Result<Event, AppError> { self.inner.update(event).await }
    async fn increment_attendees(&self, _id: &str, _respect_capacity: bool) -> Result<Option<Event>, AppError> {
        Err(AppError::InternalWithMsg("counter unavailable".into()))
    }
    async fn decrement_attendees(&self, id: &str) -> Result<Option<Event>, AppError> { self.inner.decrement_attendees(id).await }
    async fn set_attendees(&self, id: &str, count: i32) -> Result<Event, AppError> { self.inner.set_attendees(id, count).await }
    async fn delete(&self, id: &str) -> Result<(), AppError> { self.inner.delete(id).await }
}

async fn small_event(app: &TestApp, staff: &AuthHeaders, max: i32) -> String {
    let mut payload = event_payload("Tiny Room", Utc::now() + Duration::days(2));
    payload["max_attendees"] = json!(max);
    app.create_event(staff, payload).await
}

async fn registration_count(app: &TestApp) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM registrations")
        .fetch_one(&app.pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_default_policy_accepts_registrations_past_capacity() {
    let app = TestApp::new().await;
    let staff = app.staff("host@example.com").await;
    let first = app.signup("first@example.com").await;
    let second = app.signup("second@example.com").await;
    let third = app.signup("third@example.com").await;
    let event_id = small_event(&app, &staff, 2).await;
    let uri = format!("/api/v1/events/{}/register", event_id);

    for user in [&first, &second] {
        let (status, _) = app.send("POST", &uri, Some(user), None).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (_, detail) = app.send("GET", &format!("/api/v1/events/{}", event_id), Some(&third), None).await;
    assert_eq!(detail["event"]["current_attendees"], 2);
    assert_eq!(detail["event"]["max_attendees"], 2);

    let (status, body) = app.send("POST", &uri, Some(&third), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["registration_status"], "registered");
    assert_eq!(body["event"]["current_attendees"], 3);
    assert_eq!(registration_count(&app).await, 3);
}

#[tokio::test]
async fn test_enforced_capacity_rejects_full_events() {
    let policy = CapacityPolicy { enforce_capacity: true, decrement_on_unregister: false };
    let app = TestApp::with_policy(policy).await;
    let staff = app.staff("host@example.com").await;
    let first = app.signup("first@example.com").await;
    let second = app.signup("second@example.com").await;
    let event_id = small_event(&app, &staff, 1).await;
    let uri = format!("/api/v1/events/{}/register", event_id);

    let (status, _) = app.send("POST", &uri, Some(&first), None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.send("POST", &uri, Some(&second), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, detail) = app.send("GET", &format!("/api/v1/events/{}", event_id), Some(&second), None).await;
    assert_eq!(detail["event"]["current_attendees"], 1);
    assert_eq!(detail["registration_status"], "unregistered");
    assert_eq!(registration_count(&app).await, 1);
}

#[tokio::test]
async fn test_decrement_policy_releases_seats() {
    let policy = CapacityPolicy { enforce_capacity: true, decrement_on_unregister: true };
    let app = TestApp::with_policy(policy).await;
    let staff = app.staff("host@example.com").await;
    let first = app.signup("first@example.com").await;
    let second = app.signup("second@example.com").await;
    let event_id = small_event(&app, &staff, 1).await;
    let uri = format!("/api/v1/events/{}/register", event_id);

    app.send("POST", &uri, Some(&first), None).await;
    let (status, body) = app.send("DELETE", &uri, Some(&first), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["current_attendees"], 0);

    // Unregistering twice never drives the counter negative
    let (_, body) = app.send("DELETE", &uri, Some(&first), None).await;
    assert_eq!(body["event"]["current_attendees"], 0);

    let (status, body) = app.send("POST", &uri, Some(&second), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["event"]["current_attendees"], 1);
}

#[tokio::test]
async fn test_failed_increment_rolls_back_registration() {
    let app = TestApp::build(CapacityPolicy::default(), |mut repos| {
        repos.events = Arc::new(FailingIncrementEventRepo { inner: repos.events.clone() });
        repos
    }).await;
    let staff = app.staff("host@example.com").await;
    let user = app.signup("unlucky@example.com").await;
    let event_id = small_event(&app, &staff, 10).await;

    let (status, _) = app.send("POST", &format!("/api/v1/events/{}/register", event_id), Some(&user), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(registration_count(&app).await, 0);

    let (_, detail) = app.send("GET", &format!("/api/v1/events/{}", event_id), Some(&user), None).await;
    assert_eq!(detail["registration_status"], "unregistered");
    assert_eq!(detail["event"]["current_attendees"], 0);
}
