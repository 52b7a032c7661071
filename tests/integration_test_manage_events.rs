mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{event_payload, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_management_requires_staff_role() {
    let app = TestApp::new().await;
    let user = app.signup("member@example.com").await;

    let (status, _) = app.send("GET", "/api/v1/manage/events", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send("GET", "/api/v1/manage/events", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let payload = event_payload("Sneaky", Utc::now() + Duration::days(1));
    let (status, _) = app.send("POST", "/api/v1/manage/events", Some(&user), Some(payload)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_event_form_coercion() {
    let app = TestApp::new().await;
    let staff = app.staff("staff@example.com").await;

    let (status, body) = app.send("POST", "/api/v1/manage/events", Some(&staff), Some(json!({
        "name": "Poetry Slam",
        "date": "2026-11-05",
        "price": "",
        "max_attendees": ""
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["price"].is_null());
    assert!(body["max_attendees"].is_null());
    assert_eq!(body["status"], "active");
    assert_eq!(body["current_attendees"], 0);
    assert_eq!(body["organizer_id"], staff.user_id.as_str());
    assert!(body["date"].as_str().unwrap().starts_with("2026-11-05T00:00:00"));

    let (status, body) = app.send("POST", "/api/v1/manage/events", Some(&staff), Some(json!({
        "name": "Free Tasting",
        "date": "2026-11-06T18:00:00Z",
        "price": "0",
        "max_attendees": "25"
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["price"], 0.0);
    assert_eq!(body["max_attendees"], 25);
}

#[tokio::test]
async fn test_create_event_validation() {
    let app = TestApp::new().await;
    let staff = app.staff("staff@example.com").await;
    let date = "2026-11-05";

    let cases = [
        json!({ "name": "", "date": date }),
        json!({ "name": "No Date" }),
        json!({ "name": "Bad Date", "date": "next tuesday" }),
        json!({ "name": "Negative", "date": date, "price": -5 }),
        json!({ "name": "Words", "date": date, "price": "ten" }),
        json!({ "name": "Nobody", "date": date, "max_attendees": 0 }),
        json!({ "name": "Draft", "date": date, "status": "draft" }),
    ];

    for payload in cases {
        let (status, _) = app.send("POST", "/api/v1/manage/events", Some(&staff), Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload accepted: {}", payload);
    }

    let (_, body) = app.send("GET", "/api/v1/manage/events", Some(&staff), None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_staff_only_manage_their_own_events() {
    let app = TestApp::new().await;
    let alice = app.staff("alice@example.com").await;
    let bob = app.staff("bob@example.com").await;

    let later = app.create_event(&alice, event_payload("Later", Utc::now() + Duration::days(9))).await;
    let sooner = app.create_event(&alice, event_payload("Sooner", Utc::now() + Duration::days(1))).await;
    app.create_event(&bob, event_payload("Bob's Show", Utc::now() + Duration::days(2))).await;

    let (_, body) = app.send("GET", "/api/v1/manage/events", Some(&alice), None).await;
    let ids: Vec<&str> = body.as_array().unwrap().iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![sooner.as_str(), later.as_str()]);

    let uri = format!("/api/v1/manage/events/{}", later);
    let (status, _) = app.send("PUT", &uri, Some(&bob), Some(json!({ "name": "Hijacked" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send("DELETE", &format!("{}?confirm=true", uri), Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send("PUT", "/api/v1/manage/events/unknown", Some(&alice), Some(json!({ "name": "X" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_event_partially() {
    let app = TestApp::new().await;
    let staff = app.staff("editor@example.com").await;

    let mut payload = event_payload("Book Club", Utc::now() + Duration::days(3));
    payload["price"] = json!(12.5);
    payload["max_attendees"] = json!(30);
    let event_id = app.create_event(&staff, payload).await;
    let uri = format!("/api/v1/manage/events/{}", event_id);

    let (status, body) = app.send("PUT", &uri, Some(&staff), Some(json!({
        "name": "Book Club (Autumn)",
        "price": ""
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Book Club (Autumn)");
    assert!(body["price"].is_null());
    assert_eq!(body["max_attendees"], 30);
    assert_eq!(body["location"], "Town Hall");

    let (status, body) = app.send("PUT", &uri, Some(&staff), Some(json!({ "status": "cancelled" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    let (_, catalog) = app.send("GET", "/api/v1/events", None, None).await;
    assert_eq!(catalog["total_items"], 0);

    let (status, _) = app.send("PUT", &uri, Some(&staff), Some(json!({ "max_attendees": -1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_event_needs_confirmation_and_cascades() {
    let app = TestApp::new().await;
    let staff = app.staff("cleaner@example.com").await;
    let user = app.signup("attendee@example.com").await;

    let doomed = app.create_event(&staff, event_payload("Doomed", Utc::now() + Duration::days(1))).await;
    let kept = app.create_event(&staff, event_payload("Kept", Utc::now() + Duration::days(2))).await;
    app.send("POST", &format!("/api/v1/events/{}/register", doomed), Some(&user), None).await;

    let uri = format!("/api/v1/manage/events/{}", doomed);
    let (status, _) = app.send("DELETE", &uri, Some(&staff), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.send("DELETE", &format!("{}?confirm=true", uri), Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK);
    let remaining: Vec<&str> = body.as_array().unwrap().iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert_eq!(remaining, vec![kept.as_str()]);

    let (status, _) = app.send("GET", &format!("/api/v1/events/{}", doomed), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, dashboard) = app.send("GET", "/api/v1/me/registrations", Some(&user), None).await;
    assert!(dashboard.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_reconcile_resets_attendee_count() {
    let app = TestApp::new().await;
    let staff = app.staff("counter@example.com").await;
    let user = app.signup("flaky@example.com").await;
    let event_id = app.create_event(&staff, event_payload("Hackathon", Utc::now() + Duration::days(6))).await;
    let register_uri = format!("/api/v1/events/{}/register", event_id);

    app.send("POST", &register_uri, Some(&user), None).await;
    app.send("DELETE", &register_uri, Some(&user), None).await;
    let (_, body) = app.send("POST", &register_uri, Some(&user), None).await;
    assert_eq!(body["event"]["current_attendees"], 2);

    let (status, body) = app.send("POST", &format!("/api/v1/manage/events/{}/reconcile", event_id), Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_attendees"], 1);
}
