use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, auth, catalog, event, dashboard, manage};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/signup", post(auth::signup))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/session", get(auth::current_session))
        .route("/api/v1/auth/oauth/{provider}", get(auth::oauth_redirect))

        // Catalog & Detail
        .route("/api/v1/events", get(catalog::list_events))
        .route("/api/v1/events/{event_id}", get(event::get_event))
        .route("/api/v1/events/{event_id}/register", post(event::register).delete(event::unregister))
        .route("/api/v1/events/{event_id}/calendar", get(event::calendar_link))
        .route("/api/v1/events/{event_id}/calendar.ics", get(event::calendar_ics))

        // Dashboard
        .route("/api/v1/me/registrations", get(dashboard::list_registrations))
        .route("/api/v1/me/registrations/{registration_id}", delete(dashboard::cancel_registration))

        // Staff Management
        .route("/api/v1/manage/events", get(manage::list_events).post(manage::create_event))
        .route("/api/v1/manage/events/{event_id}", put(manage::update_event).delete(manage::delete_event))
        .route("/api/v1/manage/events/{event_id}/reconcile", post(manage::reconcile_event))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}