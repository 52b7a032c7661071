use events_compass::{
    api::router::create_router,
    config::{CapacityPolicy, Config},
    domain::models::profile::ROLE_STAFF,
    infra::factory::{assemble_state, Repositories},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::Value;

#[allow(dead_code)]
pub struct AuthHeaders {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_policy(CapacityPolicy::default()).await
    }

    pub async fn with_policy(policy: CapacityPolicy) -> Self {
        Self::build(policy, |repos| repos).await
    }

    /// `wrap` may swap individual repositories, e.g. to inject failures.
    pub async fn build(policy: CapacityPolicy, wrap: impl FnOnce(Repositories) -> Repositories) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            oauth_authorize_url: "https://idp.test/authorize".to_string(),
            oauth_client_id: "test-client".to_string(),
            oauth_redirect_url: "http://localhost/callback".to_string(),
            capacity_policy: policy,
        };

        let repos = wrap(Repositories::sqlite(&pool));
        let state = Arc::new(assemble_state(&config, repos).expect("Failed to assemble state"));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, auth: Option<&AuthHeaders>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    /// Sends a request and returns the status with the parsed JSON body (`Null` when empty).
    pub async fn send(&self, method: &str, uri: &str, auth: Option<&AuthHeaders>, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.request(method, uri, auth, body).await;
        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn signup(&self, email: &str) -> AuthHeaders {
        let payload = serde_json::json!({
            "email": email,
            "password": "correct-horse",
            "full_name": null
        });

        let response = self.request("POST", "/api/v1/auth/signup", None, Some(payload)).await;

        if response.status() != StatusCode::CREATED {
            panic!("Signup failed in test helper: status {}", response.status());
        }

        auth_from_response(response).await
    }

    pub async fn make_staff(&self, user_id: &str) {
        self.state.profile_repo.set_role(user_id, ROLE_STAFF).await.unwrap();
    }

    pub async fn staff(&self, email: &str) -> AuthHeaders {
        let auth = self.signup(email).await;
        self.make_staff(&auth.user_id).await;
        auth
    }

    /// Creates an event through the management API and returns its id.
    pub async fn create_event(&self, staff: &AuthHeaders, payload: Value) -> String {
        let (status, body) = self.send("POST", "/api/v1/manage/events", Some(staff), Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED, "create event failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

#[allow(dead_code)]
pub fn cookie_value(response: &Response, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .find(|c| c.starts_with(&prefix))
        .map(|c| {
            let value = &c[prefix.len()..];
            value.split(';').next().unwrap_or("").to_string()
        })
}

#[allow(dead_code)]
pub async fn auth_from_response(response: Response) -> AuthHeaders {
    let access_token = cookie_value(&response, "access_token").expect("No access_token cookie returned");
    let refresh_token = cookie_value(&response, "refresh_token").expect("No refresh_token cookie returned");

    let body_json = parse_body(response).await;
    let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();
    let user_id = body_json["user"]["id"].as_str().expect("No user id in body").to_string();

    AuthHeaders {
        user_id,
        access_token,
        refresh_token,
        csrf_token,
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

#[allow(dead_code)]
pub fn event_payload(name: &str, date: chrono::DateTime<chrono::Utc>) -> Value {
    serde_json::json!({
        "name": name,
        "description": format!("{} description", name),
        "date": date.to_rfc3339(),
        "location": "Town Hall",
        "price": "",
        "image_url": "https://img.test/event.png",
        "category": "Music",
        "max_attendees": ""
    })
}
