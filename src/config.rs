use std::env;

/// Decides how registrations touch the attendee counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CapacityPolicy {
    /// Reject registrations once `current_attendees` reaches `max_attendees`.
    pub enforce_capacity: bool,
    /// Decrement `current_attendees` when a registration is removed.
    pub decrement_on_unregister: bool,
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret_key: String, // Private key (PEM)
    pub jwt_public_key: String, // Public key (PEM)
    pub auth_issuer: String,
    pub oauth_authorize_url: String,
    pub oauth_client_id: String,
    pub oauth_redirect_url: String,
    pub capacity_policy: CapacityPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_secret_key: env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set (Ed25519 Private Key)"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.events-compass.local".to_string()),
            oauth_authorize_url: env::var("OAUTH_AUTHORIZE_URL").unwrap_or_else(|_| "https://accounts.google.com/o/oauth2/v2/auth".to_string()),
            oauth_client_id: env::var("OAUTH_CLIENT_ID").unwrap_or_default(),
            oauth_redirect_url: env::var("OAUTH_REDIRECT_URL").unwrap_or_else(|_| "http://localhost:3000/auth/callback".to_string()),
            capacity_policy: CapacityPolicy {
                enforce_capacity: env_flag("ENFORCE_CAPACITY"),
                decrement_on_unregister: env_flag("DECREMENT_ON_UNREGISTER"),
            },
        }
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
