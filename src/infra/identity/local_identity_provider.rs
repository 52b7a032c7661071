use std::sync::Arc;
use argon2::{password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString}, Argon2};
use async_trait::async_trait;
use rand::rngs::OsRng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::models::{
    account::Account,
    auth::{Identity, Session, SignInRequest, SignUpRequest},
};
use crate::domain::ports::{AccountRepository, IdentityProvider};
use crate::domain::services::auth_service::{AuthService, TokenPair};
use crate::error::AppError;

const MIN_PASSWORD_LEN: usize = 6;
const SUPPORTED_PROVIDERS: &[&str] = &["google"];

/// Email/password identities stored in `accounts`, with JWT sessions from [`AuthService`].
pub struct LocalIdentityProvider {
    accounts: Arc<dyn AccountRepository>,
    auth: Arc<AuthService>,
    oauth_authorize_url: String,
    oauth_client_id: String,
    oauth_redirect_url: String,
}

impl LocalIdentityProvider {
    pub fn new(accounts: Arc<dyn AccountRepository>, auth: Arc<AuthService>, config: &Config) -> Self {
        Self {
            accounts,
            auth,
            oauth_authorize_url: config.oauth_authorize_url.clone(),
            oauth_client_id: config.oauth_client_id.clone(),
            oauth_redirect_url: config.oauth_redirect_url.clone(),
        }
    }
}

fn identity_of(account: &Account) -> Identity {
    Identity {
        id: account.id.clone(),
        email: account.email.clone(),
        full_name: account.full_name.clone(),
        avatar_url: account.avatar_url.clone(),
    }
}

fn into_session(identity: Identity, tokens: TokenPair) -> Session {
    Session {
        identity,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        csrf_token: tokens.csrf_token,
    }
}

fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AppError::Validation("A valid email address is required".into())),
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn get_session(&self, access_token: &str) -> Result<Option<Identity>, AppError> {
        let claims = match self.auth.verify_access_token(access_token) {
            Ok(claims) => claims,
            Err(_) => {
                debug!("Access token rejected, treating caller as guest");
                return Ok(None);
            }
        };

        let account = self.accounts.find_by_id(&claims.sub).await?;
        Ok(account.as_ref().map(identity_of))
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<Session, AppError> {
        let email = normalize_email(&request.email)?;
        if request.password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!("Password must be at least {} characters", MIN_PASSWORD_LEN)));
        }

        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".into()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(request.password.as_bytes(), &salt)
            .map_err(|_| AppError::Internal)?
            .to_string();

        let full_name = request.full_name.as_ref()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let account = Account::new(email, password_hash, full_name, request.avatar_url.clone());
        let created = self.accounts.create(&account).await?;
        info!("Account created: {}", created.id);

        let identity = identity_of(&created);
        let tokens = self.auth.login(&identity).await?;
        Ok(into_session(identity, tokens))
    }

    async fn sign_in_with_password(&self, request: &SignInRequest) -> Result<Session, AppError> {
        let email = request.email.trim().to_lowercase();
        let account = self.accounts.find_by_email(&email).await?
            .ok_or(AppError::Unauthorized)?;

        let parsed_hash = PasswordHash::new(&account.password_hash)
            .map_err(|_| AppError::Internal)?;

        Argon2::default().verify_password(request.password.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::Unauthorized)?;

        let identity = identity_of(&account);
        let tokens = self.auth.login(&identity).await?;
        Ok(into_session(identity, tokens))
    }

    async fn sign_in_with_provider(&self, provider: &str) -> Result<String, AppError> {
        if !SUPPORTED_PROVIDERS.contains(&provider) {
            return Err(AppError::Validation(format!("Unsupported identity provider: {}", provider)));
        }
        if self.oauth_client_id.is_empty() {
            return Err(AppError::Validation("Provider sign-in is not configured".into()));
        }

        Ok(format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            self.oauth_authorize_url,
            urlencoding::encode(&self.oauth_client_id),
            urlencoding::encode(&self.oauth_redirect_url),
            urlencoding::encode("openid email profile"),
            Uuid::new_v4(),
        ))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AppError> {
        let record = self.auth.consume_refresh_token(refresh_token).await?;

        let account = self.accounts.find_by_id(&record.user_id).await?
            .ok_or(AppError::Unauthorized)?;

        let identity = identity_of(&account);
        let tokens = self.auth.refresh(&record, &identity).await?;
        Ok(into_session(identity, tokens))
    }

    async fn sign_out(&self, refresh_token: &str) -> Result<(), AppError> {
        self.auth.logout(refresh_token).await
    }
}
