use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::models::{
    auth::{Identity, Session, SignInRequest, SignUpRequest},
    profile::Profile,
};
use crate::domain::ports::{IdentityProvider, ProfileRepository};
use crate::error::AppError;

/// Holds the current identity for one client and publishes every change.
///
/// There is no global instance. Whoever needs a session builds one with
/// [`SessionContext::init`] and drops it (or calls [`SessionContext::teardown`])
/// when done.
pub struct SessionContext {
    provider: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileRepository>,
    identity: watch::Sender<Option<Identity>>,
    profile: Option<Profile>,
    refresh_token: Option<String>,
}

impl SessionContext {
    pub fn anonymous(provider: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileRepository>) -> Self {
        let (identity, _) = watch::channel(None);
        Self { provider, profiles, identity, profile: None, refresh_token: None }
    }

    /// Restores an existing session. An invalid or expired access token yields
    /// an anonymous context rather than an error.
    pub async fn init(
        provider: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileRepository>,
        access_token: Option<&str>,
        refresh_token: Option<String>,
    ) -> Result<Self, AppError> {
        let mut ctx = Self::anonymous(provider, profiles);
        ctx.refresh_token = refresh_token;

        if let Some(token) = access_token
            && let Some(identity) = ctx.provider.get_session(token).await?
        {
            ctx.profile = ctx.ensure_profile(&identity).await;
            ctx.identity.send_replace(Some(identity));
        }

        Ok(ctx)
    }

    pub fn current(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.identity.subscribe()
    }

    pub async fn sign_up(&mut self, request: &SignUpRequest) -> Result<Session, AppError> {
        let session = self.provider.sign_up(request).await?;
        self.adopt(&session).await;
        Ok(session)
    }

    pub async fn sign_in(&mut self, request: &SignInRequest) -> Result<Session, AppError> {
        let session = self.provider.sign_in_with_password(request).await?;
        self.adopt(&session).await;
        Ok(session)
    }

    /// Returns the authorization URL to redirect the browser to.
    pub async fn sign_in_with_provider(&self, provider: &str) -> Result<String, AppError> {
        self.provider.sign_in_with_provider(provider).await
    }

    /// Rotates the held refresh token. A rejected token ends the session.
    pub async fn refresh(&mut self) -> Result<Session, AppError> {
        let token = self.refresh_token.clone().ok_or(AppError::Unauthorized)?;

        match self.provider.refresh(&token).await {
            Ok(session) => {
                self.adopt(&session).await;
                Ok(session)
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    /// Local state is cleared and published before the remote sign-out is
    /// attempted. A remote failure is only logged.
    pub async fn sign_out(&mut self) {
        let token = self.refresh_token.take();
        let user_id = self.current().map(|i| i.id);
        self.clear();

        if let Some(token) = token
            && let Err(e) = self.provider.sign_out(&token).await
        {
            warn!("Remote sign-out failed: {}", e);
        }
        info!(user_id = ?user_id, "Signed out");
    }

    /// Drops the publisher. Subscribers see the channel close.
    pub fn teardown(self) {
        debug!("Session context torn down");
    }

    fn clear(&mut self) {
        self.profile = None;
        self.identity.send_replace(None);
    }

    async fn adopt(&mut self, session: &Session) {
        self.refresh_token = Some(session.refresh_token.clone());
        self.profile = self.ensure_profile(&session.identity).await;
        self.identity.send_replace(Some(session.identity.clone()));
    }

    /// Upserts the profile row for a signed-in identity. Failures never block sign-in.
    async fn ensure_profile(&self, identity: &Identity) -> Option<Profile> {
        let full_name = identity.full_name.clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| identity.email.clone());
        let profile = Profile::new(identity.id.clone(), full_name, identity.avatar_url.clone());

        match self.profiles.upsert(&profile).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(user_id = %identity.id, "Profile upsert failed: {}", e);
                None
            }
        }
    }
}
