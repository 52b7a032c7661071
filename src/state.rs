use std::sync::Arc;
use crate::domain::ports::{
    EventRepository, IdentityProvider, ProfileRepository, RegistrationRepository,
};
use crate::domain::services::{
    auth_service::AuthService,
    catalog::CatalogService,
    dashboard::DashboardService,
    management::ManagementService,
    registration::RegistrationService,
    session::SessionContext,
};
use crate::config::Config;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_repo: Arc<dyn EventRepository>,
    pub registration_repo: Arc<dyn RegistrationRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub auth_service: Arc<AuthService>,
    pub identity_provider: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.event_repo.clone())
    }

    pub fn registrations(&self) -> RegistrationService {
        RegistrationService::new(
            self.event_repo.clone(),
            self.registration_repo.clone(),
            self.config.capacity_policy,
        )
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(
            self.event_repo.clone(),
            self.registration_repo.clone(),
            self.config.capacity_policy,
        )
    }

    pub fn management(&self) -> ManagementService {
        ManagementService::new(self.event_repo.clone(), self.registration_repo.clone())
    }

    /// A session context for one request, restored from the request's cookies.
    pub async fn session(&self, access_token: Option<&str>, refresh_token: Option<String>) -> Result<SessionContext, AppError> {
        SessionContext::init(
            self.identity_provider.clone(),
            self.profile_repo.clone(),
            access_token,
            refresh_token,
        ).await
    }
}
