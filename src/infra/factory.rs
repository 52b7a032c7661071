use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::error::AppError;
use crate::domain::ports::{AccountRepository, AuthRepository, EventRepository, ProfileRepository, RegistrationRepository};
use crate::domain::services::auth_service::AuthService;
use crate::infra::identity::local_identity_provider::LocalIdentityProvider;
use crate::infra::repositories::{
    postgres_account_repo::PostgresAccountRepo, postgres_auth_repo::PostgresAuthRepo,
    postgres_event_repo::PostgresEventRepo, postgres_profile_repo::PostgresProfileRepo,
    postgres_registration_repo::PostgresRegistrationRepo,
    sqlite_account_repo::SqliteAccountRepo, sqlite_auth_repo::SqliteAuthRepo,
    sqlite_event_repo::SqliteEventRepo, sqlite_profile_repo::SqliteProfileRepo,
    sqlite_registration_repo::SqliteRegistrationRepo,
};

/// The storage adapters behind [`AppState`].
pub struct Repositories {
    pub events: Arc<dyn EventRepository>,
    pub registrations: Arc<dyn RegistrationRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub auth: Arc<dyn AuthRepository>,
}

impl Repositories {
    pub fn sqlite(pool: &SqlitePool) -> Self {
        Self {
            events: Arc::new(SqliteEventRepo::new(pool.clone())),
            registrations: Arc::new(SqliteRegistrationRepo::new(pool.clone())),
            profiles: Arc::new(SqliteProfileRepo::new(pool.clone())),
            accounts: Arc::new(SqliteAccountRepo::new(pool.clone())),
            auth: Arc::new(SqliteAuthRepo::new(pool.clone())),
        }
    }

    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            events: Arc::new(PostgresEventRepo::new(pool.clone())),
            registrations: Arc::new(PostgresRegistrationRepo::new(pool.clone())),
            profiles: Arc::new(PostgresProfileRepo::new(pool.clone())),
            accounts: Arc::new(PostgresAccountRepo::new(pool.clone())),
            auth: Arc::new(PostgresAuthRepo::new(pool.clone())),
        }
    }
}

/// Wires services on top of already constructed repositories.
pub fn assemble_state(config: &Config, repos: Repositories) -> Result<AppState, AppError> {
    let auth_service = Arc::new(AuthService::new(repos.auth, config)?);
    let identity_provider = Arc::new(LocalIdentityProvider::new(
        repos.accounts,
        auth_service.clone(),
        config,
    ));

    Ok(AppState {
        config: config.clone(),
        event_repo: repos.events,
        registration_repo: repos.registrations,
        profile_repo: repos.profiles,
        auth_service,
        identity_provider,
    })
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let repos = connect_repositories(&config.database_url).await;
    assemble_state(config, repos).expect("Failed to initialize auth keys")
}

/// Opens the pool selected by the URL scheme and runs pending migrations.
pub async fn connect_repositories(database_url: &str) -> Repositories {
    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        Repositories::postgres(&pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        Repositories::sqlite(&pool)
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
