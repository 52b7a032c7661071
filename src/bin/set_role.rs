use colored::*;
use events_compass::domain::models::profile::{Profile, ROLE_STAFF, ROLE_USER};
use events_compass::error::AppError;
use events_compass::infra::factory::{connect_repositories, Repositories};
use std::env;
use std::process::ExitCode;

const USAGE: &str = "usage: set_role <email> <user|staff>";

async fn promote(repos: &Repositories, email: &str, role: &str) -> Result<Profile, AppError> {
    let account = repos.accounts.find_by_email(&email.trim().to_lowercase()).await?
        .ok_or_else(|| AppError::NotFound(format!("No account for {}", email)))?;

    if repos.profiles.find_by_id(&account.id).await?.is_none() {
        let full_name = account.full_name.clone().unwrap_or_else(|| account.email.clone());
        repos.profiles.upsert(&Profile::new(account.id.clone(), full_name, account.avatar_url.clone())).await?;
    }

    repos.profiles.set_role(&account.id, role).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let (email, role) = match args.as_slice() {
        [email, role] if role == ROLE_USER || role == ROLE_STAFF => (email.as_str(), role.as_str()),
        _ => {
            eprintln!("{}", USAGE.yellow());
            return ExitCode::FAILURE;
        }
    };

    let Ok(database_url) = env::var("DATABASE_URL") else {
        eprintln!("{}", "DATABASE_URL must be set".red().bold());
        return ExitCode::FAILURE;
    };

    let repos = connect_repositories(&database_url).await;

    match promote(&repos, email, role).await {
        Ok(profile) => {
            println!("{} {} is now {}", "✔".green(), email.bold(), profile.role.cyan().bold());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", "✘".red(), e.to_string().red());
            ExitCode::FAILURE
        }
    }
}
