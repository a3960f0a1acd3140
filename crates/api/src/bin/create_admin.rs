//! Bootstrap an admin account.
//!
//! ```text
//! ADMIN_NAME="Secretaria" ADMIN_EMAIL=admin@example.com ADMIN_PASSWORD=... \
//!     cargo run --bin create-admin
//! ```

use anyhow::{bail, Context as _, Result};
use autoriza_api::auth::password::hash_password;
use autoriza_core::roles::Role;
use autoriza_core::validation::{normalize_email, validate_name, validate_password};
use autoriza_db::models::user::CreateUser;
use autoriza_db::repositories::UserRepo;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let name = required_var("ADMIN_NAME")?;
    let email = required_var("ADMIN_EMAIL")?;
    let password = required_var("ADMIN_PASSWORD")?;

    let name = validate_name("ADMIN_NAME", &name)?;
    let email = normalize_email("ADMIN_EMAIL", &email)?;
    validate_password(&password)?;

    let database_url = required_var("DATABASE_URL")?;
    let pool = autoriza_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    autoriza_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    if UserRepo::find_by_email(&pool, &email).await?.is_some() {
        bail!("A user with email {email} already exists");
    }

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Password hashing error: {e}"))?;

    let user = UserRepo::create(
        &pool,
        &CreateUser {
            name,
            email,
            password_hash: Some(password_hash),
            role: Role::Admin,
            is_active: true,
            campus_id: None,
            verification_code: None,
            verification_code_expires_at: None,
        },
    )
    .await
    .context("Failed to insert admin user")?;

    println!("Created admin {} (id {})", user.email, user.id);
    Ok(())
}

fn required_var(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("{key} must be set"))
}
