use crate::config::DatabaseConfig;
use rocket::fairing::AdHoc;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn init_pool(db_config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .min_connections(db_config.min_connections)
        .acquire_timeout(Duration::from_secs(db_config.acquire_timeout))
        .idle_timeout(Duration::from_secs(30))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&db_config.url)
        .await
}

/// Connect the pool and bring the auth schema up to date on ignite. A failed
/// connection or migration aborts launch rather than serving requests against
/// a missing or stale schema.
pub fn stage_db(db_config: DatabaseConfig) -> AdHoc {
    AdHoc::try_on_ignite("Postgres (sqlx)", |rocket| async move {
        let pool = match init_pool(&db_config).await {
            Ok(pool) => pool,
            Err(e) => {
                tracing::error!("Failed to initialize database pool: {}", e);
                return Err(rocket);
            }
        };

        if let Err(e) = MIGRATOR.run(&pool).await {
            tracing::error!("Failed to apply database migrations: {}", e);
            return Err(rocket);
        }

        tracing::info!("Database pool initialized and migrations applied");
        Ok(rocket.manage(pool))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_migrations_carry_the_auth_schema() {
        assert!(!MIGRATOR.migrations.is_empty());
        assert!(
            MIGRATOR.migrations.iter().any(|m| m.description.contains("auth")),
            "auth tables migration is embedded in the binary"
        );
    }
}
