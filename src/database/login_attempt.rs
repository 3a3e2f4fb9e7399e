use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use chrono::{Duration, Utc};

impl PostgresRepository {
    /// Append to the login attempt trail. Rows are never deleted here;
    /// retention is an operational concern outside the service.
    pub async fn record_login_attempt(&self, ip_address: &str, email: &str, success: bool) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO login_attempts (ip_address, email, success)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(ip_address)
        .bind(email)
        .bind(success)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Count failed attempts from this IP inside the trailing window. This is
    /// a sliding window over timestamps: the count drops on its own as old
    /// attempts age out, with no reset action.
    pub async fn count_recent_failures(&self, ip_address: &str, window_minutes: i64) -> Result<i64, AppError> {
        let cutoff = Utc::now() - Duration::minutes(window_minutes);

        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM login_attempts
            WHERE ip_address = $1 AND success = FALSE AND attempt_time > $2
            "#,
        )
        .bind(ip_address)
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_count_ignores_attempts_outside_window() {
        // Requires a running PostgreSQL at DATABASE_URL
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_count_ignores_successful_attempts() {
        // Requires a running PostgreSQL at DATABASE_URL
    }
}
