use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::session::{Session, SessionUser};
use chrono::{DateTime, Utc};
use uuid::Uuid;

impl PostgresRepository {
    pub async fn create_session(
        &self,
        user_id: &Uuid,
        session_token: &str,
        expires_at: DateTime<Utc>,
        user_agent: &str,
        ip_address: &str,
    ) -> Result<Session, AppError> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO user_sessions (user_id, session_token, expires_at, user_agent, ip_address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, expires_at
            "#,
        )
        .bind(user_id)
        .bind(session_token)
        .bind(expires_at)
        .bind(user_agent)
        .bind(ip_address)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// Fetch the session and its owning user by bearer token. Expiry is not
    /// filtered here; callers check it so an expired session can be cleaned
    /// up and reported distinctly from an unknown token.
    pub async fn get_session_user(&self, session_token: &str) -> Result<Option<SessionUser>, AppError> {
        let session_user = sqlx::query_as::<_, SessionUser>(
            r#"
            SELECT s.user_id, u.nickname, u.email, s.expires_at
            FROM user_sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.session_token = $1
            "#,
        )
        .bind(session_token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session_user)
    }

    pub async fn touch_session(&self, session_token: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE user_sessions SET last_activity = now() WHERE session_token = $1")
            .bind(session_token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn session_owner(&self, session_token: &str) -> Result<Option<Uuid>, AppError> {
        let owner = sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM user_sessions WHERE session_token = $1")
            .bind(session_token)
            .fetch_optional(&self.pool)
            .await?;

        Ok(owner)
    }

    pub async fn delete_session(&self, session_token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM user_sessions WHERE session_token = $1")
            .bind(session_token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_expired_session_is_returned_for_lazy_cleanup() {
        // Requires a running PostgreSQL at DATABASE_URL
    }
}
