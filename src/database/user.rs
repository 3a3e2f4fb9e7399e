use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::user::User;
use chrono::{DateTime, Utc};
use uuid::Uuid;

impl PostgresRepository {
    pub async fn create_user(
        &self,
        email: &str,
        nickname: &str,
        password_hash: &str,
        password_salt: &str,
        verification_token: &str,
        verification_token_expiry: DateTime<Utc>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, nickname, password_hash, password_salt, verification_token, verification_token_expiry)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, nickname, password_hash, password_salt, is_verified, verification_token_expiry
            "#,
        )
        .bind(email)
        .bind(nickname)
        .bind(password_hash)
        .bind(password_salt)
        .bind(verification_token)
        .bind(verification_token_expiry)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, nickname, password_hash, password_salt, is_verified, verification_token_expiry
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn nickname_exists(&self, nickname: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE nickname = $1)")
            .bind(nickname)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Look up the unverified user holding this verification token. Verified
    /// users never match, so a consumed token resolves to nothing.
    pub async fn find_unverified_by_token(&self, token: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, nickname, password_hash, password_salt, is_verified, verification_token_expiry
            FROM users
            WHERE verification_token = $1 AND is_verified = FALSE
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Flip `is_verified` and clear the token in one conditional statement.
    /// Returns false when the row was already verified or the token was
    /// cleared by a concurrent request, so only one caller can win.
    pub async fn mark_verified(&self, user_id: &Uuid, token: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_verified = TRUE, verification_token = NULL, verification_token_expiry = NULL
            WHERE id = $1 AND is_verified = FALSE AND verification_token = $2
            "#,
        )
        .bind(user_id)
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_create_user_persists_unverified_row() {
        // Requires a running PostgreSQL at DATABASE_URL
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_mark_verified_is_single_use() {
        // Requires a running PostgreSQL at DATABASE_URL
    }
}
