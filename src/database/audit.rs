use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use serde_json::Value as JsonValue;
use uuid::Uuid;

impl PostgresRepository {
    /// Create an audit log entry and log it to tracing.
    ///
    /// Callers are expected to swallow the result (`let _ =`): a logging
    /// failure must never abort the operation being audited.
    pub async fn create_audit_log(
        &self,
        event_type: &str,
        user_id: Option<&Uuid>,
        ip_address: Option<String>,
        user_agent: Option<String>,
        details: Option<JsonValue>,
    ) -> Result<(), AppError> {
        // Log to tracing (stdout) as well for operational visibility
        let uid_str = user_id.map(|u| u.to_string());
        tracing::info!(
            category = "audit",
            event_type = event_type,
            user_id = uid_str.as_deref().unwrap_or("-"),
            ip = ip_address.as_deref().unwrap_or("-"),
            user_agent = user_agent.as_deref().unwrap_or("-"),
            "audit event"
        );

        sqlx::query(
            r#"
            INSERT INTO audit_logs (event_type, user_id, ip_address, user_agent, details)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event_type)
        .bind(user_id)
        .bind(ip_address)
        .bind(user_agent)
        .bind(details)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
