use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct Session {
    pub id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Session joined with its owning user, as fetched on authenticated requests.
/// Expiry is not filtered in SQL; the caller distinguishes "no such session"
/// from "session expired" and performs the lazy cleanup.
#[derive(Debug, sqlx::FromRow)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub nickname: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionUser {
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session_user(expires_at: DateTime<Utc>) -> SessionUser {
        SessionUser {
            user_id: Uuid::new_v4(),
            nickname: "Alice".to_string(),
            email: "a@x.com".to_string(),
            expires_at,
        }
    }

    #[test]
    fn future_expiry_is_not_expired() {
        assert!(!session_user(Utc::now() + Duration::days(30)).is_expired());
    }

    #[test]
    fn past_expiry_is_expired() {
        assert!(session_user(Utc::now() - Duration::seconds(1)).is_expired());
    }
}
