use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

/// User row as the credential flows read it. Never serialized to clients;
/// responses go through [`UserResponse`] so the hash and salt cannot leak.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub password_hash: String,
    pub password_salt: String,
    pub is_verified: bool,
    pub verification_token_expiry: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1, max = 50))]
    pub nickname: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Public user profile returned after login and from `/me`.
#[derive(Debug, Serialize, JsonSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub nickname: String,
    pub email: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            nickname: user.nickname.clone(),
            email: user.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register_request() -> RegisterRequest {
        RegisterRequest {
            email: "a@x.com".to_string(),
            password: "password1".to_string(),
            nickname: "Alice".to_string(),
        }
    }

    #[test]
    fn register_request_accepts_valid_input() {
        assert!(valid_register_request().validate().is_ok());
    }

    #[test]
    fn register_request_rejects_short_password() {
        let mut request = valid_register_request();
        request.password = "short".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn register_request_rejects_malformed_email() {
        let mut request = valid_register_request();
        request.email = "not-an-email".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn register_request_rejects_empty_nickname() {
        let mut request = valid_register_request();
        request.nickname = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn login_request_rejects_missing_fields() {
        let request = LoginRequest {
            email: String::new(),
            password: "password1".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn user_response_never_contains_hash_or_salt() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            nickname: "Alice".to_string(),
            password_hash: "deadbeef".to_string(),
            password_salt: "cafebabe".to_string(),
            is_verified: true,
            verification_token_expiry: None,
        };

        let value = serde_json::to_value(UserResponse::from(&user)).expect("serializable response");
        let object = value.as_object().expect("object response");
        assert_eq!(object.len(), 3);
        assert!(object.contains_key("id"));
        assert!(object.contains_key("nickname"));
        assert!(object.contains_key("email"));
    }
}
