use rocket::http::{ContentType, Status};
use rocket::response::Responder;
use rocket::{Request, Response};
use rocket_okapi::OpenApiError;
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::Responses;
use rocket_okapi::response::OpenApiResponderInner;
use std::io::Cursor;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error")]
    Db {
        message: String,
        #[source]
        source: sqlx::error::Error,
    },
    /// Generic credential failure. Deliberately identical for unknown email
    /// and wrong password so the response does not reveal which one it was.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Email address has not been verified")]
    EmailNotVerified,
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Session is invalid")]
    SessionInvalid,
    #[error("Session has expired")]
    SessionExpired,
    #[error("Too many login attempts, please try again later")]
    TooManyLoginAttempts,
    #[error("This email address is already registered")]
    EmailTaken,
    #[error("This nickname is already taken")]
    NicknameTaken,
    /// Uniform response for an unknown, consumed, or malformed verification
    /// token; reasons are not distinguished to prevent token enumeration.
    #[error("Invalid or already verified token")]
    VerificationTokenInvalid,
    #[error("Verification token has expired")]
    VerificationTokenExpired,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),
    #[error("Internal server error")]
    Email { message: String },
    #[error("Internal server error")]
    ConfigurationError {
        message: String,
        #[source]
        source: figment::Error,
    },
}

impl AppError {
    pub fn db(message: impl Into<String>, source: sqlx::error::Error) -> Self {
        Self::Db {
            message: message.into(),
            source,
        }
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self::Email { message: message.into() }
    }
}

impl From<&AppError> for Status {
    fn from(e: &AppError) -> Self {
        match e {
            AppError::Db { .. } => Status::InternalServerError,
            AppError::InvalidCredentials => Status::Unauthorized,
            AppError::EmailNotVerified => Status::Unauthorized,
            AppError::NotLoggedIn => Status::Unauthorized,
            AppError::SessionInvalid => Status::Unauthorized,
            AppError::SessionExpired => Status::Unauthorized,
            AppError::TooManyLoginAttempts => Status::TooManyRequests,
            AppError::EmailTaken => Status::BadRequest,
            AppError::NicknameTaken => Status::BadRequest,
            AppError::VerificationTokenInvalid => Status::BadRequest,
            AppError::VerificationTokenExpired => Status::BadRequest,
            AppError::NotFound(_) => Status::NotFound,
            AppError::ValidationError(_) => Status::BadRequest,
            AppError::Email { .. } => Status::InternalServerError,
            AppError::ConfigurationError { .. } => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, req: &Request<'_>) -> rocket::response::Result<'static> {
        // Extract request context for better error logging
        let method = req.method();
        let uri = req.uri();

        // Try to get request_id from local_cache
        let request_id = req
            .local_cache(|| None::<crate::middleware::RequestId>)
            .as_ref()
            .map(|r| r.0.as_str())
            .unwrap_or("unknown");

        error!(
            error = ?self,
            request_id = %request_id,
            method = %method,
            uri = %uri,
            "request failed"
        );

        let status = Status::from(&self);
        let body = serde_json::json!({ "error": self.to_string() }).to_string();

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

impl OpenApiResponderInner for AppError {
    fn responses(_gen: &mut OpenApiGenerator) -> Result<Responses, OpenApiError> {
        use rocket_okapi::okapi::openapi3::{RefOr, Response as OpenApiResponse};
        let mut responses = Responses::default();
        for (code, description) in [
            ("400", "Bad Request"),
            ("401", "Unauthorized"),
            ("404", "Not Found"),
            ("429", "Too Many Requests"),
            ("500", "Internal Server Error"),
        ] {
            responses.responses.insert(
                code.to_string(),
                RefOr::Object(OpenApiResponse {
                    description: description.to_string(),
                    ..Default::default()
                }),
            );
        }
        Ok(responses)
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::ConfigurationError {
            message: "Failed to read configuration".to_string(),
            source: e,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::db("Database error", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_failures_map_to_401() {
        assert_eq!(Status::from(&AppError::InvalidCredentials), Status::Unauthorized);
        assert_eq!(Status::from(&AppError::EmailNotVerified), Status::Unauthorized);
        assert_eq!(Status::from(&AppError::NotLoggedIn), Status::Unauthorized);
        assert_eq!(Status::from(&AppError::SessionInvalid), Status::Unauthorized);
        assert_eq!(Status::from(&AppError::SessionExpired), Status::Unauthorized);
    }

    #[test]
    fn rate_limit_maps_to_429() {
        assert_eq!(Status::from(&AppError::TooManyLoginAttempts), Status::TooManyRequests);
    }

    #[test]
    fn conflicts_and_token_errors_map_to_400() {
        assert_eq!(Status::from(&AppError::EmailTaken), Status::BadRequest);
        assert_eq!(Status::from(&AppError::NicknameTaken), Status::BadRequest);
        assert_eq!(Status::from(&AppError::VerificationTokenInvalid), Status::BadRequest);
        assert_eq!(Status::from(&AppError::VerificationTokenExpired), Status::BadRequest);
    }

    #[test]
    fn dependency_failures_hide_details_from_callers() {
        let err = AppError::email("SMTP relay refused the connection");
        assert_eq!(Status::from(&err), Status::InternalServerError);
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn unknown_email_and_wrong_password_share_a_message() {
        // Both paths surface the same AppError variant, so the body cannot
        // be used to probe which email addresses are registered.
        assert_eq!(AppError::InvalidCredentials.to_string(), "Invalid email or password");
    }
}
