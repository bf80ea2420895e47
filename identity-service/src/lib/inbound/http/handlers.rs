use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::identity::errors::AuthError;
use crate::identity::models::User;

pub mod admin_register;
pub mod forgot_password;
pub mod login;
pub mod register;
pub mod resend_verification;
pub mod reset_password;
pub mod review_professional;
pub mod update_clinic;
pub mod validate;
pub mod verify_email;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Gone(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        tracing::error!(error = %e, "Unhandled error");
        Self::InternalServerError("Internal server error".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Gone(msg) => (StatusCode::GONE, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UserExists(_) => {
                ApiError::Conflict("User with this email already exists".to_string())
            }
            AuthError::LicenseNumberTaken(_) => ApiError::Conflict(
                "An account with this license number already exists".to_string(),
            ),
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            AuthError::InvalidToken => {
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            AuthError::AccountInactive => {
                ApiError::Forbidden("Account is suspended by administrator".to_string())
            }
            AuthError::Forbidden(_) => ApiError::Forbidden(err.to_string()),
            AuthError::InvalidUserId(_)
            | AuthError::InvalidEmail(_)
            | AuthError::InvalidPassword(_)
            | AuthError::InvalidRole(_)
            | AuthError::InvalidVerificationStatus(_)
            | AuthError::Token(_) => ApiError::BadRequest(err.to_string()),
            AuthError::UserNotFound(_) => ApiError::NotFound(err.to_string()),
            AuthError::Hashing(_)
            | AuthError::Signing(_)
            | AuthError::Entropy(_)
            | AuthError::EventPublishing(_)
            | AuthError::Storage(_) => {
                tracing::error!(error = %err, "Request failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Account fields safe to return to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_verified: bool,
    pub verification_status: String,
    pub clinic_id: Option<i64>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.to_string(),
            role: user.role.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_verified: user.is_verified,
            verification_status: user.verification_status.to_string(),
            clinic_id: user.clinic_id,
        }
    }
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}

impl MessageData {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::errors::EventPublisherError;
    use crate::identity::errors::TokenError;

    #[test]
    fn test_error_statuses() {
        assert!(matches!(
            ApiError::from(AuthError::UserExists("a@b.c".to_string())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::AccountInactive),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::Token(TokenError::AlreadyUsed)),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::UserNotFound("x".to_string())),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn test_license_clash_has_its_own_message() {
        assert_eq!(
            ApiError::from(AuthError::LicenseNumberTaken("LIC-42".to_string())),
            ApiError::Conflict("An account with this license number already exists".to_string())
        );
        assert_eq!(
            ApiError::from(AuthError::UserExists("a@b.c".to_string())),
            ApiError::Conflict("User with this email already exists".to_string())
        );
    }

    #[test]
    fn test_internal_errors_hide_detail() {
        let error = ApiError::from(AuthError::EventPublishing(
            EventPublisherError::PublishFailed("broker at 10.0.0.3 down".to_string()),
        ));

        assert_eq!(
            error,
            ApiError::InternalServerError("Internal server error".to_string())
        );
    }

    #[test]
    fn test_not_found_token_reads_as_invalid_or_expired() {
        assert_eq!(
            ApiError::from(AuthError::Token(TokenError::NotFound)),
            ApiError::BadRequest("invalid or expired token".to_string())
        );
    }
}
