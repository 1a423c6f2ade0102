use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error};

use idprofile_application::error::AppError;

pub struct HttpError(pub AppError);

impl HttpError {
    fn status_and_message(&self) -> (StatusCode, String) {
        let app_error = &self.0;

        match app_error {
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Authentication is required".to_string(),
            ),

            AppError::TokenVerificationFailed { .. } => (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired credential".to_string(),
            ),

            AppError::EmailNotVerified => (
                StatusCode::FORBIDDEN,
                "Email verification is required".to_string(),
            ),

            AppError::InvalidProfileInput { message } | AppError::ValidationError { message } => {
                (StatusCode::BAD_REQUEST, message.clone())
            }

            AppError::Domain(_) => (StatusCode::BAD_REQUEST, app_error.to_string()),

            AppError::JsonError(_) => (StatusCode::BAD_REQUEST, "Invalid JSON format".to_string()),

            AppError::ProfileLookupFailed { .. } => {
                (StatusCode::NOT_FOUND, "Profile not found".to_string())
            }

            AppError::PublicIdentifierTaken => (
                StatusCode::CONFLICT,
                "Public identifier is already taken".to_string(),
            ),

            AppError::ConfigError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),

            AppError::DatabaseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),

            AppError::ExternalServiceError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "External service error".to_string(),
            ),

            AppError::CredentialInvalid { .. }
            | AppError::AccountNotFound
            | AppError::ProfileNotFound
            | AppError::ProfileAlreadyExists { .. }
            | AppError::IoError(_)
            | AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status_code, message) = self.status_and_message();

        if status_code.is_client_error() {
            debug!("Client error response generated: {}", self.0);
        } else {
            error!("Server error response generated: {}", self.0);
        }

        let error_response = json!({
            "ok": false,
            "error": message,
            "status": status_code.as_u16()
        });

        (status_code, Json(error_response)).into_response()
    }
}

impl From<AppError> for HttpError {
    fn from(app_error: AppError) -> Self {
        HttpError(app_error)
    }
}
