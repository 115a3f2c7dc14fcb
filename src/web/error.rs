//! Error responses.

use crate::errors::{AppError, AppResult};
use crate::models::language::Language;
use crate::ui::labels::error_message;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

/// An [AppError] plus the language its message is rendered in.
#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub language: Language,
}

impl ApiError {
    pub fn new(error: AppError, language: Language) -> Self {
        Self { error, language }
    }

    fn as_status_code(&self) -> StatusCode {
        match self.error.kind() {
            "auth_error" | "account_disabled" | "not_logged_in" => StatusCode::UNAUTHORIZED,
            "forbidden" => StatusCode::FORBIDDEN,
            "missing_field" | "validation_error" => StatusCode::BAD_REQUEST,
            "duplicate_account" => StatusCode::CONFLICT,
            "not_found" => StatusCode::NOT_FOUND,
            "data_shape_error" => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self::new(error, Language::default())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.as_status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self.error);
        }

        let body = json!({
            "error": self.error.kind(),
            "message": error_message(&self.error, self.language),
        });

        (status, Json(body)).into_response()
    }
}

/// Attach the session language to a core result.
pub trait InLanguage<T> {
    fn in_language(self, language: Language) -> ApiResult<T>;
}

impl<T> InLanguage<T> for AppResult<T> {
    fn in_language(self, language: Language) -> ApiResult<T> {
        self.map_err(|e| ApiError::new(e, language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AuthError;

    #[test]
    fn statuses_follow_error_kind() {
        let status = |e: AppError| ApiError::from(e).as_status_code();

        assert_eq!(status(AuthError::BadSecret.into()), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AuthError::Disabled.into()), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AppError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status(AppError::MissingField("account")), StatusCode::BAD_REQUEST);
        assert_eq!(status(AppError::DuplicateAccount("bob".into())), StatusCode::CONFLICT);
        assert_eq!(status(AppError::SheetNotFound("202501".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status(AppError::MissingColumn("name".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(AppError::Other("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
