use crate::dtos::enroll::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::error::EnrollmentError;
use log::error;
use sea_orm::DbErr;

/// An HTTP failure rendered as `{"error": "<message>"}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        error!("Database error: {err}");
        Self::internal()
    }
}

impl From<EnrollmentError> for ApiError {
    fn from(err: EnrollmentError) -> Self {
        match err {
            EnrollmentError::SectionNotFound(_) => Self::not_found("Section not found"),
            EnrollmentError::RegistrationNotFound(_) => Self::not_found("Registration not found"),
            EnrollmentError::WaitlistEntryNotFound(_) => {
                Self::not_found("Waitlist entry not found")
            }
            EnrollmentError::Forbidden { .. } => {
                Self::forbidden("Not authorized to modify this enrollment")
            }
            EnrollmentError::Database(err) => err.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_enrollment_error_statuses() {
        let id = Uuid::new_v4();
        let cases = [
            (EnrollmentError::SectionNotFound(id), StatusCode::NOT_FOUND),
            (EnrollmentError::RegistrationNotFound(id), StatusCode::NOT_FOUND),
            (EnrollmentError::WaitlistEntryNotFound(id), StatusCode::NOT_FOUND),
            (
                EnrollmentError::Forbidden { student_id: id },
                StatusCode::FORBIDDEN,
            ),
            (
                EnrollmentError::Database(DbErr::Custom("connection reset".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[tokio::test]
    async fn test_error_body() {
        let response = ApiError::from(EnrollmentError::SectionNotFound(Uuid::new_v4()))
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Section not found" }));
    }
}
