use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// Failures of the enrollment and waitlist services.
///
/// Decisions such as a schedule clash or a full section are not errors; they
/// are reported through the services' outcome types.
#[derive(Debug, Error)]
pub enum EnrollmentError {
    #[error("section {0} not found")]
    SectionNotFound(Uuid),

    #[error("registration {0} not found")]
    RegistrationNotFound(Uuid),

    #[error("waitlist entry {0} not found")]
    WaitlistEntryNotFound(Uuid),

    #[error("student {student_id} does not own this record")]
    Forbidden { student_id: Uuid },

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}
