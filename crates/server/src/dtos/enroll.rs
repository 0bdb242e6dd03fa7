use chrono::NaiveDateTime;
use database::{
    entities::{registrations, waitlists},
    services::{
        schedule::{RegistrationDetail, SectionDetail},
        waitlist::{PromotedStudent, StudentOverview, WaitlistDetail},
    },
};
use models::clash::ClashDescriptor;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub student_id: Uuid,
    pub section_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub section_id: Uuid,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntryResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub section_id: Uuid,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrolledResponse {
    pub message: String,
    pub enrollment: EnrollmentResponse,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistedResponse {
    pub message: String,
    pub waitlist_position: u64,
    pub waitlist_entry: WaitlistEntryResponse,
}

/// An existing booking that collides with the requested section
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClashResponse {
    pub course_code: String,
    pub course_title: String,
    /// Full weekday name, e.g. "Monday"
    pub day: String,
    /// e.g. "10:00 AM - 11:00 AM"
    pub time_range: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConflictResponse {
    pub error: String,
    pub clashes: Vec<ClashResponse>,
    pub alternatives: Vec<SectionResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub credit_hours: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingResponse {
    pub course_code: String,
    pub day: String,
    pub time_range: String,
    pub room: Option<String>,
}

/// A section with its courses, meetings and seat counts
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub section_id: Uuid,
    pub section_code: String,
    pub courses: Vec<CourseSummary>,
    pub faculty: Option<String>,
    pub capacity: i32,
    pub registered: u64,
    pub available_seats: i64,
    pub schedules: Vec<MeetingResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PromotedStudentResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DropResponse {
    pub success: bool,
    pub message: String,
    pub promoted_student: Option<PromotedStudentResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WithdrawResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSummary {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub section: SectionResponse,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistSummary {
    pub id: Uuid,
    pub position: u64,
    pub created_at: NaiveDateTime,
    pub section: SectionResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OverviewResponse {
    pub registrations: Vec<RegistrationSummary>,
    pub waitlist: Vec<WaitlistSummary>,
}

impl From<registrations::Model> for EnrollmentResponse {
    fn from(registration: registrations::Model) -> Self {
        Self {
            id: registration.id,
            student_id: registration.student_id,
            section_id: registration.section_id,
            created_at: registration.created_at,
        }
    }
}

impl From<waitlists::Model> for WaitlistEntryResponse {
    fn from(entry: waitlists::Model) -> Self {
        Self {
            id: entry.id,
            student_id: entry.student_id,
            section_id: entry.section_id,
            created_at: entry.created_at,
        }
    }
}

impl From<ClashDescriptor> for ClashResponse {
    fn from(clash: ClashDescriptor) -> Self {
        Self {
            course_code: clash.course_code,
            course_title: clash.course_title,
            day: clash.day.to_string(),
            time_range: clash.time_range,
        }
    }
}

impl From<PromotedStudent> for PromotedStudentResponse {
    fn from(student: PromotedStudent) -> Self {
        Self {
            id: student.id,
            name: student.name,
            email: student.email,
        }
    }
}

/// Helper function to flatten a loaded section into its API shape
pub fn convert_to_section_response(detail: SectionDetail) -> SectionResponse {
    let faculty = detail.primary_faculty().map(|f| f.name.clone());
    let available_seats = detail.available_seats();

    let mut courses = Vec::with_capacity(detail.courses.len());
    let mut schedules = Vec::new();

    for hosted in detail.courses {
        for meeting in &hosted.schedules {
            let slot = meeting.schedule.slot();
            schedules.push(MeetingResponse {
                course_code: hosted.course.code.clone(),
                day: slot.day.to_string(),
                time_range: slot.time_range_label(),
                room: meeting.room.as_ref().map(|room| room.label()),
            });
        }

        courses.push(CourseSummary {
            id: hosted.course.id,
            code: hosted.course.code,
            title: hosted.course.title,
            credit_hours: hosted.course.credit_hours,
        });
    }

    SectionResponse {
        section_id: detail.section.id,
        section_code: detail.section.section_code,
        courses,
        faculty,
        capacity: detail.section.capacity,
        registered: detail.registered,
        available_seats,
        schedules,
    }
}

impl From<StudentOverview> for OverviewResponse {
    fn from(overview: StudentOverview) -> Self {
        let registrations = overview
            .registrations
            .into_iter()
            .map(|RegistrationDetail { registration, section }| RegistrationSummary {
                id: registration.id,
                created_at: registration.created_at,
                section: convert_to_section_response(section),
            })
            .collect();

        let waitlist = overview
            .waitlist
            .into_iter()
            .map(|WaitlistDetail { entry, position, section }| WaitlistSummary {
                id: entry.id,
                position,
                created_at: entry.created_at,
                section: convert_to_section_response(section),
            })
            .collect();

        Self {
            registrations,
            waitlist,
        }
    }
}
