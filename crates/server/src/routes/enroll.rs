use crate::{
    AppState,
    dtos::enroll::{
        ConflictResponse, DropResponse, EnrolledResponse, ErrorResponse, OverviewResponse,
        RegisterRequest, WaitlistedResponse, WithdrawResponse, convert_to_section_response,
    },
    error::ApiError,
    utils::auth::student_id,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::{
    entities::waitlists,
    services::{
        enrollment::{EnrollOutcome, EnrollmentService},
        waitlist::{DropOutcome, WaitlistService},
    },
};
use tower_oauth2_resource_server::claims::DefaultClaims;
use uuid::Uuid;

/// Request a seat in a section
///
/// Grants the seat when one is free, reports the clashing bookings together
/// with open sibling sections, or queues the student on the section's waitlist.
#[utoipa::path(
    post,
    path = "/enroll/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Seat granted", body = EnrolledResponse),
        (status = 200, description = "Section full, student is on its waitlist", body = WaitlistedResponse),
        (status = 400, description = "Student already holds a seat in this section", body = ErrorResponse),
        (status = 404, description = "Section not found", body = ErrorResponse),
        (status = 409, description = "Section clashes with the student's timetable", body = ConflictResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Enrollment"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    let outcome =
        EnrollmentService::enroll(&state.db, request.student_id, request.section_id).await?;

    Ok(enroll_response(outcome))
}

/// Drop one of the caller's registrations
///
/// The freed seat goes to the head of the section's waitlist, if any.
#[utoipa::path(
    delete,
    path = "/enroll/drop/{registrationId}",
    params(
        ("registrationId" = Uuid, Path, description = "Registration ID")
    ),
    responses(
        (status = 200, description = "Course dropped", body = DropResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Registration belongs to another student", body = ErrorResponse),
        (status = 404, description = "Registration not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollment"
)]
pub async fn drop_registration(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(registration_id): Path<Uuid>,
) -> Result<Json<DropResponse>, ApiError> {
    let student_id = student_id(&claims)?;
    let outcome =
        WaitlistService::drop_registration(&state.db, registration_id, student_id).await?;

    Ok(Json(drop_response(outcome)))
}

/// Leave a section's waitlist
#[utoipa::path(
    delete,
    path = "/enroll/waitlist/{waitlistId}",
    params(
        ("waitlistId" = Uuid, Path, description = "Waitlist entry ID")
    ),
    responses(
        (status = 200, description = "Removed from the waitlist", body = WithdrawResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Entry belongs to another student", body = ErrorResponse),
        (status = 404, description = "Waitlist entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollment"
)]
pub async fn withdraw(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(waitlist_id): Path<Uuid>,
) -> Result<Json<WithdrawResponse>, ApiError> {
    let student_id = student_id(&claims)?;
    WaitlistService::withdraw(&state.db, waitlist_id, student_id).await?;

    Ok(Json(withdraw_response()))
}

/// The caller's registrations and waitlist positions
#[utoipa::path(
    get,
    path = "/enroll/me",
    responses(
        (status = 200, description = "Current registrations and waitlist entries", body = OverviewResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Enrollment"
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
) -> Result<Json<OverviewResponse>, ApiError> {
    let student_id = student_id(&claims)?;
    let overview = WaitlistService::student_overview(&state.db, student_id).await?;

    Ok(Json(overview.into()))
}

fn enroll_response(outcome: EnrollOutcome) -> Response {
    match outcome {
        EnrollOutcome::Enrolled(registration) => (
            StatusCode::CREATED,
            Json(EnrolledResponse {
                message: "Enrollment successful".to_string(),
                enrollment: registration.into(),
            }),
        )
            .into_response(),
        EnrollOutcome::AlreadyRegistered => {
            ApiError::new(StatusCode::BAD_REQUEST, "Already registered").into_response()
        }
        EnrollOutcome::Conflict {
            clashes,
            alternatives,
        } => (
            StatusCode::CONFLICT,
            Json(ConflictResponse {
                error: "Time clash detected".to_string(),
                clashes: clashes.into_iter().map(Into::into).collect(),
                alternatives: alternatives
                    .into_iter()
                    .map(convert_to_section_response)
                    .collect(),
            }),
        )
            .into_response(),
        EnrollOutcome::Waitlisted { position, entry } => waitlisted(
            "Section full. Added to waitlist.",
            position,
            entry,
        ),
        EnrollOutcome::AlreadyWaitlisted { position, entry } => waitlisted(
            "You are already on the waitlist for this section.",
            position,
            entry,
        ),
    }
}

fn drop_response(outcome: DropOutcome) -> DropResponse {
    DropResponse {
        success: true,
        message: "Course dropped successfully".to_string(),
        promoted_student: outcome.promoted_student.map(Into::into),
    }
}

fn withdraw_response() -> WithdrawResponse {
    WithdrawResponse {
        success: true,
        message: "Removed from waitlist".to_string(),
    }
}

fn waitlisted(message: &str, position: u64, entry: waitlists::Model) -> Response {
    (
        StatusCode::OK,
        Json(WaitlistedResponse {
            message: message.to_string(),
            waitlist_position: position,
            waitlist_entry: entry.into(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use database::{
        entities::{courses, registrations, rooms, section_courses, section_schedules, sections},
        services::{
            schedule::{RegistrationDetail, ScheduleDetail, SectionCourseDetail, SectionDetail},
            waitlist::{PromotedStudent, StudentOverview, WaitlistDetail},
        },
    };
    use models::{clash::ClashDescriptor, weekday::DayOfWeek};
    use serde_json::{Value, json};

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn timestamp() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 25)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn section_with_seats(capacity: i32, registered: u64) -> SectionDetail {
        let section_id = Uuid::new_v4();
        let course_id = Uuid::new_v4();
        let link_id = Uuid::new_v4();
        let room_id = Uuid::new_v4();

        SectionDetail {
            section: sections::Model {
                id: section_id,
                section_code: "B".to_string(),
                capacity,
                term_id: Uuid::new_v4(),
            },
            courses: vec![SectionCourseDetail {
                link: section_courses::Model {
                    id: link_id,
                    section_id,
                    course_id,
                    faculty_id: None,
                },
                course: courses::Model {
                    id: course_id,
                    code: "CS101".to_string(),
                    title: "Intro to Computing".to_string(),
                    credit_hours: 3,
                    term_id: Uuid::new_v4(),
                },
                faculty: None,
                schedules: vec![ScheduleDetail {
                    schedule: section_schedules::Model {
                        id: Uuid::new_v4(),
                        section_course_id: link_id,
                        day_of_week: DayOfWeek::Tuesday,
                        start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
                        end_time: NaiveTime::from_hms_opt(15, 30, 0).unwrap(),
                        room_id,
                        faculty_id: None,
                    },
                    room: Some(rooms::Model {
                        id: room_id,
                        building: "GHC".to_string(),
                        number: "4102".to_string(),
                    }),
                }],
            }],
            registered,
        }
    }

    #[tokio::test]
    async fn test_enrolled_response() {
        let registration = registrations::Model {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            section_id: Uuid::new_v4(),
            created_at: timestamp(),
        };

        let response = enroll_response(EnrollOutcome::Enrolled(registration.clone()));
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Enrollment successful");
        assert_eq!(body["enrollment"]["id"], registration.id.to_string());
        assert_eq!(
            body["enrollment"]["studentId"],
            registration.student_id.to_string()
        );
    }

    #[tokio::test]
    async fn test_already_registered_response() {
        let response = enroll_response(EnrollOutcome::AlreadyRegistered);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Already registered" })
        );
    }

    #[tokio::test]
    async fn test_conflict_response() {
        let clash = ClashDescriptor {
            course_code: "MATH120".to_string(),
            course_title: "Calculus".to_string(),
            day: DayOfWeek::Monday,
            time_range: "10:00 AM - 11:00 AM".to_string(),
        };

        let response = enroll_response(EnrollOutcome::Conflict {
            clashes: vec![clash],
            alternatives: vec![section_with_seats(30, 28)],
        });
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Time clash detected");
        assert_eq!(
            body["clashes"],
            json!([{
                "courseCode": "MATH120",
                "courseTitle": "Calculus",
                "day": "Monday",
                "timeRange": "10:00 AM - 11:00 AM",
            }])
        );

        let alternative = &body["alternatives"][0];
        assert_eq!(alternative["sectionCode"], "B");
        assert_eq!(alternative["availableSeats"], 2);
        assert_eq!(alternative["courses"][0]["code"], "CS101");
        assert_eq!(
            alternative["schedules"][0],
            json!({
                "courseCode": "CS101",
                "day": "Tuesday",
                "timeRange": "2:00 PM - 3:30 PM",
                "room": "GHC 4102",
            })
        );
    }

    #[tokio::test]
    async fn test_waitlist_responses() {
        let entry = waitlists::Model {
            id: Uuid::now_v7(),
            student_id: Uuid::new_v4(),
            section_id: Uuid::new_v4(),
            created_at: timestamp(),
        };

        let response = enroll_response(EnrollOutcome::Waitlisted {
            position: 3,
            entry: entry.clone(),
        });
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Section full. Added to waitlist.");
        assert_eq!(body["waitlistPosition"], 3);
        assert_eq!(body["waitlistEntry"]["id"], entry.id.to_string());

        let response = enroll_response(EnrollOutcome::AlreadyWaitlisted {
            position: 1,
            entry,
        });
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["message"],
            "You are already on the waitlist for this section."
        );
        assert_eq!(body["waitlistPosition"], 1);
    }

    #[test]
    fn test_drop_response_without_promotion() {
        let body = serde_json::to_value(drop_response(DropOutcome {
            promoted_student: None,
        }))
        .unwrap();

        assert_eq!(
            body,
            json!({
                "success": true,
                "message": "Course dropped successfully",
                "promotedStudent": null,
            })
        );
    }

    #[test]
    fn test_drop_response_with_promotion() {
        let promoted = PromotedStudent {
            id: Uuid::new_v4(),
            name: "Grace Hopper".to_string(),
            email: "grace.hopper@example.edu".to_string(),
        };

        let body = serde_json::to_value(drop_response(DropOutcome {
            promoted_student: Some(promoted.clone()),
        }))
        .unwrap();

        assert_eq!(body["success"], true);
        assert_eq!(
            body["promotedStudent"],
            json!({
                "id": promoted.id.to_string(),
                "name": "Grace Hopper",
                "email": "grace.hopper@example.edu",
            })
        );
    }

    #[test]
    fn test_withdraw_response() {
        assert_eq!(
            serde_json::to_value(withdraw_response()).unwrap(),
            json!({ "success": true, "message": "Removed from waitlist" })
        );
    }

    #[test]
    fn test_overview_response() {
        let registered_in = section_with_seats(30, 12);
        let waiting_on = section_with_seats(20, 20);
        let student_id = Uuid::new_v4();

        let overview = StudentOverview {
            registrations: vec![RegistrationDetail {
                registration: registrations::Model {
                    id: Uuid::new_v4(),
                    student_id,
                    section_id: registered_in.section.id,
                    created_at: timestamp(),
                },
                section: registered_in,
            }],
            waitlist: vec![WaitlistDetail {
                entry: waitlists::Model {
                    id: Uuid::now_v7(),
                    student_id,
                    section_id: waiting_on.section.id,
                    created_at: timestamp(),
                },
                position: 4,
                section: waiting_on,
            }],
        };

        let body = serde_json::to_value(OverviewResponse::from(overview)).unwrap();

        let registration = &body["registrations"][0];
        assert_eq!(registration["createdAt"], "2025-08-25T09:30:00");
        assert_eq!(registration["section"]["availableSeats"], 18);
        assert_eq!(registration["section"]["courses"][0]["creditHours"], 3);

        let waiting = &body["waitlist"][0];
        assert_eq!(waiting["position"], 4);
        assert_eq!(waiting["section"]["availableSeats"], 0);
        assert_eq!(waiting["section"]["schedules"][0]["room"], "GHC 4102");
    }
}
