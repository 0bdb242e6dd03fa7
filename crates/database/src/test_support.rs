//! Fixtures for service tests: an in-memory SQLite database migrated with the
//! real schema, plus helpers to seed terms, offerings and seats.

use crate::entities::{
    courses, registrations, rooms, section_courses, section_schedules, sections, students,
    terms, waitlists,
};
use chrono::NaiveTime;
use migration::{Migrator, MigratorTrait};
use models::weekday::DayOfWeek;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectOptions, Database,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};
use uuid::Uuid;

/// A section hosting one freshly created course
pub struct Offering {
    pub section_id: Uuid,
    pub course_id: Uuid,
}

/// A weekly meeting used when seeding schedules
pub struct SlotSpec {
    day: DayOfWeek,
    start: NaiveTime,
    end: NaiveTime,
}

pub fn slot(day: DayOfWeek, start: &str, end: &str) -> SlotSpec {
    SlotSpec {
        day,
        start: NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
        end: NaiveTime::parse_from_str(end, "%H:%M").unwrap(),
    }
}

pub async fn setup() -> DatabaseConnection {
    // A single pooled connection keeps every query on the same in-memory
    // database and serializes transactions the way a row lock would
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn create_term(db: &DatabaseConnection) -> Uuid {
    terms::ActiveModel {
        id: Set(Uuid::new_v4()),
        year: Set(2025),
        semester: Set("Fall".to_string()),
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub async fn create_student(db: &DatabaseConnection, name: &str) -> Uuid {
    students::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(format!("{}@example.edu", name.to_lowercase().replace(' ', "."))),
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub async fn create_section(
    db: &DatabaseConnection,
    term: Uuid,
    code: &str,
    capacity: i32,
) -> Uuid {
    sections::ActiveModel {
        id: Set(Uuid::new_v4()),
        section_code: Set(code.to_string()),
        capacity: Set(capacity),
        term_id: Set(term),
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub async fn create_course(db: &DatabaseConnection, term: Uuid, code: &str) -> Uuid {
    courses::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(code.to_string()),
        title: Set(format!("{code} title")),
        credit_hours: Set(3),
        term_id: Set(term),
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

/// Attach a course to a section, returning the link id
pub async fn link_course(db: &DatabaseConnection, section: Uuid, course: Uuid) -> Uuid {
    section_courses::ActiveModel {
        id: Set(Uuid::new_v4()),
        section_id: Set(section),
        course_id: Set(course),
        faculty_id: Set(None),
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub async fn add_schedule(db: &DatabaseConnection, link: Uuid, spec: SlotSpec) {
    let room = rooms::ActiveModel {
        id: Set(Uuid::new_v4()),
        building: Set("GHC".to_string()),
        number: Set("4102".to_string()),
    }
    .insert(db)
    .await
    .unwrap();

    section_schedules::ActiveModel {
        id: Set(Uuid::new_v4()),
        section_course_id: Set(link),
        day_of_week: Set(spec.day),
        start_time: Set(spec.start),
        end_time: Set(spec.end),
        room_id: Set(room.id),
        faculty_id: Set(None),
    }
    .insert(db)
    .await
    .unwrap();
}

/// Section "A" hosting a new course with a single weekly meeting
pub async fn offering(
    db: &DatabaseConnection,
    term: Uuid,
    course_code: &str,
    capacity: i32,
    spec: SlotSpec,
) -> Offering {
    let course_id = create_course(db, term, course_code).await;
    let section_id = create_section(db, term, "A", capacity).await;
    let link = link_course(db, section_id, course_id).await;
    add_schedule(db, link, spec).await;

    Offering {
        section_id,
        course_id,
    }
}

/// Seed a seat directly, bypassing the enrollment checks
pub async fn register(
    db: &DatabaseConnection,
    student: Uuid,
    section: Uuid,
) -> registrations::Model {
    registrations::ActiveModel {
        id: Set(Uuid::new_v4()),
        student_id: Set(student),
        section_id: Set(section),
        created_at: Set(crate::services::now()),
    }
    .insert(db)
    .await
    .unwrap()
}

/// Seed a waitlist entry directly, bypassing the enrollment checks
pub async fn join_waitlist(
    db: &DatabaseConnection,
    student: Uuid,
    section: Uuid,
) -> waitlists::Model {
    waitlists::ActiveModel {
        id: Set(Uuid::now_v7()),
        student_id: Set(student),
        section_id: Set(section),
        created_at: Set(crate::services::now()),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn count_registrations(db: &DatabaseConnection, section: Uuid) -> u64 {
    registrations::Entity::find()
        .filter(registrations::Column::SectionId.eq(section))
        .count(db)
        .await
        .unwrap()
}

pub async fn count_waitlist(db: &DatabaseConnection, section: Uuid) -> u64 {
    waitlists::Entity::find()
        .filter(waitlists::Column::SectionId.eq(section))
        .count(db)
        .await
        .unwrap()
}
