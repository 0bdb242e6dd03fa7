use crate::entities::{
    courses, faculty, registrations, rooms, section_courses, section_schedules, sections,
};
use models::{clash::BookedCourse, time_slot::TimeSlot};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseTransaction, DbBackend, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// A weekly meeting together with the room it is held in
#[derive(Debug, Clone)]
pub struct ScheduleDetail {
    pub schedule: section_schedules::Model,
    pub room: Option<rooms::Model>,
}

/// A course hosted by a section, with its instructor and meetings
#[derive(Debug, Clone)]
pub struct SectionCourseDetail {
    pub link: section_courses::Model,
    pub course: courses::Model,
    pub faculty: Option<faculty::Model>,
    pub schedules: Vec<ScheduleDetail>,
}

/// A section with everything needed to check clashes and present it to a
/// student without further queries
#[derive(Debug, Clone)]
pub struct SectionDetail {
    pub section: sections::Model,
    pub courses: Vec<SectionCourseDetail>,
    /// Number of confirmed registrations when the section was loaded
    pub registered: u64,
}

impl SectionDetail {
    pub fn course_ids(&self) -> HashSet<Uuid> {
        self.courses.iter().map(|c| c.course.id).collect()
    }

    /// All weekly slots of the section, across every hosted course
    pub fn slots(&self) -> Vec<TimeSlot> {
        self.courses
            .iter()
            .flat_map(|c| c.schedules.iter().map(|s| s.schedule.slot()))
            .collect()
    }

    /// The section's courses as bookings, for clash checks against it
    pub fn booked_courses(&self) -> Vec<BookedCourse> {
        self.courses
            .iter()
            .map(|c| BookedCourse {
                course_code: c.course.code.clone(),
                course_title: c.course.title.clone(),
                slots: c.schedules.iter().map(|s| s.schedule.slot()).collect(),
            })
            .collect()
    }

    pub fn available_seats(&self) -> i64 {
        i64::from(self.section.capacity) - self.registered as i64
    }

    pub fn is_full(&self) -> bool {
        self.available_seats() <= 0
    }

    /// The instructor of the first hosted course that has one assigned
    pub fn primary_faculty(&self) -> Option<&faculty::Model> {
        self.courses.iter().find_map(|c| c.faculty.as_ref())
    }

    /// e.g. "CS101" or "CS101, CS101L"
    pub fn course_codes(&self) -> String {
        self.courses
            .iter()
            .map(|c| c.course.code.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A student's registration with the section it holds a seat in
#[derive(Debug, Clone)]
pub struct RegistrationDetail {
    pub registration: registrations::Model,
    pub section: SectionDetail,
}

pub struct ScheduleService;

impl ScheduleService {
    /// Get a single section with its courses, meetings, rooms and instructors
    pub async fn get_section<C: ConnectionTrait>(
        conn: &C,
        section_id: Uuid,
    ) -> Result<Option<SectionDetail>, DbErr> {
        let section = match sections::Entity::find_by_id(section_id).one(conn).await? {
            Some(section) => section,
            None => return Ok(None),
        };

        Ok(Self::with_details(conn, vec![section]).await?.pop())
    }

    /// Get several sections with details, in storage order
    pub async fn get_sections<C: ConnectionTrait>(
        conn: &C,
        section_ids: Vec<Uuid>,
    ) -> Result<Vec<SectionDetail>, DbErr> {
        if section_ids.is_empty() {
            return Ok(vec![]);
        }

        let sections = sections::Entity::find()
            .filter(sections::Column::Id.is_in(section_ids))
            .all(conn)
            .await?;

        Self::with_details(conn, sections).await
    }

    /// Load courses, meetings, rooms, instructors and seat counts for the
    /// given sections using one batched query per table
    pub async fn with_details<C: ConnectionTrait>(
        conn: &C,
        sections: Vec<sections::Model>,
    ) -> Result<Vec<SectionDetail>, DbErr> {
        if sections.is_empty() {
            return Ok(vec![]);
        }

        let section_ids: Vec<Uuid> = sections.iter().map(|s| s.id).collect();

        // Batch fetch all section-course links with their courses
        let links: Vec<(section_courses::Model, courses::Model)> = section_courses::Entity::find()
            .filter(section_courses::Column::SectionId.is_in(section_ids.clone()))
            .find_also_related(courses::Entity)
            .all(conn)
            .await?
            .into_iter()
            .filter_map(|(link, course)| course.map(|c| (link, c)))
            .collect();

        let link_ids: Vec<Uuid> = links.iter().map(|(link, _)| link.id).collect();
        let faculty_ids: HashSet<Uuid> = links
            .iter()
            .filter_map(|(link, _)| link.faculty_id)
            .collect();

        let instructors: HashMap<Uuid, faculty::Model> = if faculty_ids.is_empty() {
            HashMap::new()
        } else {
            faculty::Entity::find()
                .filter(faculty::Column::Id.is_in(faculty_ids))
                .all(conn)
                .await?
                .into_iter()
                .map(|f| (f.id, f))
                .collect()
        };

        let schedules = if link_ids.is_empty() {
            vec![]
        } else {
            section_schedules::Entity::find()
                .filter(section_schedules::Column::SectionCourseId.is_in(link_ids))
                .order_by_asc(section_schedules::Column::StartTime)
                .all(conn)
                .await?
        };

        let room_ids: HashSet<Uuid> = schedules.iter().map(|s| s.room_id).collect();
        let rooms_by_id: HashMap<Uuid, rooms::Model> = if room_ids.is_empty() {
            HashMap::new()
        } else {
            rooms::Entity::find()
                .filter(rooms::Column::Id.is_in(room_ids))
                .all(conn)
                .await?
                .into_iter()
                .map(|r| (r.id, r))
                .collect()
        };

        let mut registered = Self::count_registrations_by_section(conn, section_ids).await?;

        // Build lookup maps
        let mut schedules_by_link: HashMap<Uuid, Vec<ScheduleDetail>> = HashMap::new();
        for schedule in schedules {
            let room = rooms_by_id.get(&schedule.room_id).cloned();
            schedules_by_link
                .entry(schedule.section_course_id)
                .or_default()
                .push(ScheduleDetail { schedule, room });
        }

        let mut courses_by_section: HashMap<Uuid, Vec<SectionCourseDetail>> = HashMap::new();
        for (link, course) in links {
            let schedules = schedules_by_link.remove(&link.id).unwrap_or_default();
            let faculty = link.faculty_id.and_then(|id| instructors.get(&id).cloned());

            courses_by_section
                .entry(link.section_id)
                .or_default()
                .push(SectionCourseDetail {
                    link,
                    course,
                    faculty,
                    schedules,
                });
        }

        // Build the final result structure
        let details = sections
            .into_iter()
            .map(|section| SectionDetail {
                courses: courses_by_section.remove(&section.id).unwrap_or_default(),
                registered: registered.remove(&section.id).unwrap_or_default(),
                section,
            })
            .collect();

        Ok(details)
    }

    /// Get a student's registrations, optionally limited to one term
    pub async fn get_student_registrations<C: ConnectionTrait>(
        conn: &C,
        student_id: Uuid,
        term_id: Option<Uuid>,
    ) -> Result<Vec<RegistrationDetail>, DbErr> {
        let mut query =
            registrations::Entity::find().filter(registrations::Column::StudentId.eq(student_id));

        if let Some(term_id) = term_id {
            query = query
                .inner_join(sections::Entity)
                .filter(sections::Column::TermId.eq(term_id));
        }

        let registrations = query
            .order_by_asc(registrations::Column::CreatedAt)
            .all(conn)
            .await?;

        let section_ids: Vec<Uuid> = registrations.iter().map(|r| r.section_id).collect();
        let mut sections_by_id: HashMap<Uuid, SectionDetail> =
            Self::get_sections(conn, section_ids)
                .await?
                .into_iter()
                .map(|detail| (detail.section.id, detail))
                .collect();

        // (student, section) is unique, so each section is claimed once
        let details = registrations
            .into_iter()
            .filter_map(|registration| {
                sections_by_id
                    .remove(&registration.section_id)
                    .map(|section| RegistrationDetail {
                        registration,
                        section,
                    })
            })
            .collect();

        Ok(details)
    }

    /// Count confirmed registrations for one section
    pub async fn count_registrations<C: ConnectionTrait>(
        conn: &C,
        section_id: Uuid,
    ) -> Result<u64, DbErr> {
        registrations::Entity::find()
            .filter(registrations::Column::SectionId.eq(section_id))
            .count(conn)
            .await
    }

    async fn count_registrations_by_section<C: ConnectionTrait>(
        conn: &C,
        section_ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, u64>, DbErr> {
        let counts: Vec<(Uuid, i64)> = registrations::Entity::find()
            .select_only()
            .column(registrations::Column::SectionId)
            .column_as(Expr::col(registrations::Column::Id).count(), "registered")
            .filter(registrations::Column::SectionId.is_in(section_ids))
            .group_by(registrations::Column::SectionId)
            .into_tuple()
            .all(conn)
            .await?;

        Ok(counts
            .into_iter()
            .map(|(section_id, count)| (section_id, count.max(0) as u64))
            .collect())
    }

    /// Re-read a section inside a transaction, holding a row lock on it until
    /// the transaction ends.
    ///
    /// Every seat-changing transaction takes this lock first, so concurrent
    /// enrollments and drops on one section are serialized. SQLite has no row
    /// locks; its database-wide write lock gives the same guarantee there.
    pub async fn lock_section(
        txn: &DatabaseTransaction,
        section_id: Uuid,
    ) -> Result<Option<sections::Model>, DbErr> {
        let query = sections::Entity::find_by_id(section_id);

        if txn.get_database_backend() == DbBackend::Sqlite {
            query.one(txn).await
        } else {
            query.lock_exclusive().one(txn).await
        }
    }
}
