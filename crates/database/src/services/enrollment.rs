use crate::{
    entities::{registrations, sections, waitlists},
    error::EnrollmentError,
    services::{
        alternatives::AlternativeService,
        is_unique_violation, now,
        schedule::{ScheduleService, SectionDetail},
        waitlist::WaitlistService,
    },
};
use log::{debug, info};
use models::clash::{BookedCourse, ClashDescriptor, find_clashes};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

/// The decision taken for a seat request
#[derive(Debug)]
pub enum EnrollOutcome {
    /// A seat was free and is now held by the student
    Enrolled(registrations::Model),
    /// The student already holds a seat in this section
    AlreadyRegistered,
    /// The section collides with the student's timetable; nothing was written
    Conflict {
        clashes: Vec<ClashDescriptor>,
        alternatives: Vec<SectionDetail>,
    },
    /// The section is full and the student joined the end of its waitlist
    Waitlisted {
        position: u64,
        entry: waitlists::Model,
    },
    /// The section is full and the student was already waiting for it
    AlreadyWaitlisted {
        position: u64,
        entry: waitlists::Model,
    },
}

/// Result of checking a request against the student's current timetable
enum Screening {
    AlreadyRegistered,
    Clash {
        clashes: Vec<ClashDescriptor>,
        booked: Vec<BookedCourse>,
    },
    Clear,
}

pub struct EnrollmentService;

impl EnrollmentService {
    /// Decide and apply a student's request for a seat in a section
    pub async fn enroll(
        db: &DatabaseConnection,
        student_id: Uuid,
        section_id: Uuid,
    ) -> Result<EnrollOutcome, EnrollmentError> {
        let target = ScheduleService::get_section(db, section_id)
            .await?
            .ok_or(EnrollmentError::SectionNotFound(section_id))?;

        match Self::screen(db, student_id, &target).await? {
            Screening::AlreadyRegistered => return Ok(EnrollOutcome::AlreadyRegistered),
            Screening::Clash { clashes, booked } => {
                return Self::conflict(db, &target, &booked, clashes).await;
            }
            Screening::Clear => {}
        }

        Self::allocate_seat(db, student_id, &target).await
    }

    async fn screen<C: ConnectionTrait>(
        conn: &C,
        student_id: Uuid,
        target: &SectionDetail,
    ) -> Result<Screening, DbErr> {
        let existing = ScheduleService::get_student_registrations(
            conn,
            student_id,
            Some(target.section.term_id),
        )
        .await?;

        if existing
            .iter()
            .any(|r| r.registration.section_id == target.section.id)
        {
            return Ok(Screening::AlreadyRegistered);
        }

        let booked: Vec<BookedCourse> = existing
            .iter()
            .flat_map(|r| r.section.booked_courses())
            .collect();

        let clashes = find_clashes(&target.slots(), &booked);
        if clashes.is_empty() {
            Ok(Screening::Clear)
        } else {
            Ok(Screening::Clash { clashes, booked })
        }
    }

    async fn conflict(
        db: &DatabaseConnection,
        target: &SectionDetail,
        booked: &[BookedCourse],
        clashes: Vec<ClashDescriptor>,
    ) -> Result<EnrollOutcome, EnrollmentError> {
        let alternatives = AlternativeService::find_alternatives(db, target, booked).await?;

        info!(
            "Time clash for section {}: {} clashes, {} alternatives",
            target.section.id,
            clashes.len(),
            alternatives.len()
        );

        Ok(EnrollOutcome::Conflict {
            clashes,
            alternatives,
        })
    }

    /// Register or waitlist the student inside one transaction
    async fn allocate_seat(
        db: &DatabaseConnection,
        student_id: Uuid,
        target: &SectionDetail,
    ) -> Result<EnrollOutcome, EnrollmentError> {
        let txn = db.begin().await?;

        let section = ScheduleService::lock_section(&txn, target.section.id)
            .await?
            .ok_or(EnrollmentError::SectionNotFound(target.section.id))?;

        // Screening again under the lock: the first pass saw no registrations
        // committed after it ran
        match Self::screen(&txn, student_id, target).await? {
            Screening::AlreadyRegistered => {
                txn.rollback().await?;
                return Ok(EnrollOutcome::AlreadyRegistered);
            }
            Screening::Clash { clashes, booked } => {
                txn.rollback().await?;
                return Self::conflict(db, target, &booked, clashes).await;
            }
            Screening::Clear => {}
        }

        let registered = ScheduleService::count_registrations(&txn, section.id).await?;
        let capacity = u64::try_from(section.capacity).unwrap_or_default();

        let outcome = if registered < capacity {
            match Self::register(&txn, student_id, &section).await {
                Ok(registration) => EnrollOutcome::Enrolled(registration),
                Err(err) if is_unique_violation(&err) => {
                    return Ok(EnrollOutcome::AlreadyRegistered);
                }
                Err(err) => return Err(err.into()),
            }
        } else {
            Self::join_waitlist(&txn, student_id, &section).await?
        };

        txn.commit().await?;

        match &outcome {
            EnrollOutcome::Enrolled(_) => info!(
                "Student {student_id} enrolled in section {} ({}/{capacity})",
                section.id,
                registered + 1
            ),
            EnrollOutcome::Waitlisted { position, .. } => info!(
                "Section {} full, student {student_id} waitlisted at position {position}",
                section.id
            ),
            _ => debug!(
                "Student {student_id} already waiting for section {}",
                section.id
            ),
        }

        Ok(outcome)
    }

    async fn register(
        txn: &DatabaseTransaction,
        student_id: Uuid,
        section: &sections::Model,
    ) -> Result<registrations::Model, DbErr> {
        let registration = registrations::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student_id),
            section_id: Set(section.id),
            created_at: Set(now()),
        }
        .insert(txn)
        .await?;

        // A seat supersedes any place the student held in the queue
        waitlists::Entity::delete_many()
            .filter(waitlists::Column::StudentId.eq(student_id))
            .filter(waitlists::Column::SectionId.eq(section.id))
            .exec(txn)
            .await?;

        Ok(registration)
    }

    async fn join_waitlist(
        txn: &DatabaseTransaction,
        student_id: Uuid,
        section: &sections::Model,
    ) -> Result<EnrollOutcome, DbErr> {
        let existing = waitlists::Entity::find()
            .filter(waitlists::Column::StudentId.eq(student_id))
            .filter(waitlists::Column::SectionId.eq(section.id))
            .one(txn)
            .await?;

        if let Some(entry) = existing {
            let position = WaitlistService::position(txn, &entry).await?;
            return Ok(EnrollOutcome::AlreadyWaitlisted { position, entry });
        }

        let queued = waitlists::Entity::find()
            .filter(waitlists::Column::SectionId.eq(section.id))
            .count(txn)
            .await?;

        let entry = waitlists::ActiveModel {
            id: Set(Uuid::now_v7()),
            student_id: Set(student_id),
            section_id: Set(section.id),
            created_at: Set(now()),
        }
        .insert(txn)
        .await?;

        Ok(EnrollOutcome::Waitlisted {
            position: queued + 1,
            entry,
        })
    }
}
