use crate::{
    entities::{notifications, registrations, students, waitlists},
    error::EnrollmentError,
    services::{
        now,
        schedule::{RegistrationDetail, ScheduleService, SectionDetail},
    },
};
use log::info;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// The student who took over a vacated seat
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromotedStudent {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<students::Model> for PromotedStudent {
    fn from(student: students::Model) -> Self {
        Self {
            id: student.id,
            name: student.name,
            email: student.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropOutcome {
    pub promoted_student: Option<PromotedStudent>,
}

/// A waitlist entry with its current position and the section it waits for
#[derive(Debug, Clone)]
pub struct WaitlistDetail {
    pub entry: waitlists::Model,
    pub position: u64,
    pub section: SectionDetail,
}

/// Everything a student currently holds or waits for
#[derive(Debug, Clone)]
pub struct StudentOverview {
    pub registrations: Vec<RegistrationDetail>,
    pub waitlist: Vec<WaitlistDetail>,
}

pub struct WaitlistService;

impl WaitlistService {
    /// 1-based position of an entry within its section's queue.
    ///
    /// Always counted, never stored, so removals never require renumbering.
    pub async fn position<C: ConnectionTrait>(
        conn: &C,
        entry: &waitlists::Model,
    ) -> Result<u64, DbErr> {
        waitlists::Entity::find()
            .filter(waitlists::Column::SectionId.eq(entry.section_id))
            .filter(
                Condition::any()
                    .add(waitlists::Column::CreatedAt.lt(entry.created_at))
                    .add(
                        Condition::all()
                            .add(waitlists::Column::CreatedAt.eq(entry.created_at))
                            .add(waitlists::Column::Id.lte(entry.id)),
                    ),
            )
            .count(conn)
            .await
    }

    /// Give up a seat and hand it to the head of the section's waitlist.
    ///
    /// The delete and the promotion commit together, so the seat is never
    /// observed empty while someone is waiting for it.
    pub async fn drop_registration(
        db: &DatabaseConnection,
        registration_id: Uuid,
        student_id: Uuid,
    ) -> Result<DropOutcome, EnrollmentError> {
        let registration = registrations::Entity::find_by_id(registration_id)
            .one(db)
            .await?
            .ok_or(EnrollmentError::RegistrationNotFound(registration_id))?;

        if registration.student_id != student_id {
            return Err(EnrollmentError::Forbidden { student_id });
        }

        let section = ScheduleService::get_section(db, registration.section_id)
            .await?
            .ok_or(EnrollmentError::SectionNotFound(registration.section_id))?;

        let txn = db.begin().await?;
        ScheduleService::lock_section(&txn, section.section.id).await?;

        let deleted = registration.delete(&txn).await?;
        if deleted.rows_affected == 0 {
            // Dropped by a concurrent request
            return Err(EnrollmentError::RegistrationNotFound(registration_id));
        }

        let promoted_student = Self::promote_next(&txn, &section).await?;
        txn.commit().await?;

        match &promoted_student {
            Some(student) => info!(
                "Registration {registration_id} dropped, student {} promoted into section {}",
                student.id, section.section.id
            ),
            None => info!(
                "Registration {registration_id} dropped, no waitlist for section {}",
                section.section.id
            ),
        }

        Ok(DropOutcome { promoted_student })
    }

    /// Move the earliest waitlist entry of a section into a registration
    async fn promote_next(
        txn: &DatabaseTransaction,
        section: &SectionDetail,
    ) -> Result<Option<PromotedStudent>, DbErr> {
        let head = waitlists::Entity::find()
            .filter(waitlists::Column::SectionId.eq(section.section.id))
            .order_by_asc(waitlists::Column::CreatedAt)
            .order_by_asc(waitlists::Column::Id)
            .one(txn)
            .await?;

        let Some(head) = head else {
            return Ok(None);
        };

        registrations::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(head.student_id),
            section_id: Set(head.section_id),
            created_at: Set(now()),
        }
        .insert(txn)
        .await?;

        waitlists::Entity::delete_by_id(head.id).exec(txn).await?;

        notifications::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(head.student_id),
            message: Set(format!(
                "A seat opened up in {} (section {}). You have been enrolled from the waitlist.",
                section.course_codes(),
                section.section.section_code
            )),
            read: Set(false),
            created_at: Set(now()),
        }
        .insert(txn)
        .await?;

        let student = students::Entity::find_by_id(head.student_id)
            .one(txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("student {}", head.student_id)))?;

        Ok(Some(student.into()))
    }

    /// Leave a section's waitlist. Later entries move up automatically since
    /// positions are counted on read.
    pub async fn withdraw(
        db: &DatabaseConnection,
        waitlist_id: Uuid,
        student_id: Uuid,
    ) -> Result<(), EnrollmentError> {
        let entry = waitlists::Entity::find_by_id(waitlist_id)
            .one(db)
            .await?
            .ok_or(EnrollmentError::WaitlistEntryNotFound(waitlist_id))?;

        if entry.student_id != student_id {
            return Err(EnrollmentError::Forbidden { student_id });
        }

        let section_id = entry.section_id;
        entry.delete(db).await?;
        info!("Student {student_id} left the waitlist of section {section_id}");

        Ok(())
    }

    /// A student's registrations in every term plus their waitlist entries
    /// with current positions
    pub async fn student_overview(
        db: &DatabaseConnection,
        student_id: Uuid,
    ) -> Result<StudentOverview, DbErr> {
        let registrations = ScheduleService::get_student_registrations(db, student_id, None).await?;

        let entries = waitlists::Entity::find()
            .filter(waitlists::Column::StudentId.eq(student_id))
            .order_by_asc(waitlists::Column::CreatedAt)
            .all(db)
            .await?;

        let section_ids = entries.iter().map(|e| e.section_id).collect();
        let mut sections_by_id: HashMap<Uuid, SectionDetail> =
            ScheduleService::get_sections(db, section_ids)
                .await?
                .into_iter()
                .map(|detail| (detail.section.id, detail))
                .collect();

        let mut waitlist = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(section) = sections_by_id.remove(&entry.section_id) else {
                continue;
            };
            let position = Self::position(db, &entry).await?;
            waitlist.push(WaitlistDetail {
                entry,
                position,
                section,
            });
        }

        Ok(StudentOverview {
            registrations,
            waitlist,
        })
    }
}
