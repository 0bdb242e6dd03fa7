use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // A student holds at most one seat per section
        manager
            .create_index(
                Index::create()
                    .name("idx_registrations_student_section")
                    .table(Registrations::Table)
                    .col(Registrations::StudentId)
                    .col(Registrations::SectionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // A student waits at most once per section
        manager
            .create_index(
                Index::create()
                    .name("idx_waitlists_student_section")
                    .table(Waitlists::Table)
                    .col(Waitlists::StudentId)
                    .col(Waitlists::SectionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Queue order lookups: earliest entry per section
        manager
            .create_index(
                Index::create()
                    .name("idx_waitlists_section_created_at")
                    .table(Waitlists::Table)
                    .col(Waitlists::SectionId)
                    .col(Waitlists::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Seat counts per section
        manager
            .create_index(
                Index::create()
                    .name("idx_registrations_section_id")
                    .table(Registrations::Table)
                    .col(Registrations::SectionId)
                    .to_owned(),
            )
            .await?;

        // Indexes on section_courses for faster many-to-many lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_section_courses_section_id")
                    .table(SectionCourses::Table)
                    .col(SectionCourses::SectionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_section_courses_course_id")
                    .table(SectionCourses::Table)
                    .col(SectionCourses::CourseId)
                    .to_owned(),
            )
            .await?;

        // Index on section_schedules.section_course_id for faster joins
        manager
            .create_index(
                Index::create()
                    .name("idx_section_schedules_section_course_id")
                    .table(SectionSchedules::Table)
                    .col(SectionSchedules::SectionCourseId)
                    .to_owned(),
            )
            .await?;

        // Sibling sections are restricted to the same term
        manager
            .create_index(
                Index::create()
                    .name("idx_sections_term_id")
                    .table(Sections::Table)
                    .col(Sections::TermId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_sections_term_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_section_schedules_section_course_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_section_courses_course_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_section_courses_section_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_registrations_section_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_waitlists_section_created_at").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_waitlists_student_section").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_registrations_student_section").to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Registrations {
    Table,
    StudentId,
    SectionId,
}

#[derive(Iden)]
enum Waitlists {
    Table,
    StudentId,
    SectionId,
    CreatedAt,
}

#[derive(Iden)]
enum SectionCourses {
    Table,
    SectionId,
    CourseId,
}

#[derive(Iden)]
enum SectionSchedules {
    Table,
    SectionCourseId,
}

#[derive(Iden)]
enum Sections {
    Table,
    TermId,
}
