use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create terms table
        manager
            .create_table(
                Table::create()
                    .table(Terms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Terms::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Terms::Year).integer().not_null())
                    .col(ColumnDef::new(Terms::Semester).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create rooms table
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rooms::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Rooms::Building).string().not_null())
                    .col(ColumnDef::new(Rooms::Number).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create faculty table
        manager
            .create_table(
                Table::create()
                    .table(Faculty::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Faculty::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Faculty::Name).string().not_null())
                    .col(ColumnDef::new(Faculty::Email).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(ColumnDef::new(Students::Email).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Courses::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::CreditHours).integer().not_null())
                    .col(ColumnDef::new(Courses::TermId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-courses-term_id")
                            .from(Courses::Table, Courses::TermId)
                            .to(Terms::Table, Terms::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create sections table
        manager
            .create_table(
                Table::create()
                    .table(Sections::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sections::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sections::SectionCode).string().not_null())
                    .col(
                        ColumnDef::new(Sections::Capacity)
                            .integer()
                            .not_null()
                            .check(Expr::col(Sections::Capacity).gt(0)),
                    )
                    .col(ColumnDef::new(Sections::TermId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sections-term_id")
                            .from(Sections::Table, Sections::TermId)
                            .to(Terms::Table, Terms::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create section_courses junction table (many-to-many)
        manager
            .create_table(
                Table::create()
                    .table(SectionCourses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SectionCourses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SectionCourses::SectionId).uuid().not_null())
                    .col(ColumnDef::new(SectionCourses::CourseId).uuid().not_null())
                    .col(ColumnDef::new(SectionCourses::FacultyId).uuid())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-section_courses-section_id")
                            .from(SectionCourses::Table, SectionCourses::SectionId)
                            .to(Sections::Table, Sections::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-section_courses-course_id")
                            .from(SectionCourses::Table, SectionCourses::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-section_courses-faculty_id")
                            .from(SectionCourses::Table, SectionCourses::FacultyId)
                            .to(Faculty::Table, Faculty::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create section_schedules table
        manager
            .create_table(
                Table::create()
                    .table(SectionSchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SectionSchedules::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SectionSchedules::SectionCourseId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SectionSchedules::DayOfWeek)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SectionSchedules::StartTime).time().not_null())
                    .col(ColumnDef::new(SectionSchedules::EndTime).time().not_null())
                    .col(ColumnDef::new(SectionSchedules::RoomId).uuid().not_null())
                    .col(ColumnDef::new(SectionSchedules::FacultyId).uuid())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-section_schedules-section_course_id")
                            .from(SectionSchedules::Table, SectionSchedules::SectionCourseId)
                            .to(SectionCourses::Table, SectionCourses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-section_schedules-room_id")
                            .from(SectionSchedules::Table, SectionSchedules::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-section_schedules-faculty_id")
                            .from(SectionSchedules::Table, SectionSchedules::FacultyId)
                            .to(Faculty::Table, Faculty::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create registrations table. Deleting a section with seats taken is
        // refused; they have to be cleared first.
        manager
            .create_table(
                Table::create()
                    .table(Registrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Registrations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Registrations::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Registrations::SectionId).uuid().not_null())
                    .col(
                        ColumnDef::new(Registrations::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-registrations-student_id")
                            .from(Registrations::Table, Registrations::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-registrations-section_id")
                            .from(Registrations::Table, Registrations::SectionId)
                            .to(Sections::Table, Sections::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create waitlists table
        manager
            .create_table(
                Table::create()
                    .table(Waitlists::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Waitlists::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Waitlists::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Waitlists::SectionId).uuid().not_null())
                    .col(ColumnDef::new(Waitlists::CreatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-waitlists-student_id")
                            .from(Waitlists::Table, Waitlists::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-waitlists-section_id")
                            .from(Waitlists::Table, Waitlists::SectionId)
                            .to(Sections::Table, Sections::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create notifications table
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).uuid().not_null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::Read)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-user_id")
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Waitlists::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Registrations::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SectionSchedules::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SectionCourses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Sections::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Faculty::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Terms::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Terms {
    Table,
    Id,
    Year,
    Semester,
}

#[derive(Iden)]
enum Rooms {
    Table,
    Id,
    Building,
    Number,
}

#[derive(Iden)]
enum Faculty {
    Table,
    Id,
    Name,
    Email,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
    Name,
    Email,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
    Code,
    Title,
    CreditHours,
    TermId,
}

#[derive(Iden)]
enum Sections {
    Table,
    Id,
    SectionCode,
    Capacity,
    TermId,
}

#[derive(Iden)]
enum SectionCourses {
    Table,
    Id,
    SectionId,
    CourseId,
    FacultyId,
}

#[derive(Iden)]
enum SectionSchedules {
    Table,
    Id,
    SectionCourseId,
    DayOfWeek,
    StartTime,
    EndTime,
    RoomId,
    FacultyId,
}

#[derive(Iden)]
enum Registrations {
    Table,
    Id,
    StudentId,
    SectionId,
    CreatedAt,
}

#[derive(Iden)]
enum Waitlists {
    Table,
    Id,
    StudentId,
    SectionId,
    CreatedAt,
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
    UserId,
    Message,
    Read,
    CreatedAt,
}
