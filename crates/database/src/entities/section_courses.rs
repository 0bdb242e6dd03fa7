use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Junction table between sections and the courses they host.
/// Carries the primary instructor assignment.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "section_courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub section_id: Uuid,
    pub course_id: Uuid,
    pub faculty_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sections::Entity",
        from = "Column::SectionId",
        to = "super::sections::Column::Id"
    )]
    Section,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::faculty::Entity",
        from = "Column::FacultyId",
        to = "super::faculty::Column::Id"
    )]
    Faculty,
    #[sea_orm(has_many = "super::section_schedules::Entity")]
    SectionSchedules,
}

impl Related<super::sections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::faculty::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Faculty.def()
    }
}

impl Related<super::section_schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SectionSchedules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
