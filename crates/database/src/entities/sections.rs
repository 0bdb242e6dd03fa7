use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One offering of one or more courses within a term
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub section_code: String, // e.g. "A", "L01"
    pub capacity: i32,
    pub term_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::terms::Entity",
        from = "Column::TermId",
        to = "super::terms::Column::Id"
    )]
    Term,
    #[sea_orm(has_many = "super::section_courses::Entity")]
    SectionCourses,
    #[sea_orm(has_many = "super::registrations::Entity")]
    Registrations,
    #[sea_orm(has_many = "super::waitlists::Entity")]
    Waitlists,
}

impl Related<super::terms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Term.def()
    }
}

impl Related<super::section_courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SectionCourses.def()
    }
}

impl Related<super::registrations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl Related<super::waitlists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Waitlists.def()
    }
}

// Many-to-many relationship with courses
impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        super::section_courses::Relation::Course.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::section_courses::Relation::Section.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
