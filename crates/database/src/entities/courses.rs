use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String, // e.g. "CS101", always uppercase
    pub title: String,
    pub credit_hours: i32,
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

// Many-to-many relationship with sections
impl Related<super::sections::Entity> for Entity {
    fn to() -> RelationDef {
        super::section_courses::Relation::Section.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::section_courses::Relation::Course.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
