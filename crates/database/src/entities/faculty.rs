use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "faculty")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::section_courses::Entity")]
    SectionCourses,
}

impl Related<super::section_courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SectionCourses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
