use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub building: String, // e.g. "GHC"
    pub number: String,   // e.g. "4102"
}

impl Model {
    pub fn label(&self) -> String {
        format!("{} {}", self.building, self.number)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::section_schedules::Entity")]
    SectionSchedules,
}

impl Related<super::section_schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SectionSchedules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
