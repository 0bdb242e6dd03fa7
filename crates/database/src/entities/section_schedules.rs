use models::{time_slot::TimeSlot, weekday::DayOfWeek};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "section_schedules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub section_course_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: Time,
    pub end_time: Time,
    pub room_id: Uuid,
    pub faculty_id: Option<Uuid>,
}

impl Model {
    pub fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.day_of_week, self.start_time, self.end_time)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::section_courses::Entity",
        from = "Column::SectionCourseId",
        to = "super::section_courses::Column::Id"
    )]
    SectionCourse,
    #[sea_orm(
        belongs_to = "super::rooms::Entity",
        from = "Column::RoomId",
        to = "super::rooms::Column::Id"
    )]
    Room,
}

impl Related<super::section_courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SectionCourse.def()
    }
}

impl Related<super::rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
