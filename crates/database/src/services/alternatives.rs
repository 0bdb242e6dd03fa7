use crate::{
    entities::{section_courses, sections},
    services::schedule::{ScheduleService, SectionDetail},
};
use log::debug;
use models::clash::{BookedCourse, has_clash};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

pub struct AlternativeService;

impl AlternativeService {
    /// Find sibling sections a student could take instead of `target`.
    ///
    /// A sibling is another section in the same term that hosts at least one
    /// of the target's courses. It qualifies when it still has a free seat and
    /// none of its slots collide with `booked`. Candidates keep storage order.
    pub async fn find_alternatives<C: ConnectionTrait>(
        conn: &C,
        target: &SectionDetail,
        booked: &[BookedCourse],
    ) -> Result<Vec<SectionDetail>, DbErr> {
        let course_ids: Vec<Uuid> = target.course_ids().into_iter().collect();
        if course_ids.is_empty() {
            return Ok(vec![]);
        }

        let sibling_ids: Vec<Uuid> = section_courses::Entity::find()
            .select_only()
            .column(section_courses::Column::SectionId)
            .filter(section_courses::Column::CourseId.is_in(course_ids))
            .filter(section_courses::Column::SectionId.ne(target.section.id))
            .distinct()
            .into_tuple()
            .all(conn)
            .await?;

        if sibling_ids.is_empty() {
            return Ok(vec![]);
        }

        let candidates = sections::Entity::find()
            .filter(sections::Column::TermId.eq(target.section.term_id))
            .filter(sections::Column::Id.is_in(sibling_ids))
            .all(conn)
            .await?;

        let candidates = ScheduleService::with_details(conn, candidates).await?;
        let considered = candidates.len();

        let alternatives: Vec<SectionDetail> = candidates
            .into_iter()
            .filter(|candidate| !candidate.is_full())
            .filter(|candidate| !has_clash(&candidate.slots(), booked))
            .collect();

        debug!(
            "Section {}: {} of {} sibling sections are open alternatives",
            target.section.id,
            alternatives.len(),
            considered
        );

        Ok(alternatives)
    }
}
