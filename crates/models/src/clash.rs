use crate::{time_slot::TimeSlot, weekday::DayOfWeek};
use serde::Serialize;

/// A course a student already holds a seat in, with its weekly slots
#[derive(Debug, Clone, PartialEq)]
pub struct BookedCourse {
    pub course_code: String,
    pub course_title: String,
    pub slots: Vec<TimeSlot>,
}

/// Describes an existing booking that collides with a requested section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClashDescriptor {
    pub course_code: String,
    pub course_title: String,
    pub day: DayOfWeek,
    pub time_range: String,
}

/// Collects every collision between the requested slots and the student's
/// booked courses.
///
/// Every pair is tested, so a course that collides on two days is reported
/// twice. Results follow the order of `booked`, then each course's slots,
/// then `target`.
pub fn find_clashes(target: &[TimeSlot], booked: &[BookedCourse]) -> Vec<ClashDescriptor> {
    let mut clashes = Vec::new();

    for course in booked {
        for existing in &course.slots {
            for requested in target {
                if requested.overlaps(existing) {
                    clashes.push(ClashDescriptor {
                        course_code: course.course_code.clone(),
                        course_title: course.course_title.clone(),
                        day: existing.day,
                        time_range: existing.time_range_label(),
                    });
                }
            }
        }
    }

    clashes
}

/// Cheaper check used when only a yes/no answer is needed
pub fn has_clash(target: &[TimeSlot], booked: &[BookedCourse]) -> bool {
    booked.iter().any(|course| {
        course
            .slots
            .iter()
            .any(|existing| target.iter().any(|requested| requested.overlaps(existing)))
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveTime;

    fn slot(day: DayOfWeek, start: u32, end: u32) -> TimeSlot {
        TimeSlot::new(
            day,
            NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
        )
    }

    fn course(code: &str, slots: Vec<TimeSlot>) -> BookedCourse {
        BookedCourse {
            course_code: code.to_string(),
            course_title: format!("{code} title"),
            slots,
        }
    }

    #[test]
    fn test_no_booked_courses() {
        let target = vec![slot(DayOfWeek::Monday, 10, 11)];
        assert!(find_clashes(&target, &[]).is_empty());
        assert!(!has_clash(&target, &[]));
    }

    #[test]
    fn test_single_clash_describes_existing_booking() {
        let booked = vec![course("CS101", vec![slot(DayOfWeek::Monday, 10, 11)])];
        let target = vec![TimeSlot::new(
            DayOfWeek::Monday,
            NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
        )];

        let clashes = find_clashes(&target, &booked);
        assert_eq!(clashes.len(), 1);
        assert_eq!(clashes[0].course_code, "CS101");
        assert_eq!(clashes[0].course_title, "CS101 title");
        assert_eq!(clashes[0].day, DayOfWeek::Monday);
        assert_eq!(clashes[0].time_range, "10:00 AM - 11:00 AM");
        assert!(has_clash(&target, &booked));
    }

    #[test]
    fn test_all_clashes_are_collected() {
        let booked = vec![
            course(
                "MATH201",
                vec![
                    slot(DayOfWeek::Monday, 9, 11),
                    slot(DayOfWeek::Wednesday, 9, 11),
                ],
            ),
            course("PHYS110", vec![slot(DayOfWeek::Wednesday, 10, 12)]),
            course("HIST100", vec![slot(DayOfWeek::Friday, 10, 11)]),
        ];
        let target = vec![
            slot(DayOfWeek::Monday, 10, 11),
            slot(DayOfWeek::Wednesday, 10, 11),
        ];

        let clashes = find_clashes(&target, &booked);
        let summary: Vec<_> = clashes
            .iter()
            .map(|c| (c.course_code.as_str(), c.day))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("MATH201", DayOfWeek::Monday),
                ("MATH201", DayOfWeek::Wednesday),
                ("PHYS110", DayOfWeek::Wednesday),
            ]
        );
    }

    #[test]
    fn test_back_to_back_is_not_a_clash() {
        let booked = vec![course("CS101", vec![slot(DayOfWeek::Tuesday, 8, 10)])];
        let target = vec![slot(DayOfWeek::Tuesday, 10, 12)];
        assert!(find_clashes(&target, &booked).is_empty());
    }

    #[test]
    fn test_clash_serializes_camel_case() {
        let clash = ClashDescriptor {
            course_code: "CS101".to_string(),
            course_title: "Intro".to_string(),
            day: DayOfWeek::Monday,
            time_range: "10:00 AM - 11:00 AM".to_string(),
        };
        let json = serde_json::to_value(&clash).unwrap();
        assert_eq!(json["courseCode"], "CS101");
        assert_eq!(json["day"], "Monday");
        assert_eq!(json["timeRange"], "10:00 AM - 11:00 AM");
    }
}
