use crate::weekday::DayOfWeek;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// One weekly meeting of a section: a teaching day and a time-of-day interval.
///
/// Only the wall-clock time is meaningful. The interval is half-open, so a
/// class ending at 11:00 does not collide with one starting at 11:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: DayOfWeek,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn new(day: DayOfWeek, start: NaiveTime, end: NaiveTime) -> Self {
        Self { day, start, end }
    }

    /// Start of the slot in minutes since midnight
    pub fn start_minutes(&self) -> u32 {
        minutes_since_midnight(self.start)
    }

    /// End of the slot in minutes since midnight
    pub fn end_minutes(&self) -> u32 {
        minutes_since_midnight(self.end)
    }

    /// Whether two slots occupy the same minutes of the same day
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.day == other.day
            && self.start_minutes() < other.end_minutes()
            && self.end_minutes() > other.start_minutes()
    }

    /// Human-readable time range, e.g. "10:00 AM - 11:30 AM"
    pub fn time_range_label(&self) -> String {
        format!("{} - {}", format_time(self.start), format_time(self.end))
    }
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}", self.day, self.time_range_label())
    }
}

/// Seconds are ignored; schedules are kept at minute granularity
pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// 12-hour clock format used in clash and alternative descriptions
pub fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}
