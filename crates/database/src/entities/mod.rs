pub mod courses;
pub mod faculty;
pub mod notifications;
pub mod registrations;
pub mod rooms;
pub mod section_courses;
pub mod section_schedules;
pub mod sections;
pub mod students;
pub mod terms;
pub mod waitlists;
