pub mod clash;
pub mod time_slot;
pub mod weekday;
