use chrono::{NaiveDateTime, SubsecRound, Utc};
use sea_orm::{DbErr, SqlErr};

pub mod alternatives;
pub mod enrollment;
pub mod schedule;
pub mod waitlist;

/// Current UTC time truncated to the microsecond precision databases keep,
/// so values read back compare equal to the ones written
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
