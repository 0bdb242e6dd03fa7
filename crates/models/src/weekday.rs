use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use strum::{EnumIter, EnumProperty, IntoEnumIterator};

#[cfg(feature = "database")]
use sea_orm::Value;

/// A teaching day. Classes are never scheduled on Sunday.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumProperty,
)]
pub enum DayOfWeek {
    #[strum(props(display = "Monday", short = "MON"))]
    Monday,

    #[strum(props(display = "Tuesday", short = "TUE"))]
    Tuesday,

    #[strum(props(display = "Wednesday", short = "WED"))]
    Wednesday,

    #[strum(props(display = "Thursday", short = "THU"))]
    Thursday,

    #[strum(props(display = "Friday", short = "FRI"))]
    Friday,

    #[strum(props(display = "Saturday", short = "SAT"))]
    Saturday,
}

impl DayOfWeek {
    pub fn as_str(&self) -> &'static str {
        self.get_str("display").unwrap_or_default()
    }

    pub fn short(&self) -> &'static str {
        self.get_str("short").unwrap_or_default()
    }
}

/// Error returned when a string does not name a teaching day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDayError(pub String);

impl Display for ParseDayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "unknown day of week: {}", self.0)
    }
}

impl std::error::Error for ParseDayError {}

impl FromStr for DayOfWeek {
    type Err = ParseDayError;

    /// Accepts full names ("Monday", "MONDAY") and three-letter codes ("Mon")
    fn from_str(day: &str) -> Result<Self, Self::Err> {
        let day = day.trim();

        Self::iter()
            .find(|variant| {
                variant.as_str().eq_ignore_ascii_case(day)
                    || variant.short().eq_ignore_ascii_case(day)
            })
            .ok_or_else(|| ParseDayError(day.to_string()))
    }
}

impl Display for DayOfWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::ValueType for DayOfWeek {
    fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        match v {
            Value::String(Some(s)) => s.parse().map_err(|_| sea_orm::sea_query::ValueTypeErr),
            _ => Err(sea_orm::sea_query::ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "DayOfWeek".to_string()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        sea_orm::sea_query::ArrayType::String
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        sea_orm::sea_query::ColumnType::Text
    }
}

#[cfg(feature = "database")]
impl From<DayOfWeek> for Value {
    fn from(day: DayOfWeek) -> Self {
        Value::String(Some(Box::new(day.as_str().to_string())))
    }
}

#[cfg(feature = "database")]
impl sea_orm::TryGetable for DayOfWeek {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let val: String = res.try_get_by(index)?;

        val.parse().map_err(|e: ParseDayError| {
            sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(format!(
                "Failed to read DayOfWeek: {e}"
            )))
        })
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::Nullable for DayOfWeek {
    fn null() -> Value {
        Value::String(None)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_day_from_str() {
        assert_eq!(DayOfWeek::from_str("Monday").unwrap(), DayOfWeek::Monday);
        assert_eq!(DayOfWeek::from_str("MONDAY").unwrap(), DayOfWeek::Monday);
        assert_eq!(DayOfWeek::from_str("sat").unwrap(), DayOfWeek::Saturday);
        assert_eq!(DayOfWeek::from_str(" THU ").unwrap(), DayOfWeek::Thursday);

        // Sunday is not a teaching day
        assert!(DayOfWeek::from_str("Sunday").is_err());
        assert!(DayOfWeek::from_str("").is_err());
    }

    #[test]
    fn test_day_display() {
        assert_eq!(DayOfWeek::Wednesday.to_string(), "Wednesday");
        assert_eq!(DayOfWeek::Friday.short(), "FRI");
    }

    #[test]
    fn test_day_serializes_as_name() {
        let json = serde_json::to_string(&DayOfWeek::Monday).unwrap();
        assert_eq!(json, "\"Monday\"");
    }
}
