use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::{Date, Duration, OffsetDateTime, format_description::FormatItem, macros::format_description};

pub const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A UTC calendar date, the key under which a daily selection is stored.
///
/// Two instants on the same UTC calendar day map to the same `SelectionDate`;
/// the time component is intentionally absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionDate(pub Date);

impl SelectionDate {
    pub fn new(date: Date) -> Self {
        Self(date)
    }

    /// The current calendar date in UTC, regardless of host timezone.
    pub fn today_utc() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    /// The calendar day immediately before this one.
    pub fn previous_day(self) -> Self {
        Self(self.0 - Duration::days(1))
    }

    /// The calendar day immediately after this one.
    pub fn next_day(self) -> Self {
        Self(self.0 + Duration::days(1))
    }

    pub fn inner(&self) -> &Date {
        &self.0
    }

    pub fn into_inner(self) -> Date {
        self.0
    }
}

impl fmt::Display for SelectionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self.0.format(DATE_FORMAT).map_err(|_| fmt::Error)?;
        write!(f, "{formatted}")
    }
}

impl FromStr for SelectionDate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let date = Date::parse(s, DATE_FORMAT)
            .map_err(|e| CoreError::invalid_date(format!("Failed to parse date '{s}': {e}")))?;
        Ok(SelectionDate(date))
    }
}

impl From<Date> for SelectionDate {
    fn from(date: Date) -> Self {
        Self(date)
    }
}

impl Serialize for SelectionDate {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self.0.format(DATE_FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for SelectionDate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SelectionDate::from_str(&s).map_err(serde::de::Error::custom)
    }
}
