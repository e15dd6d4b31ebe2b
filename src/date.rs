// Calendar dates without a time component, and inclusive date intervals built from them

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Canonical wire and key format for every date the client handles
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidFormat(String),

    #[error("Interval end {end} is before start {start}")]
    ReversedInterval { start: DateOnly, end: DateOnly },
}

/// A calendar day. Equality and ordering match the canonical `YYYY-MM-DD` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateOnly(NaiveDate);

impl DateOnly {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(DateOnly)
            .ok_or_else(|| DateError::InvalidFormat(format!("{:04}-{:02}-{:02}", year, month, day)))
    }

    pub fn today() -> Self {
        DateOnly(chrono::Local::now().date_naive())
    }

    // Whole days from `self` to `later`; negative when `later` is earlier
    pub fn days_until(self, later: DateOnly) -> i64 {
        (later.0 - self.0).num_days()
    }

    pub fn add_days(self, days: i64) -> Option<DateOnly> {
        self.0.checked_add_signed(Duration::days(days)).map(DateOnly)
    }
}

impl From<NaiveDate> for DateOnly {
    fn from(date: NaiveDate) -> Self {
        DateOnly(date)
    }
}

impl FromStr for DateOnly {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono accepts signs, unpadded fields and extra year digits; only the
        // exact canonical rendering is a valid key
        let date = NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map_err(|_| DateError::InvalidFormat(s.to_string()))?;
        if date.format(DATE_FORMAT).to_string() != s {
            return Err(DateError::InvalidFormat(s.to_string()));
        }
        Ok(DateOnly(date))
    }
}

impl fmt::Display for DateOnly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl Serialize for DateOnly {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateOnly {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Inclusive day range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Interval {
    start: DateOnly,
    end: DateOnly,
}

impl Interval {
    pub fn new(start: DateOnly, end: DateOnly) -> Result<Self, DateError> {
        if start > end {
            return Err(DateError::ReversedInterval { start, end });
        }
        Ok(Self { start, end })
    }

    // Order-independent construction from two endpoints
    pub fn spanning(a: DateOnly, b: DateOnly) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn single_day(day: DateOnly) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, DateError> {
        Self::new(start.parse()?, end.parse()?)
    }

    pub fn start(&self) -> DateOnly {
        self.start
    }

    pub fn end(&self) -> DateOnly {
        self.end
    }

    // Both endpoints count, so a same-day interval is one day long
    pub fn day_count(&self) -> i64 {
        self.start.days_until(self.end) + 1
    }

    pub fn contains(&self, day: DateOnly) -> bool {
        self.start <= day && day <= self.end
    }

    /// Inclusive-day intersection: two intervals overlap when they share at least
    /// one calendar day, so a range ending on D conflicts with one starting on D.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start.max(other.start) <= self.end.min(other.end)
    }

    pub fn days(&self) -> impl Iterator<Item = DateOnly> {
        let start = self.start;
        (0..self.day_count()).filter_map(move |offset| start.add_days(offset))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
pub(crate) fn day(s: &str) -> DateOnly {
    s.parse().unwrap()
}
