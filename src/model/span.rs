// File: ./src/model/span.rs
//! Calendar span of a dated record.
//!
//! Deployment folders are named `YYYY-MM-DD` or `YYYY-MM-DD - YYYY-MM-DD`.
//! A single day always occupies that day. A multi-day span occupies every
//! weekday in the inclusive range; Saturdays and Sundays are not counted as
//! occupied.
use crate::error::{PlannerError, PlannerResult};
use chrono::{Datelike, NaiveDate, Weekday};
use std::fmt;

pub const ISO_DATE: &str = "%Y-%m-%d";

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // chrono accepts unpadded fields, folder names must be exactly 10 chars.
    if s.len() != 10 || !s.is_ascii() {
        return None;
    }
    NaiveDate::parse_from_str(s, ISO_DATE).ok()
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateSpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateSpan {
    /// Builds a span. `end` before `start` is rejected.
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> PlannerResult<Self> {
        let end = end.unwrap_or(start);
        if end < start {
            return Err(PlannerError::invalid(format!(
                "end date {} is before start date {}",
                format_iso_date(end),
                format_iso_date(start)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Parses user-entered start and optional end strings.
    pub fn parse(start: &str, end: Option<&str>) -> PlannerResult<Self> {
        let parse_one = |text: &str| {
            parse_iso_date(text).ok_or_else(|| {
                PlannerError::invalid(format!("'{}' is not a YYYY-MM-DD date", text))
            })
        };
        let start_date = parse_one(start)?;
        let end_date = end.map(parse_one).transpose()?;
        Self::new(start_date, end_date)
    }

    /// Parses a deployment folder name.
    ///
    /// Returns `None` when the name is not a date or date range at all, and
    /// `Some(Err(_))` when it is a range whose end precedes its start.
    pub fn from_folder_name(name: &str) -> Option<PlannerResult<Self>> {
        let name = name.trim();
        let start = parse_iso_date(name.get(..10)?)?;
        let rest = name.get(10..)?;
        if rest.is_empty() {
            return Some(Ok(Self::single(start)));
        }
        let end_str = rest.trim_start().strip_prefix('-')?.trim_start();
        let end = parse_iso_date(end_str)?;
        Some(Self::new(start, Some(end)))
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn is_multi_day(&self) -> bool {
        self.end > self.start
    }

    /// Folder name for this span, the inverse of `from_folder_name`.
    pub fn folder_name(&self) -> String {
        self.to_string()
    }

    /// Ordered days the record occupies.
    pub fn occupied_days(&self) -> Vec<NaiveDate> {
        if !self.is_multi_day() {
            return vec![self.start];
        }
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .filter(|d| !is_weekend(*d))
            .collect()
    }
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_multi_day() {
            write!(
                f,
                "{} - {}",
                format_iso_date(self.start),
                format_iso_date(self.end)
            )
        } else {
            write!(f, "{}", format_iso_date(self.start))
        }
    }
}
