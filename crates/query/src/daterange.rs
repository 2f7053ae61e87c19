//! Date range resolution and period arithmetic
//!
//! Supports preset keywords (7d, 30d, mtd, ytd), explicit single dates, and
//! explicit [start, end] pairs. Calculates comparison periods (previous
//! period, year-over-year).

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

/// A user-selected date range, as stored in a filter condition
///
/// Serializes as either a bare string (preset keyword or a single
/// `YYYY-MM-DD` date) or a two-element `[start, end]` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateRange {
    Value(String),
    Span(String, String),
}

impl DateRange {
    /// Create a preset or single-date range
    pub fn preset(s: impl Into<String>) -> Self {
        Self::Value(s.into())
    }

    /// Create an explicit [start, end] range
    pub fn span(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self::Span(start.into(), end.into())
    }

    /// Resolve this range into concrete dates, relative to `today`
    ///
    /// Supported values:
    /// - Presets: `today`, `yesterday`, `wtd`, `mtd`, `qtd`, `ytd`
    /// - Calendar-month shortcuts: `3m`, `6m`, `12m`
    /// - Relative: `7d`, `30d`, `2w`, `1y`
    /// - Explicit: `2024-01-15` (single day) or `[start, end]`
    pub fn resolve(&self, today: NaiveDate) -> Result<DateSpan> {
        match self {
            Self::Value(s) => {
                let s = s.trim().to_lowercase();
                if let Ok(date) = parse_date(&s) {
                    return DateSpan::new(date, date);
                }
                if let Some(span) = resolve_predefined(&s, today) {
                    return Ok(span);
                }
                if let Some(span) = resolve_relative(&s, today) {
                    return Ok(span);
                }
                Err(QueryError::InvalidDateRange(format!(
                    "unknown date range: {}",
                    s
                )))
            }
            Self::Span(start, end) => DateSpan::new(parse_date(start)?, parse_date(end)?),
        }
    }
}

/// A concrete date range with inclusive endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    /// Create a new span; end must not be before start
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(QueryError::InvalidDateRange(
                "end must not be before start".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Number of calendar days in this span (both endpoints inclusive)
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The immediately preceding period of equal length
    ///
    /// End is one day before this span's start; start keeps the length.
    pub fn previous_period(&self) -> Self {
        let end = self.start - Duration::days(1);
        Self {
            start: end - Duration::days(self.days() - 1),
            end,
        }
    }

    /// The same span shifted one year back (Feb 29 clamps to Feb 28)
    pub fn previous_year(&self) -> Self {
        Self {
            start: shift_years(self.start, -1),
            end: shift_years(self.end, -1),
        }
    }

    /// Both endpoints as `YYYY-MM-DD` strings
    pub fn to_strings(&self) -> [String; 2] {
        [
            self.start.format("%Y-%m-%d").to_string(),
            self.end.format("%Y-%m-%d").to_string(),
        ]
    }
}

fn resolve_predefined(s: &str, today: NaiveDate) -> Option<DateSpan> {
    let span = |start, end| Some(DateSpan { start, end });
    match s {
        "today" => span(today, today),
        "yesterday" => {
            let y = today - Duration::days(1);
            span(y, y)
        }
        "wtd" => span(start_of_week(today), today),
        "mtd" => span(start_of_month(today), today),
        "qtd" => span(start_of_quarter(today), today),
        "ytd" => span(start_of_year(today), today),
        // Month shortcuts use calendar months, not 30-day approximations
        "3m" => span(shift_months(today, -3), today),
        "6m" => span(shift_months(today, -6), today),
        "12m" => span(shift_months(today, -12), today),
        _ => None,
    }
}

fn resolve_relative(s: &str, today: NaiveDate) -> Option<DateSpan> {
    let (num, unit) = extract_num_unit(s)?;
    let back = match unit {
        'd' => Duration::days(num - 1), // 7d means today + 6 previous days
        'w' => Duration::weeks(num) - Duration::days(1),
        'm' => Duration::days(num * 30 - 1),
        'y' => Duration::days(num * 365 - 1),
        _ => return None,
    };
    Some(DateSpan {
        start: today - back,
        end: today,
    })
}

fn extract_num_unit(s: &str) -> Option<(i64, char)> {
    let unit = s.chars().last()?;
    if !unit.is_ascii_alphabetic() {
        return None;
    }
    let num: i64 = s[..s.len() - 1].parse().ok()?;
    if num <= 0 {
        return None;
    }
    Some((num, unit))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        QueryError::InvalidDateRange(format!("invalid date: {} (use YYYY-MM-DD)", s))
    })
}

fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn start_of_quarter(date: NaiveDate) -> NaiveDate {
    let quarter_start_month = ((date.month() - 1) / 3) * 3 + 1;
    date.with_month(quarter_start_month)
        .and_then(|d| d.with_day(1))
        .unwrap_or(date)
}

fn start_of_year(date: NaiveDate) -> NaiveDate {
    date.with_month(1).and_then(|d| d.with_day(1)).unwrap_or(date)
}

fn shift_years(date: NaiveDate, years: i32) -> NaiveDate {
    date.with_year(date.year() + years)
        .or_else(|| {
            // Feb 29 in a non-leap target year
            date.with_day(28).and_then(|d| d.with_year(d.year() + years))
        })
        .unwrap_or(date)
}

/// Shift a date by a number of months (positive or negative)
///
/// If the target day does not exist (e.g. Jan 31 minus 2 months), clamps to
/// the last day of the target month.
fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total_months = date.month() as i32 + months;
    let year_delta = if total_months <= 0 {
        (total_months - 12) / 12
    } else {
        (total_months - 1) / 12
    };
    let new_year = date.year() + year_delta;
    let new_month = ((total_months - 1).rem_euclid(12) + 1) as u32;

    NaiveDate::from_ymd_opt(new_year, new_month, date.day())
        .or_else(|| last_day_of_month(new_year, new_month))
        .unwrap_or(date)
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.map(|d| d - Duration::days(1))
}
