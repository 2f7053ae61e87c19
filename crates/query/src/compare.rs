//! Comparison-period calculation
//!
//! Finds the date filter governing a time dimension and derives the
//! comparison window: the immediately preceding period of equal length.
//! "Prior period" deliberately means same-length and adjacent, never
//! same-period-last-year; see [`DateSpan::previous_year`] for the explicit
//! year-over-year variant.

use chrono::{NaiveDate, Utc};

use crate::daterange::DateSpan;
use crate::filter::{find_date_condition, Filter};

/// Compute `[current, prior]` date spans for a time dimension
///
/// Searches `filters` depth-first (descending into and/or groups) for the
/// first `inDateRange` condition on `time_dimension`; that condition's range
/// resolves against today's date. Returns `None` when no date filter exists
/// for the field or its range cannot be resolved — comparison is unavailable,
/// which is not an error.
pub fn build_compare_date_range(
    time_dimension: &str,
    filters: &[Filter],
) -> Option<[DateSpan; 2]> {
    build_compare_date_range_at(time_dimension, filters, Utc::now().date_naive())
}

/// Same as [`build_compare_date_range`] with an explicit reference date
pub fn build_compare_date_range_at(
    time_dimension: &str,
    filters: &[Filter],
    today: NaiveDate,
) -> Option<[DateSpan; 2]> {
    let condition = find_date_condition(time_dimension, filters)?;
    let current = condition.date_range.as_ref()?.resolve(today).ok()?;
    Some([current, current.previous_period()])
}
