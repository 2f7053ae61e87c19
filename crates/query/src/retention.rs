//! Retention query building
//!
//! Retention tracks how many entities from a cohort window come back in each
//! subsequent period.

use chrono::NaiveDate;

use crate::daterange::DateRange;
use crate::filter::Filter;
use crate::request::{RetentionBody, RetentionRequest};
use crate::selection::Granularity;

/// Build a retention request
///
/// Requires a cube, a binding key, a time dimension, a resolvable cohort
/// date range, and at least one period; otherwise returns `None`. The date
/// range is resolved to concrete dates relative to `today` so the backend
/// sees a fixed window.
#[allow(clippy::too_many_arguments)]
pub fn build_retention_query(
    cube: Option<&str>,
    binding_key: Option<&str>,
    time_dimension: Option<&str>,
    date_range: Option<&DateRange>,
    cohort_filters: &[Filter],
    activity_filters: &[Filter],
    periods: u32,
    granularity: Granularity,
    today: NaiveDate,
) -> Option<RetentionRequest> {
    let cube = cube.filter(|s| !s.is_empty())?;
    let binding_key = binding_key.filter(|s| !s.is_empty())?;
    let time_dimension = time_dimension.filter(|s| !s.is_empty())?;
    let span = date_range?.resolve(today).ok()?;
    if periods == 0 {
        return None;
    }

    Some(RetentionRequest {
        retention: RetentionBody {
            cube: cube.to_string(),
            binding_key: binding_key.to_string(),
            time_dimension: time_dimension.to_string(),
            date_range: span.to_strings(),
            cohort_filters: cohort_filters.to_vec(),
            activity_filters: activity_filters.to_vec(),
            periods,
            granularity,
        },
    })
}
