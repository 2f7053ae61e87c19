//! Query building
//!
//! Turns a flat selection into the canonical request shape. Total and
//! side-effect-free: no validation happens here (completeness is checked by
//! the mode adapters), and empty sections are omitted from the output rather
//! than emitted as empty arrays.

use crate::filter::Filter;
use crate::request::{QueryRequest, TimeDimensionRequest};
use crate::selection::{BreakdownSelection, MetricSelection, SortDirection};

/// Build a query request from a flat selection
///
/// Breakdowns are partitioned into plain dimensions and time dimensions; a
/// time dimension without an explicit granularity defaults to daily buckets.
/// `order` passes through unchanged.
pub fn build_query(
    metrics: &[MetricSelection],
    breakdowns: &[BreakdownSelection],
    filters: &[Filter],
    order: &[(String, SortDirection)],
) -> QueryRequest {
    let measures: Vec<String> = metrics.iter().map(|m| m.field.clone()).collect();

    let dimensions: Vec<String> = breakdowns
        .iter()
        .filter(|b| !b.is_time_dimension)
        .map(|b| b.field.clone())
        .collect();

    let time_dimensions: Vec<TimeDimensionRequest> = breakdowns
        .iter()
        .filter(|b| b.is_time_dimension)
        .map(|b| TimeDimensionRequest {
            dimension: b.field.clone(),
            granularity: b.granularity.unwrap_or_default(),
            compare_date_range: None,
        })
        .collect();

    QueryRequest {
        measures: none_if_empty(measures),
        dimensions: none_if_empty(dimensions),
        time_dimensions: none_if_empty(time_dimensions),
        filters: none_if_empty(filters.to_vec()),
        order: none_if_empty(order.to_vec()),
    }
}

fn none_if_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
