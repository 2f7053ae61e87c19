//! Tests for query building

use serde_json::json;

use crate::build::build_query;
use crate::filter::Filter;
use crate::selection::{BreakdownSelection, Granularity, MetricSelection, SortDirection};

#[test]
fn test_empty_selection_builds_empty_request() {
    let request = build_query(&[], &[], &[], &[]);
    assert!(request.measures.is_none());
    assert!(request.dimensions.is_none());
    assert!(request.time_dimensions.is_none());
    assert!(request.filters.is_none());
    assert!(request.order.is_none());
    assert_eq!(serde_json::to_value(&request).unwrap(), json!({}));
}

#[test]
fn test_measures_and_time_dimension() {
    let metrics = vec![MetricSelection::new("Orders.count", 0)];
    let breakdowns = vec![
        BreakdownSelection::time("Orders.createdAt").with_granularity(Granularity::Month),
    ];
    let request = build_query(&metrics, &breakdowns, &[], &[]);

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(
        value,
        json!({
            "measures": ["Orders.count"],
            "timeDimensions": [
                {"dimension": "Orders.createdAt", "granularity": "month"}
            ]
        })
    );
    // Empty sections are absent, not empty arrays
    assert!(value.get("dimensions").is_none());
    assert!(value.get("filters").is_none());
}

#[test]
fn test_breakdowns_partition_by_time() {
    let breakdowns = vec![
        BreakdownSelection::new("Orders.status"),
        BreakdownSelection::time("Orders.createdAt"),
        BreakdownSelection::new("Orders.country"),
    ];
    let request = build_query(&[], &breakdowns, &[], &[]);

    assert_eq!(
        request.dimensions.unwrap(),
        vec!["Orders.status".to_string(), "Orders.country".to_string()]
    );
    let time = request.time_dimensions.unwrap();
    assert_eq!(time.len(), 1);
    assert_eq!(time[0].dimension, "Orders.createdAt");
}

#[test]
fn test_time_dimension_granularity_defaults_to_day() {
    let mut breakdown = BreakdownSelection::time("Orders.createdAt");
    breakdown.granularity = None;
    let request = build_query(&[], &[breakdown], &[], &[]);
    let time = request.time_dimensions.unwrap();
    assert_eq!(time[0].granularity, Granularity::Day);
}

#[test]
fn test_filters_and_order_pass_through() {
    let filters = vec![Filter::equals("Orders.status", "shipped")];
    let order = vec![("Orders.count".to_string(), SortDirection::Desc)];
    let request = build_query(&[], &[], &filters, &order);

    assert_eq!(request.filters.unwrap(), filters);
    let value = serde_json::to_value(build_query(&[], &[], &[], &order)).unwrap();
    assert_eq!(value["order"], json!([["Orders.count", "desc"]]));
}
