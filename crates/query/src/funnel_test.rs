//! Tests for funnel query building

use crate::daterange::DateRange;
use crate::filter::Filter;
use crate::funnel::{build_funnel_query, FunnelStep};

fn two_steps() -> Vec<FunnelStep> {
    vec![
        FunnelStep::new("Signed up", "Signups"),
        FunnelStep::new("First purchase", "Orders"),
    ]
}

#[test]
fn test_gates_on_binding_key_and_time_dimension() {
    let steps = two_steps();
    assert!(build_funnel_query(None, Some("Events.timestamp"), None, &steps).is_none());
    assert!(build_funnel_query(Some(""), Some("Events.timestamp"), None, &steps).is_none());
    assert!(build_funnel_query(Some("Events.userId"), None, None, &steps).is_none());
    assert!(build_funnel_query(Some("Events.userId"), Some(""), None, &steps).is_none());
}

#[test]
fn test_gates_on_step_count() {
    let binding = Some("Events.userId");
    let time = Some("Events.timestamp");

    assert!(build_funnel_query(binding, time, None, &[]).is_none());
    assert!(build_funnel_query(binding, time, None, &two_steps()[..1]).is_none());

    let request = build_funnel_query(binding, time, None, &two_steps()).unwrap();
    assert_eq!(request.funnel.steps.len(), 2);
}

#[test]
fn test_unusable_steps_are_skipped() {
    // A placeholder step without a cube does not count toward the minimum
    let mut steps = two_steps();
    steps.push(FunnelStep::empty());
    steps.push(FunnelStep::new("", "Orders"));

    let request =
        build_funnel_query(Some("Events.userId"), Some("Events.timestamp"), None, &steps).unwrap();
    assert_eq!(request.funnel.steps.len(), 2);

    // With only one usable step left, the funnel is not executable
    steps.remove(0);
    steps.remove(0);
    steps.push(FunnelStep::new("Checkout", "Orders"));
    assert!(
        build_funnel_query(Some("Events.userId"), Some("Events.timestamp"), None, &steps)
            .is_none()
    );
}

#[test]
fn test_step_details_pass_through() {
    let mut steps = two_steps();
    steps[0].filters.push(Filter::equals("Signups.plan", "pro"));
    steps[1] = steps[1].clone().with_time_to_convert("P7D");

    let request = build_funnel_query(
        Some("Events.userId"),
        Some("Events.timestamp"),
        Some(&DateRange::preset("90d")),
        &steps,
    )
    .unwrap();

    assert_eq!(request.funnel.steps[0].filters.len(), 1);
    assert_eq!(request.funnel.steps[1].time_to_convert.as_deref(), Some("P7D"));
    assert_eq!(request.funnel.date_range, Some(DateRange::preset("90d")));
    assert!(request.funnel.include_time_metrics);
}

#[test]
fn test_request_serialization() {
    let request = build_funnel_query(
        Some("Events.userId"),
        Some("Events.timestamp"),
        None,
        &two_steps(),
    )
    .unwrap();
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["funnel"]["bindingKey"], "Events.userId");
    assert_eq!(value["funnel"]["includeTimeMetrics"], true);
    assert_eq!(value["funnel"]["steps"][0]["cube"], "Signups");
    // Empty step filters are omitted
    assert!(value["funnel"]["steps"][0].get("filters").is_none());
}
