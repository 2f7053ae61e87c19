//! Tests for comparison-period calculation

use chrono::NaiveDate;

use crate::compare::build_compare_date_range_at;
use crate::daterange::DateRange;
use crate::filter::Filter;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_explicit_range_prior_period() {
    // A 10-day window gets the 10 days immediately preceding it
    let filters = vec![Filter::in_date_range(
        "Orders.createdAt",
        DateRange::span("2023-03-01", "2023-03-10"),
    )];
    let [current, prior] =
        build_compare_date_range_at("Orders.createdAt", &filters, day(2023, 6, 1)).unwrap();

    assert_eq!(current.to_strings(), ["2023-03-01", "2023-03-10"]);
    assert_eq!(prior.to_strings(), ["2023-02-19", "2023-02-28"]);
    assert_eq!(current.days(), prior.days());
}

#[test]
fn test_prior_period_crosses_leap_day() {
    let filters = vec![Filter::in_date_range(
        "Orders.createdAt",
        DateRange::span("2024-03-01", "2024-03-10"),
    )];
    let [_, prior] =
        build_compare_date_range_at("Orders.createdAt", &filters, day(2024, 6, 1)).unwrap();
    // Prior period ends the day before March 1st, which is Feb 29 in 2024
    assert_eq!(prior.to_strings(), ["2024-02-20", "2024-02-29"]);
}

#[test]
fn test_preset_range_resolves_against_today() {
    let filters = vec![Filter::in_date_range(
        "Orders.createdAt",
        DateRange::preset("7d"),
    )];
    let [current, prior] =
        build_compare_date_range_at("Orders.createdAt", &filters, day(2024, 5, 20)).unwrap();

    assert_eq!(current.to_strings(), ["2024-05-14", "2024-05-20"]);
    assert_eq!(prior.to_strings(), ["2024-05-07", "2024-05-13"]);
}

#[test]
fn test_no_date_filter_means_unavailable() {
    let filters = vec![Filter::equals("Orders.status", "shipped")];
    assert!(build_compare_date_range_at("Orders.createdAt", &filters, day(2024, 5, 20)).is_none());
    assert!(build_compare_date_range_at("Orders.createdAt", &[], day(2024, 5, 20)).is_none());
}

#[test]
fn test_filter_on_other_member_is_ignored() {
    let filters = vec![Filter::in_date_range(
        "Users.signedUpAt",
        DateRange::preset("30d"),
    )];
    assert!(build_compare_date_range_at("Orders.createdAt", &filters, day(2024, 5, 20)).is_none());
}

#[test]
fn test_finds_condition_inside_groups() {
    let filters = vec![Filter::or(vec![
        Filter::equals("Orders.status", "shipped"),
        Filter::and(vec![Filter::in_date_range(
            "Orders.createdAt",
            DateRange::span("2024-01-01", "2024-01-07"),
        )]),
    ])];
    let [current, prior] =
        build_compare_date_range_at("Orders.createdAt", &filters, day(2024, 5, 20)).unwrap();
    assert_eq!(current.to_strings(), ["2024-01-01", "2024-01-07"]);
    assert_eq!(prior.to_strings(), ["2023-12-25", "2023-12-31"]);
}

#[test]
fn test_unresolvable_range_means_unavailable() {
    let filters = vec![Filter::in_date_range(
        "Orders.createdAt",
        DateRange::preset("sometime"),
    )];
    assert!(build_compare_date_range_at("Orders.createdAt", &filters, day(2024, 5, 20)).is_none());
}

#[test]
fn test_single_day_range() {
    let filters = vec![Filter::in_date_range(
        "Orders.createdAt",
        DateRange::preset("2024-04-15"),
    )];
    let [current, prior] =
        build_compare_date_range_at("Orders.createdAt", &filters, day(2024, 5, 20)).unwrap();
    assert_eq!(current.to_strings(), ["2024-04-15", "2024-04-15"]);
    assert_eq!(prior.to_strings(), ["2024-04-14", "2024-04-14"]);
}
