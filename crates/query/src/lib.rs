//! Glance query model and builders
//!
//! The lowest layer of the Glance analytics engine: the flat selection model
//! (metrics, breakdowns, filters) and the pure functions that turn a
//! selection into the canonical request a query backend executes.
//!
//! # Overview
//!
//! - **Selections**: metrics with spreadsheet-style labels, breakdowns with
//!   optional time granularity, recursive filter trees
//! - **Date ranges**: preset keywords (`7d`, `mtd`, `ytd`, ...), explicit
//!   dates, and comparison-period arithmetic
//! - **Builders**: `build_query`, `build_funnel_query`, `build_flow_query`,
//!   `build_retention_query` — total functions that return `None` (never an
//!   error) when a configuration is not yet executable
//!
//! # Usage
//!
//! ```ignore
//! use glance_query::{build_query, BreakdownSelection, MetricSelection};
//!
//! let metrics = vec![MetricSelection::new("Orders.count", 0)];
//! let breakdowns = vec![BreakdownSelection::time("Orders.createdAt")];
//! let request = build_query(&metrics, &breakdowns, &[], &[]);
//! ```
//!
//! Builders perform no validation: completeness rules live one layer up, in
//! `glance-modes`.

pub mod build;
pub mod compare;
pub mod daterange;
pub mod error;
pub mod filter;
pub mod flow;
pub mod funnel;
pub mod request;
pub mod retention;
pub mod selection;

#[cfg(test)]
mod build_test;
#[cfg(test)]
mod compare_test;
#[cfg(test)]
mod funnel_test;

// Re-exports for convenience
pub use build::build_query;
pub use compare::{build_compare_date_range, build_compare_date_range_at};
pub use daterange::{DateRange, DateSpan};
pub use error::{QueryError, Result};
pub use filter::{find_date_condition, Condition, Filter, FilterGroup, FilterOperator, GroupOp};
pub use flow::{build_flow_query, StepDefinition};
pub use funnel::{build_funnel_query, FunnelStep};
pub use request::{
    FlowRequest, FunnelRequest, QueryRequest, RetentionRequest, TimeDimensionRequest,
};
pub use retention::build_retention_query;
pub use selection::{
    metric_label, BreakdownSelection, Granularity, MetricSelection, SortDirection,
};
