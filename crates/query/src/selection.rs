//! Selection entities: metrics, breakdowns, sort order
//!
//! These are the flat pieces a user assembles in the builder UI. Each entity
//! gets a generated id so it can be addressed for removal or editing; ids are
//! unique within one mode's state, not globally.

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

/// A selected metric (a fully qualified measure name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSelection {
    pub id: String,
    /// Fully qualified measure, e.g. `Orders.count`
    pub field: String,
    /// Spreadsheet-style label (A, B, ..., Z, AA, ...) assigned at creation
    pub label: String,
}

impl MetricSelection {
    /// Create a metric selection with a label for the given insertion index
    pub fn new(field: impl Into<String>, label_index: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            field: field.into(),
            label: metric_label(label_index),
        }
    }
}

/// A selected breakdown (grouping dimension)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownSelection {
    pub id: String,
    /// Fully qualified dimension, e.g. `Orders.status`
    pub field: String,
    /// Whether this breakdown buckets by time rather than by value
    pub is_time_dimension: bool,
    /// Time bucket size; only meaningful for time dimensions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularity: Option<Granularity>,
    /// Whether period comparison is enabled for this time dimension.
    /// At most one breakdown per query state may have this set.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub enable_comparison: bool,
}

impl BreakdownSelection {
    /// Create a plain (non-time) breakdown
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            field: field.into(),
            is_time_dimension: false,
            granularity: None,
            enable_comparison: false,
        }
    }

    /// Create a time-dimension breakdown (defaults to daily granularity)
    pub fn time(field: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            field: field.into(),
            is_time_dimension: true,
            granularity: Some(Granularity::Day),
            enable_comparison: false,
        }
    }

    /// Set the granularity
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }
}

/// Time granularity for time-dimension breakdowns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Granularity {
    /// Parse granularity from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hour" | "hourly" | "1h" => Ok(Self::Hour),
            "day" | "daily" | "1d" => Ok(Self::Day),
            "week" | "weekly" | "1w" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            "quarter" | "quarterly" => Ok(Self::Quarter),
            "year" | "yearly" | "1y" => Ok(Self::Year),
            _ => Err(QueryError::InvalidGranularity(s.to_string())),
        }
    }

    /// Wire name of this granularity
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }
}

/// Sort direction for an order entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Generate a spreadsheet-style label for a zero-based insertion index
///
/// 0 -> "A", 25 -> "Z", 26 -> "AA", 27 -> "AB". Bijective base-26.
pub fn metric_label(index: u32) -> String {
    let mut n = i64::from(index) + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_label_sequence() {
        let labels: Vec<String> = (0..28).map(metric_label).collect();
        assert_eq!(labels[0], "A");
        assert_eq!(labels[1], "B");
        assert_eq!(labels[25], "Z");
        assert_eq!(labels[26], "AA");
        assert_eq!(labels[27], "AB");
    }

    #[test]
    fn test_metric_label_deep() {
        assert_eq!(metric_label(51), "AZ");
        assert_eq!(metric_label(52), "BA");
        assert_eq!(metric_label(701), "ZZ");
        assert_eq!(metric_label(702), "AAA");
    }

    #[test]
    fn test_metric_selection_label() {
        let m = MetricSelection::new("Orders.count", 2);
        assert_eq!(m.label, "C");
        assert!(!m.id.is_empty());
    }

    #[test]
    fn test_granularity_parse() {
        assert_eq!(Granularity::parse("day").unwrap(), Granularity::Day);
        assert_eq!(Granularity::parse("Monthly").unwrap(), Granularity::Month);
        assert!(Granularity::parse("fortnight").is_err());
    }

    #[test]
    fn test_breakdown_serialization_omits_defaults() {
        let b = BreakdownSelection::new("Orders.status");
        let json = serde_json::to_string(&b).unwrap();
        assert!(!json.contains("granularity"));
        assert!(!json.contains("enableComparison"));
        assert!(json.contains("\"isTimeDimension\":false"));
    }
}
