//! Filter trees
//!
//! A filter is either a simple condition on one member or an and/or group of
//! nested filters, recursively. Conditions with the `inDateRange` operator
//! carry a [`DateRange`] and are the source of truth for period comparison.

use serde::{Deserialize, Serialize};

use crate::daterange::DateRange;
use crate::error::{QueryError, Result};

/// A filter: simple condition or boolean group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Filter {
    Group(FilterGroup),
    Condition(Condition),
}

impl Filter {
    /// Create an equality condition
    pub fn equals(member: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Condition(Condition {
            member: member.into(),
            operator: FilterOperator::Equals,
            values: vec![value.into()],
            date_range: None,
        })
    }

    /// Create a contains condition
    pub fn contains(member: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Condition(Condition {
            member: member.into(),
            operator: FilterOperator::Contains,
            values: vec![value.into()],
            date_range: None,
        })
    }

    /// Create a set condition (member has a value)
    pub fn set(member: impl Into<String>) -> Self {
        Self::Condition(Condition {
            member: member.into(),
            operator: FilterOperator::Set,
            values: Vec::new(),
            date_range: None,
        })
    }

    /// Create a date-range condition
    pub fn in_date_range(member: impl Into<String>, range: DateRange) -> Self {
        Self::Condition(Condition {
            member: member.into(),
            operator: FilterOperator::InDateRange,
            values: Vec::new(),
            date_range: Some(range),
        })
    }

    /// Create an AND group
    pub fn and(filters: Vec<Filter>) -> Self {
        Self::Group(FilterGroup {
            op: GroupOp::And,
            filters,
        })
    }

    /// Create an OR group
    pub fn or(filters: Vec<Filter>) -> Self {
        Self::Group(FilterGroup {
            op: GroupOp::Or,
            filters,
        })
    }
}

/// A boolean group of nested filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    #[serde(rename = "type")]
    pub op: GroupOp,
    pub filters: Vec<Filter>,
}

/// Boolean connective for a filter group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupOp {
    And,
    Or,
}

/// A simple condition on one member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Fully qualified member, e.g. `Orders.status`
    pub member: String,
    pub operator: FilterOperator,
    /// Comparison values; empty for set/notSet/inDateRange
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// Only present when `operator` is `inDateRange`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

/// Condition operators (camelCase on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Gt,
    Gte,
    Lt,
    Lte,
    Set,
    NotSet,
    InDateRange,
}

impl FilterOperator {
    /// Parse operator from string
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "equals" | "eq" | "=" => Ok(Self::Equals),
            "notEquals" | "ne" | "!=" => Ok(Self::NotEquals),
            "contains" => Ok(Self::Contains),
            "notContains" => Ok(Self::NotContains),
            "startsWith" => Ok(Self::StartsWith),
            "endsWith" => Ok(Self::EndsWith),
            "gt" | ">" => Ok(Self::Gt),
            "gte" | ">=" => Ok(Self::Gte),
            "lt" | "<" => Ok(Self::Lt),
            "lte" | "<=" => Ok(Self::Lte),
            "set" => Ok(Self::Set),
            "notSet" => Ok(Self::NotSet),
            "inDateRange" => Ok(Self::InDateRange),
            _ => Err(QueryError::InvalidOperator(s.to_string())),
        }
    }
}

/// Depth-first search for the first `inDateRange` condition on `member`,
/// descending into and/or groups. First match wins.
pub fn find_date_condition<'a>(member: &str, filters: &'a [Filter]) -> Option<&'a Condition> {
    for filter in filters {
        match filter {
            Filter::Condition(c)
                if c.member == member
                    && c.operator == FilterOperator::InDateRange
                    && c.date_range.is_some() =>
            {
                return Some(c);
            }
            Filter::Group(group) => {
                if let Some(found) = find_date_condition(member, &group.filters) {
                    return Some(found);
                }
            }
            Filter::Condition(_) => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_serialization() {
        let f = Filter::or(vec![
            Filter::equals("Orders.status", "shipped"),
            Filter::equals("Orders.status", "delivered"),
        ]);
        let json = serde_json::to_string(&f).unwrap();
        assert!(json.contains("\"type\":\"or\""));
        assert!(json.contains("\"operator\":\"equals\""));
    }

    #[test]
    fn test_filter_round_trip() {
        let f = Filter::and(vec![
            Filter::contains("Users.email", "@example.com"),
            Filter::in_date_range("Orders.createdAt", DateRange::preset("30d")),
        ]);
        let json = serde_json::to_string(&f).unwrap();
        let back: Filter = serde_json::from_str(&json).unwrap();
        assert_eq!(f, back);
    }

    #[test]
    fn test_find_date_condition_nested() {
        let filters = vec![
            Filter::equals("Orders.status", "shipped"),
            Filter::and(vec![Filter::in_date_range(
                "Orders.createdAt",
                DateRange::preset("7d"),
            )]),
        ];
        let found = find_date_condition("Orders.createdAt", &filters).unwrap();
        assert_eq!(found.member, "Orders.createdAt");
        assert!(find_date_condition("Orders.updatedAt", &filters).is_none());
    }

    #[test]
    fn test_find_date_condition_first_match_wins() {
        let filters = vec![
            Filter::and(vec![Filter::in_date_range(
                "Orders.createdAt",
                DateRange::preset("7d"),
            )]),
            Filter::in_date_range("Orders.createdAt", DateRange::preset("30d")),
        ];
        let found = find_date_condition("Orders.createdAt", &filters).unwrap();
        assert_eq!(found.date_range, Some(DateRange::preset("7d")));
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!(
            FilterOperator::parse("inDateRange").unwrap(),
            FilterOperator::InDateRange
        );
        assert_eq!(FilterOperator::parse("=").unwrap(), FilterOperator::Equals);
        assert!(FilterOperator::parse("between").is_err());
    }
}
