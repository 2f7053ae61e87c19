//! Funnel query building
//!
//! A funnel is an ordered list of steps bound by a shared key dimension.
//! The builder gates on completeness: a funnel with fewer than two usable
//! steps, or without a binding key or time dimension, is "not yet
//! executable" and builds to `None`.

use serde::{Deserialize, Serialize};

use crate::daterange::DateRange;
use crate::filter::Filter;
use crate::request::{FunnelBody, FunnelRequest, FunnelStepRequest};

/// One configured funnel step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStep {
    pub id: String,
    /// Display name; empty until the user names the step
    pub name: String,
    /// Source cube for this step; empty until an event is chosen
    pub cube: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    /// ISO-8601 duration bounding conversion into the next step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_convert: Option<String>,
}

impl FunnelStep {
    /// Create a step for a cube
    pub fn new(name: impl Into<String>, cube: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            cube: cube.into(),
            filters: Vec::new(),
            time_to_convert: None,
        }
    }

    /// Create an empty placeholder step (shown in the UI, skipped by the builder)
    pub fn empty() -> Self {
        Self::new("", "")
    }

    /// Set the conversion window
    pub fn with_time_to_convert(mut self, duration: impl Into<String>) -> Self {
        self.time_to_convert = Some(duration.into());
        self
    }

    /// A step is usable once it has both a cube and a name
    pub fn is_usable(&self) -> bool {
        !self.cube.is_empty() && !self.name.is_empty()
    }
}

/// Build a funnel request
///
/// Requires a binding key, a time dimension, and at least two usable steps;
/// otherwise returns `None`. Step filters and conversion windows pass through
/// unchanged. The output always requests time metrics.
pub fn build_funnel_query(
    binding_key: Option<&str>,
    time_dimension: Option<&str>,
    date_range: Option<&DateRange>,
    steps: &[FunnelStep],
) -> Option<FunnelRequest> {
    let binding_key = binding_key.filter(|s| !s.is_empty())?;
    let time_dimension = time_dimension.filter(|s| !s.is_empty())?;

    let usable: Vec<&FunnelStep> = steps.iter().filter(|s| s.is_usable()).collect();
    if usable.len() < 2 {
        return None;
    }

    Some(FunnelRequest {
        funnel: FunnelBody {
            binding_key: binding_key.to_string(),
            time_dimension: time_dimension.to_string(),
            date_range: date_range.cloned(),
            steps: usable
                .into_iter()
                .map(|s| FunnelStepRequest {
                    name: s.name.clone(),
                    cube: s.cube.clone(),
                    filters: s.filters.clone(),
                    time_to_convert: s.time_to_convert.clone(),
                })
                .collect(),
            include_time_metrics: true,
        },
    })
}
