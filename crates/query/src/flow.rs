//! Flow query building
//!
//! A flow explores event paths out of a starting step within one cube.

use serde::{Deserialize, Serialize};

use crate::daterange::DateRange;
use crate::filter::Filter;
use crate::request::{FlowBody, FlowRequest, FlowStepRequest};

/// A named step definition (the flow's starting point)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
}

impl StepDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// Build a flow request
///
/// Requires a cube, a binding key, a time dimension, and a starting step;
/// otherwise returns `None`.
pub fn build_flow_query(
    cube: Option<&str>,
    binding_key: Option<&str>,
    time_dimension: Option<&str>,
    date_range: Option<&DateRange>,
    starting_step: Option<&StepDefinition>,
    filters: &[Filter],
    breakdowns: &[String],
) -> Option<FlowRequest> {
    let cube = cube.filter(|s| !s.is_empty())?;
    let binding_key = binding_key.filter(|s| !s.is_empty())?;
    let time_dimension = time_dimension.filter(|s| !s.is_empty())?;
    let starting_step = starting_step.filter(|s| !s.name.is_empty())?;

    Some(FlowRequest {
        flow: FlowBody {
            cube: cube.to_string(),
            binding_key: binding_key.to_string(),
            time_dimension: time_dimension.to_string(),
            date_range: date_range.cloned(),
            starting_step: FlowStepRequest {
                name: starting_step.name.clone(),
                filters: starting_step.filters.clone(),
            },
            filters: filters.to_vec(),
            breakdowns: breakdowns.to_vec(),
        },
    })
}
