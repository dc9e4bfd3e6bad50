use tracing::{debug, info, warn};

use crate::error::{ProcessingError, Result};
use crate::filters::{combine_filters, Comparison, ExtremeKind, FilterEngine};
use crate::pipeline::tool_calls::{parse_tool_calls, FilterRequest, ToolCall};

/// Runs filter plans against one catalog snapshot.
pub struct PlanExecutor<'a> {
    engine: FilterEngine<'a>,
}

impl<'a> PlanExecutor<'a> {
    pub fn new(engine: FilterEngine<'a>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &FilterEngine<'a> {
        &self.engine
    }

    /// Evaluate one request. `Combine` yields `None`: intersection of the
    /// plan's results happens automatically in [`PlanExecutor::execute_calls`].
    pub fn execute(&self, request: &FilterRequest) -> Result<Option<Vec<String>>> {
        let engine = &self.engine;
        let ids = match request {
            FilterRequest::Coordinates { bbox, k } => engine.filter_by_coordinates(bbox, *k),
            FilterRequest::DateRange {
                start_date,
                end_date,
                k,
            } => engine.filter_by_date_range(start_date, end_date, *k),
            FilterRequest::ParameterValue {
                parameter,
                operator,
                value,
                k,
            } => match operator.parse::<Comparison>() {
                Ok(comparison) => engine.filter_by_parameter_value(parameter, comparison, *value, *k),
                Err(e) => {
                    warn!("{}", e);
                    Vec::new()
                }
            },
            FilterRequest::ExtremeValues {
                parameter,
                extreme_type,
                k,
            } => match extreme_type.parse::<ExtremeKind>() {
                Ok(extreme) => engine.find_extreme_values(parameter, extreme, *k),
                Err(e) => {
                    warn!("{}", e);
                    Vec::new()
                }
            },
            FilterRequest::PlatformType { platform_type, k } => engine.filter_by_platform_type(platform_type, *k),
            FilterRequest::Negation { filter, k } => engine.filter_by_negation(filter, *k)?,
            FilterRequest::Combine => {
                info!("Skipping explicit call to combine_filters as it's handled automatically.");
                return Ok(None);
            }
            FilterRequest::AllFloatIds => engine.all_float_ids(),
            FilterRequest::FloatById { float_id } => engine.get_float_by_id(float_id),
            FilterRequest::NearestFloats {
                latitude,
                longitude,
                k,
            } => engine.find_nearest_floats(*latitude, *longitude, *k),
        };
        Ok(Some(ids))
    }

    /// Execute parsed calls and intersect their results.
    ///
    /// Unknown tool names are skipped; any other failing call fails the plan.
    pub fn execute_calls(&self, calls: &[ToolCall]) -> Result<Vec<String>> {
        let mut results = Vec::new();
        for call in calls {
            debug!("Executing {} with {:?}", call.name, call.args);
            let request = match FilterRequest::from_call(call) {
                Ok(request) => request,
                Err(ProcessingError::ToolCallParse(e)) => {
                    warn!("Skipping tool call: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Some(ids) = self.execute(&request)? {
                info!("Tool {} returned: {} floats", call.name, ids.len());
                results.push(ids);
            }
        }

        Ok(intersect(results))
    }

    /// Execute typed requests and intersect their results, keeping the order
    /// of the first request's result.
    pub fn execute_requests(&self, requests: &[FilterRequest]) -> Result<Vec<String>> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            if let Some(ids) = self.execute(request)? {
                results.push(ids);
            }
        }
        Ok(intersect(results))
    }

    /// Parse a planner response and execute it.
    pub fn execute_plan(&self, response: &str) -> Result<Vec<String>> {
        let calls = parse_tool_calls(response);
        debug!("Parsed {} tool calls", calls.len());
        self.execute_calls(&calls)
    }
}

fn intersect(mut results: Vec<Vec<String>>) -> Vec<String> {
    match results.len() {
        0 => Vec::new(),
        1 => results.swap_remove(0),
        n => {
            info!("Combining results from {} tool calls...", n);
            combine_filters(&results)
        }
    }
}
