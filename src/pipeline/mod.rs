pub mod collaborators;
pub mod executor;
pub mod orchestrator;
pub mod tool_calls;

pub use collaborators::{
    Classification, Collaborators, Decomposition, FilterPlanner, OutputDecider, OutputDecision, OutputMode,
    ProfileFetcher, QueryCategory, QueryClassifier, QueryDecomposer, SubQuery,
};
pub use executor::PlanExecutor;
pub use orchestrator::{QueryOutcome, QueryPipeline};
pub use tool_calls::{parse_tool_calls, ArgValue, FilterRequest, ToolArgs, ToolCall, ToolName};
