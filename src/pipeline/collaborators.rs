//! Seams to the language-model side of the system.
//!
//! Every routing decision the pipeline cannot make deterministically goes
//! through one of these traits. Implementations report failures as
//! `anyhow::Error`; the pipeline wraps them in `ProcessingError::Collaborator`.

use serde::{Deserialize, Serialize};

use crate::models::{GroupedResult, ProfileRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryCategory {
    /// Nothing to do with Argo data.
    Irrelevant,
    /// Answerable without touching the catalog.
    Simple,
    /// Needs filtering and possibly profile data.
    Data,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: QueryCategory,
    /// Reply to use directly when no data is needed.
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    /// Which floats to select.
    pub filter_instruction: String,
    /// What to fetch for them.
    pub fetch_instruction: String,
}

/// One independently filtered part of a query, e.g. one region of a
/// comparison question. `label` becomes the group name in results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubQuery {
    pub label: String,
    pub query: String,
}

impl SubQuery {
    pub fn new(label: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            query: query.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    IdsOnly,
    FullData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDecision {
    pub mode: OutputMode,
    pub response: String,
}

pub trait QueryClassifier: Send + Sync {
    fn classify(&self, query: &str) -> anyhow::Result<Classification>;
}

pub trait QueryDecomposer: Send + Sync {
    fn decompose(&self, query: &str) -> anyhow::Result<Decomposition>;

    /// Split the filter instruction into labelled sub-queries.
    fn split(&self, filter_instruction: &str) -> anyhow::Result<Vec<SubQuery>>;
}

pub trait FilterPlanner: Send + Sync {
    /// Produce a `TOOL_CALLS:` block for one sub-query.
    fn plan(&self, sub_query: &SubQuery) -> anyhow::Result<String>;
}

pub trait OutputDecider: Send + Sync {
    fn decide(&self, query: &str, grouped: &GroupedResult) -> anyhow::Result<OutputDecision>;
}

pub trait ProfileFetcher: Send + Sync {
    fn fetch(&self, instruction: &str, grouped: &GroupedResult) -> anyhow::Result<Vec<ProfileRow>>;
}

/// The full set of collaborators a [`QueryPipeline`](super::QueryPipeline) needs.
pub struct Collaborators {
    pub classifier: Box<dyn QueryClassifier>,
    pub decomposer: Box<dyn QueryDecomposer>,
    pub planner: Box<dyn FilterPlanner>,
    pub decider: Box<dyn OutputDecider>,
    pub fetcher: Box<dyn ProfileFetcher>,
}
