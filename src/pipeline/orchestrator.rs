use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::filters::FilterEngine;
use crate::models::{CatalogHandle, FloatCatalog, GroupedResult, ResultTree};
use crate::pipeline::collaborators::{Collaborators, OutputMode, QueryCategory, SubQuery};
use crate::pipeline::executor::PlanExecutor;
use crate::processors::{group_rows, NormalizationReport, ResultNormalizer};
use crate::readers::CatalogReader;
use crate::settings::Settings;
use crate::writers::JsonWriter;

/// What a query produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryOutcome {
    /// Answered without consulting the catalog.
    Answer { response: String },
    /// Float IDs per sub-query label.
    FloatIds { response: String, grouped: GroupedResult },
    /// Profile data grouped by label, float and cycle.
    Data {
        response: String,
        grouped: GroupedResult,
        results: ResultTree,
        #[serde(skip)]
        report: NormalizationReport,
    },
}

impl QueryOutcome {
    pub fn response(&self) -> &str {
        match self {
            QueryOutcome::Answer { response }
            | QueryOutcome::FloatIds { response, .. }
            | QueryOutcome::Data { response, .. } => response,
        }
    }
}

/// End-to-end query flow: classify, decompose, filter each sub-query,
/// then either return IDs or fetch, group and normalize profile data.
pub struct QueryPipeline {
    catalog: CatalogHandle,
    collaborators: Collaborators,
    settings: Settings,
}

impl QueryPipeline {
    pub fn new(catalog: CatalogHandle, collaborators: Collaborators, settings: Settings) -> Self {
        Self {
            catalog,
            collaborators,
            settings,
        }
    }

    pub fn catalog(&self) -> &CatalogHandle {
        &self.catalog
    }

    /// Re-read the catalog file and swap it in. Queries already running keep
    /// the snapshot they started with.
    pub fn reload(&self, path: &Path) -> Result<usize> {
        let catalog = CatalogReader::with_skip_invalid(self.settings.catalog.skip_invalid).read_catalog(path)?;
        Ok(self.catalog.replace(catalog))
    }

    #[instrument(skip(self))]
    pub fn run(&self, query: &str) -> Result<QueryOutcome> {
        let classification = self.collaborators.classifier.classify(query)?;
        if classification.category != QueryCategory::Data {
            info!("Query classified as {:?}, answering directly", classification.category);
            return Ok(QueryOutcome::Answer {
                response: classification.response,
            });
        }

        let decomposition = self.collaborators.decomposer.decompose(query)?;
        info!("Filter instruction: {}", decomposition.filter_instruction);
        info!("Fetch instruction: {}", decomposition.fetch_instruction);

        let sub_queries = self.collaborators.decomposer.split(&decomposition.filter_instruction)?;
        let snapshot = self.catalog.snapshot();
        let grouped = self.filter_sub_queries(&snapshot, &sub_queries)?;

        let decision = self.collaborators.decider.decide(query, &grouped)?;
        if decision.mode == OutputMode::IdsOnly {
            return Ok(QueryOutcome::FloatIds {
                response: decision.response,
                grouped,
            });
        }

        let rows = self
            .collaborators
            .fetcher
            .fetch(&decomposition.fetch_instruction, &grouped)?;
        info!("Fetched {} profile rows", rows.len());

        let tree = group_rows(&rows, &grouped);
        let (results, report) = ResultNormalizer::new().normalize(&tree, None);
        info!("{}", report);

        if self.settings.output.persist {
            JsonWriter::new()
                .with_pretty(self.settings.output.pretty)
                .write(&results, &self.settings.output.results_path)?;
        }

        Ok(QueryOutcome::Data {
            response: decision.response,
            grouped,
            results,
            report,
        })
    }

    /// Plan and execute each sub-query against one catalog snapshot. A
    /// sub-query whose plan fails contributes an empty group.
    fn filter_sub_queries(&self, catalog: &FloatCatalog, sub_queries: &[SubQuery]) -> Result<GroupedResult> {
        let engine = FilterEngine::new(catalog).with_zero_policy(self.settings.catalog.zero_policy);
        let executor = PlanExecutor::new(engine);
        let mut grouped = GroupedResult::with_capacity(sub_queries.len());

        for sub_query in sub_queries {
            info!("Executing sub-query '{}': {}", sub_query.label, sub_query.query);
            let plan = self.collaborators.planner.plan(sub_query)?;
            let ids = match executor.execute_plan(&plan) {
                Ok(ids) => ids,
                Err(e) => {
                    warn!("Sub-query '{}' failed: {}", sub_query.label, e);
                    Vec::new()
                }
            };
            info!("Finished sub-query '{}', found {} floats", sub_query.label, ids.len());
            grouped.insert(sub_query.label.clone(), ids);
        }

        Ok(grouped)
    }
}
