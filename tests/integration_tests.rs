use anyhow::bail;
use argo_query::models::{CatalogHandle, FloatCatalog, GroupedResult, ProfileRow};
use argo_query::pipeline::{
    Classification, Collaborators, Decomposition, FilterPlanner, OutputDecider, OutputDecision, OutputMode,
    ProfileFetcher, QueryCategory, QueryClassifier, QueryDecomposer, QueryOutcome, QueryPipeline, SubQuery,
};
use argo_query::readers::CatalogReader;
use argo_query::settings::Settings;
use argo_query::ProcessingError;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

const CATALOG_JSON: &str = r#"{
    "2902746": {
        "launch_info": {"date": "b'20190515093000'", "latitude": 15.2, "longitude": 88.1, "platform_type": "APEX"},
        "temp_max": 30.1, "temp_min": 21.0, "psal_max": 35.2
    },
    "2902115": {
        "launch_info": {"date": "20120301000000", "latitude": 18.0, "longitude": 65.0, "platform_type": "ARVOR"},
        "temp_max": 31.5, "temp_min": 0.0
    },
    "2902747": {
        "launch_info": {"date": "20210710120000", "latitude": 12.0, "longitude": 85.0, "platform_type": "APEX"},
        "temp_max": 29.0, "temp_min": 19.5
    },
    "1901234": {
        "launch_info": {"date": "20150101000000", "latitude": -35.0, "longitude": 20.0, "platform_type": "PROVOR"},
        "temp_max": 18.0, "temp_min": 4.2
    }
}"#;

struct CannedClassifier {
    category: QueryCategory,
}

impl QueryClassifier for CannedClassifier {
    fn classify(&self, _query: &str) -> anyhow::Result<Classification> {
        Ok(Classification {
            category: self.category,
            response: "Argo floats are autonomous profiling instruments.".to_string(),
        })
    }
}

struct FailingClassifier;

impl QueryClassifier for FailingClassifier {
    fn classify(&self, _query: &str) -> anyhow::Result<Classification> {
        bail!("model unavailable")
    }
}

struct CannedDecomposer {
    sub_queries: Vec<SubQuery>,
}

impl QueryDecomposer for CannedDecomposer {
    fn decompose(&self, query: &str) -> anyhow::Result<Decomposition> {
        Ok(Decomposition {
            filter_instruction: query.to_string(),
            fetch_instruction: "temperature profiles".to_string(),
        })
    }

    fn split(&self, _filter_instruction: &str) -> anyhow::Result<Vec<SubQuery>> {
        Ok(self.sub_queries.clone())
    }
}

struct CannedPlanner {
    plans: HashMap<String, String>,
}

impl FilterPlanner for CannedPlanner {
    fn plan(&self, sub_query: &SubQuery) -> anyhow::Result<String> {
        match self.plans.get(&sub_query.label) {
            Some(plan) => Ok(plan.clone()),
            None => bail!("no plan for {}", sub_query.label),
        }
    }
}

struct CannedDecider {
    mode: OutputMode,
}

impl OutputDecider for CannedDecider {
    fn decide(&self, _query: &str, grouped: &GroupedResult) -> anyhow::Result<OutputDecision> {
        Ok(OutputDecision {
            mode: self.mode,
            response: format!("Found floats in {} group(s)", grouped.len()),
        })
    }
}

struct CannedFetcher {
    rows: Vec<ProfileRow>,
}

impl ProfileFetcher for CannedFetcher {
    fn fetch(&self, _instruction: &str, _grouped: &GroupedResult) -> anyhow::Result<Vec<ProfileRow>> {
        Ok(self.rows.clone())
    }
}

fn load_catalog() -> FloatCatalog {
    CatalogReader::new().parse_catalog(CATALOG_JSON).unwrap()
}

fn comparison_collaborators(mode: OutputMode, rows: Vec<ProfileRow>) -> Collaborators {
    let plans = HashMap::from([
        (
            "bay_of_bengal".to_string(),
            "Thought: Bay of Bengal bounds.\nTOOL_CALLS:\nfilter_by_coordinates: lat_min=5, lat_max=22, lon_min=80, lon_max=95, k=1"
                .to_string(),
        ),
        (
            "arabian_sea".to_string(),
            "TOOL_CALLS:\nfilter_by_coordinates: lat_min=8, lat_max=25, lon_min=50, lon_max=75, k=1".to_string(),
        ),
    ]);

    Collaborators {
        classifier: Box::new(CannedClassifier {
            category: QueryCategory::Data,
        }),
        decomposer: Box::new(CannedDecomposer {
            sub_queries: vec![
                SubQuery::new("bay_of_bengal", "Find one float in the Bay of Bengal"),
                SubQuery::new("arabian_sea", "Find one float in the Arabian Sea"),
            ],
        }),
        planner: Box::new(CannedPlanner { plans }),
        decider: Box::new(CannedDecider { mode }),
        fetcher: Box::new(CannedFetcher { rows }),
    }
}

fn settings_in(dir: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.output.results_path = dir.join("output").join("results.json");
    settings
}

#[test]
fn test_catalog_file_keeps_order() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(CATALOG_JSON.as_bytes()).unwrap();

    let catalog = CatalogReader::new().read_catalog(file.path()).unwrap();

    assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["2902746", "2902115", "2902747", "1901234"]);
    assert_eq!(catalog.get("2902115").unwrap().float_id, "2902115");
}

#[test]
fn test_irrelevant_query_is_answered_directly() {
    let temp_dir = TempDir::new().unwrap();
    let mut collaborators = comparison_collaborators(OutputMode::IdsOnly, Vec::new());
    collaborators.classifier = Box::new(CannedClassifier {
        category: QueryCategory::Simple,
    });

    let pipeline = QueryPipeline::new(CatalogHandle::new(load_catalog()), collaborators, settings_in(temp_dir.path()));
    let outcome = pipeline.run("What is an Argo float?").unwrap();

    assert!(matches!(outcome, QueryOutcome::Answer { .. }));
    assert_eq!(outcome.response(), "Argo floats are autonomous profiling instruments.");
}

#[test]
fn test_ids_only_query() {
    let temp_dir = TempDir::new().unwrap();
    let settings = settings_in(temp_dir.path());
    let results_path = settings.output.results_path.clone();
    let pipeline = QueryPipeline::new(
        CatalogHandle::new(load_catalog()),
        comparison_collaborators(OutputMode::IdsOnly, Vec::new()),
        settings,
    );

    let outcome = pipeline
        .run("List any one float from the Arabian Sea, and one from the Bay of Bengal")
        .unwrap();

    let QueryOutcome::FloatIds { grouped, response } = outcome else {
        panic!("expected float IDs");
    };
    assert_eq!(response, "Found floats in 2 group(s)");
    assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["bay_of_bengal", "arabian_sea"]);
    assert_eq!(grouped.get("bay_of_bengal").unwrap(), &vec!["2902746".to_string()]);
    assert_eq!(grouped.get("arabian_sea").unwrap(), &vec!["2902115".to_string()]);
    assert!(!results_path.exists());
}

#[test]
fn test_full_data_query_writes_sorted_results() {
    let temp_dir = TempDir::new().unwrap();
    let settings = settings_in(temp_dir.path());
    let results_path = settings.output.results_path.clone();

    let rows = vec![
        ProfileRow::new("2902746", 12)
            .with_position("2020-01-01 00:00:00", 15.0, 88.0)
            .with_column("temperature", vec![28.5, f64::NAN]),
        ProfileRow::new("2902746", 3).with_position("2019-06-01 00:00:00", 15.1, 88.2),
        ProfileRow::new("2902115", 10).with_position("2012-05-01 00:00:00", 18.0, 65.0),
        ProfileRow::new("2902115", 2).with_position("2012-03-05 00:00:00", 18.1, 65.1),
        ProfileRow::new("5555555", 1),
    ];

    let pipeline = QueryPipeline::new(
        CatalogHandle::new(load_catalog()),
        comparison_collaborators(OutputMode::FullData, rows),
        settings,
    );
    let outcome = pipeline
        .run("compare temperature of any one float in bay of bengal and one float in arabian sea")
        .unwrap();

    let QueryOutcome::Data { results, report, .. } = outcome else {
        panic!("expected profile data");
    };
    assert_eq!(report.floats, 2);
    assert_eq!(report.cycles, 4);
    assert!(report.lexical_fallbacks.is_empty());

    let bob = results.get("bay_of_bengal").unwrap().get("2902746").unwrap();
    assert_eq!(bob.keys().collect::<Vec<_>>(), vec!["3", "12"]);

    let written: Value = serde_json::from_str(&fs::read_to_string(&results_path).unwrap()).unwrap();
    assert_eq!(written["bay_of_bengal"]["2902746"]["12"]["temperature"], json!([28.5, null]));
    assert_eq!(written["arabian_sea"]["2902115"]["2"]["juld"], json!("2012-03-05 00:00:00"));

    let text = fs::read_to_string(&results_path).unwrap();
    assert!(text.find("\"2\"").unwrap() < text.find("\"10\"").unwrap());
}

#[test]
fn test_multi_call_plan_is_intersected() {
    let temp_dir = TempDir::new().unwrap();
    let mut collaborators = comparison_collaborators(OutputMode::IdsOnly, Vec::new());
    collaborators.decomposer = Box::new(CannedDecomposer {
        sub_queries: vec![SubQuery::new(
            "bay_of_bengal_high_min_temp",
            "Get floats in Bay of Bengal that have minimum temperature above 20.",
        )],
    });
    collaborators.planner = Box::new(CannedPlanner {
        plans: HashMap::from([(
            "bay_of_bengal_high_min_temp".to_string(),
            "TOOL_CALLS:\n\
             filter_by_coordinates: lat_min=5, lat_max=22, lon_min=80, lon_max=95, k=all\n\
             filter_by_parameter_value: parameter='temp_min', operator='>', value=20, k=all\n\
             combine_filters: float_lists=[]"
                .to_string(),
        )]),
    });

    let pipeline = QueryPipeline::new(CatalogHandle::new(load_catalog()), collaborators, settings_in(temp_dir.path()));
    let QueryOutcome::FloatIds { grouped, .. } = pipeline.run("high min temp in the bay").unwrap() else {
        panic!("expected float IDs");
    };

    assert_eq!(
        grouped.get("bay_of_bengal_high_min_temp").unwrap(),
        &vec!["2902746".to_string()]
    );
}

#[test]
fn test_failing_sub_query_yields_empty_group() {
    let temp_dir = TempDir::new().unwrap();
    let mut collaborators = comparison_collaborators(OutputMode::IdsOnly, Vec::new());
    collaborators.decomposer = Box::new(CannedDecomposer {
        sub_queries: vec![SubQuery::new("odd", "floats that are not salty")],
    });
    collaborators.planner = Box::new(CannedPlanner {
        plans: HashMap::from([(
            "odd".to_string(),
            "TOOL_CALLS:\nfilter_by_negation: filter_type='salinity', value=35".to_string(),
        )]),
    });

    let pipeline = QueryPipeline::new(CatalogHandle::new(load_catalog()), collaborators, settings_in(temp_dir.path()));
    let QueryOutcome::FloatIds { grouped, .. } = pipeline.run("floats that are not salty").unwrap() else {
        panic!("expected float IDs");
    };

    assert!(grouped.get("odd").unwrap().is_empty());
}

#[test]
fn test_collaborator_failure_propagates() {
    let temp_dir = TempDir::new().unwrap();
    let mut collaborators = comparison_collaborators(OutputMode::IdsOnly, Vec::new());
    collaborators.classifier = Box::new(FailingClassifier);

    let pipeline = QueryPipeline::new(CatalogHandle::new(load_catalog()), collaborators, settings_in(temp_dir.path()));
    let err = pipeline.run("anything").unwrap_err();

    assert!(matches!(err, ProcessingError::Collaborator(_)));
    assert!(err.to_string().contains("model unavailable"));
}

#[test]
fn test_reload_swaps_catalog_for_new_queries() {
    let temp_dir = TempDir::new().unwrap();
    let catalog_path = temp_dir.path().join("meta_data.json");
    fs::write(
        &catalog_path,
        r#"{"3900001": {"launch_info": {"latitude": 10.0, "longitude": 85.0, "platform_type": "NAVIS"}}}"#,
    )
    .unwrap();

    let pipeline = QueryPipeline::new(
        CatalogHandle::new(load_catalog()),
        comparison_collaborators(OutputMode::IdsOnly, Vec::new()),
        settings_in(temp_dir.path()),
    );
    let before = pipeline.catalog().snapshot();

    assert_eq!(pipeline.reload(&catalog_path).unwrap(), 1);

    assert_eq!(before.len(), 4);
    let QueryOutcome::FloatIds { grouped, .. } = pipeline.run("one float per basin").unwrap() else {
        panic!("expected float IDs");
    };
    assert_eq!(grouped.get("bay_of_bengal").unwrap(), &vec!["3900001".to_string()]);
    assert!(grouped.get("arabian_sea").unwrap().is_empty());
}

#[test]
fn test_invalid_catalog_coordinates_are_rejected() {
    let err = CatalogReader::new()
        .parse_catalog(r#"{"42": {"launch_info": {"latitude": 123.0, "longitude": 10.0}}}"#)
        .unwrap_err();

    match err {
        ProcessingError::Validation { float_id, .. } => assert_eq!(float_id, "42"),
        other => panic!("unexpected error: {other}"),
    }
}
