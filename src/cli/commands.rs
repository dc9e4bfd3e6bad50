use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analyzers::CatalogAnalyzer;
use crate::cli::args::{Cli, Commands, FilterCriteria};
use crate::error::{ProcessingError, Result};
use crate::filters::{FilterEngine, NegatedFilter, ResultLimit};
use crate::models::{FloatCatalog, GroupedResult};
use crate::pipeline::{FilterRequest, PlanExecutor};
use crate::processors::ResultNormalizer;
use crate::readers::{read_results, CatalogReader};
use crate::settings::Settings;
use crate::utils::coordinates::{named_region, validate_coordinates, BoundingBox};
use crate::utils::filename::generate_default_results_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::JsonWriter;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Filter { catalog, k, criteria } => {
            let catalog = load_catalog(&settings, catalog.as_deref())?;
            let limit = ResultLimit::parse_lenient(&k);
            let requests = criteria_requests(&criteria)?;

            let engine = FilterEngine::new(&catalog).with_zero_policy(settings.catalog.zero_policy);
            let executor = PlanExecutor::new(engine);
            let ids = if requests.is_empty() {
                executor.engine().all_float_ids()
            } else {
                executor.execute_requests(&requests)?
            };
            let ids = limit.apply(ids);

            println!("Found {} floats (k={})", ids.len(), limit);
            println!("{}", JsonWriter::new().to_string(&ids)?);
        }

        Commands::Plan {
            input,
            catalog,
            label,
        } => {
            let catalog = load_catalog(&settings, catalog.as_deref())?;
            let plan = fs::read_to_string(&input)?;

            let progress = ProgressReporter::new_spinner("Executing plan...", false);
            let engine = FilterEngine::new(&catalog).with_zero_policy(settings.catalog.zero_policy);
            let ids = PlanExecutor::new(engine).execute_plan(&plan)?;
            progress.finish_with_message(&format!("Selected {} floats", ids.len()));

            let mut grouped = GroupedResult::new();
            grouped.insert(label, ids);
            println!("{}", JsonWriter::new().to_string(&grouped)?);
        }

        Commands::Normalize {
            input,
            output,
            compact,
        } => {
            let output = output.unwrap_or_else(generate_default_results_filename);
            println!("Normalizing results...");
            println!("Input file: {}", input.display());
            println!("Output file: {}", output.display());

            let tree = read_results(&input)?;
            let progress = ProgressReporter::new(tree.len() as u64, "Sorting cycles...", false);
            let (normalized, report) = ResultNormalizer::new().normalize(&tree, Some(&progress));
            progress.finish_with_message(&format!("Normalized {} floats", report.floats));

            JsonWriter::new().with_pretty(!compact).write(&normalized, &output)?;
            println!("\n{}", report);
            println!("Normalization complete!");
        }

        Commands::Info { catalog, float } => {
            let catalog = load_catalog(&settings, catalog.as_deref())?;
            let stats = CatalogAnalyzer::new().analyze(&catalog)?;
            println!("\n{}", stats.detailed_summary());

            if let Some(float_id) = float {
                let record = catalog.require(&float_id)?;
                println!("\nFloat {}:", float_id);
                println!("{}", JsonWriter::new().to_string(record)?);
            }
        }
    }

    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins unless `--verbose` is set.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("argo_query=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let result = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
        None => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| ProcessingError::Config(format!("Failed to initialise logging: {}", e)))
}

fn load_catalog(settings: &Settings, path: Option<&Path>) -> Result<FloatCatalog> {
    let path: PathBuf = path.map(Path::to_path_buf).unwrap_or_else(|| settings.catalog.path.clone());
    let catalog = CatalogReader::with_skip_invalid(settings.catalog.skip_invalid).read_catalog(&path)?;
    println!("Loaded {} floats from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Translate command-line criteria into filter requests. Ranked criteria
/// come first so their order survives the intersection.
fn criteria_requests(criteria: &FilterCriteria) -> Result<Vec<FilterRequest>> {
    let all = ResultLimit::All;
    let mut requests = Vec::new();

    if let Some(extreme) = &criteria.extreme {
        requests.push(FilterRequest::ExtremeValues {
            parameter: required_parameter(criteria)?,
            extreme_type: extreme.clone(),
            k: all,
        });
    }

    if let Some(near) = &criteria.near {
        let [latitude, longitude] = near.as_slice() else {
            return Err(ProcessingError::InvalidParameter(format!(
                "--near needs LAT,LON, got {} value(s)",
                near.len()
            )));
        };
        validate_coordinates(*latitude, *longitude)?;
        requests.push(FilterRequest::NearestFloats {
            latitude: *latitude,
            longitude: *longitude,
            k: all,
        });
    }

    if let Some(float_id) = &criteria.id {
        requests.push(FilterRequest::FloatById {
            float_id: float_id.clone(),
        });
    }

    if let (Some(operator), Some(value)) = (&criteria.operator, criteria.value) {
        requests.push(FilterRequest::ParameterValue {
            parameter: required_parameter(criteria)?,
            operator: operator.clone(),
            value,
            k: all,
        });
    }

    let mut negatable = Vec::new();
    if let Some(bbox) = region_bbox(criteria)? {
        negatable.push(NegatedFilter::coordinates(bbox));
    }
    if let (Some(start), Some(end)) = (&criteria.start, &criteria.end) {
        negatable.push(NegatedFilter::date_range(start.as_str(), end.as_str()));
    }
    if let Some(platform) = &criteria.platform {
        negatable.push(NegatedFilter::platform_type(platform.as_str()));
    }

    if criteria.negate {
        if negatable.len() != 1 {
            return Err(ProcessingError::InvalidParameter(
                "--negate needs exactly one region, date range or platform criterion".to_string(),
            ));
        }
        for filter in negatable {
            requests.push(FilterRequest::Negation { filter, k: all });
        }
    } else {
        requests.extend(negatable.into_iter().map(|filter| direct_request(filter, all)));
    }

    Ok(requests)
}

fn direct_request(filter: NegatedFilter, k: ResultLimit) -> FilterRequest {
    match filter {
        NegatedFilter::Coordinates { bbox, .. } => FilterRequest::Coordinates { bbox, k },
        NegatedFilter::DateRange {
            start_date, end_date, ..
        } => FilterRequest::DateRange {
            start_date,
            end_date,
            k,
        },
        NegatedFilter::PlatformType { platform_type, .. } => FilterRequest::PlatformType { platform_type, k },
    }
}

fn required_parameter(criteria: &FilterCriteria) -> Result<String> {
    criteria
        .parameter
        .clone()
        .ok_or_else(|| ProcessingError::InvalidParameter("--parameter is required".to_string()))
}

fn region_bbox(criteria: &FilterCriteria) -> Result<Option<BoundingBox>> {
    if let Some(name) = &criteria.region {
        return named_region(name)
            .map(Some)
            .ok_or_else(|| ProcessingError::InvalidParameter(format!("Unknown region '{}'", name)));
    }

    match criteria.bbox.as_deref() {
        None => Ok(None),
        Some(&[lat_min, lat_max, lon_min, lon_max]) => Ok(Some(BoundingBox::new(lat_min, lat_max, lon_min, lon_max))),
        Some(values) => Err(ProcessingError::InvalidParameter(format!(
            "--bbox needs LAT_MIN,LAT_MAX,LON_MIN,LON_MAX, got {} value(s)",
            values.len()
        ))),
    }
}
