use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "argo-query")]
#[command(about = "Deterministic filtering and result normalization for Argo float metadata")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file [default: ./argo-query.{toml,json,yaml}]")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select floats from the metadata catalog
    Filter {
        #[arg(short, long, help = "Float metadata JSON file [default: catalog.path setting]")]
        catalog: Option<PathBuf>,

        #[arg(short, long, default_value = "all", help = "Maximum number of IDs (integer or 'all')")]
        k: String,

        #[command(flatten)]
        criteria: FilterCriteria,
    },

    /// Execute a TOOL_CALLS plan against the catalog
    Plan {
        #[arg(short, long, help = "File holding the planner response")]
        input: PathBuf,

        #[arg(short, long, help = "Float metadata JSON file [default: catalog.path setting]")]
        catalog: Option<PathBuf>,

        #[arg(short, long, default_value = "result", help = "Group label for the selected IDs")]
        label: String,
    },

    /// Sort the cycles of a grouped results file numerically
    Normalize {
        #[arg(short, long, help = "Grouped results JSON file")]
        input: PathBuf,

        #[arg(
            short,
            long,
            help = "Output JSON file path [default: output/argo-results-{YYMMDD}.json]"
        )]
        output: Option<PathBuf>,

        #[arg(long, help = "Write compact JSON")]
        compact: bool,
    },

    /// Display statistics about a float metadata catalog
    Info {
        #[arg(short, long, help = "Float metadata JSON file [default: catalog.path setting]")]
        catalog: Option<PathBuf>,

        #[arg(short, long, help = "Show the metadata record of one float")]
        float: Option<String>,
    },
}

/// Criteria for the `filter` command. Every given criterion must hold.
#[derive(Args, Debug, Default)]
pub struct FilterCriteria {
    #[arg(long, help = "Named region: bay_of_bengal, arabian_sea, indian_ocean")]
    pub region: Option<String>,

    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        conflicts_with = "region",
        help = "Bounding box as LAT_MIN,LAT_MAX,LON_MIN,LON_MAX"
    )]
    pub bbox: Option<Vec<f64>>,

    #[arg(long, requires = "end", help = "Launch date lower bound (YYYY-MM-DD)")]
    pub start: Option<String>,

    #[arg(long, requires = "start", help = "Launch date upper bound (YYYY-MM-DD)")]
    pub end: Option<String>,

    #[arg(long, help = "Parameter name, e.g. temperature or temp_max")]
    pub parameter: Option<String>,

    #[arg(long, requires_all = ["parameter", "value"], help = "Comparison: >, <, >=, <=, ==")]
    pub operator: Option<String>,

    #[arg(long, requires = "operator", allow_hyphen_values = true)]
    pub value: Option<f64>,

    #[arg(long, requires = "parameter", help = "Rank by parameter: max or min")]
    pub extreme: Option<String>,

    #[arg(long, help = "Platform type substring, e.g. APEX")]
    pub platform: Option<String>,

    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        help = "Rank by distance from LAT,LON"
    )]
    pub near: Option<Vec<f64>>,

    #[arg(long, help = "Select a single float by ID")]
    pub id: Option<String>,

    #[arg(long, help = "Invert the region, date or platform criterion")]
    pub negate: bool,
}
