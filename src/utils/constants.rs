/// Summary statistic suffixes carried by every measured parameter
pub const STAT_MAX: &str = "max";
pub const STAT_MIN: &str = "min";
pub const STAT_AVG: &str = "avg";
pub const STAT_SUFFIXES: [&str; 3] = ["_max", "_min", "_avg"];

/// File names
pub const METADATA_FILE: &str = "meta_data.json";
pub const RESULTS_FILE: &str = "results.json";
pub const SETTINGS_FILE: &str = "argo-query";

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "ARGO_QUERY";

/// Marker that opens the tool-call block of a filter plan
pub const TOOL_CALLS_MARKER: &str = "TOOL_CALLS:";

/// Limit keyword meaning "no truncation"
pub const LIMIT_ALL: &str = "all";
