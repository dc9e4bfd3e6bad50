use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Generate default results filename with format: argo-results-{YYMMDD}.json
pub fn generate_default_results_filename() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!("argo-results-{:02}{:02}{:02}.json", year, month, day);
    PathBuf::from("output").join(filename)
}
