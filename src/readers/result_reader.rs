use crate::error::Result;
use crate::models::ResultTree;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

fn non_finite_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""(?:[^"\\]|\\.)*"|-?\bInfinity\b|\bNaN\b"#).expect("valid non-finite regex"))
}

/// Replace bare `NaN` / `Infinity` tokens, which lenient upstream writers
/// emit for missing positions, with `null`. String literals are left alone.
pub fn null_non_finite(json: &str) -> Cow<'_, str> {
    let re = non_finite_regex();
    if !re.find_iter(json).any(|m| !m.as_str().starts_with('"')) {
        return Cow::Borrowed(json);
    }

    let cleaned = re.replace_all(json, |caps: &Captures| {
        let token = &caps[0];
        if token.starts_with('"') {
            token.to_string()
        } else {
            "null".to_string()
        }
    });
    Cow::Owned(cleaned.into_owned())
}

/// Read a nested group -> float -> cycle results document, keeping key order
pub fn read_results(path: &Path) -> Result<ResultTree> {
    info!("Reading results from {}", path.display());
    let raw = fs::read_to_string(path)?;
    let cleaned = null_non_finite(&raw);
    if let Cow::Owned(_) = cleaned {
        debug!("Replaced non-finite numbers with null in {}", path.display());
    }
    Ok(serde_json::from_str(&cleaned)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_results_keeps_order() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(
            temp_file,
            r#"{{"arabian_sea": {{"2902115": {{"10": {{"juld": "x"}}, "2": {{"juld": "y"}}}}}}}}"#
        )?;

        let tree = read_results(temp_file.path())?;
        let cycles = tree.get("arabian_sea").and_then(|floats| floats.get("2902115")).unwrap();
        assert_eq!(cycles.keys().collect::<Vec<_>>(), vec!["10", "2"]);

        Ok(())
    }

    #[test]
    fn test_bare_nan_positions_become_null() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(
            temp_file,
            r#"{{"g": {{"1902670": {{"4": {{"juld": "NaN", "latitude": NaN, "longitude": -Infinity, "temp": [1.5, NaN]}}}}}}}}"#
        )?;

        let tree = read_results(temp_file.path())?;
        let cycle = tree.get("g").and_then(|floats| floats.get("1902670")).and_then(|c| c.get("4")).unwrap();
        assert_eq!(cycle["juld"], serde_json::json!("NaN"));
        assert!(cycle["latitude"].is_null());
        assert!(cycle["longitude"].is_null());
        assert_eq!(cycle["temp"], serde_json::json!([1.5, null]));

        Ok(())
    }

    #[test]
    fn test_clean_documents_are_borrowed() {
        assert!(matches!(null_non_finite(r#"{"a": "NaN text", "b": 1}"#), Cow::Borrowed(_)));
    }
}
