//! Layered runtime settings: defaults, then an optional settings file,
//! then `ARGO_QUERY__SECTION__KEY` environment variables.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ProcessingError, Result};
use crate::models::ZeroPolicy;
use crate::utils::constants::{ENV_PREFIX, METADATA_FILE, RESULTS_FILE, SETTINGS_FILE};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Float metadata JSON file
    pub path: PathBuf,
    pub zero_policy: ZeroPolicy,
    /// Drop floats that fail validation instead of refusing the whole file
    pub skip_invalid: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(METADATA_FILE),
            zero_policy: ZeroPolicy::Absent,
            skip_invalid: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub results_path: PathBuf,
    pub persist: bool,
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            results_path: PathBuf::from(RESULTS_FILE),
            persist: true,
            pretty: true,
        }
    }
}

impl Settings {
    /// Load from `argo-query.{toml,json,yaml}` in the working directory (if
    /// present) or the given file, then the process environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with_env(file, Self::environment())
    }

    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX).separator("__")
    }

    pub fn load_with_env(file: Option<&Path>, env: Environment) -> Result<Self> {
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(SETTINGS_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file_source)
            .add_source(env)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        tracing::debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.catalog.path.as_os_str().is_empty() {
            return Err(ProcessingError::Config("catalog.path must not be empty".to_string()));
        }
        if self.output.persist && self.output.results_path.as_os_str().is_empty() {
            return Err(ProcessingError::Config(
                "output.results_path must be set when output.persist is enabled".to_string(),
            ));
        }
        Ok(())
    }
}
