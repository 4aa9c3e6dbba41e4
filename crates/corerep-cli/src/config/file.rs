use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileCalculationConfig {
    pub method: Option<String>,
    pub order: Option<String>,
    pub min_pairs_per_task: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileParametersConfig {
    pub path: Option<PathBuf>,
}

/// On-disk layout of a run configuration file.
///
/// ```toml
/// [calculation]
/// method = "am1"
/// order = "gradient"
/// min-pairs-per-task = 64
///
/// [parameters]
/// path = "custom-am1.toml"
/// ```
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub calculation: Option<FileCalculationConfig>,
    pub parameters: Option<FileParametersConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        // Parameter paths are relative to the config file, not the working directory.
        if let (Some(parameters), Some(base)) = (config.parameters.as_mut(), path.parent()) {
            if let Some(param_path) = parameters.path.as_mut() {
                if param_path.is_relative() {
                    *param_path = base.join(&*param_path);
                }
            }
        }
        Ok(config)
    }
}
