use corerep::engine::config::{RepulsionConfig, RepulsionMethod};
use std::path::PathBuf;

/// Where the element parameters of a run come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterSource {
    BuiltIn(RepulsionMethod),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub parameters: ParameterSource,
    pub core_config: RepulsionConfig,
}
