use crate::core::pair::DerivativeOrder;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
    #[error("Unknown repulsion method: '{0}'")]
    UnknownMethod(String),
}

/// Semiempirical family whose core-core function the pair units implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RepulsionMethod {
    Mndo,
    #[default]
    Am1,
}

impl fmt::Display for RepulsionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepulsionMethod::Mndo => f.write_str("MNDO"),
            RepulsionMethod::Am1 => f.write_str("AM1"),
        }
    }
}

impl FromStr for RepulsionMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mndo" => Ok(RepulsionMethod::Mndo),
            "am1" => Ok(RepulsionMethod::Am1),
            _ => Err(ConfigError::UnknownMethod(s.to_string())),
        }
    }
}

/// Scheduling knobs of the pair table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Smallest number of pairs a single parallel task handles. Larger values mean
    /// coarser splits; results agree up to floating-point reduction order.
    pub min_pairs_per_task: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_pairs_per_task: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepulsionConfig {
    pub method: RepulsionMethod,
    pub order: DerivativeOrder,
    pub table: TableConfig,
}

#[derive(Default)]
pub struct RepulsionConfigBuilder {
    method: Option<RepulsionMethod>,
    order: Option<DerivativeOrder>,
    min_pairs_per_task: Option<usize>,
}

impl RepulsionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: RepulsionMethod) -> Self {
        self.method = Some(method);
        self
    }
    pub fn order(mut self, order: DerivativeOrder) -> Self {
        self.order = Some(order);
        self
    }
    pub fn min_pairs_per_task(mut self, n: usize) -> Self {
        self.min_pairs_per_task = Some(n);
        self
    }

    pub fn build(self) -> Result<RepulsionConfig, ConfigError> {
        let min_pairs_per_task = self
            .min_pairs_per_task
            .unwrap_or(TableConfig::default().min_pairs_per_task);
        if min_pairs_per_task == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "min_pairs_per_task",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(RepulsionConfig {
            method: self.method.ok_or(ConfigError::MissingParameter("method"))?,
            order: self.order.ok_or(ConfigError::MissingParameter("order"))?,
            table: TableConfig { min_pairs_per_task },
        })
    }
}
