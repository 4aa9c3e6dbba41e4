use thiserror::Error;

use super::config::ConfigError;
use crate::core::pair::DerivativeOrder;
use crate::core::params::ParameterError;

#[derive(Debug, Error)]
pub enum RepulsionError {
    #[error("Initialization failed for pair ({first}, {second}): {source}")]
    Initialization {
        first: usize,
        second: usize,
        #[source]
        source: ParameterError,
    },

    #[error("Repulsion has not been calculated yet")]
    NotComputed,

    #[error("Derivatives of order '{requested}' requested, but only '{computed}' was calculated")]
    OrderNotComputed {
        requested: DerivativeOrder,
        computed: DerivativeOrder,
    },

    #[error("Order '{0}' has no derivative part")]
    NoDerivative(DerivativeOrder),

    #[error("Table was initialized for {expected} atoms but received {found}")]
    AtomCountMismatch { expected: usize, found: usize },

    #[error("Atom index {index} is out of range for {atoms} atoms")]
    AtomOutOfRange { index: usize, atoms: usize },

    #[error("Pair ({first}, {second}) is not a pair of distinct atoms among {atoms}")]
    PairOutOfRange {
        first: usize,
        second: usize,
        atoms: usize,
    },

    #[error("Accumulator holds {found} atoms, but the table has {expected}")]
    AccumulatorSize { expected: usize, found: usize },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
