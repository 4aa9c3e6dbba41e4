//! # Pair Repulsion Module
//!
//! Closed-form core-core repulsion for a single atom pair.
//!
//! ## Overview
//!
//! A pair unit is built once from the parameter records of its two elements and then
//! evaluated repeatedly as the geometry changes. Every evaluation is a pure function
//! of the separation vector `r = x_j - x_i` and returns a fresh [`PairDerivatives`]
//! value; the unit itself holds no mutable state.
//!
//! ## Key Components
//!
//! - [`PairRepulsion`] - The capability every semiempirical family implements
//! - [`DerivativeOrder`] - Requested derivative order, with the two second-order layouts
//! - [`PairDerivatives`] - Energy plus the derivatives of the requested order
//! - [`mndo`] / [`am1`] - The MNDO and AM1 core-core functions

pub mod am1;
pub mod mndo;
mod radial;

use crate::core::params::ElementParameters;
use nalgebra::{Matrix3, Vector3};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use am1::Am1PairRepulsion;
pub use mndo::MndoPairRepulsion;

/// Requested derivative order of a repulsion calculation.
///
/// Both second-order variants produce the same per-pair payload; they only select how
/// contributions are laid out once folded into a system-level accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivativeOrder {
    Energy,
    Gradient,
    SecondAtomic,
    SecondFull,
}

impl DerivativeOrder {
    /// Numeric order: 0 for energy, 1 for gradients and 2 for both Hessian layouts.
    pub fn rank(self) -> u8 {
        match self {
            DerivativeOrder::Energy => 0,
            DerivativeOrder::Gradient => 1,
            DerivativeOrder::SecondAtomic | DerivativeOrder::SecondFull => 2,
        }
    }

    /// Whether results computed at `self` also answer queries of order `requested`.
    pub fn covers(self, requested: DerivativeOrder) -> bool {
        self.rank() >= requested.rank()
    }
}

impl fmt::Display for DerivativeOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DerivativeOrder::Energy => "energy",
            DerivativeOrder::Gradient => "gradient",
            DerivativeOrder::SecondAtomic => "second-atomic",
            DerivativeOrder::SecondFull => "second-full",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Unknown derivative order: '{0}'")]
pub struct UnknownOrderError(pub String);

impl FromStr for DerivativeOrder {
    type Err = UnknownOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "energy" => Ok(DerivativeOrder::Energy),
            "1" | "gradient" | "first" => Ok(DerivativeOrder::Gradient),
            "second-atomic" | "hessian-atomic" | "atomic" => Ok(DerivativeOrder::SecondAtomic),
            "2" | "second-full" | "hessian-full" | "hessian" | "full" => {
                Ok(DerivativeOrder::SecondFull)
            }
            _ => Err(UnknownOrderError(s.to_string())),
        }
    }
}

/// Result of one pair evaluation.
///
/// Gradients and Hessians are taken with respect to the separation vector; the atom
/// `j` receives them with a positive sign and atom `i` with a negative one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairDerivatives {
    Energy(f64),
    Gradient {
        energy: f64,
        gradient: Vector3<f64>,
    },
    Hessian {
        energy: f64,
        gradient: Vector3<f64>,
        hessian: Matrix3<f64>,
    },
}

/// The derivative part of a [`PairDerivatives`], as handed to accumulators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairDerivative {
    pub gradient: Vector3<f64>,
    pub hessian: Option<Matrix3<f64>>,
}

impl PairDerivatives {
    pub fn energy(&self) -> f64 {
        match *self {
            PairDerivatives::Energy(energy)
            | PairDerivatives::Gradient { energy, .. }
            | PairDerivatives::Hessian { energy, .. } => energy,
        }
    }

    /// Highest order this result holds. Hessian results report `SecondFull`, which
    /// covers both second-order layouts.
    pub fn order(&self) -> DerivativeOrder {
        match self {
            PairDerivatives::Energy(_) => DerivativeOrder::Energy,
            PairDerivatives::Gradient { .. } => DerivativeOrder::Gradient,
            PairDerivatives::Hessian { .. } => DerivativeOrder::SecondFull,
        }
    }

    pub fn gradient(&self) -> Option<Vector3<f64>> {
        match *self {
            PairDerivatives::Energy(_) => None,
            PairDerivatives::Gradient { gradient, .. }
            | PairDerivatives::Hessian { gradient, .. } => Some(gradient),
        }
    }

    pub fn hessian(&self) -> Option<Matrix3<f64>> {
        match *self {
            PairDerivatives::Hessian { hessian, .. } => Some(hessian),
            _ => None,
        }
    }

    /// Extracts the derivative of the requested order, or `None` when this result
    /// was computed at a lower order. Order 0 has no derivative part.
    pub fn derivative(&self, order: DerivativeOrder) -> Option<PairDerivative> {
        if order == DerivativeOrder::Energy || !self.order().covers(order) {
            return None;
        }
        let gradient = self.gradient()?;
        let hessian = if order.rank() >= 2 {
            Some(self.hessian()?)
        } else {
            None
        };
        Some(PairDerivative { gradient, hessian })
    }
}

/// Core-core repulsion function of one semiempirical family for a single atom pair.
///
/// Implementations copy what they need from the two parameter records at construction
/// and must be shareable across threads, since the pair table evaluates units in
/// parallel. Degenerate separations are passed through untouched; handling them is up
/// to the implementation.
pub trait PairRepulsion: Send + Sync + Sized {
    /// Builds the unit for the pair `(first, second)`, where `first` belongs to the
    /// lower-indexed atom.
    fn new(first: &ElementParameters, second: &ElementParameters) -> Self;

    /// Evaluates the repulsion energy, and derivatives up to `order`, at `separation`.
    fn calculate(&self, separation: &Vector3<f64>, order: DerivativeOrder) -> PairDerivatives;
}
