use super::mndo::MndoPairRepulsion;
use super::radial::Radial;
use super::{DerivativeOrder, PairDerivatives, PairRepulsion};
use crate::core::params::{ElementParameters, GaussianTerm};
use nalgebra::Vector3;

/// AM1 core-core repulsion: the MNDO function plus Gaussian corrections
/// `(Z_A Z_B / R) Σ_k a_k exp(-b_k (R - c_k)²)` over the terms of both atoms.
#[derive(Debug)]
pub struct Am1PairRepulsion {
    mndo: MndoPairRepulsion,
    gaussians: Vec<GaussianTerm>,
}

impl Am1PairRepulsion {
    fn radial(&self, distance: f64) -> Radial {
        let correction = self
            .gaussians
            .iter()
            .map(|t| Radial::gaussian(distance, t.a, t.b, t.c))
            .fold(Radial::default(), |acc, term| acc + term);
        let scaled = Radial::reciprocal(distance) * correction * self.mndo.charge_product();
        self.mndo.radial(distance) + scaled
    }
}

impl PairRepulsion for Am1PairRepulsion {
    fn new(first: &ElementParameters, second: &ElementParameters) -> Self {
        Self {
            mndo: MndoPairRepulsion::new(first, second),
            gaussians: first
                .gaussians
                .iter()
                .chain(second.gaussians.iter())
                .copied()
                .collect(),
        }
    }

    fn calculate(&self, separation: &Vector3<f64>, order: DerivativeOrder) -> PairDerivatives {
        self.radial(separation.norm()).into_cartesian(separation, order)
    }
}
