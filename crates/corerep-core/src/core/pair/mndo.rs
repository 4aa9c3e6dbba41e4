use super::radial::{COULOMB_EV_ANGSTROM, Radial};
use super::{DerivativeOrder, PairDerivatives, PairRepulsion};
use crate::core::models::element::Element;
use crate::core::params::ElementParameters;
use nalgebra::Vector3;

/// MNDO core-core repulsion:
/// `E(R) = Z_A Z_B γ_ss(R) (1 + f_A(R) + f_B(R))` with `f_X = exp(-α_X R)`.
///
/// For N-H and O-H pairs the heavy atom's factor is `R exp(-α_X R)` instead.
#[derive(Debug)]
pub struct MndoPairRepulsion {
    charge_product: f64,
    rho: f64,
    first: DecayFactor,
    second: DecayFactor,
}

#[derive(Debug, Clone, Copy)]
struct DecayFactor {
    alpha: f64,
    scaled: bool,
}

impl DecayFactor {
    fn radial(self, distance: f64) -> Radial {
        if self.scaled {
            Radial::scaled_exp_decay(distance, self.alpha)
        } else {
            Radial::exp_decay(distance, self.alpha)
        }
    }
}

fn uses_scaled_decay(element: Element, partner: Element) -> bool {
    matches!(element, Element::N | Element::O) && partner == Element::H
}

/// Klopman-Ohno additive term `ρ = e² / (2 G_ss)`, in Å.
fn additive_term(params: &ElementParameters) -> f64 {
    COULOMB_EV_ANGSTROM / (2.0 * params.gss)
}

impl MndoPairRepulsion {
    pub(crate) fn charge_product(&self) -> f64 {
        self.charge_product
    }

    pub(crate) fn radial(&self, distance: f64) -> Radial {
        let gamma = Radial::klopman_ohno(distance, self.rho);
        let factor =
            Radial::constant(1.0) + self.first.radial(distance) + self.second.radial(distance);
        gamma * factor * self.charge_product
    }
}

impl PairRepulsion for MndoPairRepulsion {
    fn new(first: &ElementParameters, second: &ElementParameters) -> Self {
        Self {
            charge_product: first.core_charge * second.core_charge,
            rho: additive_term(first) + additive_term(second),
            first: DecayFactor {
                alpha: first.alpha,
                scaled: uses_scaled_decay(first.element, second.element),
            },
            second: DecayFactor {
                alpha: second.alpha,
                scaled: uses_scaled_decay(second.element, first.element),
            },
        }
    }

    fn calculate(&self, separation: &Vector3<f64>, order: DerivativeOrder) -> PairDerivatives {
        self.radial(separation.norm()).into_cartesian(separation, order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pair::test_utils::{numerical_gradient, numerical_hessian};
    use crate::core::params::ElementParameterTable;

    fn unit(a: Element, b: Element) -> MndoPairRepulsion {
        let table = ElementParameterTable::mndo();
        MndoPairRepulsion::new(table.get(a).unwrap(), table.get(b).unwrap())
    }

    fn along_diagonal(distance: f64) -> Vector3<f64> {
        Vector3::new(1.0, 2.0, 2.0) * (distance / 3.0)
    }

    #[test]
    fn reproduces_reference_energies_and_gradient_magnitudes() {
        let fixtures = [
            (Element::C, Element::H, 1.1, 40.61376758184445, 28.866484814926707),
            (Element::C, Element::H, 1.5, 31.82236352702994, 16.779042530501442),
            (Element::O, Element::H, 1.1, 62.85073649309559, 43.807075332580325),
            (Element::O, Element::H, 1.5, 49.19037317839285, 26.536434443613643),
            (Element::C, Element::N, 1.1, 202.61828899564904, 141.5280770515892),
            (Element::H, Element::H, 1.5, 8.028751544372156, 4.29618075870053),
        ];
        for (a, b, distance, energy, gradient_norm) in fixtures {
            let result = unit(a, b).calculate(&along_diagonal(distance), DerivativeOrder::Gradient);
            assert!(
                (result.energy() - energy).abs() < 1e-9 * energy,
                "{a}-{b} at {distance}: {} vs {energy}",
                result.energy()
            );
            let norm = result.gradient().unwrap().norm();
            assert!(
                (norm - gradient_norm).abs() < 1e-6,
                "{a}-{b} at {distance}: |g| {norm} vs {gradient_norm}"
            );
        }
    }

    #[test]
    fn repulsion_decreases_with_distance() {
        let pair = unit(Element::C, Element::C);
        let near = pair.calculate(&along_diagonal(1.2), DerivativeOrder::Energy).energy();
        let far = pair.calculate(&along_diagonal(2.5), DerivativeOrder::Energy).energy();
        assert!(near > far);
        assert!(far > 0.0);
    }

    #[test]
    fn gradient_points_toward_decreasing_separation() {
        let separation = Vector3::new(0.0, 0.0, 1.4);
        let result = unit(Element::N, Element::O).calculate(&separation, DerivativeOrder::Gradient);
        let gradient = result.gradient().unwrap();
        assert!(gradient.z < 0.0);
        assert!(gradient.x.abs() < 1e-14 && gradient.y.abs() < 1e-14);
    }

    #[test]
    fn energy_is_independent_of_pair_order() {
        let separation = along_diagonal(1.05);
        let oh = unit(Element::O, Element::H).calculate(&separation, DerivativeOrder::Energy);
        let ho = unit(Element::H, Element::O).calculate(&separation, DerivativeOrder::Energy);
        assert!((oh.energy() - ho.energy()).abs() < 1e-12);
    }

    #[test]
    fn hydrogen_exception_changes_only_nh_and_oh_pairs() {
        let table = ElementParameterTable::mndo();
        let mut fake_carbon = table.get(Element::O).unwrap().clone();
        fake_carbon.element = Element::C;
        let hydrogen = table.get(Element::H).unwrap();

        let separation = along_diagonal(1.0);
        let with_exception = MndoPairRepulsion::new(table.get(Element::O).unwrap(), hydrogen)
            .calculate(&separation, DerivativeOrder::Energy)
            .energy();
        let without_exception = MndoPairRepulsion::new(&fake_carbon, hydrogen)
            .calculate(&separation, DerivativeOrder::Energy)
            .energy();
        // At R = 1 Å the two forms of the decay factor coincide.
        assert!((with_exception - without_exception).abs() < 1e-12);

        let separation = along_diagonal(1.3);
        let with_exception = MndoPairRepulsion::new(table.get(Element::O).unwrap(), hydrogen)
            .calculate(&separation, DerivativeOrder::Energy)
            .energy();
        let without_exception = MndoPairRepulsion::new(&fake_carbon, hydrogen)
            .calculate(&separation, DerivativeOrder::Energy)
            .energy();
        assert!(with_exception > without_exception);
    }

    #[test]
    fn analytic_gradient_matches_finite_differences() {
        for (a, b) in [(Element::C, Element::H), (Element::N, Element::H), (Element::F, Element::O)] {
            let pair = unit(a, b);
            let separation = Vector3::new(0.7, -0.4, 1.1);
            let analytic = pair.calculate(&separation, DerivativeOrder::Gradient).gradient().unwrap();
            let numeric = numerical_gradient(&pair, &separation, 1e-5);
            assert!((analytic - numeric).norm() < 1e-6, "{a}-{b}: {analytic} vs {numeric}");
        }
    }

    #[test]
    fn analytic_hessian_matches_finite_differences() {
        let pair = unit(Element::O, Element::H);
        let separation = Vector3::new(-0.5, 0.6, 0.45);
        let analytic = pair.calculate(&separation, DerivativeOrder::SecondFull).hessian().unwrap();
        let numeric = numerical_hessian(&pair, &separation, 1e-5);
        assert!((analytic - numeric).norm() < 1e-5, "{analytic} vs {numeric}");
        assert!((analytic - analytic.transpose()).norm() < 1e-12);
    }
}
