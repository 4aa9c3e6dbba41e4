use super::{DerivativeOrder, PairDerivatives};
use nalgebra::{Matrix3, Vector3};
use std::ops::{Add, Mul};

/// Coulomb constant e²/(4πε₀) in eV·Å.
pub(crate) const COULOMB_EV_ANGSTROM: f64 = 14.399645;

/// A scalar function of the interatomic distance together with its first and second
/// radial derivatives, all evaluated at the same distance.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Radial {
    pub value: f64,
    pub d1: f64,
    pub d2: f64,
}

impl Radial {
    pub const fn constant(value: f64) -> Self {
        Self {
            value,
            d1: 0.0,
            d2: 0.0,
        }
    }

    /// Klopman-Ohno s-s integral `e² / sqrt(R² + ρ²)`.
    pub fn klopman_ohno(distance: f64, rho: f64) -> Self {
        let denom = distance * distance + rho * rho;
        let inv_sqrt = denom.sqrt().recip();
        let inv3 = inv_sqrt / denom;
        let inv5 = inv3 / denom;
        Self {
            value: COULOMB_EV_ANGSTROM * inv_sqrt,
            d1: -COULOMB_EV_ANGSTROM * distance * inv3,
            d2: COULOMB_EV_ANGSTROM * (2.0 * distance * distance - rho * rho) * inv5,
        }
    }

    /// `exp(-α R)`
    pub fn exp_decay(distance: f64, alpha: f64) -> Self {
        let e = (-alpha * distance).exp();
        Self {
            value: e,
            d1: -alpha * e,
            d2: alpha * alpha * e,
        }
    }

    /// `R exp(-α R)`
    pub fn scaled_exp_decay(distance: f64, alpha: f64) -> Self {
        let e = (-alpha * distance).exp();
        Self {
            value: distance * e,
            d1: (1.0 - alpha * distance) * e,
            d2: (alpha * alpha * distance - 2.0 * alpha) * e,
        }
    }

    /// `1 / R`
    pub fn reciprocal(distance: f64) -> Self {
        let inv = distance.recip();
        Self {
            value: inv,
            d1: -inv * inv,
            d2: 2.0 * inv * inv * inv,
        }
    }

    /// `a exp(-b (R - c)²)`
    pub fn gaussian(distance: f64, a: f64, b: f64, c: f64) -> Self {
        let shift = distance - c;
        let v = a * (-b * shift * shift).exp();
        Self {
            value: v,
            d1: -2.0 * b * shift * v,
            d2: (4.0 * b * b * shift * shift - 2.0 * b) * v,
        }
    }

    /// Converts radial derivatives into derivatives with respect to the Cartesian
    /// separation vector, keeping only what `order` asks for.
    pub fn into_cartesian(self, separation: &Vector3<f64>, order: DerivativeOrder) -> PairDerivatives {
        let energy = self.value;
        if order == DerivativeOrder::Energy {
            return PairDerivatives::Energy(energy);
        }

        let distance = separation.norm();
        let unit = separation / distance;
        let gradient = unit * self.d1;
        if order == DerivativeOrder::Gradient {
            return PairDerivatives::Gradient { energy, gradient };
        }

        let projector = unit * unit.transpose();
        let hessian = projector * self.d2 + (Matrix3::identity() - projector) * (self.d1 / distance);
        PairDerivatives::Hessian {
            energy,
            gradient,
            hessian,
        }
    }
}

impl Add for Radial {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            value: self.value + rhs.value,
            d1: self.d1 + rhs.d1,
            d2: self.d2 + rhs.d2,
        }
    }
}

/// Product rule.
impl Mul for Radial {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            value: self.value * rhs.value,
            d1: self.d1 * rhs.value + self.value * rhs.d1,
            d2: self.d2 * rhs.value + 2.0 * self.d1 * rhs.d1 + self.value * rhs.d2,
        }
    }
}

impl Mul<f64> for Radial {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            value: self.value * rhs,
            d1: self.d1 * rhs,
            d2: self.d2 * rhs,
        }
    }
}
