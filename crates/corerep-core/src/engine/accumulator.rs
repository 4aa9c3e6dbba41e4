use crate::core::pair::{DerivativeOrder, PairDerivative};
use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

/// Caller-owned, system-level collector of per-pair derivative contributions.
///
/// The table calls [`add_pair`](DerivativeAccumulator::add_pair) exactly once per
/// populated pair `(i, j)`, `i < j`, with the derivative taken with respect to the
/// separation `x_j - x_i`. `ORDER` fixes which derivative order the accumulator
/// consumes, so the shape always matches the request.
pub trait DerivativeAccumulator {
    const ORDER: DerivativeOrder;

    fn atom_count(&self) -> usize;

    fn add_pair(&mut self, i: usize, j: usize, derivative: &PairDerivative);
}

/// Per-atom Cartesian gradients.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientCollection {
    gradients: Vec<Vector3<f64>>,
}

impl GradientCollection {
    pub fn new(atom_count: usize) -> Self {
        Self {
            gradients: vec![Vector3::zeros(); atom_count],
        }
    }

    pub fn gradients(&self) -> &[Vector3<f64>] {
        &self.gradients
    }

    pub fn get(&self, atom: usize) -> Option<&Vector3<f64>> {
        self.gradients.get(atom)
    }

    /// Net force-free check: the sum over atoms of a translation-invariant energy's
    /// gradient is zero.
    pub fn total(&self) -> Vector3<f64> {
        self.gradients.iter().sum()
    }
}

impl DerivativeAccumulator for GradientCollection {
    const ORDER: DerivativeOrder = DerivativeOrder::Gradient;

    fn atom_count(&self) -> usize {
        self.gradients.len()
    }

    fn add_pair(&mut self, i: usize, j: usize, derivative: &PairDerivative) {
        self.gradients[i] -= derivative.gradient;
        self.gradients[j] += derivative.gradient;
    }
}

/// Per-atom gradients plus the 3×3 diagonal Hessian block of each atom.
///
/// Off-diagonal (inter-atomic) blocks are not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomicSecondDerivativeCollection {
    gradients: Vec<Vector3<f64>>,
    hessians: Vec<Matrix3<f64>>,
}

impl AtomicSecondDerivativeCollection {
    pub fn new(atom_count: usize) -> Self {
        Self {
            gradients: vec![Vector3::zeros(); atom_count],
            hessians: vec![Matrix3::zeros(); atom_count],
        }
    }

    pub fn gradients(&self) -> &[Vector3<f64>] {
        &self.gradients
    }

    pub fn hessians(&self) -> &[Matrix3<f64>] {
        &self.hessians
    }
}

impl DerivativeAccumulator for AtomicSecondDerivativeCollection {
    const ORDER: DerivativeOrder = DerivativeOrder::SecondAtomic;

    fn atom_count(&self) -> usize {
        self.gradients.len()
    }

    fn add_pair(&mut self, i: usize, j: usize, derivative: &PairDerivative) {
        self.gradients[i] -= derivative.gradient;
        self.gradients[j] += derivative.gradient;
        if let Some(hessian) = derivative.hessian {
            self.hessians[i] += hessian;
            self.hessians[j] += hessian;
        }
    }
}

/// Per-atom gradients plus the dense 3N×3N Hessian, ordered `(x0, y0, z0, x1, ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FullSecondDerivativeCollection {
    gradients: Vec<Vector3<f64>>,
    hessian: DMatrix<f64>,
}

impl FullSecondDerivativeCollection {
    pub fn new(atom_count: usize) -> Self {
        Self {
            gradients: vec![Vector3::zeros(); atom_count],
            hessian: DMatrix::zeros(3 * atom_count, 3 * atom_count),
        }
    }

    pub fn gradients(&self) -> &[Vector3<f64>] {
        &self.gradients
    }

    pub fn hessian(&self) -> &DMatrix<f64> {
        &self.hessian
    }

    /// The `(a, b)` 3×3 block, `∂²E / ∂x_a ∂x_b`.
    pub fn block(&self, a: usize, b: usize) -> Matrix3<f64> {
        self.hessian.fixed_view::<3, 3>(3 * a, 3 * b).into_owned()
    }

    /// Gradient flattened in the same coordinate order as the Hessian.
    pub fn gradient_vector(&self) -> DVector<f64> {
        DVector::from_iterator(
            3 * self.gradients.len(),
            self.gradients.iter().flat_map(|g| g.iter().copied()),
        )
    }

    fn add_block(&mut self, a: usize, b: usize, block: &Matrix3<f64>) {
        let mut view = self.hessian.fixed_view_mut::<3, 3>(3 * a, 3 * b);
        view += block;
    }
}

impl DerivativeAccumulator for FullSecondDerivativeCollection {
    const ORDER: DerivativeOrder = DerivativeOrder::SecondFull;

    fn atom_count(&self) -> usize {
        self.gradients.len()
    }

    fn add_pair(&mut self, i: usize, j: usize, derivative: &PairDerivative) {
        self.gradients[i] -= derivative.gradient;
        self.gradients[j] += derivative.gradient;
        if let Some(hessian) = derivative.hessian {
            let coupling = -hessian;
            self.add_block(i, i, &hessian);
            self.add_block(j, j, &hessian);
            self.add_block(i, j, &coupling);
            self.add_block(j, i, &coupling.transpose());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derivative() -> PairDerivative {
        PairDerivative {
            gradient: Vector3::new(1.0, -2.0, 0.5),
            hessian: Some(Matrix3::new(2.0, 0.1, 0.0, 0.1, 3.0, 0.2, 0.0, 0.2, 4.0)),
        }
    }

    #[test]
    fn gradient_collection_applies_opposite_signs_to_pair_atoms() {
        let mut acc = GradientCollection::new(3);
        acc.add_pair(0, 2, &derivative());
        assert_eq!(acc.gradients()[0], Vector3::new(-1.0, 2.0, -0.5));
        assert_eq!(acc.gradients()[1], Vector3::zeros());
        assert_eq!(acc.gradients()[2], Vector3::new(1.0, -2.0, 0.5));
        assert_eq!(acc.total(), Vector3::zeros());
    }

    #[test]
    fn gradient_collection_accumulates_over_pairs() {
        let mut acc = GradientCollection::new(3);
        acc.add_pair(0, 1, &derivative());
        acc.add_pair(1, 2, &derivative());
        assert_eq!(acc.get(1), Some(&Vector3::zeros()));
        assert_eq!(acc.get(3), None);
    }

    #[test]
    fn atomic_collection_adds_hessian_to_both_diagonal_blocks() {
        let mut acc = AtomicSecondDerivativeCollection::new(2);
        acc.add_pair(0, 1, &derivative());
        let expected = derivative().hessian.unwrap();
        assert_eq!(acc.hessians()[0], expected);
        assert_eq!(acc.hessians()[1], expected);
        assert_eq!(acc.gradients()[0], -derivative().gradient);
        assert_eq!(acc.atom_count(), 2);
    }

    #[test]
    fn full_collection_fills_diagonal_and_coupling_blocks() {
        let mut acc = FullSecondDerivativeCollection::new(3);
        acc.add_pair(0, 2, &derivative());
        let h = derivative().hessian.unwrap();

        assert_eq!(acc.hessian().shape(), (9, 9));
        assert_eq!(acc.block(0, 0), h);
        assert_eq!(acc.block(2, 2), h);
        assert_eq!(acc.block(0, 2), -h);
        assert_eq!(acc.block(2, 0), -h);
        assert_eq!(acc.block(1, 1), Matrix3::zeros());
        assert_eq!(acc.block(0, 1), Matrix3::zeros());
    }

    #[test]
    fn full_collection_rows_sum_to_zero_for_translation_invariance() {
        let mut acc = FullSecondDerivativeCollection::new(3);
        acc.add_pair(0, 1, &derivative());
        acc.add_pair(1, 2, &derivative());
        for row in acc.hessian().row_iter() {
            assert!(row.sum().abs() < 1e-12);
        }
        assert!(acc.hessian().is_square());
        assert_eq!(acc.hessian(), &acc.hessian().transpose());
    }

    #[test]
    fn gradient_vector_flattens_in_hessian_order() {
        let mut acc = FullSecondDerivativeCollection::new(2);
        acc.add_pair(0, 1, &derivative());
        let flat = acc.gradient_vector();
        assert_eq!(flat.len(), 6);
        assert_eq!(flat[0], -1.0);
        assert_eq!(flat[4], -2.0);
        assert_eq!(flat[5], 0.5);
    }
}
