use super::accumulator::DerivativeAccumulator;
use super::config::TableConfig;
use super::error::RepulsionError;
use crate::core::models::atoms::AtomSource;
use crate::core::pair::{DerivativeOrder, PairDerivative, PairDerivatives, PairRepulsion};
use crate::core::params::ElementParameterTable;
use itertools::Itertools;
use nalgebra::Point3;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    Uninitialized,
    Initialized,
    Computed(DerivativeOrder),
}

/// One populated pair: its repulsion unit and the last result computed for it.
#[derive(Debug)]
pub struct PairSlot<P> {
    unit: P,
    result: Option<PairDerivatives>,
}

impl<P: PairRepulsion> PairSlot<P> {
    fn new(unit: P) -> Self {
        Self { unit, result: None }
    }

    fn calculate(&mut self, separation: &nalgebra::Vector3<f64>, order: DerivativeOrder) {
        self.result = Some(self.unit.calculate(separation, order));
    }

    pub fn unit(&self) -> &P {
        &self.unit
    }

    pub fn result(&self) -> Option<&PairDerivatives> {
        self.result.as_ref()
    }

    pub fn repulsion_energy(&self) -> Result<f64, RepulsionError> {
        self.result
            .as_ref()
            .map(PairDerivatives::energy)
            .ok_or(RepulsionError::NotComputed)
    }

    pub fn derivative(&self, order: DerivativeOrder) -> Result<PairDerivative, RepulsionError> {
        if order == DerivativeOrder::Energy {
            return Err(RepulsionError::NoDerivative(order));
        }
        let result = self.result.as_ref().ok_or(RepulsionError::NotComputed)?;
        result
            .derivative(order)
            .ok_or(RepulsionError::OrderNotComputed {
                requested: order,
                computed: result.order(),
            })
    }
}

/// Core-core repulsion of a whole atom set, one unit per unordered atom pair.
///
/// Slots live in a flat arena in upper-triangle order: pair `(i, j)`, `i < j`, sits
/// at `i (2N - i - 1) / 2 + (j - i - 1)`. Every pair is computed independently, so
/// full recomputations split the arena across the rayon pool.
#[derive(Debug)]
pub struct RepulsionTable<P: PairRepulsion> {
    config: TableConfig,
    atom_count: usize,
    pairs: Vec<(usize, usize)>,
    slots: Vec<PairSlot<P>>,
    state: TableState,
}

impl<P: PairRepulsion> Default for RepulsionTable<P> {
    fn default() -> Self {
        Self::with_config(TableConfig::default())
    }
}

impl<P: PairRepulsion> RepulsionTable<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self {
            config,
            atom_count: 0,
            pairs: Vec::new(),
            slots: Vec::new(),
            state: TableState::Uninitialized,
        }
    }

    pub fn state(&self) -> TableState {
        self.state
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Slot of the pair `(i, j)`, in either order.
    pub fn pair(&self, i: usize, j: usize) -> Result<&PairSlot<P>, RepulsionError> {
        let index = self.pair_index(i, j)?;
        Ok(&self.slots[index])
    }

    fn pair_index(&self, i: usize, j: usize) -> Result<usize, RepulsionError> {
        let n = self.atom_count;
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        if i == j || j >= n {
            return Err(RepulsionError::PairOutOfRange {
                first: i,
                second: j,
                atoms: n,
            });
        }
        Ok(i * (2 * n - i - 1) / 2 + (j - i - 1))
    }

    /// Builds one unit for every unordered pair of `atoms`.
    ///
    /// Any previous units and results are dropped first. If a parameter lookup fails
    /// the table is left `Uninitialized`.
    #[instrument(skip_all, name = "repulsion_table_initialize", fields(atoms = atoms.atom_count()))]
    pub fn initialize<A: AtomSource>(
        &mut self,
        atoms: &A,
        params: &ElementParameterTable,
    ) -> Result<(), RepulsionError> {
        self.atom_count = 0;
        self.pairs.clear();
        self.slots.clear();
        self.state = TableState::Uninitialized;

        let n = atoms.atom_count();
        let pairs: Vec<(usize, usize)> = (0..n).tuple_combinations().collect();

        let build = |&(i, j): &(usize, usize)| -> Result<PairSlot<P>, RepulsionError> {
            let lookup = |atom: usize| {
                params
                    .get(atoms.element_at(atom))
                    .map_err(|source| RepulsionError::Initialization {
                        first: i,
                        second: j,
                        source,
                    })
            };
            Ok(PairSlot::new(P::new(lookup(i)?, lookup(j)?)))
        };

        #[cfg(feature = "parallel")]
        let slots = pairs
            .par_iter()
            .with_min_len(self.config.min_pairs_per_task)
            .map(build)
            .collect::<Result<Vec<_>, _>>()?;

        #[cfg(not(feature = "parallel"))]
        let slots = pairs.iter().map(build).collect::<Result<Vec<_>, _>>()?;

        info!(
            atoms = n,
            pairs = pairs.len(),
            parameters = params.name(),
            "Repulsion table initialized."
        );

        self.atom_count = n;
        self.pairs = pairs;
        self.slots = slots;
        self.state = TableState::Initialized;
        Ok(())
    }

    fn check_atoms<A: AtomSource>(&self, atoms: &A) -> Result<(), RepulsionError> {
        if self.state == TableState::Uninitialized {
            return Err(RepulsionError::NotComputed);
        }
        if atoms.atom_count() != self.atom_count {
            return Err(RepulsionError::AtomCountMismatch {
                expected: self.atom_count,
                found: atoms.atom_count(),
            });
        }
        Ok(())
    }

    /// Recomputes every pair at `order` from the current positions of `atoms`.
    #[instrument(skip_all, name = "repulsion_table_calculate", fields(order = %order))]
    pub fn calculate_repulsion<A: AtomSource>(
        &mut self,
        atoms: &A,
        order: DerivativeOrder,
    ) -> Result<(), RepulsionError> {
        self.check_atoms(atoms)?;
        let positions: Vec<Point3<f64>> =
            (0..self.atom_count).map(|i| atoms.position_at(i)).collect();

        #[cfg(feature = "parallel")]
        let iterator = self
            .slots
            .par_iter_mut()
            .zip(self.pairs.par_iter())
            .with_min_len(self.config.min_pairs_per_task);

        #[cfg(not(feature = "parallel"))]
        let iterator = self.slots.iter_mut().zip(self.pairs.iter());

        iterator.for_each(|(slot, &(i, j))| {
            slot.calculate(&(positions[j] - positions[i]), order);
        });

        debug!(pairs = self.pairs.len(), "Pair repulsion recomputed.");
        self.state = TableState::Computed(order);
        Ok(())
    }

    fn computed_order(&self) -> Result<DerivativeOrder, RepulsionError> {
        match self.state {
            TableState::Computed(order) => Ok(order),
            _ => Err(RepulsionError::NotComputed),
        }
    }

    /// Recomputes the single pair `(i, j)` at the order of the last full computation.
    pub fn calculate_pair_repulsion<A: AtomSource>(
        &mut self,
        atoms: &A,
        i: usize,
        j: usize,
    ) -> Result<(), RepulsionError> {
        let order = self.computed_order()?;
        self.check_atoms(atoms)?;
        let index = self.pair_index(i, j)?;
        let (first, second) = self.pairs[index];
        let separation = atoms.position_at(second) - atoms.position_at(first);
        self.slots[index].calculate(&separation, order);
        Ok(())
    }

    /// Recomputes every pair that involves at least one atom of `moved`.
    pub fn update_atoms<A: AtomSource>(
        &mut self,
        atoms: &A,
        moved: &[usize],
    ) -> Result<(), RepulsionError> {
        let order = self.computed_order()?;
        self.check_atoms(atoms)?;

        let mut is_moved = vec![false; self.atom_count];
        for &index in moved {
            if index >= self.atom_count {
                return Err(RepulsionError::AtomOutOfRange {
                    index,
                    atoms: self.atom_count,
                });
            }
            is_moved[index] = true;
        }

        let mut updated = 0;
        for (slot, &(i, j)) in self.slots.iter_mut().zip(self.pairs.iter()) {
            if is_moved[i] || is_moved[j] {
                slot.calculate(&(atoms.position_at(j) - atoms.position_at(i)), order);
                updated += 1;
            }
        }
        debug!(moved = moved.len(), pairs = updated, "Partial repulsion update.");
        Ok(())
    }

    /// Sum of all pair energies, in eV. Reduction order follows the thread split, so
    /// results may differ in the last bits between runs with different pools.
    pub fn repulsion_energy(&self) -> Result<f64, RepulsionError> {
        self.computed_order()?;

        #[cfg(feature = "parallel")]
        let total = self
            .slots
            .par_iter()
            .with_min_len(self.config.min_pairs_per_task)
            .map(PairSlot::repulsion_energy)
            .try_reduce(|| 0.0, |a, b| Ok(a + b))?;

        #[cfg(not(feature = "parallel"))]
        let total = self
            .slots
            .iter()
            .map(PairSlot::repulsion_energy)
            .try_fold(0.0, |acc, e| e.map(|e| acc + e))?;

        Ok(total)
    }

    /// Folds every pair's derivatives into `accumulator` at the accumulator's order.
    pub fn add_repulsion_derivatives<C: DerivativeAccumulator>(
        &self,
        accumulator: &mut C,
    ) -> Result<(), RepulsionError> {
        let computed = self.computed_order()?;
        if !computed.covers(C::ORDER) {
            return Err(RepulsionError::OrderNotComputed {
                requested: C::ORDER,
                computed,
            });
        }
        if accumulator.atom_count() != self.atom_count {
            return Err(RepulsionError::AccumulatorSize {
                expected: self.atom_count,
                found: accumulator.atom_count(),
            });
        }
        for (slot, &(i, j)) in self.slots.iter().zip(self.pairs.iter()) {
            accumulator.add_pair(i, j, &slot.derivative(C::ORDER)?);
        }
        Ok(())
    }
}
