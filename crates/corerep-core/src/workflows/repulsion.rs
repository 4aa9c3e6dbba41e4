use crate::core::models::atoms::AtomSource;
use crate::core::pair::{Am1PairRepulsion, DerivativeOrder, MndoPairRepulsion, PairRepulsion};
use crate::core::params::ElementParameterTable;
use crate::engine::accumulator::{
    AtomicSecondDerivativeCollection, FullSecondDerivativeCollection, GradientCollection,
};
use crate::engine::config::{RepulsionConfig, RepulsionMethod};
use crate::engine::error::RepulsionError;
use crate::engine::table::RepulsionTable;
use tracing::{debug, info, instrument};

/// System-level derivatives in the layout selected by the requested order.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemDerivatives {
    None,
    Gradient(GradientCollection),
    Atomic(AtomicSecondDerivativeCollection),
    Full(FullSecondDerivativeCollection),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepulsionReport {
    pub method: RepulsionMethod,
    pub order: DerivativeOrder,
    pub atom_count: usize,
    pub pair_count: usize,
    /// Total core-core repulsion, in eV.
    pub energy: f64,
    pub derivatives: SystemDerivatives,
}

/// Keeps a table alive between geometry steps so later steps can recompute only the
/// pairs touched by moved atoms.
pub struct RepulsionDriver<P: PairRepulsion> {
    config: RepulsionConfig,
    table: RepulsionTable<P>,
}

impl<P: PairRepulsion> RepulsionDriver<P> {
    pub fn new<A: AtomSource>(
        atoms: &A,
        params: &ElementParameterTable,
        config: RepulsionConfig,
    ) -> Result<Self, RepulsionError> {
        let mut table = RepulsionTable::with_config(config.table);
        table.initialize(atoms, params)?;
        Ok(Self { config, table })
    }

    pub fn table(&self) -> &RepulsionTable<P> {
        &self.table
    }

    /// Recomputes every pair and reports at the configured order.
    pub fn compute<A: AtomSource>(&mut self, atoms: &A) -> Result<RepulsionReport, RepulsionError> {
        self.table.calculate_repulsion(atoms, self.config.order)?;
        self.report()
    }

    /// Recomputes only the pairs involving `moved`. Requires a prior [`compute`](Self::compute).
    pub fn update_moved<A: AtomSource>(
        &mut self,
        atoms: &A,
        moved: &[usize],
    ) -> Result<RepulsionReport, RepulsionError> {
        self.table.update_atoms(atoms, moved)?;
        self.report()
    }

    fn report(&self) -> Result<RepulsionReport, RepulsionError> {
        let energy = self.table.repulsion_energy()?;
        let derivatives = collect_derivatives(&self.table, self.config.order)?;
        debug!(energy, "Repulsion report assembled.");
        Ok(RepulsionReport {
            method: self.config.method,
            order: self.config.order,
            atom_count: self.table.atom_count(),
            pair_count: self.table.pair_count(),
            energy,
            derivatives,
        })
    }
}

/// Folds the table's derivatives into a fresh accumulator of the layout `order` names.
pub fn collect_derivatives<P: PairRepulsion>(
    table: &RepulsionTable<P>,
    order: DerivativeOrder,
) -> Result<SystemDerivatives, RepulsionError> {
    let n = table.atom_count();
    Ok(match order {
        DerivativeOrder::Energy => SystemDerivatives::None,
        DerivativeOrder::Gradient => {
            let mut acc = GradientCollection::new(n);
            table.add_repulsion_derivatives(&mut acc)?;
            SystemDerivatives::Gradient(acc)
        }
        DerivativeOrder::SecondAtomic => {
            let mut acc = AtomicSecondDerivativeCollection::new(n);
            table.add_repulsion_derivatives(&mut acc)?;
            SystemDerivatives::Atomic(acc)
        }
        DerivativeOrder::SecondFull => {
            let mut acc = FullSecondDerivativeCollection::new(n);
            table.add_repulsion_derivatives(&mut acc)?;
            SystemDerivatives::Full(acc)
        }
    })
}

pub fn run_with<P: PairRepulsion, A: AtomSource>(
    atoms: &A,
    params: &ElementParameterTable,
    config: &RepulsionConfig,
) -> Result<RepulsionReport, RepulsionError> {
    RepulsionDriver::<P>::new(atoms, params, *config)?.compute(atoms)
}

/// One-shot repulsion calculation with the family named in `config`.
#[instrument(skip_all, name = "repulsion_workflow", fields(method = %config.method, order = %config.order))]
pub fn run<A: AtomSource>(
    atoms: &A,
    params: &ElementParameterTable,
    config: &RepulsionConfig,
) -> Result<RepulsionReport, RepulsionError> {
    info!(
        atoms = atoms.atom_count(),
        parameters = params.name(),
        "Starting core-core repulsion calculation."
    );
    let report = match config.method {
        RepulsionMethod::Mndo => run_with::<MndoPairRepulsion, _>(atoms, params, config)?,
        RepulsionMethod::Am1 => run_with::<Am1PairRepulsion, _>(atoms, params, config)?,
    };
    info!(
        energy_ev = report.energy,
        pairs = report.pair_count,
        "Repulsion calculation complete."
    );
    Ok(report)
}
