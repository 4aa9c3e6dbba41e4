use corerep::core::pair::DerivativeOrder;
use corerep::engine::config::{RepulsionMethod, TableConfig};

pub struct DefaultsConfig {
    pub method: RepulsionMethod,
    pub order: DerivativeOrder,
    pub min_pairs_per_task: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            method: RepulsionMethod::default(),
            order: DerivativeOrder::Energy,
            min_pairs_per_task: TableConfig::default().min_pairs_per_task,
        }
    }
}
