use metrosim::engine::evaluator::Backend;

/// Values used when neither the config file nor the command line sets a field.
pub struct DefaultsConfig {
    pub steps: usize,
    pub backend: Backend,
    pub status_interval: usize,
    pub state_interval: usize,
    pub save_final_state: bool,
    pub energy_tolerance: f64,
    pub include_intramolecular: bool,
    pub primary_atom_index: usize,
    pub output_dir: &'static str,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            steps: 1000,
            backend: Backend::Sequential,
            status_interval: 100,
            state_interval: 0,
            save_final_state: true,
            energy_tolerance: 1e-3,
            include_intramolecular: false,
            primary_atom_index: 0,
            output_dir: ".",
        }
    }
}
