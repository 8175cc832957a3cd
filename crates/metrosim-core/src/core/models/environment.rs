use serde::{Deserialize, Serialize};

/// Boltzmann constant in kcal/(mol·K).
pub const BOLTZMANN_KCAL_PER_MOL_K: f64 = 1.987206504191549e-3;

/// Run-wide physical and sampling parameters.
///
/// The environment is fixed for the duration of a run. It is serialized verbatim into
/// checkpoint files so that a resumed run sees exactly the same box, temperature and
/// step sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Environment {
    /// Box edge lengths (x, y, z) in Angstroms.
    #[serde(rename = "box")]
    pub dimensions: [f64; 3],
    /// Temperature in Kelvin.
    pub temperature: f64,
    /// Largest displacement along each axis for a single move, in Angstroms.
    pub max_translation: f64,
    /// Largest rotation about each axis for a single move, in degrees.
    pub max_rotation: f64,
    /// Molecule-molecule interaction cutoff, measured between primary atoms, in Angstroms.
    pub cutoff: f64,
    /// Seed of the run's random stream.
    pub seed: u64,
    /// Number of molecules in the box.
    pub molecule_count: usize,
    /// Index (within each molecule) of the atom that anchors cutoffs, rotations and wrapping.
    pub primary_atom_index: usize,
}

impl Environment {
    /// Returns the thermal energy kB·T in kcal/mol.
    #[inline]
    pub fn kt(&self) -> f64 {
        BOLTZMANN_KCAL_PER_MOL_K * self.temperature
    }

    /// Checks that every field describes a physically meaningful run.
    ///
    /// # Errors
    ///
    /// Returns a human-readable description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(axis) = self.dimensions.iter().position(|&d| !(d.is_finite() && d > 0.0)) {
            return Err(format!(
                "box dimension {} must be positive, got {}",
                ["x", "y", "z"][axis],
                self.dimensions[axis]
            ));
        }
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(format!(
                "temperature must be positive, got {}",
                self.temperature
            ));
        }
        if !(self.max_translation.is_finite() && self.max_translation >= 0.0) {
            return Err(format!(
                "max translation must be non-negative, got {}",
                self.max_translation
            ));
        }
        if !(self.max_rotation.is_finite() && self.max_rotation >= 0.0) {
            return Err(format!(
                "max rotation must be non-negative, got {}",
                self.max_rotation
            ));
        }
        if !(self.cutoff > 0.0) {
            return Err(format!("cutoff must be positive, got {}", self.cutoff));
        }
        if self.molecule_count == 0 {
            return Err("molecule count must be at least 1".to_string());
        }
        Ok(())
    }
}
