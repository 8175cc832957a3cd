use nalgebra::Point3;

/// Represents a single interaction site of a molecule.
///
/// Besides its identity and position, an atom carries the non-bonded parameters
/// used by the pair potential. These are resolved once from the force-field table
/// when the box is built so that energy evaluation never needs a lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Box-wide identifier, assigned sequentially across all molecules.
    pub id: usize,
    /// The atom name (e.g., "O", "H1").
    pub name: String,
    /// The force-field type tag used to look up parameters (e.g., "OW").
    pub atom_type: String,
    /// Cartesian position in Angstroms.
    pub position: Point3<f64>,
    /// Lennard-Jones diameter in Angstroms.
    pub sigma: f64,
    /// Lennard-Jones well depth in kcal/mol.
    pub epsilon: f64,
    /// Partial charge in elementary charge units.
    pub charge: f64,
}

impl Atom {
    /// Creates a new `Atom` with zeroed non-bonded parameters.
    ///
    /// # Arguments
    ///
    /// * `id` - The box-wide identifier of the atom.
    /// * `name` - The name of the atom.
    /// * `atom_type` - The force-field type tag.
    /// * `position` - The Cartesian position in Angstroms.
    pub fn new(id: usize, name: &str, atom_type: &str, position: Point3<f64>) -> Self {
        Self {
            id,
            name: name.to_string(),
            atom_type: atom_type.to_string(),
            position,
            sigma: 0.0,
            epsilon: 0.0,
            charge: 0.0,
        }
    }

    /// Returns the atom with the given Lennard-Jones and Coulomb parameters.
    pub fn with_parameters(mut self, sigma: f64, epsilon: f64, charge: f64) -> Self {
        self.sigma = sigma;
        self.epsilon = epsilon;
        self.charge = charge;
        self
    }
}
