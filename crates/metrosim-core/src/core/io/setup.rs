use crate::core::forcefield::params::{ForcefieldParams, ParamLoadError};
use crate::core::models::atom::Atom;
use crate::core::models::environment::Environment;
use crate::core::models::molecule::Molecule;
use crate::core::models::system::{BoxError, SimulationBox};
use crate::core::utils::geometry::{minimum_image_distance, rotation_from_degrees, wrap_shift};
use nalgebra::{Point3, Vector3};
use rand::Rng;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Closest allowed approach of two primary atoms when placing molecules, in Angstroms.
pub const MIN_PLACEMENT_DISTANCE: f64 = 2.0;
const MAX_PLACEMENT_ATTEMPTS: usize = 1000;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Failed to read molecule template '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse molecule template '{path}': {source}")]
    Template {
        path: String,
        source: toml::de::Error,
    },

    #[error("Molecule template contains no atoms")]
    EmptyTemplate,

    #[error("Force-field parameters: {0}")]
    Parameters(#[from] ParamLoadError),

    #[error("Invalid box: {0}")]
    Box(#[from] BoxError),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateAtom {
    pub name: String,
    #[serde(rename = "type")]
    pub atom_type: String,
    /// Position relative to the template origin, in Angstroms.
    pub position: [f64; 3],
}

/// A rigid molecule geometry that is replicated to fill a box.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoleculeTemplate {
    #[serde(default)]
    pub name: Option<String>,
    pub atoms: Vec<TemplateAtom>,
}

impl MoleculeTemplate {
    pub fn from_path(path: &Path) -> Result<Self, SetupError> {
        let content = std::fs::read_to_string(path).map_err(|e| SetupError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| SetupError::Template {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    fn centered_positions(&self) -> Vec<Vector3<f64>> {
        let n = self.atoms.len() as f64;
        let sum = self
            .atoms
            .iter()
            .fold(Vector3::zeros(), |acc, a| acc + Vector3::from(a.position));
        let center = sum / n;
        self.atoms
            .iter()
            .map(|a| Vector3::from(a.position) - center)
            .collect()
    }
}

/// Fills a box with `environment.molecule_count` copies of `template`.
///
/// Each copy gets a uniformly random orientation and a uniformly random position. A
/// placement whose primary atom comes closer than [`MIN_PLACEMENT_DISTANCE`] to an
/// already placed primary atom is redrawn; after too many attempts the last draw is
/// kept with a warning. Atom ids run sequentially across the whole box and molecule
/// ids equal their index.
///
/// # Errors
///
/// Fails if the template is empty, an atom type has no parameters, or the resulting
/// box is invalid.
pub fn build_box<R: Rng>(
    environment: Environment,
    template: &MoleculeTemplate,
    params: &ForcefieldParams,
    rng: &mut R,
) -> Result<SimulationBox, SetupError> {
    if template.atoms.is_empty() {
        return Err(SetupError::EmptyTemplate);
    }
    environment.validate().map_err(BoxError::InvalidEnvironment)?;
    if environment.primary_atom_index >= template.atoms.len() {
        return Err(BoxError::PrimaryAtomOutOfRange {
            molecule: 0,
            atoms: template.atoms.len(),
            primary: environment.primary_atom_index,
        }
        .into());
    }

    let parameters = template
        .atoms
        .iter()
        .map(|a| params.require(&a.atom_type).copied())
        .collect::<Result<Vec<_>, _>>()?;
    let local = template.centered_positions();
    let dims = environment.dimensions;
    let primary = environment.primary_atom_index;

    info!(
        molecules = environment.molecule_count,
        atoms_per_molecule = local.len(),
        "Placing molecules in a {:?} box.",
        dims
    );

    let mut anchors: Vec<Point3<f64>> = Vec::with_capacity(environment.molecule_count);
    let mut molecules = Vec::with_capacity(environment.molecule_count);
    let mut next_atom_id = 0;

    for index in 0..environment.molecule_count {
        let mut attempts = 0;
        let positions = loop {
            attempts += 1;
            let candidate = random_placement(&local, &dims, rng);
            let anchor = candidate[primary];
            let clear = anchors
                .iter()
                .all(|other| minimum_image_distance(other, &anchor, &dims) >= MIN_PLACEMENT_DISTANCE);
            if clear {
                break candidate;
            }
            if attempts >= MAX_PLACEMENT_ATTEMPTS {
                warn!(
                    molecule = index,
                    "No overlap-free position found after {} attempts; keeping the last one.",
                    attempts
                );
                break candidate;
            }
        };
        debug!(molecule = index, attempts, "Placed molecule.");

        let shift = wrap_shift(&positions[primary], &dims);
        anchors.push(positions[primary] + shift);

        let atoms = template
            .atoms
            .iter()
            .zip(&parameters)
            .zip(positions)
            .map(|((template_atom, p), position)| {
                let atom = Atom::new(
                    next_atom_id,
                    &template_atom.name,
                    &template_atom.atom_type,
                    position,
                )
                .with_parameters(p.sigma, p.epsilon, p.charge);
                next_atom_id += 1;
                atom
            })
            .collect();
        molecules.push(Molecule::new(index, atoms));
    }

    Ok(SimulationBox::new(environment, molecules)?)
}

/// Rotates the centered template uniformly at random and moves its center to a
/// uniformly random point of the box. Consumes six draws: three angles, then x, y, z.
fn random_placement<R: Rng>(
    local: &[Vector3<f64>],
    dims: &[f64; 3],
    rng: &mut R,
) -> Vec<Point3<f64>> {
    let rotation = rotation_from_degrees(
        rng.gen_range(0.0..360.0),
        rng.gen_range(0.0..360.0),
        rng.gen_range(0.0..360.0),
    );
    let center = Point3::new(
        rng.gen_range(0.0..dims[0]),
        rng.gen_range(0.0..dims[1]),
        rng.gen_range(0.0..dims[2]),
    );
    local.iter().map(|offset| center + rotation * offset).collect()
}
