use super::IoError;
use super::traits::BoxFile;
use crate::core::models::atom::Atom;
use crate::core::models::environment::Environment;
use crate::core::models::molecule::Molecule;
use crate::core::models::system::SimulationBox;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

/// Checkpoint file: the environment plus every atom, enough to resume a run.
///
/// The on-disk layout is a TOML document:
///
/// ```toml
/// step = 1000
///
/// [environment]
/// box = [55.0, 55.0, 55.0]
/// # ...
///
/// [[molecules]]
/// id = 0
///
/// [[molecules.atoms]]
/// id = 0
/// name = "O"
/// type = "OW"
/// position = [1.0, 2.0, 3.0]
/// sigma = 3.15365
/// epsilon = 0.155
/// charge = 0.0
/// ```
pub struct StateFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateMetadata {
    /// The step at which the snapshot was taken; a resumed run starts here.
    pub step: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StateDocument {
    step: usize,
    environment: Environment,
    molecules: Vec<MoleculeRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct MoleculeRecord {
    id: usize,
    atoms: Vec<AtomRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct AtomRecord {
    id: usize,
    name: String,
    #[serde(rename = "type")]
    atom_type: String,
    position: [f64; 3],
    sigma: f64,
    epsilon: f64,
    charge: f64,
}

impl From<&Atom> for AtomRecord {
    fn from(atom: &Atom) -> Self {
        Self {
            id: atom.id,
            name: atom.name.clone(),
            atom_type: atom.atom_type.clone(),
            position: [atom.position.x, atom.position.y, atom.position.z],
            sigma: atom.sigma,
            epsilon: atom.epsilon,
            charge: atom.charge,
        }
    }
}

impl From<AtomRecord> for Atom {
    fn from(record: AtomRecord) -> Self {
        let [x, y, z] = record.position;
        Atom::new(record.id, &record.name, &record.atom_type, Point3::new(x, y, z)).with_parameters(
            record.sigma,
            record.epsilon,
            record.charge,
        )
    }
}

impl BoxFile for StateFile {
    type Metadata = StateMetadata;
    type Error = IoError;

    fn read_from(reader: &mut impl BufRead) -> Result<(SimulationBox, Self::Metadata), Self::Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        let document: StateDocument = toml::from_str(&content)?;

        let molecules = document
            .molecules
            .into_iter()
            .map(|m| Molecule::new(m.id, m.atoms.into_iter().map(Atom::from).collect()))
            .collect();
        let sim_box = SimulationBox::new(document.environment, molecules)?;

        Ok((sim_box, StateMetadata { step: document.step }))
    }

    fn write_to(
        sim_box: &SimulationBox,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let document = StateDocument {
            step: metadata.step,
            environment: sim_box.environment().clone(),
            molecules: sim_box
                .molecules()
                .iter()
                .map(|m| MoleculeRecord {
                    id: m.id,
                    atoms: m.atoms().iter().map(AtomRecord::from).collect(),
                })
                .collect(),
        };
        let text = toml::to_string(&document)?;
        writer.write_all(text.as_bytes())?;
        Ok(())
    }
}
