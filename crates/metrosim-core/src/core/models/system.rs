use super::environment::Environment;
use super::molecule::Molecule;
use crate::core::moves::{MoveRecord, MoveState, RigidMove, wrap_molecule};
use rand::Rng;
use thiserror::Error;
use tracing::{trace, warn};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BoxError {
    #[error("Invalid environment: {0}")]
    InvalidEnvironment(String),

    #[error("Environment declares {expected} molecules but {found} were provided")]
    MoleculeCountMismatch { expected: usize, found: usize },

    #[error("Molecule {molecule} contains no atoms")]
    EmptyMolecule { molecule: usize },

    #[error(
        "Primary atom index {primary} is out of range for molecule {molecule} with {atoms} atoms"
    )]
    PrimaryAtomOutOfRange {
        molecule: usize,
        atoms: usize,
        primary: usize,
    },

    #[error("Molecule index {index} is out of range for a box of {count} molecules")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Cannot move molecule {requested} while the move of molecule {pending} is unresolved")]
    MovePending { pending: usize, requested: usize },
}

/// The molecular state store: every molecule of the run plus its environment.
///
/// The number of molecules and the atom count of each molecule are fixed at
/// construction. Positions change only through [`SimulationBox::apply_move`], which
/// records the pre-move positions so that the move can be rolled back exactly.
#[derive(Debug, Clone)]
pub struct SimulationBox {
    environment: Environment,
    molecules: Vec<Molecule>,
    pending_move: Option<MoveRecord>,
}

impl SimulationBox {
    /// Builds a box from an environment and an ordered list of molecules.
    ///
    /// Every molecule is shifted by whole box lengths so that its primary atom lies
    /// inside the box.
    ///
    /// # Errors
    ///
    /// Returns a [`BoxError`] if the environment is invalid, the molecule count differs
    /// from the environment's, a molecule is empty, or the primary atom index does not
    /// exist in some molecule.
    pub fn new(environment: Environment, mut molecules: Vec<Molecule>) -> Result<Self, BoxError> {
        environment
            .validate()
            .map_err(BoxError::InvalidEnvironment)?;

        if molecules.len() != environment.molecule_count {
            return Err(BoxError::MoleculeCountMismatch {
                expected: environment.molecule_count,
                found: molecules.len(),
            });
        }

        for (index, molecule) in molecules.iter_mut().enumerate() {
            if molecule.is_empty() {
                return Err(BoxError::EmptyMolecule { molecule: index });
            }
            if environment.primary_atom_index >= molecule.len() {
                return Err(BoxError::PrimaryAtomOutOfRange {
                    molecule: index,
                    atoms: molecule.len(),
                    primary: environment.primary_atom_index,
                });
            }
            wrap_molecule(
                molecule,
                environment.primary_atom_index,
                &environment.dimensions,
            );
        }

        Ok(Self {
            environment,
            molecules,
            pending_move: None,
        })
    }

    pub fn molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    pub fn molecule(&self, index: usize) -> Option<&Molecule> {
        self.molecules.get(index)
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn molecule_count(&self) -> usize {
        self.molecules.len()
    }

    pub fn atom_count(&self) -> usize {
        self.molecules.iter().map(Molecule::len).sum()
    }

    /// The undo record of the move currently awaiting commit or rollback, if any.
    pub fn pending_move(&self) -> Option<&MoveRecord> {
        self.pending_move.as_ref()
    }

    /// Picks a molecule uniformly at random, consuming one draw from `rng`.
    pub fn choose_molecule_index<R: Rng>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.molecules.len())
    }

    /// Applies a random rigid-body move to the molecule at `index`.
    ///
    /// The pre-move positions are kept as the pending move until [`Self::commit`] or
    /// [`Self::rollback`] resolves it.
    ///
    /// # Errors
    ///
    /// Returns [`BoxError::IndexOutOfRange`] for an invalid index and
    /// [`BoxError::MovePending`] if the previous move was never resolved. In both cases
    /// the box is left untouched and no random draws are consumed.
    pub fn apply_move<R: Rng>(&mut self, index: usize, rng: &mut R) -> Result<RigidMove, BoxError> {
        if index >= self.molecules.len() {
            return Err(BoxError::IndexOutOfRange {
                index,
                count: self.molecules.len(),
            });
        }
        if let Some(pending) = &self.pending_move {
            return Err(BoxError::MovePending {
                pending: pending.molecule(),
                requested: index,
            });
        }

        let env = &self.environment;
        let rigid_move = RigidMove::sample(rng, env.max_translation, env.max_rotation);
        let molecule = &mut self.molecules[index];

        self.pending_move = Some(MoveRecord::capture(index, molecule));
        rigid_move.apply(molecule, env.primary_atom_index, &env.dimensions);
        trace!(molecule = index, ?rigid_move, "Applied rigid-body move.");

        Ok(rigid_move)
    }

    /// Accepts the pending move of the molecule at `index`.
    ///
    /// Committing without a matching pending move is an internal consistency violation:
    /// it panics in debug builds and is a logged no-op in release builds.
    pub fn commit(&mut self, index: usize) -> Option<MoveState> {
        let record = self.take_pending(index, "commit")?;
        Some(record.commit())
    }

    /// Restores the molecule at `index` to its positions before the pending move.
    ///
    /// Must be called at most once per [`Self::apply_move`]. Rolling back without a
    /// matching pending move panics in debug builds and is a logged no-op in release
    /// builds.
    pub fn rollback(&mut self, index: usize) -> Option<MoveState> {
        let record = self.take_pending(index, "rollback")?;
        Some(record.restore(&mut self.molecules[index]))
    }

    fn take_pending(&mut self, index: usize, action: &str) -> Option<MoveRecord> {
        match self.pending_move.take() {
            Some(record) if record.molecule() == index => Some(record),
            Some(record) => {
                debug_assert!(
                    false,
                    "{} requested for molecule {} but the pending move belongs to molecule {}",
                    action,
                    index,
                    record.molecule()
                );
                warn!(
                    "Ignoring {} of molecule {}: pending move belongs to molecule {}.",
                    action,
                    index,
                    record.molecule()
                );
                self.pending_move = Some(record);
                None
            }
            None => {
                debug_assert!(
                    false,
                    "{} requested for molecule {} with no pending move",
                    action, index
                );
                warn!(
                    "Ignoring {} of molecule {}: no move is pending.",
                    action, index
                );
                None
            }
        }
    }
}
