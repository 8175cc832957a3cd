//! Rigid-body move sampling and the undo record that makes a move reversible.
//!
//! A move goes through an explicit lifecycle: it is [`MoveState::Proposed`] when the
//! pre-move positions are captured, then either [`MoveState::Committed`] (the record is
//! discarded) or [`MoveState::RolledBack`] (the saved positions are written back).

use super::models::molecule::Molecule;
use super::utils::geometry::{rotation_from_degrees, wrap_shift};
use nalgebra::{Point3, Vector3};
use rand::Rng;

/// A random rigid-body displacement: a rotation about the primary atom followed by a
/// translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidMove {
    pub translation: Vector3<f64>,
    /// Rotation angles about x, y and z in degrees.
    pub rotation_degrees: Vector3<f64>,
}

impl RigidMove {
    /// Draws a move with every translation component in `[-max_translation, max_translation]`
    /// and every rotation angle in `[-max_rotation, max_rotation]`.
    ///
    /// Exactly six uniform draws are consumed, in the order tx, ty, tz, rx, ry, rz.
    pub fn sample<R: Rng>(rng: &mut R, max_translation: f64, max_rotation: f64) -> Self {
        let mut draw = |max: f64| rng.gen_range(-max..=max);
        let translation = Vector3::new(
            draw(max_translation),
            draw(max_translation),
            draw(max_translation),
        );
        let rotation_degrees = Vector3::new(draw(max_rotation), draw(max_rotation), draw(max_rotation));
        Self {
            translation,
            rotation_degrees,
        }
    }

    /// Applies the move to `molecule`, then shifts the whole molecule by whole box
    /// lengths so that its primary atom lies inside the box.
    pub fn apply(&self, molecule: &mut Molecule, primary_atom_index: usize, dimensions: &[f64; 3]) {
        let Some(pivot) = molecule.position_of(primary_atom_index) else {
            return;
        };
        let rotation = rotation_from_degrees(
            self.rotation_degrees.x,
            self.rotation_degrees.y,
            self.rotation_degrees.z,
        );
        molecule.rotate_about(&pivot, &rotation);
        molecule.translate(&self.translation);
        wrap_molecule(molecule, primary_atom_index, dimensions);
    }
}

/// Shifts `molecule` by whole box lengths so that its primary atom lies in `[0, L)`.
///
/// The molecule is kept intact rather than wrapping atoms one by one.
pub fn wrap_molecule(molecule: &mut Molecule, primary_atom_index: usize, dimensions: &[f64; 3]) {
    if let Some(anchor) = molecule.position_of(primary_atom_index) {
        let shift = wrap_shift(&anchor, dimensions);
        if shift != Vector3::zeros() {
            molecule.translate(&shift);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveState {
    Proposed,
    Committed,
    RolledBack,
}

/// The minimal undo information for one proposed move: the moved molecule's index and
/// its atom positions before the mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveRecord {
    molecule: usize,
    saved_positions: Vec<Point3<f64>>,
    state: MoveState,
}

impl MoveRecord {
    /// Captures the current positions of `molecule`, which sits at `index` in its box.
    pub fn capture(index: usize, molecule: &Molecule) -> Self {
        Self {
            molecule: index,
            saved_positions: molecule.positions(),
            state: MoveState::Proposed,
        }
    }

    pub fn molecule(&self) -> usize {
        self.molecule
    }

    pub fn state(&self) -> MoveState {
        self.state
    }

    pub fn saved_positions(&self) -> &[Point3<f64>] {
        &self.saved_positions
    }

    /// Accepts the move; the saved positions are dropped with the record.
    pub fn commit(mut self) -> MoveState {
        debug_assert_eq!(self.state, MoveState::Proposed);
        self.state = MoveState::Committed;
        self.state
    }

    /// Rejects the move and writes the saved positions back into `molecule`.
    pub fn restore(mut self, molecule: &mut Molecule) -> MoveState {
        debug_assert_eq!(self.state, MoveState::Proposed);
        molecule.set_positions(&self.saved_positions);
        self.state = MoveState::RolledBack;
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const BOX: [f64; 3] = [20.0, 20.0, 20.0];

    fn dimer() -> Molecule {
        Molecule::new(
            0,
            vec![
                Atom::new(0, "C1", "CT", Point3::new(5.0, 5.0, 5.0)),
                Atom::new(1, "C2", "CT", Point3::new(6.5, 5.0, 5.0)),
            ],
        )
    }

    #[test]
    fn sample_respects_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let mv = RigidMove::sample(&mut rng, 0.15, 15.0);
            assert!(mv.translation.iter().all(|t| t.abs() <= 0.15));
            assert!(mv.rotation_degrees.iter().all(|r| r.abs() <= 15.0));
        }
    }

    #[test]
    fn sample_with_zero_bounds_is_identity() {
        let mut rng = StdRng::seed_from_u64(7);
        let mv = RigidMove::sample(&mut rng, 0.0, 0.0);
        let mut mol = dimer();
        mv.apply(&mut mol, 0, &BOX);
        assert_eq!(mol, dimer());
    }

    #[test]
    fn sample_is_reproducible_for_a_seed() {
        let a = RigidMove::sample(&mut StdRng::seed_from_u64(42), 1.0, 10.0);
        let b = RigidMove::sample(&mut StdRng::seed_from_u64(42), 1.0, 10.0);
        assert_eq!(a, b);
    }

    #[test]
    fn apply_preserves_intramolecular_distances() {
        let mv = RigidMove {
            translation: Vector3::new(0.1, -0.1, 0.05),
            rotation_degrees: Vector3::new(12.0, -7.0, 3.0),
        };
        let mut mol = dimer();
        mv.apply(&mut mol, 0, &BOX);
        let d = (mol.atoms()[1].position - mol.atoms()[0].position).norm();
        assert!((d - 1.5).abs() < 1e-12);
        assert!((mol.atoms()[0].position - Point3::new(5.1, 4.9, 5.05)).norm() < 1e-12);
    }

    #[test]
    fn apply_wraps_molecule_by_primary_atom() {
        let mv = RigidMove {
            translation: Vector3::new(-5.5, 0.0, 0.0),
            rotation_degrees: Vector3::zeros(),
        };
        let mut mol = dimer();
        mv.apply(&mut mol, 0, &BOX);
        assert!((mol.atoms()[0].position.x - 19.5).abs() < 1e-12);
        assert!((mol.atoms()[1].position.x - 21.0).abs() < 1e-12);
    }

    #[test]
    fn restore_returns_exact_positions() {
        let mut mol = dimer();
        let record = MoveRecord::capture(0, &mol);
        assert_eq!(record.state(), MoveState::Proposed);

        RigidMove::sample(&mut StdRng::seed_from_u64(1), 0.5, 30.0).apply(&mut mol, 0, &BOX);
        assert_ne!(mol, dimer());

        assert_eq!(record.restore(&mut mol), MoveState::RolledBack);
        assert_eq!(mol, dimer());
    }

    #[test]
    fn commit_marks_record_committed() {
        let record = MoveRecord::capture(4, &dimer());
        assert_eq!(record.molecule(), 4);
        assert_eq!(record.saved_positions().len(), 2);
        assert_eq!(record.commit(), MoveState::Committed);
    }
}
