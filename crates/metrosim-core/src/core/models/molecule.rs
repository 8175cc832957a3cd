use super::atom::Atom;
use nalgebra::{Point3, Rotation3, Vector3};

/// An ordered group of atoms moved as one rigid unit.
///
/// The atom list is fixed at construction: atom order drives per-atom indexing and
/// output formatting, and the atom count never changes during a run. Positions can
/// only be changed through the rigid-body operations below.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    /// Index of the molecule within its box.
    pub id: usize,
    atoms: Vec<Atom>,
}

impl Molecule {
    pub fn new(id: usize, atoms: Vec<Atom>) -> Self {
        Self { id, atoms }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Position of the atom at `index`, or `None` if the molecule is shorter.
    pub fn position_of(&self, index: usize) -> Option<Point3<f64>> {
        self.atoms.get(index).map(|a| a.position)
    }

    /// Copies out every atom position in atom order.
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|a| a.position).collect()
    }

    /// Overwrites every atom position in atom order.
    ///
    /// The slice must hold exactly one position per atom.
    pub(crate) fn set_positions(&mut self, positions: &[Point3<f64>]) {
        debug_assert_eq!(positions.len(), self.atoms.len());
        for (atom, &p) in self.atoms.iter_mut().zip(positions) {
            atom.position = p;
        }
    }

    pub fn translate(&mut self, offset: &Vector3<f64>) {
        for atom in &mut self.atoms {
            atom.position += offset;
        }
    }

    /// Rotates every atom about `pivot`.
    pub fn rotate_about(&mut self, pivot: &Point3<f64>, rotation: &Rotation3<f64>) {
        for atom in &mut self.atoms {
            atom.position = pivot + rotation * (atom.position - pivot);
        }
    }

}
