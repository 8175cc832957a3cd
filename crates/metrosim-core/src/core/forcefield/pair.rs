use super::potentials::{coulomb, geometric_mean, lennard_jones_12_6};
use crate::core::models::atom::Atom;

/// The energy of a single atom pair.
///
/// Implementations must be deterministic and commutative in their two atom
/// arguments. `distance` is the minimum-image separation in Angstroms. Evaluators
/// call the potential from many threads at once, hence the `Send + Sync` bound.
pub trait PairPotential: Send + Sync {
    fn energy(&self, a: &Atom, b: &Atom, distance: f64) -> f64;
}

/// 12-6 Lennard-Jones plus Coulomb, with geometric-mean mixing of sigma and epsilon.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LennardJonesCoulomb;

impl PairPotential for LennardJonesCoulomb {
    #[inline]
    fn energy(&self, a: &Atom, b: &Atom, distance: f64) -> f64 {
        let sigma = geometric_mean(a.sigma, b.sigma);
        let epsilon = geometric_mean(a.epsilon, b.epsilon);
        lennard_jones_12_6(distance, sigma, epsilon) + coulomb(distance, a.charge, b.charge)
    }
}

impl<F> PairPotential for F
where
    F: Fn(&Atom, &Atom, f64) -> f64 + Send + Sync,
{
    #[inline]
    fn energy(&self, a: &Atom, b: &Atom, distance: f64) -> f64 {
        self(a, b, distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn oxygen(charge: f64) -> Atom {
        Atom::new(0, "O", "OW", Point3::origin()).with_parameters(3.15, 0.155, charge)
    }

    #[test]
    fn lennard_jones_coulomb_is_commutative() {
        let a = oxygen(-0.8);
        let b = Atom::new(1, "H", "HW", Point3::origin()).with_parameters(0.0, 0.0, 0.4);
        let potential = LennardJonesCoulomb;
        assert_eq!(potential.energy(&a, &b, 2.3), potential.energy(&b, &a, 2.3));
    }

    #[test]
    fn hydrogen_without_lj_parameters_contributes_only_coulomb() {
        let a = oxygen(-0.8);
        let b = Atom::new(1, "H", "HW", Point3::origin()).with_parameters(0.0, 0.0, 0.4);
        let e = LennardJonesCoulomb.energy(&a, &b, 2.0);
        assert!((e - 332.06 * -0.8 * 0.4 / 2.0).abs() < 1e-9);
    }

    #[test]
    fn neutral_like_atoms_attract_beyond_minimum() {
        let a = oxygen(0.0);
        let e = LennardJonesCoulomb.energy(&a, &a, 4.0);
        assert!(e < 0.0);
    }

    #[test]
    fn closures_act_as_pair_potentials() {
        let product = |a: &Atom, b: &Atom, _d: f64| a.charge * b.charge;
        let a = oxygen(2.0);
        let b = oxygen(3.0);
        assert_eq!(product.energy(&a, &b, 1.0), 6.0);
    }
}
