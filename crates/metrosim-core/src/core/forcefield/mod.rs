//! # Force Field Module
//!
//! Non-bonded interaction energies between pairs of atoms.
//!
//! ## Overview
//!
//! The simulation engine treats the energy of an atom pair as an opaque, deterministic
//! and commutative function of the two atoms and their minimum-image separation. That
//! contract is the [`pair::PairPotential`] trait; the default implementation combines a
//! 12-6 Lennard-Jones term with a Coulomb term.
//!
//! ## Key Components
//!
//! - [`params`] - Atom-type parameter table loaded from CSV
//! - [`potentials`] - Closed-form potential functions and mixing rules
//! - [`pair`] - The pluggable pair-potential trait and its default implementation

pub mod pair;
pub mod params;
pub(crate) mod potentials;
