//! # Core Module
//!
//! Fundamental building blocks of the simulation: the molecular state store, periodic
//! boundary geometry, move sampling, pair potentials and file formats.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, molecules, the run environment and the simulation box
//! - **Energy Functions** ([`forcefield`]) - Atom-type parameters and the pluggable pair potential
//! - **Rigid-Body Moves** ([`moves`]) - Random translation/rotation sampling and the undo record
//! - **File I/O** ([`io`]) - Box construction from templates, checkpoints and PDB trajectories
//! - **Geometry** ([`utils`]) - Minimum-image separations and periodic wrapping

pub mod forcefield;
pub mod io;
pub mod models;
pub mod moves;
pub mod utils;
