//! # Core Models Module
//!
//! Data structures describing the simulated system.
//!
//! ## Key Components
//!
//! - [`atom`] - A single interaction site with its type tag, position and force-field parameters
//! - [`molecule`] - An ordered, rigid group of atoms moved as one unit
//! - [`environment`] - Box geometry, temperature, cutoff, step sizes and seed
//! - [`system`] - The [`system::SimulationBox`] that owns every molecule and the pending move
//!
//! ## Usage
//!
//! ```ignore
//! use metrosim::core::models::{atom::Atom, molecule::Molecule, system::SimulationBox};
//!
//! let water = Molecule::new(0, vec![Atom::new(0, "O", "OW", Point3::new(1.0, 1.0, 1.0))]);
//! let sim_box = SimulationBox::new(environment, vec![water])?;
//! ```

pub mod atom;
pub mod environment;
pub mod molecule;
pub mod system;
