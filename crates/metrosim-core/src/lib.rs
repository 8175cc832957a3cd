//! # metrosim Core Library
//!
//! A Monte Carlo molecular simulation engine. Starting from a periodic box of rigid
//! molecules, it repeatedly proposes a random rigid-body move, evaluates the change in
//! potential energy of the moved molecule, and accepts or rolls back the move according
//! to the Metropolis criterion.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Data models (`Atom`, `Molecule`, `Environment`,
//!   `SimulationBox`), periodic geometry, rigid-body move sampling, the pluggable pair
//!   potential, and file I/O for checkpoints and trajectories.
//!
//! - **[`engine`]: The Logic Core.** The two interchangeable energy evaluators
//!   (sequential and data-parallel), the triangular pair index that lets parallel
//!   workers write results without contention, and the Metropolis driver that ties
//!   proposal, evaluation and acceptance together.
//!
//! - **[`workflows`]: The Public API.** Complete runs: build or resume a box, pick a
//!   backend, drive the simulation and hand checkpoints and reports to the file sink.

pub mod core;
pub mod engine;
pub mod workflows;
