//! # Workflows Module
//!
//! Top-level entry points that run a complete simulation.
//!
//! ## Overview
//!
//! A workflow takes a [`crate::engine::config::SimulationConfig`], obtains the starting
//! box (either by replicating a molecule template or by reading a checkpoint), selects
//! the energy backend, drives the Metropolis loop and writes checkpoints, the trajectory
//! snapshot and the results file into the output directory.
//!
//! - **Simulation Workflow** ([`simulate`]) - Build or resume, run, verify energy drift
//! - **Results File** ([`report`]) - The key/value summary written at the end of a run

pub mod report;
pub mod simulate;
