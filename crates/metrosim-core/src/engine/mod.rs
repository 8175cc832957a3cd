//! # Engine Module
//!
//! The computational core of a Monte Carlo run: the energy evaluators, the pair index
//! that lets parallel workers write results independently, and the Metropolis driver.
//!
//! ## Overview
//!
//! A run is a strictly sequential chain of steps. Each step picks a molecule, measures
//! its interaction energy with the rest of the box, moves it, measures again and then
//! either keeps the move or restores the saved positions. Only the energy evaluations
//! fan out across threads, and only when the parallel backend is selected.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Run parameters, box source and output settings
//! - **Evaluation** ([`evaluator`]) - The [`evaluator::EnergyEvaluator`] trait and its
//!   sequential and parallel implementations
//! - **Driver** ([`metropolis`]) - The step loop, acceptance test and bookkeeping
//! - **Reporting** ([`sink`], [`progress`], [`state`]) - Checkpoint hooks, progress events
//!   and the end-of-run summary
//! - **Error Handling** ([`error`]) - Engine-level error type

pub mod config;
pub mod error;
pub mod evaluator;
pub mod metropolis;
pub mod progress;
pub mod sink;
pub mod state;
