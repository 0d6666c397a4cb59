#![deny(unsafe_code)]
//! # coevo-engine
//!
//! The evolution controller: seeds a population, advances it through a
//! bounded number of generations, publishes a snapshot after every
//! generation, and assembles the final report.
//!
//! One run task at a time owns the population and the log; observers only
//! ever see cloned snapshots. Cancellation is cooperative and observed at
//! generation boundaries, so an in-flight generation always completes and is
//! published before the loop exits.

pub mod controller;
pub mod error;
mod population;

pub use controller::{EvolutionController, RunStatus, DEFAULT_PACING};
pub use error::EngineError;
