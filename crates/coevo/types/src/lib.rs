#![deny(unsafe_code)]
//! # coevo-types
//!
//! Shared data model for the coevo playground: run configuration, candidate
//! function pairs, per-generation aggregates, the final report, and the run
//! lifecycle phases.

pub mod catalog;
pub mod config;
pub mod event;
pub mod generation;
pub mod pair;
pub mod phase;
pub mod report;

pub use catalog::{Dataset, ModelArch};
pub use config::{ConfigError, EvolutionConfig};
pub use event::RunEvent;
pub use generation::{best_of_log, GenerationData};
pub use pair::FunctionPair;
pub use phase::{PhaseError, RunPhase};
pub use report::FinalReport;
