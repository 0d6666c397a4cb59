use crate::pair::FunctionPair;
use serde::{Deserialize, Serialize};

/// Aggregates recorded after one completed generation. Append-only: once a
/// generation is in the log it is never revised.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationData {
    /// 1-based, monotonically increasing, gapless.
    pub generation: u32,
    /// Best pair of the generation's population, by accuracy descending.
    pub best_pair: FunctionPair,
    pub avg_accuracy: f64,
    pub avg_f1: f64,
    pub avg_convergence: f64,
}

impl GenerationData {
    /// Compute the snapshot for a population. Returns `None` for an empty
    /// population, which a validated run never produces.
    pub fn from_population(generation: u32, population: &[FunctionPair]) -> Option<Self> {
        let best_pair = population
            .iter()
            .max_by(|a, b| {
                a.accuracy
                    .partial_cmp(&b.accuracy)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?
            .clone();

        let n = population.len() as f64;
        Some(Self {
            generation,
            best_pair,
            avg_accuracy: population.iter().map(|p| p.accuracy).sum::<f64>() / n,
            avg_f1: population.iter().map(|p| p.f1).sum::<f64>() / n,
            avg_convergence: population.iter().map(|p| p.convergence).sum::<f64>() / n,
        })
    }
}

/// Best pair across a whole log by maximum accuracy; the first occurrence
/// wins ties.
pub fn best_of_log(log: &[GenerationData]) -> Option<&FunctionPair> {
    let mut best: Option<&FunctionPair> = None;
    for entry in log {
        match best {
            Some(current) if entry.best_pair.accuracy <= current.accuracy => {}
            _ => best = Some(&entry.best_pair),
        }
    }
    best
}
