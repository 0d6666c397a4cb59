use crate::config::EvolutionConfig;
use crate::generation::GenerationData;
use crate::pair::FunctionPair;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Terminal artifact of a run, created exactly once when the run ends by
/// budget exhaustion or cancellation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FinalReport {
    pub run_id: Uuid,
    pub config: EvolutionConfig,
    /// Best pair across the whole run by maximum accuracy; first seen wins
    /// ties.
    pub best_pair: FunctionPair,
    /// Full generation history, one entry per completed generation.
    pub history: Vec<GenerationData>,
    /// Summarizer prose, or the static fallback paragraph.
    pub summary: String,
    pub finished_at: DateTime<Utc>,
}

impl FinalReport {
    /// Number of generations that completed before the run ended.
    pub fn generations_completed(&self) -> u32 {
        self.history.len() as u32
    }
}
