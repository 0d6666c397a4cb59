use crate::generation::GenerationData;
use crate::report::FinalReport;
use serde::{Deserialize, Serialize};

/// Progress events published by the controller after each generation and at
/// the end of a run. Observers receive immutable snapshots only.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum RunEvent {
    GenerationCompleted(GenerationData),
    Finished(Box<FinalReport>),
}
