use coevo_types::{ConfigError, PhaseError};

/// Errors returned by the controller's public contract.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Phase(#[from] PhaseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
