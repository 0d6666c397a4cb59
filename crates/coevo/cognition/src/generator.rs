use crate::error::CognitionError;
use crate::gemini::GeminiClient;
use crate::prompt::PromptBuilder;
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One symbolic activation/loss expression pair as produced by a generator,
/// before any fitness is attached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymbolicPair {
    pub activation: String,
    pub loss: String,
}

/// Produces symbolic function pairs on demand.
///
/// May fail with a network/configuration error; callers substitute
/// [`fallback_pairs`] rather than propagating the failure into the run.
#[async_trait]
pub trait PairGenerator: Send + Sync {
    async fn generate(&self, count: usize) -> Result<Vec<SymbolicPair>, CognitionError>;
}

/// Generator backed by the Gemini structured-JSON endpoint.
pub struct GeminiPairGenerator {
    client: GeminiClient,
}

impl GeminiPairGenerator {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PairGenerator for GeminiPairGenerator {
    async fn generate(&self, count: usize) -> Result<Vec<SymbolicPair>, CognitionError> {
        let prompt = PromptBuilder::function_pairs(count);
        let raw = self.client.generate_json(&prompt).await?;
        parse_pairs(&raw)
    }
}

/// Parse a generator response into pairs, tolerating markdown code fences.
pub fn parse_pairs(raw: &str) -> Result<Vec<SymbolicPair>, CognitionError> {
    let trimmed = strip_fences(raw);
    let pairs: Vec<SymbolicPair> = serde_json::from_str(trimmed)
        .map_err(|e| CognitionError::MalformedResponse(format!("expected pair array: {}", e)))?;

    if pairs.is_empty() {
        return Err(CognitionError::MalformedResponse(
            "pair array was empty".to_string(),
        ));
    }
    if pairs
        .iter()
        .any(|p| p.activation.trim().is_empty() || p.loss.trim().is_empty())
    {
        return Err(CognitionError::MalformedResponse(
            "pair with empty expression".to_string(),
        ));
    }
    Ok(pairs)
}

fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Locally synthesized placeholder pairs, used when the generator fails.
///
/// A sigmoid-like activation with a random slope and a binary-cross-entropy
/// style loss with a random scale; plausible enough to render, nothing more.
pub fn fallback_pairs(count: usize, rng: &mut impl Rng) -> Vec<SymbolicPair> {
    (0..count)
        .map(|_| {
            let slope = rng.gen_range(0.0..2.0);
            let scale = rng.gen_range(0.0..1.0);
            SymbolicPair {
                activation: format!("x / (1 + exp(-{:.2}*x))", slope),
                loss: format!(
                    "-{:.2} * (y_true * log(y_pred) + (1 - y_true) * log(1 - y_pred))",
                    scale
                ),
            }
        })
        .collect()
}

/// Deterministic generator for tests and offline runs.
pub struct SimulatedPairGenerator;

const SIMULATED_ACTIVATIONS: [&str; 4] = [
    "max(0, x)",
    "x / (1 + exp(-x))",
    "tanh(x)",
    "log(1 + exp(x))",
];
const SIMULATED_LOSSES: [&str; 4] = [
    "-y_true * log(y_pred)",
    "(y_true - y_pred)^2",
    "max(0, 1 - y_true * y_pred)",
    "-(y_true * log(y_pred) + (1 - y_true) * log(1 - y_pred))",
];

#[async_trait]
impl PairGenerator for SimulatedPairGenerator {
    async fn generate(&self, count: usize) -> Result<Vec<SymbolicPair>, CognitionError> {
        Ok((0..count)
            .map(|i| SymbolicPair {
                activation: SIMULATED_ACTIVATIONS[i % SIMULATED_ACTIVATIONS.len()].to_string(),
                loss: SIMULATED_LOSSES[i % SIMULATED_LOSSES.len()].to_string(),
            })
            .collect())
    }
}

/// Generator that always fails, for exercising the fallback path.
pub struct FailingPairGenerator;

#[async_trait]
impl PairGenerator for FailingPairGenerator {
    async fn generate(&self, _count: usize) -> Result<Vec<SymbolicPair>, CognitionError> {
        Err(CognitionError::Transport(
            "simulated generator failure".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[tokio::test]
    async fn simulated_generator_returns_requested_count() {
        let pairs = SimulatedPairGenerator.generate(7).await.unwrap();
        assert_eq!(pairs.len(), 7);
        assert!(pairs.iter().all(|p| !p.activation.is_empty() && !p.loss.is_empty()));
    }

    #[tokio::test]
    async fn failing_generator_errors() {
        assert!(FailingPairGenerator.generate(1).await.is_err());
    }

    #[test]
    fn parse_plain_json_array() {
        let raw = r#"[{"activation": "tanh(x)", "loss": "-log(y_pred)"}]"#;
        let pairs = parse_pairs(raw).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].activation, "tanh(x)");
    }

    #[test]
    fn parse_fenced_json_array() {
        let raw = "```json\n[{\"activation\": \"sin(x)\", \"loss\": \"(y_true - y_pred)^2\"}]\n```";
        let pairs = parse_pairs(raw).unwrap();
        assert_eq!(pairs[0].activation, "sin(x)");
    }

    #[test]
    fn parse_rejects_non_array() {
        assert!(parse_pairs("{\"activation\": \"x\"}").is_err());
        assert!(parse_pairs("not json at all").is_err());
    }

    #[test]
    fn parse_rejects_empty_and_blank_pairs() {
        assert!(parse_pairs("[]").is_err());
        assert!(parse_pairs(r#"[{"activation": " ", "loss": "l"}]"#).is_err());
    }

    #[test]
    fn fallback_pairs_are_plausible() {
        let mut rng = StdRng::seed_from_u64(1);
        let pairs = fallback_pairs(5, &mut rng);
        assert_eq!(pairs.len(), 5);
        for p in &pairs {
            assert!(p.activation.contains("exp("));
            assert!(p.loss.contains("log(y_pred)"));
        }
    }
}
