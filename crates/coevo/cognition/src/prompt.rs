use coevo_types::{EvolutionConfig, FunctionPair, GenerationData};

/// Builds the prompts sent to the generative backend.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Prompt asking for `count` symbolic activation/loss pairs as JSON.
    pub fn function_pairs(count: usize) -> String {
        let mut prompt = String::new();
        prompt.push_str(&format!(
            "Generate {} pairs of novel, mathematically plausible symbolic functions for a neural network.\n",
            count
        ));
        prompt.push_str(
            "One function in each pair must be an activation function of the single input variable 'x'.\n",
        );
        prompt.push_str(
            "The other must be a classification loss function over the variables 'y_true' and 'y_pred'.\n",
        );
        prompt.push_str(
            "Use common operators such as +, -, *, /, exp, log, sin, cos, max, min, and sigmoid-like constructs.\n",
        );
        prompt.push_str(
            "Respond with a JSON array of objects, each object carrying \"activation\" and \"loss\" string keys.\n",
        );
        prompt
    }

    /// Prompt asking for a short prose analysis of a finished run.
    pub fn report_summary(
        config: &EvolutionConfig,
        champion: &FunctionPair,
        log: &[GenerationData],
    ) -> String {
        let mut prompt = String::new();
        prompt.push_str(
            "Analyze the results of a simulated co-evolutionary search over neural network functions.\n\n",
        );

        prompt.push_str("## Configuration\n");
        prompt.push_str(&format!("- Dataset: {}\n", config.dataset));
        prompt.push_str(&format!("- Model: {}\n", config.model));
        prompt.push_str(&format!("- Generations: {}\n", config.generations));
        prompt.push_str(&format!("- Population size: {}\n", config.population_size));
        prompt.push_str(&format!("- Mutation rate: {}\n", config.mutation_rate));
        prompt.push_str(&format!("- Crossover rate: {}\n\n", config.crossover_rate));

        prompt.push_str("## Best performer\n");
        prompt.push_str(&format!("- Activation: `{}`\n", champion.activation));
        prompt.push_str(&format!("- Loss: `{}`\n", champion.loss));
        prompt.push_str(&format!(
            "- Final accuracy: {:.2}%\n",
            champion.accuracy * 100.0
        ));
        prompt.push_str(&format!("- Final F1 score: {:.3}\n\n", champion.f1));

        if let (Some(first), Some(last)) = (log.first(), log.last()) {
            prompt.push_str("## Evolution trend\n");
            prompt.push_str(&format!(
                "- Initial average accuracy: {:.2}%\n",
                first.avg_accuracy * 100.0
            ));
            prompt.push_str(&format!(
                "- Final average accuracy: {:.2}%\n\n",
                last.avg_accuracy * 100.0
            ));
        }

        prompt.push_str(
            "Write a brief, insightful summary of the run. Comment on the best pair's performance \
             and the overall trend across generations. Keep it to 2-3 paragraphs.\n",
        );
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn champion() -> FunctionPair {
        FunctionPair::new("gen3-a-1", "x * tanh(log(1 + exp(x)))", "-sum(y_true * log(y_pred))")
            .with_fitness(0.93, 0.91, 22.0)
    }

    #[test]
    fn function_prompt_names_count_and_variables() {
        let prompt = PromptBuilder::function_pairs(8);
        assert!(prompt.contains("8 pairs"));
        assert!(prompt.contains("'x'"));
        assert!(prompt.contains("'y_true'"));
        assert!(prompt.contains("JSON array"));
    }

    #[test]
    fn summary_prompt_embeds_config_and_champion() {
        let config = EvolutionConfig::default();
        let prompt = PromptBuilder::report_summary(&config, &champion(), &[]);
        assert!(prompt.contains("CIFAR-10"));
        assert!(prompt.contains("Simple CNN"));
        assert!(prompt.contains("Mutation rate: 0.1"));
        assert!(prompt.contains("x * tanh(log(1 + exp(x)))"));
        assert!(prompt.contains("93.00%"));
    }

    #[test]
    fn summary_prompt_includes_trend_when_log_present() {
        let config = EvolutionConfig::default();
        let pair = champion();
        let log = vec![
            GenerationData::from_population(1, std::slice::from_ref(&pair)).unwrap(),
            GenerationData::from_population(2, std::slice::from_ref(&pair)).unwrap(),
        ];
        let prompt = PromptBuilder::report_summary(&config, &pair, &log);
        assert!(prompt.contains("Initial average accuracy"));
        assert!(prompt.contains("Final average accuracy"));
    }

    #[test]
    fn summary_prompt_omits_trend_for_empty_log() {
        let config = EvolutionConfig::default();
        let prompt = PromptBuilder::report_summary(&config, &champion(), &[]);
        assert!(!prompt.contains("Evolution trend"));
    }
}
