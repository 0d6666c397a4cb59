use crate::catalog::{Dataset, ModelArch};
use serde::{Deserialize, Serialize};

/// Configuration for a single evolutionary run. Immutable once a run starts.
///
/// `mutation_rate` and `crossover_rate` are operator-facing metadata: they are
/// validated, forwarded to the generator prompt and the report, and otherwise
/// untouched by the derivation step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub dataset: Dataset,
    pub model: ModelArch,
    pub population_size: usize,
    pub generations: u32,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            dataset: Dataset::Cifar10,
            model: ModelArch::SimpleCnn,
            population_size: 20,
            generations: 15,
            mutation_rate: 0.1,
            crossover_rate: 0.6,
        }
    }
}

impl EvolutionConfig {
    /// Check the configuration before a run is allowed to start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::PopulationSize);
        }
        if self.generations == 0 {
            return Err(ConfigError::Generations);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::Rate {
                field: "mutation_rate",
                value: self.mutation_rate,
            });
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(ConfigError::Rate {
                field: "crossover_rate",
                value: self.crossover_rate,
            });
        }
        Ok(())
    }

    /// Number of top candidates carried unchanged into the next generation.
    pub fn elite_count(&self) -> usize {
        (self.population_size as f64 * 0.2).ceil() as usize
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("population_size must be positive")]
    PopulationSize,
    #[error("generations must be positive")]
    Generations,
    #[error("{field} must be within [0, 1], got {value}")]
    Rate { field: &'static str, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dataset, Dataset::Cifar10);
        assert_eq!(config.population_size, 20);
        assert_eq!(config.generations, 15);
    }

    #[test]
    fn zero_population_rejected() {
        let config = EvolutionConfig {
            population_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PopulationSize)
        ));
    }

    #[test]
    fn zero_generations_rejected() {
        let config = EvolutionConfig {
            generations: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Generations)));
    }

    #[test]
    fn out_of_range_rate_rejected() {
        let config = EvolutionConfig {
            mutation_rate: 1.2,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(format!("{}", err).contains("mutation_rate"));
    }

    #[test]
    fn elite_count_rounds_up() {
        let mut config = EvolutionConfig::default();
        assert_eq!(config.elite_count(), 4);
        config.population_size = 11;
        assert_eq!(config.elite_count(), 3);
        config.population_size = 1;
        assert_eq!(config.elite_count(), 1);
    }

    #[test]
    fn config_serde_round_trip() {
        let config = EvolutionConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EvolutionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
