//! Population bookkeeping for the generation loop.

use coevo_cognition::{fallback_pairs, SymbolicPair};
use coevo_fitness::FitnessSampler;
use coevo_types::FunctionPair;
use rand::Rng;

/// Sort a population by accuracy descending.
pub(crate) fn rank_desc(population: &mut [FunctionPair]) {
    population.sort_by(|a, b| {
        b.accuracy
            .partial_cmp(&a.accuracy)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Build the initial population from generated symbolic pairs, ids `gen0-{i}`.
pub(crate) fn seed_population(
    symbolic: &[SymbolicPair],
    sampler: &mut FitnessSampler,
) -> Vec<FunctionPair> {
    symbolic
        .iter()
        .enumerate()
        .map(|(i, pair)| {
            let sample = sampler.initial();
            FunctionPair::new(format!("gen0-{}", i), &pair.activation, &pair.loss)
                .with_fitness(sample.accuracy, sample.f1, sample.convergence)
        })
        .collect()
}

/// Derive the next population from a ranked one.
///
/// The top `elite_count` members are carried unchanged. Each generated
/// symbolic pair contributes two candidates: the pair as-is, and a
/// recombination of the mirrored pair's activation with this pair's loss.
/// The refill is truncated to exactly fill `population_size`, topping up
/// from local fallback synthesis if the generator under-delivered.
pub(crate) fn assemble_next(
    generation: u32,
    ranked: &[FunctionPair],
    elite_count: usize,
    symbolic: &[SymbolicPair],
    population_size: usize,
    sampler: &mut FitnessSampler,
    expr_rng: &mut impl Rng,
) -> Vec<FunctionPair> {
    let elite_count = elite_count.min(ranked.len());
    let mut next: Vec<FunctionPair> = ranked[..elite_count].to_vec();

    let needed = population_size.saturating_sub(elite_count);
    if needed == 0 {
        next.truncate(population_size);
        return next;
    }

    // The leader anchors every child's fitness. A run never derives from an
    // empty population.
    let Some(leader) = next.first().cloned() else {
        return next;
    };

    let mut fresh: Vec<FunctionPair> = symbolic
        .iter()
        .enumerate()
        .flat_map(|(i, pair)| {
            let mirrored = &symbolic[symbolic.len() - 1 - i];
            [
                FunctionPair::new(
                    format!("gen{}-a-{}", generation, i),
                    &pair.activation,
                    &pair.loss,
                ),
                FunctionPair::new(
                    format!("gen{}-b-{}", generation, i),
                    &mirrored.activation,
                    &pair.loss,
                ),
            ]
        })
        .take(needed)
        .collect();

    if fresh.len() < needed {
        let top_up = fallback_pairs(needed - fresh.len(), expr_rng);
        fresh.extend(top_up.into_iter().enumerate().map(|(k, pair)| {
            FunctionPair::new(
                format!("gen{}-f-{}", generation, k),
                pair.activation,
                pair.loss,
            )
        }));
    }

    for candidate in &mut fresh {
        let sample = sampler.offspring(&leader);
        *candidate = candidate
            .clone()
            .with_fitness(sample.accuracy, sample.f1, sample.convergence);
    }

    next.extend(fresh);
    next
}
