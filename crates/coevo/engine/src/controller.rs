//! The evolution controller and its generation loop.

use crate::error::EngineError;
use crate::population;
use chrono::Utc;
use coevo_cognition::{fallback_pairs, PairGenerator, ReportSummarizer, FALLBACK_SUMMARY};
use coevo_fitness::FitnessSampler;
use coevo_types::{
    best_of_log, EvolutionConfig, FinalReport, FunctionPair, GenerationData, PhaseError, RunEvent,
    RunPhase,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::time::sleep;
use uuid::Uuid;

/// Inter-generation pacing used when none is configured. Matches the live
/// dashboard cadence; tests run with `Duration::ZERO`.
pub const DEFAULT_PACING: Duration = Duration::from_millis(1500);

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Point-in-time view of the controller for status endpoints.
#[derive(Clone, Debug, serde::Serialize)]
pub struct RunStatus {
    pub phase: RunPhase,
    pub config: Option<EvolutionConfig>,
    pub generations_completed: u32,
}

struct ControllerState {
    phase: RunPhase,
    config: Option<EvolutionConfig>,
    log: Vec<GenerationData>,
    report: Option<FinalReport>,
}

/// Drives one evolutionary run at a time.
///
/// Lifecycle: `CONFIGURING -> RUNNING -> FINISHED`, back to `CONFIGURING`
/// via [`reset`](EvolutionController::reset). Starting while a run is active
/// or finished is a contract violation, not a silent no-op.
pub struct EvolutionController {
    state: Arc<RwLock<ControllerState>>,
    generator: Arc<dyn PairGenerator>,
    summarizer: Arc<dyn ReportSummarizer>,
    events: broadcast::Sender<RunEvent>,
    stop: Arc<AtomicBool>,
    pacing: Duration,
    seed: Option<u64>,
}

impl EvolutionController {
    pub fn new(generator: Arc<dyn PairGenerator>, summarizer: Arc<dyn ReportSummarizer>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(ControllerState {
                phase: RunPhase::Configuring,
                config: None,
                log: Vec::new(),
                report: None,
            })),
            generator,
            summarizer,
            events,
            stop: Arc::new(AtomicBool::new(false)),
            pacing: DEFAULT_PACING,
            seed: None,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Pin the fitness trajectory to a seed; runs replay deterministically.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Subscribe to per-generation and end-of-run events.
    pub fn subscribe(&self) -> broadcast::Receiver<RunEvent> {
        self.events.subscribe()
    }

    pub async fn phase(&self) -> RunPhase {
        self.state.read().await.phase
    }

    pub async fn status(&self) -> RunStatus {
        let state = self.state.read().await;
        RunStatus {
            phase: state.phase,
            config: state.config.clone(),
            generations_completed: state.log.len() as u32,
        }
    }

    /// Read-only snapshot of the generations completed so far.
    pub async fn log_snapshot(&self) -> Vec<GenerationData> {
        self.state.read().await.log.clone()
    }

    /// The final report, once the run has finished.
    pub async fn report(&self) -> Option<FinalReport> {
        self.state.read().await.report.clone()
    }

    /// Start a run. Valid only from `CONFIGURING`; clears any prior log and
    /// report and spawns the generation loop.
    pub async fn start(&self, config: EvolutionConfig) -> Result<(), EngineError> {
        config.validate()?;

        {
            let mut state = self.state.write().await;
            if state.phase != RunPhase::Configuring {
                return Err(PhaseError::InvalidTransition {
                    from: state.phase,
                    to: RunPhase::Running,
                }
                .into());
            }
            state.phase = RunPhase::Running;
            state.config = Some(config.clone());
            state.log.clear();
            state.report = None;
            self.stop.store(false, Ordering::SeqCst);
        }

        tracing::info!(
            dataset = %config.dataset,
            model = %config.model,
            population_size = config.population_size,
            generations = config.generations,
            "starting evolutionary run"
        );

        let ctx = RunContext {
            state: self.state.clone(),
            generator: self.generator.clone(),
            summarizer: self.summarizer.clone(),
            events: self.events.clone(),
            stop: self.stop.clone(),
            pacing: self.pacing,
            config,
            sampler: match self.seed {
                Some(seed) => FitnessSampler::seeded(seed),
                None => FitnessSampler::from_entropy(),
            },
            expr_rng: match self.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
                None => StdRng::from_entropy(),
            },
        };

        tokio::spawn(async move {
            ctx.run().await;
        });

        Ok(())
    }

    /// Request cooperative cancellation. The flag is observed at the top of
    /// each generation iteration; an in-flight generation still completes
    /// and is published. Outside `RUNNING` this is a logged no-op.
    pub async fn request_stop(&self) {
        if self.state.read().await.phase.is_running() {
            self.stop.store(true, Ordering::SeqCst);
            tracing::info!("stop requested; run will end at the next generation boundary");
        } else {
            tracing::debug!("stop requested with no active run");
        }
    }

    /// Clear all run state and return to `CONFIGURING`. Invalid while a run
    /// is active.
    pub async fn reset(&self) -> Result<(), EngineError> {
        let mut state = self.state.write().await;
        if state.phase.is_running() {
            return Err(PhaseError::InvalidTransition {
                from: state.phase,
                to: RunPhase::Configuring,
            }
            .into());
        }
        state.phase = RunPhase::Configuring;
        state.config = None;
        state.log.clear();
        state.report = None;
        self.stop.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Everything the spawned run task owns.
struct RunContext {
    state: Arc<RwLock<ControllerState>>,
    generator: Arc<dyn PairGenerator>,
    summarizer: Arc<dyn ReportSummarizer>,
    events: broadcast::Sender<RunEvent>,
    stop: Arc<AtomicBool>,
    pacing: Duration,
    config: EvolutionConfig,
    sampler: FitnessSampler,
    expr_rng: StdRng,
}

impl RunContext {
    async fn run(mut self) {
        let run_id = Uuid::new_v4();
        let mut log: Vec<GenerationData> = Vec::new();
        let mut population = self.seed_initial_population().await;

        for generation in 1..=self.config.generations {
            if self.stop.load(Ordering::SeqCst) {
                tracing::info!(generation, "stop observed at generation boundary");
                break;
            }

            population::rank_desc(&mut population);
            let elite_count = self.config.elite_count();
            let needed = self.config.population_size.saturating_sub(elite_count.min(population.len()));
            let symbolic = self.generate_or_fallback(needed.div_ceil(2)).await;

            population = population::assemble_next(
                generation,
                &population,
                elite_count,
                &symbolic,
                self.config.population_size,
                &mut self.sampler,
                &mut self.expr_rng,
            );

            let Some(data) = GenerationData::from_population(generation, &population) else {
                // Unreachable for a validated config; bail rather than loop on nothing.
                tracing::error!(generation, "generation produced an empty population");
                break;
            };

            log.push(data.clone());
            self.state.write().await.log.push(data.clone());
            let _ = self.events.send(RunEvent::GenerationCompleted(data));
            tracing::debug!(generation, "generation published");

            if !self.pacing.is_zero() {
                sleep(self.pacing).await;
            }
        }

        self.finish(run_id, log, population).await;
    }

    async fn seed_initial_population(&mut self) -> Vec<FunctionPair> {
        let count = self.config.population_size;
        let mut symbolic = self.generate_or_fallback(count).await;
        symbolic.truncate(count);
        if symbolic.len() < count {
            let missing = count - symbolic.len();
            symbolic.extend(fallback_pairs(missing, &mut self.expr_rng));
        }
        population::seed_population(&symbolic, &mut self.sampler)
    }

    /// One generator attempt; on any failure the run degrades to locally
    /// synthesized pairs instead of aborting.
    async fn generate_or_fallback(&mut self, count: usize) -> Vec<coevo_cognition::SymbolicPair> {
        if count == 0 {
            return Vec::new();
        }
        match self.generator.generate(count).await {
            Ok(pairs) if !pairs.is_empty() => pairs,
            Ok(_) => {
                tracing::warn!(count, "generator returned no pairs; using fallback synthesis");
                fallback_pairs(count, &mut self.expr_rng)
            }
            Err(err) => {
                tracing::warn!(error = %err, count, "generator failed; using fallback synthesis");
                fallback_pairs(count, &mut self.expr_rng)
            }
        }
    }

    async fn finish(self, run_id: Uuid, log: Vec<GenerationData>, population: Vec<FunctionPair>) {
        let champion = best_of_log(&log).cloned().or_else(|| {
            // Cancelled before any generation completed: the seeded
            // population's leader stands in.
            population
                .iter()
                .max_by(|a, b| {
                    a.accuracy
                        .partial_cmp(&b.accuracy)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .cloned()
        });

        let Some(champion) = champion else {
            // Unreachable for a validated config.
            tracing::error!("run ended without any candidates; no report produced");
            self.state.write().await.phase = RunPhase::Finished;
            return;
        };

        let summary = match self
            .summarizer
            .summarize(&self.config, &champion, &log)
            .await
        {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "summarizer failed; using fallback summary");
                FALLBACK_SUMMARY.to_string()
            }
        };

        let report = FinalReport {
            run_id,
            config: self.config.clone(),
            best_pair: champion,
            history: log,
            summary,
            finished_at: Utc::now(),
        };

        {
            let mut state = self.state.write().await;
            state.report = Some(report.clone());
            state.phase = RunPhase::Finished;
        }

        tracing::info!(
            run_id = %report.run_id,
            generations = report.generations_completed(),
            best_accuracy = report.best_pair.accuracy,
            "run finished"
        );
        let _ = self.events.send(RunEvent::Finished(Box::new(report)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use coevo_cognition::{
        CognitionError, FailingPairGenerator, FailingSummarizer, SimulatedPairGenerator,
        SimulatedSummarizer, SymbolicPair,
    };
    use std::sync::Mutex;
    use tokio::sync::{mpsc, Semaphore};

    /// Records every requested count before delegating to the simulated
    /// generator.
    struct RecordingGenerator {
        calls: Mutex<Vec<usize>>,
    }

    impl RecordingGenerator {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PairGenerator for RecordingGenerator {
        async fn generate(&self, count: usize) -> Result<Vec<SymbolicPair>, CognitionError> {
            self.calls.lock().unwrap().push(count);
            SimulatedPairGenerator.generate(count).await
        }
    }

    /// Blocks each generate call on a semaphore permit and reports entry, so
    /// tests can hold the run at a precise suspension point.
    struct GatedGenerator {
        gate: Arc<Semaphore>,
        entered: mpsc::UnboundedSender<usize>,
    }

    #[async_trait]
    impl PairGenerator for GatedGenerator {
        async fn generate(&self, count: usize) -> Result<Vec<SymbolicPair>, CognitionError> {
            let _ = self.entered.send(count);
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|_| CognitionError::Transport("gate closed".to_string()))?;
            permit.forget();
            SimulatedPairGenerator.generate(count).await
        }
    }

    fn controller(generator: Arc<dyn PairGenerator>) -> EvolutionController {
        EvolutionController::new(generator, Arc::new(SimulatedSummarizer))
            .with_pacing(Duration::ZERO)
            .with_seed(42)
    }

    fn config(population_size: usize, generations: u32) -> EvolutionConfig {
        EvolutionConfig {
            population_size,
            generations,
            ..Default::default()
        }
    }

    async fn wait_for_report(
        controller: &EvolutionController,
        rx: &mut broadcast::Receiver<RunEvent>,
    ) -> FinalReport {
        loop {
            match rx.recv().await.expect("event stream closed") {
                RunEvent::Finished(report) => {
                    assert_eq!(controller.phase().await, RunPhase::Finished);
                    return *report;
                }
                RunEvent::GenerationCompleted(_) => continue,
            }
        }
    }

    #[tokio::test]
    async fn single_generation_run_matches_contract() {
        let generator = Arc::new(RecordingGenerator::new());
        let controller = controller(generator.clone());
        let mut rx = controller.subscribe();

        controller.start(config(20, 1)).await.unwrap();
        let report = wait_for_report(&controller, &mut rx).await;

        // Initial seed asks for 20 pairs; the refill for 16 slots asks for 8.
        assert_eq!(*generator.calls.lock().unwrap(), vec![20, 8]);
        assert_eq!(report.history.len(), 1);
        assert_eq!(report.history[0].generation, 1);
        assert_eq!(
            report.best_pair.accuracy,
            report.history[0].best_pair.accuracy
        );
    }

    #[tokio::test]
    async fn log_never_exceeds_generation_budget() {
        let controller = controller(Arc::new(SimulatedPairGenerator));
        let mut rx = controller.subscribe();

        controller.start(config(10, 5)).await.unwrap();
        let report = wait_for_report(&controller, &mut rx).await;

        assert_eq!(report.history.len(), 5);
        assert_eq!(controller.log_snapshot().await.len(), 5);
        let generations: Vec<u32> = report.history.iter().map(|g| g.generation).collect();
        assert_eq!(generations, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn best_accuracy_is_monotonic_with_elite_retention() {
        let controller = controller(Arc::new(SimulatedPairGenerator));
        let mut rx = controller.subscribe();

        controller.start(config(20, 8)).await.unwrap();
        let report = wait_for_report(&controller, &mut rx).await;

        for w in report.history.windows(2) {
            assert!(
                w[1].best_pair.accuracy >= w[0].best_pair.accuracy,
                "elite retention keeps the generation best from regressing"
            );
        }
    }

    #[tokio::test]
    async fn report_best_is_log_wide_maximum() {
        let controller = controller(Arc::new(SimulatedPairGenerator));
        let mut rx = controller.subscribe();

        controller.start(config(12, 6)).await.unwrap();
        let report = wait_for_report(&controller, &mut rx).await;

        let max = report
            .history
            .iter()
            .map(|g| g.best_pair.accuracy)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(report.best_pair.accuracy, max);
    }

    #[tokio::test]
    async fn failing_collaborators_still_finish_with_fallbacks() {
        let controller = EvolutionController::new(
            Arc::new(FailingPairGenerator),
            Arc::new(FailingSummarizer),
        )
        .with_pacing(Duration::ZERO)
        .with_seed(7);
        let mut rx = controller.subscribe();

        controller.start(config(10, 3)).await.unwrap();
        let report = wait_for_report(&controller, &mut rx).await;

        assert_eq!(report.history.len(), 3);
        assert_eq!(report.summary, FALLBACK_SUMMARY);
        // Fallback synthesis produced every candidate.
        assert!(report.best_pair.activation.contains("exp("));
    }

    #[tokio::test]
    async fn stop_before_first_generation_yields_empty_log() {
        let gate = Arc::new(Semaphore::new(0));
        let (entered_tx, mut entered_rx) = mpsc::unbounded_channel();
        let generator = Arc::new(GatedGenerator {
            gate: gate.clone(),
            entered: entered_tx,
        });
        let controller = controller(generator);
        let mut rx = controller.subscribe();

        controller.start(config(20, 5)).await.unwrap();
        // The run is parked inside the initial generate call.
        assert_eq!(entered_rx.recv().await, Some(20));
        controller.request_stop().await;
        gate.add_permits(64);

        let report = wait_for_report(&controller, &mut rx).await;
        assert!(report.history.is_empty());
        assert!(report.best_pair.id.starts_with("gen0-"));
        assert!(!report.summary.is_empty());
    }

    #[tokio::test]
    async fn stop_during_generation_k_keeps_exactly_k_generations() {
        let gate = Arc::new(Semaphore::new(2));
        let (entered_tx, mut entered_rx) = mpsc::unbounded_channel();
        let generator = Arc::new(GatedGenerator {
            gate: gate.clone(),
            entered: entered_tx,
        });
        let controller = controller(generator);
        let mut rx = controller.subscribe();

        controller.start(config(10, 5)).await.unwrap();
        // Seed call and generation 1 refill pass the gate immediately.
        assert_eq!(entered_rx.recv().await, Some(10));
        assert!(entered_rx.recv().await.is_some());
        // Generation 2 is now in flight, parked at the gate.
        assert!(entered_rx.recv().await.is_some());
        controller.request_stop().await;
        gate.add_permits(64);

        let report = wait_for_report(&controller, &mut rx).await;
        // The in-flight generation completes and is published; nothing after.
        assert_eq!(report.history.len(), 2);
        assert_eq!(report.history.last().unwrap().generation, 2);
    }

    #[tokio::test]
    async fn start_while_running_is_a_contract_violation() {
        let gate = Arc::new(Semaphore::new(0));
        let (entered_tx, mut entered_rx) = mpsc::unbounded_channel();
        let generator = Arc::new(GatedGenerator {
            gate: gate.clone(),
            entered: entered_tx,
        });
        let controller = controller(generator);
        let mut rx = controller.subscribe();

        controller.start(config(5, 1)).await.unwrap();
        assert_eq!(entered_rx.recv().await, Some(5));

        let err = controller.start(config(5, 1)).await.unwrap_err();
        assert!(matches!(err, EngineError::Phase(_)));
        let err = controller.reset().await.unwrap_err();
        assert!(matches!(err, EngineError::Phase(_)));

        gate.add_permits(64);
        wait_for_report(&controller, &mut rx).await;
    }

    #[tokio::test]
    async fn finished_requires_reset_before_restart() {
        let controller = controller(Arc::new(SimulatedPairGenerator));
        let mut rx = controller.subscribe();

        controller.start(config(6, 2)).await.unwrap();
        wait_for_report(&controller, &mut rx).await;

        assert!(controller.start(config(6, 2)).await.is_err());
        assert!(controller.report().await.is_some());

        controller.reset().await.unwrap();
        assert_eq!(controller.phase().await, RunPhase::Configuring);
        assert!(controller.report().await.is_none());
        assert!(controller.log_snapshot().await.is_empty());

        let mut rx = controller.subscribe();
        controller.start(config(6, 2)).await.unwrap();
        let report = wait_for_report(&controller, &mut rx).await;
        assert_eq!(report.history.len(), 2);
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_before_any_state_change() {
        let controller = controller(Arc::new(SimulatedPairGenerator));
        let err = controller.start(config(0, 3)).await.unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
        assert_eq!(controller.phase().await, RunPhase::Configuring);
    }

    #[tokio::test]
    async fn stop_without_active_run_is_a_no_op() {
        let controller = controller(Arc::new(SimulatedPairGenerator));
        controller.request_stop().await;
        assert_eq!(controller.phase().await, RunPhase::Configuring);

        // A later run is unaffected by the stray request.
        let mut rx = controller.subscribe();
        controller.start(config(5, 2)).await.unwrap();
        let report = wait_for_report(&controller, &mut rx).await;
        assert_eq!(report.history.len(), 2);
    }

    #[tokio::test]
    async fn seeded_runs_replay_identically() {
        let make = || {
            EvolutionController::new(
                Arc::new(SimulatedPairGenerator),
                Arc::new(SimulatedSummarizer),
            )
            .with_pacing(Duration::ZERO)
            .with_seed(99)
        };

        let mut reports = Vec::new();
        for _ in 0..2 {
            let controller = make();
            let mut rx = controller.subscribe();
            controller.start(config(8, 4)).await.unwrap();
            reports.push(wait_for_report(&controller, &mut rx).await);
        }

        assert_eq!(reports[0].best_pair, reports[1].best_pair);
        assert_eq!(reports[0].history, reports[1].history);
    }
}
