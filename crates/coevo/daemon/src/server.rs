//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use coevo_cognition::{
    GeminiClient, GeminiPairGenerator, GeminiSummarizer, PairGenerator, ReportSummarizer,
    SimulatedPairGenerator, SimulatedSummarizer,
};
use coevo_engine::EvolutionController;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// coevod server
pub struct Server {
    config: DaemonConfig,
    controller: Arc<EvolutionController>,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let (generator, summarizer) = build_collaborators(&config)?;

        let mut controller = EvolutionController::new(generator, summarizer)
            .with_pacing(Duration::from_millis(config.evolution.pacing_ms));
        if let Some(seed) = config.evolution.seed {
            controller = controller.with_seed(seed);
        }

        Ok(Self {
            config,
            controller: Arc::new(controller),
        })
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let state = AppState::new(self.controller.clone());
        let app = create_router(state, self.config.server.enable_cors);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("coevod listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("coevod shutting down");
        Ok(())
    }
}

/// Pick the live Gemini collaborators when a key is available, otherwise run
/// on the simulated ones.
fn build_collaborators(
    config: &DaemonConfig,
) -> DaemonResult<(Arc<dyn PairGenerator>, Arc<dyn ReportSummarizer>)> {
    if config.cognition.simulated {
        tracing::info!("using simulated generator and summarizer");
        return Ok((Arc::new(SimulatedPairGenerator), Arc::new(SimulatedSummarizer)));
    }

    let client = match &config.cognition.api_key {
        // An explicitly configured key that cannot be used is a startup error.
        Some(api_key) => Some(
            GeminiClient::new(api_key.clone())
                .map_err(|e| DaemonError::Cognition(e.to_string()))?,
        ),
        None => match GeminiClient::from_env() {
            Ok(client) => Some(client),
            Err(err) => {
                tracing::warn!(error = %err, "no Gemini API key; falling back to simulated collaborators");
                None
            }
        },
    };

    match client {
        Some(client) => {
            let mut client = client.with_model(config.cognition.model.clone());
            if let Some(endpoint) = &config.cognition.endpoint {
                client = client.with_endpoint(endpoint.clone());
            }
            tracing::info!(model = %config.cognition.model, "using Gemini generator and summarizer");
            Ok((
                Arc::new(GeminiPairGenerator::new(client.clone())),
                Arc::new(GeminiSummarizer::new(client)),
            ))
        }
        None => Ok((Arc::new(SimulatedPairGenerator), Arc::new(SimulatedSummarizer))),
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "failed to install signal handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("received terminate signal, initiating graceful shutdown");
        }
    }
}
