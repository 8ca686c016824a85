//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use krishi_chat::ChatOrchestrator;
use krishi_core::config::KrishiConfig;
use krishi_model::ModelRegistry;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks. Everything
/// here is immutable after startup; per-session mutability lives inside the
/// orchestrator.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<KrishiConfig>,
    /// The slot-filling chat engine.
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Loaded prediction collaborators.
    pub models: Arc<ModelRegistry>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState, wiring the orchestrator to the given models.
    pub fn new(config: KrishiConfig, models: Arc<ModelRegistry>) -> Self {
        let orchestrator = ChatOrchestrator::new(
            config.chat.clone(),
            config.advisor.clone(),
            Arc::clone(&models),
        );
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
            models,
            start_time: Instant::now(),
        }
    }
}
