//! Runtime configuration for the orchestration engine.

/// Tunables for one orchestrator instance.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Telemetry label identifying the owning component in log events.
    pub component: String,
    /// Pending-queue depth above which request registration logs a warning.
    pub pending_warn_threshold: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            component: "orchestrator".to_string(),
            pending_warn_threshold: 32,
        }
    }
}
