//! Shared state handed to every request handler

use crate::gate::{AllowAll, RateLimitGate};
use reqlens_core::Pipelines;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pipelines: Pipelines,
    pub gate: Arc<dyn RateLimitGate>,
}

impl AppState {
    /// State with the allow-all gate
    pub fn new(pipelines: Pipelines) -> Self {
        Self {
            pipelines,
            gate: Arc::new(AllowAll),
        }
    }

    pub fn with_gate(mut self, gate: Arc<dyn RateLimitGate>) -> Self {
        self.gate = gate;
        self
    }
}
