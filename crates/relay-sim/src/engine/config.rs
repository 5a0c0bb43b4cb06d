use std::time::Duration;

/// SPEC_FULL.md §4.7/§4.8/§9: tunables for both engine variants.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub max_iterations: u64,
    pub timeout: Duration,
    /// Generous inner timeout for `wait_until_complete` within one pass —
    /// its expiry is an internal error, not oscillation.
    pub component_barrier_timeout: Duration,
    /// Worker-pool thread count (pooled engine only). Defaults to
    /// `num_cpus::get()`.
    pub worker_threads: usize,
    /// Component-count threshold at or above which [`crate::engine::Engine::from_world`]
    /// chooses the pooled variant.
    pub pooled_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            timeout: Duration::from_secs(30),
            component_barrier_timeout: Duration::from_secs(10),
            worker_threads: num_cpus::get(),
            pooled_threshold: 2_000,
        }
    }
}
