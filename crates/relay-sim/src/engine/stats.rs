use std::time::Duration;

/// Statistics returned alongside every [`super::EngineState`] terminal
/// transition (SPEC_FULL.md §4.7 step 3).
#[derive(Debug, Clone, Default)]
pub struct RunStatistics {
    pub iterations: u64,
    pub components_updated: u64,
    pub time_to_stability: Option<Duration>,
    pub total_time: Duration,
    pub stable: bool,
    pub max_iterations_reached: bool,
    pub timeout_reached: bool,
    pub component_errors: u64,
    /// [ADD] pooled-engine-only counters, zero on the single-threaded
    /// variant; useful for confirming the worker pool is actually being
    /// used without changing functional outcomes.
    pub vnets_processed_parallel: u64,
    pub components_processed_parallel: u64,
}
