/// SPEC_FULL.md §4.7: `STOPPED -> INITIALIZING -> RUNNING -> {STABLE |
/// OSCILLATING | TIMEOUT | ERROR | STOPPED}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Stopped,
    Initializing,
    Running,
    Stable,
    Oscillating,
    Timeout,
    Error,
}
