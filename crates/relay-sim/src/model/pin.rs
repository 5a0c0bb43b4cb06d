use parking_lot::Mutex;

use crate::ids::{ComponentId, TabId};
use crate::state::State;

/// Logical bundle of tabs owned by one component.
///
/// The pin's own lock guards its state; setting it cascades to every tab it
/// owns by construction (tabs have no independent storage — see
/// [`crate::model::tab::Tab`]), so the pin/tab coherence invariant can never
/// be violated by a partial write.
#[derive(Debug)]
pub struct Pin {
    pub component: ComponentId,
    pub tabs: Vec<TabId>,
    state: Mutex<State>,
}

impl Pin {
    pub fn new(component: ComponentId) -> Self {
        Self {
            component,
            tabs: Vec::new(),
            state: Mutex::new(State::Float),
        }
    }

    pub fn state(&self) -> State {
        *self.state.lock()
    }

    /// Overwrite this pin's asserted state. Returns the previous state so
    /// callers can decide whether anything downstream needs dirtying.
    pub fn set_state(&self, new_state: State) -> State {
        let mut guard = self.state.lock();
        std::mem::replace(&mut *guard, new_state)
    }

    /// A pin with zero tabs evaluates to FLOAT regardless of its asserted
    /// state, per the invariant in SPEC_FULL.md §3.
    pub fn effective_state(&self) -> State {
        if self.tabs.is_empty() {
            State::Float
        } else {
            self.state()
        }
    }
}
