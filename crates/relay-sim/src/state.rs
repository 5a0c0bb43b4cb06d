//! Two-valued logic for the relay simulator: `HIGH` and `FLOAT`.

/// The electrical state carried by every tab, pin, and VNET.
///
/// Combining operator is HIGH-wins OR: `HIGH ⊔ x = HIGH`, `FLOAT ⊔ FLOAT =
/// FLOAT`. There is no `LOW` and no conflict state — two drivers disagreeing
/// simply resolves to `HIGH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    #[default]
    Float,
    High,
}

impl State {
    pub const fn is_high(self) -> bool {
        matches!(self, State::High)
    }

    /// HIGH-wins OR.
    pub fn or(self, other: State) -> State {
        if self.is_high() || other.is_high() {
            State::High
        } else {
            State::Float
        }
    }

    /// Fold an iterator of states with HIGH-wins OR, short-circuiting on the
    /// first `HIGH`.
    pub fn or_all(states: impl IntoIterator<Item = State>) -> State {
        for s in states {
            if s.is_high() {
                return State::High;
            }
        }
        State::Float
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            State::High => "HIGH",
            State::Float => "FLOAT",
        }
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_wins_or() {
        assert_eq!(State::High.or(State::Float), State::High);
        assert_eq!(State::Float.or(State::High), State::High);
        assert_eq!(State::High.or(State::High), State::High);
        assert_eq!(State::Float.or(State::Float), State::Float);
    }

    #[test]
    fn or_all_short_circuits_on_empty_and_all_float() {
        assert_eq!(State::or_all(Vec::<State>::new()), State::Float);
        assert_eq!(State::or_all([State::Float, State::Float]), State::Float);
        assert_eq!(State::or_all([State::Float, State::High, State::Float]), State::High);
    }

    #[test]
    fn default_is_float() {
        assert_eq!(State::default(), State::Float);
    }
}
