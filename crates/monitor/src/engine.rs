//! Monitor engine: one automaton plus one current-state cursor.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::automaton::{Automaton, AutomatonState, StateId, StateKind};

/// Overall classification of the observed behaviour so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Current state is an accepting state
    Accepted,
    /// Current state is a violating state
    Violated,
    /// No decision yet
    Inconclusive,
}

impl From<StateKind> for Verdict {
    fn from(kind: StateKind) -> Self {
        match kind {
            StateKind::Accept => Verdict::Accepted,
            StateKind::Violation => Verdict::Violated,
            StateKind::Inconclusive => Verdict::Inconclusive,
        }
    }
}

/// What a single step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// The cursor was already in an absorbing state and did not move
    Absorbed {
        /// Kind of the absorbing state
        kind: StateKind,
    },
    /// Action is not part of the alphabet; ignored
    UnknownAction,
    /// Action is in the alphabet but has no transition from the current state
    IllegalAction {
        /// State the action was attempted in
        state: StateId,
    },
    /// Cursor moved
    Moved {
        /// New current state
        to: StateId,
        /// Kind of the new state
        kind: StateKind,
    },
}

impl StepOutcome {
    /// Boolean verdict reported to callers.
    ///
    /// `true` means no violation has been observed yet; it does not mean the
    /// property is accepted.
    pub fn passed(&self) -> bool {
        match self {
            StepOutcome::Absorbed { kind } => *kind == StateKind::Accept,
            StepOutcome::UnknownAction => true,
            StepOutcome::IllegalAction { .. } => false,
            StepOutcome::Moved { kind, .. } => *kind != StateKind::Violation,
        }
    }
}

/// Runtime monitor stepping a shared, immutable automaton.
///
/// The cursor is guarded by a single lock so that concurrent callers observe
/// each step atomically.
#[derive(Debug)]
pub struct Monitor {
    automaton: Arc<Automaton>,
    current: Mutex<StateId>,
}

impl Monitor {
    /// Create a monitor positioned at the automaton's initial state.
    pub fn new(automaton: Arc<Automaton>) -> Self {
        let initial = automaton.initial_state();
        Self {
            automaton,
            current: Mutex::new(initial),
        }
    }

    /// Observe one action and return the boolean verdict.
    pub fn step(&self, action: &str) -> bool {
        self.step_outcome(action).passed()
    }

    /// Observe one action and return the detailed outcome.
    pub fn step_outcome(&self, action: &str) -> StepOutcome {
        let mut current = self.cursor();
        let state = &self.automaton.states[*current];

        if state.kind.is_terminal() {
            return StepOutcome::Absorbed { kind: state.kind };
        }

        let Some(action_id) = self.automaton.action_id(action) else {
            debug!(action, "Action is unknown, ignoring");
            return StepOutcome::UnknownAction;
        };

        let Some(target) = self.automaton.table.target(*current, action_id) else {
            warn!(action, state = %state.label, "Action is not valid in current state");
            return StepOutcome::IllegalAction { state: *current };
        };

        let kind = self.automaton.states[target].kind;
        if kind == StateKind::Violation {
            warn!(
                action,
                state = %state.label,
                property = %self.automaton.property,
                "Action violates property"
            );
        }
        *current = target;
        StepOutcome::Moved { to: target, kind }
    }

    /// Verdict of the current state.
    pub fn verdict(&self) -> Verdict {
        self.current_state().kind.into()
    }

    /// Current state.
    pub fn current_state(&self) -> &AutomatonState {
        let current = *self.cursor();
        &self.automaton.states[current]
    }

    /// Property text being monitored.
    pub fn property(&self) -> &str {
        self.automaton.property()
    }

    /// Underlying automaton.
    pub fn automaton(&self) -> &Arc<Automaton> {
        &self.automaton
    }

    fn cursor(&self) -> MutexGuard<'_, StateId> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
