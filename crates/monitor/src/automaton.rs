//! Finite automaton compiled from a temporal-logic safety property.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of a state in load order.
pub type StateId = usize;

/// Index of an action symbol in declaration order.
pub type ActionId = usize;

/// Classification of an automaton state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    /// Property is satisfied on every continuation
    Accept,
    /// Property is violated on every continuation
    Violation,
    /// Not yet decided
    Inconclusive,
}

impl StateKind {
    /// Map a state-line prefix character to its kind.
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            '+' => Some(StateKind::Accept),
            '-' => Some(StateKind::Violation),
            '?' => Some(StateKind::Inconclusive),
            _ => None,
        }
    }

    /// Accept and Violation states are absorbing.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StateKind::Inconclusive)
    }
}

/// A named automaton state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonState {
    /// Position in load order
    pub id: StateId,
    /// Unique label (state line without its type prefix)
    pub label: String,
    /// Accept / Violation / Inconclusive
    pub kind: StateKind,
}

/// A named action symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSymbol {
    /// Position in declaration order
    pub id: ActionId,
    /// Unique action name
    pub name: String,
}

/// Dense `states x actions` transition table.
///
/// A `None` cell means the action is illegal in that state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    action_count: usize,
    cells: Vec<Option<StateId>>,
}

impl TransitionTable {
    /// Allocate a table with every cell invalid.
    pub fn new(state_count: usize, action_count: usize) -> Self {
        Self {
            action_count,
            cells: vec![None; state_count * action_count],
        }
    }

    /// Number of rows.
    pub fn state_count(&self) -> usize {
        if self.action_count == 0 {
            0
        } else {
            self.cells.len() / self.action_count
        }
    }

    /// Number of columns.
    pub fn action_count(&self) -> usize {
        self.action_count
    }

    /// Target of `(state, action)`, or `None` when the action is illegal there.
    pub fn target(&self, state: StateId, action: ActionId) -> Option<StateId> {
        self.cells
            .get(state * self.action_count + action)
            .copied()
            .flatten()
    }

    pub(crate) fn set(&mut self, from: StateId, action: ActionId, to: StateId) {
        self.cells[from * self.action_count + action] = Some(to);
    }
}

/// Immutable automaton produced by the loader.
#[derive(Debug, Clone)]
pub struct Automaton {
    pub(crate) property: String,
    pub(crate) states: Vec<AutomatonState>,
    pub(crate) actions: Vec<ActionSymbol>,
    pub(crate) action_index: HashMap<String, ActionId>,
    pub(crate) table: TransitionTable,
    pub(crate) initial: StateId,
}

impl Automaton {
    /// Property text the automaton was compiled from.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// States in load order.
    pub fn states(&self) -> &[AutomatonState] {
        &self.states
    }

    /// Action alphabet in declaration order.
    pub fn actions(&self) -> &[ActionSymbol] {
        &self.actions
    }

    /// Transition table.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Initial state.
    pub fn initial_state(&self) -> StateId {
        self.initial
    }

    /// State by id.
    pub fn state(&self, id: StateId) -> Option<&AutomatonState> {
        self.states.get(id)
    }

    /// Look up an action symbol by name.
    pub fn action_id(&self, name: &str) -> Option<ActionId> {
        self.action_index.get(name).copied()
    }
}
