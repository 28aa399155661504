//! Monitor description loader.
//!
//! The description is line oriented:
//!
//! ```text
//! TLTMON:
//! <property text>
//! <state count N>
//! <N lines: '+' | '-' | '?' followed by a state label>
//! <action count M>
//! <M lines: action name>
//! <transition lines: from,action,to>
//! ```
//!
//! Blank lines are skipped everywhere. The initial state is the first state
//! whose label is [`INITIAL_STATE_MARKER`].

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::automaton::{ActionSymbol, Automaton, AutomatonState, StateId, StateKind, TransitionTable};
use crate::error::MonitorError;

/// Tag every description must start with.
pub const HEADER_TAG: &str = "TLTMON:";

/// Label of the initial state.
pub const INITIAL_STATE_MARKER: &str = "(0, 0)";

#[derive(Debug, Clone, Copy)]
enum Section {
    Header,
    Property,
    StateCount,
    States { remaining: usize },
    ActionCount,
    Actions { remaining: usize },
    Transitions,
}

impl Section {
    fn name(&self) -> &'static str {
        match self {
            Section::Header => "header",
            Section::Property => "property",
            Section::StateCount => "state count",
            Section::States { .. } => "states",
            Section::ActionCount => "action count",
            Section::Actions { .. } => "actions",
            Section::Transitions => "transitions",
        }
    }
}

#[derive(Default)]
struct Partial {
    property: String,
    states: Vec<AutomatonState>,
    state_labels: HashMap<String, StateId>,
    actions: Vec<ActionSymbol>,
    action_index: HashMap<String, usize>,
    table: Option<TransitionTable>,
    initial: Option<StateId>,
}

impl Automaton {
    /// Load an automaton from a description file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MonitorError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| MonitorError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let automaton = Self::parse(&content)?;
        info!(
            path = %path.display(),
            property = %automaton.property,
            states = automaton.states.len(),
            actions = automaton.actions.len(),
            "Loaded monitor"
        );
        Ok(automaton)
    }

    /// Parse an automaton from description text.
    pub fn parse(input: &str) -> Result<Self, MonitorError> {
        let mut section = Section::Header;
        let mut partial = Partial::default();

        for (index, raw) in input.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim_end();
            if line.trim().is_empty() {
                continue;
            }

            section = match section {
                Section::Header => {
                    if !line.starts_with(HEADER_TAG) {
                        return Err(MonitorError::MissingHeader {
                            line: line_no,
                            expected: HEADER_TAG,
                        });
                    }
                    Section::Property
                }
                Section::Property => {
                    partial.property = line.to_string();
                    Section::StateCount
                }
                Section::StateCount => Section::States {
                    remaining: parse_count("state", line, line_no)?,
                },
                Section::States { remaining } => {
                    partial.push_state(line, line_no)?;
                    if remaining == 1 {
                        Section::ActionCount
                    } else {
                        Section::States {
                            remaining: remaining - 1,
                        }
                    }
                }
                Section::ActionCount => Section::Actions {
                    remaining: parse_count("action", line, line_no)?,
                },
                Section::Actions { remaining } => {
                    partial.push_action(line, line_no)?;
                    if remaining == 1 {
                        partial.table = Some(TransitionTable::new(
                            partial.states.len(),
                            partial.actions.len(),
                        ));
                        Section::Transitions
                    } else {
                        Section::Actions {
                            remaining: remaining - 1,
                        }
                    }
                }
                Section::Transitions => {
                    partial.push_transition(line, line_no)?;
                    Section::Transitions
                }
            };
        }

        if !matches!(section, Section::Transitions) {
            return Err(MonitorError::UnexpectedEof {
                section: section.name(),
            });
        }

        partial.finish()
    }
}

fn parse_count(section: &'static str, line: &str, line_no: usize) -> Result<usize, MonitorError> {
    match line.trim().parse::<i64>() {
        Ok(count) if count > 0 => Ok(count as usize),
        _ => Err(MonitorError::InvalidCount {
            section,
            value: line.to_string(),
            line: line_no,
        }),
    }
}

impl Partial {
    fn push_state(&mut self, line: &str, line_no: usize) -> Result<(), MonitorError> {
        let mut chars = line.chars();
        // Non-blank lines always have a first character.
        let prefix = chars.next().unwrap_or_default();
        let kind = StateKind::from_prefix(prefix)
            .ok_or(MonitorError::InvalidStateType { prefix, line: line_no })?;
        let label = chars.as_str().to_string();

        if self.state_labels.contains_key(&label) {
            return Err(MonitorError::DuplicateState {
                label,
                line: line_no,
            });
        }

        let id = self.states.len();
        if label == INITIAL_STATE_MARKER && self.initial.is_none() {
            self.initial = Some(id);
        }
        self.state_labels.insert(label.clone(), id);
        self.states.push(AutomatonState { id, label, kind });
        Ok(())
    }

    fn push_action(&mut self, line: &str, line_no: usize) -> Result<(), MonitorError> {
        let name = line.to_string();
        if self.action_index.contains_key(&name) {
            return Err(MonitorError::DuplicateAction {
                name,
                line: line_no,
            });
        }
        let id = self.actions.len();
        self.action_index.insert(name.clone(), id);
        self.actions.push(ActionSymbol { id, name });
        Ok(())
    }

    fn push_transition(&mut self, line: &str, line_no: usize) -> Result<(), MonitorError> {
        let malformed = || MonitorError::MalformedTransition {
            text: line.to_string(),
            line: line_no,
        };

        let components = line
            .split(',')
            .map(|component| component.trim().parse::<usize>().map_err(|_| malformed()))
            .collect::<Result<Vec<_>, _>>()?;
        let [from, action, to] = components[..] else {
            return Err(malformed());
        };

        let state_count = self.states.len();
        let action_count = self.actions.len();
        for (kind, index, count) in [
            ("state", from, state_count),
            ("action", action, action_count),
            ("state", to, state_count),
        ] {
            if index >= count {
                return Err(MonitorError::TransitionOutOfRange {
                    kind,
                    index,
                    count,
                    line: line_no,
                });
            }
        }

        if let Some(table) = self.table.as_mut() {
            table.set(from, action, to);
        }
        Ok(())
    }

    fn finish(self) -> Result<Automaton, MonitorError> {
        let initial = self.initial.ok_or(MonitorError::MissingInitialState {
            marker: INITIAL_STATE_MARKER,
        })?;
        let table = self.table.ok_or(MonitorError::UnexpectedEof {
            section: "actions",
        })?;
        debug!(initial, "Monitor description parsed");

        Ok(Automaton {
            property: self.property,
            states: self.states,
            actions: self.actions,
            action_index: self.action_index,
            table,
            initial,
        })
    }
}
