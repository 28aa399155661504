//! Monitor load errors
//!
//! A monitor description either loads completely or not at all; every
//! variant here aborts construction of the automaton.

use thiserror::Error;

/// Errors raised while loading a monitor description.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Description file could not be read
    #[error("Couldn't open monitor description {path}: {source}")]
    Io {
        /// Path that failed to open
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// First non-blank line is not the header tag
    #[error("Missing or wrong header on line {line}, expected '{expected}'")]
    MissingHeader {
        /// 1-based line number
        line: usize,
        /// Expected header tag
        expected: &'static str,
    },

    /// State or action count is not a positive integer
    #[error("Invalid {section} count '{value}' on line {line}")]
    InvalidCount {
        /// Which count ("state" or "action")
        section: &'static str,
        /// Raw text of the line
        value: String,
        /// 1-based line number
        line: usize,
    },

    /// State line does not start with '+', '-' or '?'
    #[error("Invalid state type '{prefix}' on line {line}")]
    InvalidStateType {
        /// Offending first character
        prefix: char,
        /// 1-based line number
        line: usize,
    },

    /// Two states share a label
    #[error("Duplicate state label '{label}' on line {line}")]
    DuplicateState {
        /// Repeated label
        label: String,
        /// 1-based line number
        line: usize,
    },

    /// Two actions share a name
    #[error("Duplicate action '{name}' on line {line}")]
    DuplicateAction {
        /// Repeated action name
        name: String,
        /// 1-based line number
        line: usize,
    },

    /// Transition line is not three comma separated integers
    #[error("Invalid transition '{text}' on line {line}")]
    MalformedTransition {
        /// Raw text of the line
        text: String,
        /// 1-based line number
        line: usize,
    },

    /// Transition references a state or action that does not exist
    #[error("Transition on line {line} references {kind} index {index}, but only {count} exist")]
    TransitionOutOfRange {
        /// "state" or "action"
        kind: &'static str,
        /// Referenced index
        index: usize,
        /// Number of declared entries
        count: usize,
        /// 1-based line number
        line: usize,
    },

    /// Input ended before the named section was complete
    #[error("Unexpected end of input while reading {section}")]
    UnexpectedEof {
        /// Section being read
        section: &'static str,
    },

    /// No state carries the initial-state marker
    #[error("Initial state {marker} not found")]
    MissingInitialState {
        /// Marker that was searched for
        marker: &'static str,
    },
}
