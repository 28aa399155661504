//! Skydrop runtime monitor
//!
//! Loads a temporal-logic safety property compiled to a finite automaton and
//! steps it one observed action at a time.
//!
//! This crate provides:
//! - The monitor description loader ([`Automaton::parse`], [`Automaton::from_file`])
//! - The monitor engine with absorbing accept/violation states ([`Monitor`])
//! - The assurance broker exposed to other services ([`AssuranceBroker`])
//!
//! ```
//! use std::sync::Arc;
//! use skydrop_monitor::{Automaton, Monitor, Verdict};
//!
//! let text = "TLTMON:\nF done\n2\n?(0, 0)\n+(1, 1)\n1\ndone\n0,0,1\n";
//! let monitor = Monitor::new(Arc::new(Automaton::parse(text)?));
//! assert!(monitor.step("done"));
//! assert_eq!(monitor.verdict(), Verdict::Accepted);
//! # Ok::<(), skydrop_monitor::MonitorError>(())
//! ```

#![warn(missing_docs)]

pub mod automaton;
pub mod broker;
pub mod engine;
pub mod error;
pub mod loader;

pub use automaton::{
    ActionId, ActionSymbol, Automaton, AutomatonState, StateId, StateKind, TransitionTable,
};
pub use broker::AssuranceBroker;
pub use engine::{Monitor, StepOutcome, Verdict};
pub use error::MonitorError;
pub use loader::{HEADER_TAG, INITIAL_STATE_MARKER};
