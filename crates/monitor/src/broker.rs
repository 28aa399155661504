//! Assurance broker: the service-facing wrapper around one monitor.
//!
//! Other processes report mission actions through `check_state`; the broker
//! steps the monitor and logs every verdict. A broker can only be built from
//! a description that loads completely.

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::automaton::Automaton;
use crate::engine::{Monitor, StepOutcome, Verdict};
use crate::error::MonitorError;

/// Assurance broker service state.
#[derive(Debug)]
pub struct AssuranceBroker {
    monitor: Monitor,
}

impl AssuranceBroker {
    /// Create a broker around an already loaded automaton.
    pub fn new(automaton: Arc<Automaton>) -> Self {
        Self {
            monitor: Monitor::new(automaton),
        }
    }

    /// Load the monitor description at `path` and create a broker for it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MonitorError> {
        let automaton = Automaton::from_file(path)?;
        Ok(Self::new(Arc::new(automaton)))
    }

    /// Step the monitor with `action` and return the boolean verdict.
    pub fn check_state(&self, action: &str) -> bool {
        let outcome = self.monitor.step_outcome(action);
        let result = outcome.passed();
        match outcome {
            StepOutcome::UnknownAction => {
                // Unknown actions pass through; a misspelt action name on the
                // caller's side looks exactly like a passing step.
                warn!(action, result, "Result of step for action outside the alphabet");
            }
            _ => info!(action, result, "Result of step"),
        }
        result
    }

    /// Verdict of the monitor's current state.
    pub fn verdict(&self) -> Verdict {
        self.monitor.verdict()
    }

    /// Underlying monitor.
    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }
}
