//! Mission state store
//!
//! Phase, latches, telemetry, destination and counters live in one record
//! behind one lock. Single-field accessors are kept for command handlers;
//! the reconciler reads through [`MissionStore::snapshot`] so that every tick
//! sees one consistent view across fields.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::types::{Destination, LockLatch, MissionPhase, Telemetry};

/// Everything the store tracks, as one consistent copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionSnapshot {
    /// Current mission phase
    pub phase: MissionPhase,
    /// Release mechanism latch
    pub lock: LockLatch,
    /// Set once the payload has been released; never reset
    pub released: bool,
    /// Last reported telemetry
    pub telemetry: Telemetry,
    /// Commanded destination
    pub destination: Destination,
    /// Takeoff altitude in meters
    pub takeoff_altitude: f64,
    /// Seconds accumulated by reconciler ticks
    pub elapsed_seconds: f64,
}

/// Shared mission state.
#[derive(Debug)]
pub struct MissionStore {
    record: Mutex<MissionSnapshot>,
}

impl MissionStore {
    /// Create a store in `INITIALIZED` with the release mechanism locked.
    pub fn new(default_takeoff_altitude: f64) -> Self {
        Self {
            record: Mutex::new(MissionSnapshot {
                phase: MissionPhase::Initialized,
                lock: LockLatch::Locked,
                released: false,
                telemetry: Telemetry::default(),
                destination: Destination::default(),
                takeoff_altitude: default_takeoff_altitude,
                elapsed_seconds: 0.0,
            }),
        }
    }

    /// Consistent copy of every field.
    pub fn snapshot(&self) -> MissionSnapshot {
        *self.record()
    }

    /// Current mission phase
    pub fn phase(&self) -> MissionPhase {
        self.record().phase
    }

    /// Set the mission phase
    pub fn set_phase(&self, phase: MissionPhase) {
        self.record().phase = phase;
    }

    /// Release mechanism latch
    pub fn lock_latch(&self) -> LockLatch {
        self.record().lock
    }

    /// Set the release mechanism latch
    pub fn set_lock_latch(&self, lock: LockLatch) {
        self.record().lock = lock;
    }

    /// Whether the payload has been released
    pub fn has_released(&self) -> bool {
        self.record().released
    }

    /// Last reported telemetry
    pub fn telemetry(&self) -> Telemetry {
        self.record().telemetry
    }

    /// Overwrite telemetry (last write wins)
    pub fn set_telemetry(&self, telemetry: Telemetry) {
        self.record().telemetry = telemetry;
    }

    /// Commanded destination
    pub fn destination(&self) -> Destination {
        self.record().destination
    }

    /// Set the commanded destination
    pub fn set_destination(&self, destination: Destination) {
        self.record().destination = destination;
    }

    /// Takeoff altitude in meters
    pub fn takeoff_altitude(&self) -> f64 {
        self.record().takeoff_altitude
    }

    /// Seconds accumulated by reconciler ticks
    pub fn elapsed_seconds(&self) -> f64 {
        self.record().elapsed_seconds
    }

    /// Add `seconds` to the elapsed-time counter
    pub fn advance_elapsed(&self, seconds: f64) {
        self.record().elapsed_seconds += seconds;
    }

    /// Run `f` with exclusive access to the record.
    ///
    /// Used for check-then-act transitions that must not interleave with
    /// other writers.
    pub fn update<R>(&self, f: impl FnOnce(&mut MissionSnapshot) -> R) -> R {
        f(&mut self.record())
    }

    /// Claim the one payload release of this store's lifetime.
    ///
    /// Succeeds only in `AT_DESTINATION` with the latch unlocked and no prior
    /// release. On success the release latch is set, the lock latch goes back
    /// to `LOCKED` and the phase moves to `DROP_SUPPLIES`, all under one lock.
    pub fn claim_release(&self) -> bool {
        self.update(|record| {
            if record.phase != MissionPhase::AtDestination
                || record.lock != LockLatch::Unlocked
                || record.released
            {
                return false;
            }
            record.released = true;
            record.lock = LockLatch::Locked;
            record.phase = MissionPhase::DropSupplies;
            true
        })
    }

    fn record(&self) -> MutexGuard<'_, MissionSnapshot> {
        // Every critical section leaves the record valid, so a poisoned lock
        // still holds usable state.
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
