//! Skydrop mission control.
//!
//! Tracks the supply-drop mission phase from vehicle telemetry, handles
//! operator commands, and gates the payload release through a periodic
//! reconciler that reports progress to the runtime monitor.
//!
//! All collaborators sit behind traits in [`collaborators`]; the service
//! binary plugs in concrete vehicle and payload clients.

#![warn(missing_docs)]

pub mod collaborators;
pub mod error;
pub mod ingest;
pub mod manager;
pub mod payload;
pub mod reconciler;
pub mod runtime;
pub mod status;
pub mod store;
pub mod types;

pub use collaborators::{AssuranceClient, PayloadControl, VehicleControl, Waypoint};
pub use error::{CollaboratorError, MissionError};
pub use ingest::{FollowUp, IngestOutcome, TelemetryIngest};
pub use manager::{CommandOutcome, MissionManager};
pub use payload::SimulatedPayload;
pub use reconciler::{GatingReconciler, TickOutcome};
pub use runtime::{MissionContext, MissionRuntime};
pub use status::{status_channel, StatusReceiver, StatusSender};
pub use store::{MissionSnapshot, MissionStore};
pub use types::{
    Destination, LatLon, LockLatch, MissionParams, MissionPhase, StatusReport, Telemetry,
    VehicleState,
};
