//! Newline-delimited JSON requests accepted on stdin.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use skydrop_mission::{
    CommandOutcome, LatLon, MissionContext, MissionParams, StatusReport, VehicleState,
};
use skydrop_monitor::AssuranceBroker;

/// One harness request, tagged by `op`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    SetMissionParams {
        latitude: f64,
        longitude: f64,
        start_time: i64,
        end_time: i64,
        altitude: f64,
    },
    ClearMissionParams,
    TakeOff,
    Abort,
    SaveStatus {
        state: VehicleState,
        latitude: f64,
        longitude: f64,
        altitude: f64,
    },
    CheckState {
        action: String,
    },
    Snapshot,
}

/// Reply written to stdout for every request line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    fn ok(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(message.into()),
        }
    }
}

fn command(outcome: CommandOutcome) -> Response {
    match serde_json::to_value(outcome) {
        Ok(value) => Response::ok(value),
        Err(err) => Response::error(err.to_string()),
    }
}

/// Parse one line and dispatch it.
pub async fn handle_line(context: &MissionContext, broker: &AssuranceBroker, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => handle(context, broker, request).await,
        Err(err) => Response::error(format!("invalid request: {err}")),
    }
}

/// Dispatch one request against the mission context.
pub async fn handle(context: &MissionContext, broker: &AssuranceBroker, request: Request) -> Response {
    match request {
        Request::SetMissionParams {
            latitude,
            longitude,
            start_time,
            end_time,
            altitude,
        } => {
            let params = MissionParams {
                destination: LatLon::new(latitude, longitude),
                start_time,
                end_time,
                takeoff_altitude: altitude,
            };
            command(context.set_mission_params(params).await)
        }
        Request::ClearMissionParams => command(context.clear_mission_params().await),
        Request::TakeOff => command(context.take_off().await),
        Request::Abort => command(context.abort().await),
        Request::SaveStatus {
            state,
            latitude,
            longitude,
            altitude,
        } => {
            let report = StatusReport::new(state, LatLon::new(latitude, longitude), altitude);
            match context.save_status(report).await {
                Ok(()) => Response::ok(json!("queued")),
                Err(err) => Response::error(err.to_string()),
            }
        }
        Request::CheckState { action } => Response::ok(json!(broker.check_state(&action))),
        Request::Snapshot => match serde_json::to_value(context.store().snapshot()) {
            Ok(value) => Response::ok(value),
            Err(err) => Response::error(err.to_string()),
        },
    }
}
