//! End-to-end mission flow against recording collaborators.

mod common;

use common::{
    destination, mission_params, monitor_path, CallLog, RecordingAssurance, RecordingPayload,
    RecordingVehicle,
};
use skydrop_core::{Config, ReconcilerConfig};
use skydrop_mission::{
    AssuranceClient, CommandOutcome, FollowUp, GatingReconciler, LatLon, LockLatch, MissionContext,
    MissionManager, MissionPhase, MissionStore, PayloadControl, SimulatedPayload, StatusReport,
    TelemetryIngest, TickOutcome, VehicleControl, VehicleState,
};
use skydrop_monitor::{AssuranceBroker, Verdict};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

struct Rig {
    log: CallLog,
    store: Arc<MissionStore>,
    manager: MissionManager,
    ingest: TelemetryIngest,
    reconciler: GatingReconciler,
}

fn rig_with(
    log: CallLog,
    vehicle: RecordingVehicle,
    assurance: Arc<dyn AssuranceClient>,
    payload: Arc<dyn PayloadControl>,
) -> Rig {
    let store = Arc::new(MissionStore::new(2.0));
    let vehicle: Arc<dyn VehicleControl> = Arc::new(vehicle);
    Rig {
        manager: MissionManager::new(Arc::clone(&store), Arc::clone(&vehicle)),
        ingest: TelemetryIngest::new(Arc::clone(&store), Arc::clone(&vehicle)),
        reconciler: GatingReconciler::new(
            Arc::clone(&store),
            assurance,
            payload,
            vehicle,
            ReconcilerConfig::default(),
        ),
        store,
        log,
    }
}

fn rig() -> Rig {
    let log = CallLog::default();
    rig_with(
        log.clone(),
        RecordingVehicle::new(log.clone()),
        Arc::new(RecordingAssurance::new(log.clone(), true)),
        Arc::new(RecordingPayload::new(log)),
    )
}

fn far() -> LatLon {
    LatLon::new(47.0, 8.0)
}

fn near() -> LatLon {
    let dest = destination();
    LatLon::new(dest.latitude + 1e-4, dest.longitude - 1e-4)
}

fn report(state: VehicleState, position: LatLon) -> StatusReport {
    StatusReport::new(state, position, 10.0)
}

/// Drive a primed rig from launch to arrival with the mechanism unlocked.
async fn fly_to_destination(rig: &mut Rig) {
    rig.manager.set_mission_params(mission_params()).await;
    rig.manager.take_off().await;
    rig.ingest.apply(report(VehicleState::TakingOff, far())).await;
    rig.ingest.apply(report(VehicleState::Flying, far())).await;
    assert_eq!(rig.reconciler.tick().await, TickOutcome::Idle);
    rig.ingest.apply(report(VehicleState::Flying, near())).await;
    assert_eq!(rig.reconciler.tick().await, TickOutcome::Unlocked);
    rig.ingest
        .apply(report(VehicleState::WaypointReached, near()))
        .await;
}

#[tokio::test]
async fn test_phase_sequencing_from_status_reports() {
    let mut rig = rig();
    let steps = [
        (VehicleState::TakingOff, MissionPhase::TakeoffStarted, None),
        (
            VehicleState::Flying,
            MissionPhase::FlyingToDestination,
            Some(FollowUp::Start),
        ),
        (VehicleState::Flying, MissionPhase::FlyingToDestination, None),
        (VehicleState::WaypointReached, MissionPhase::AtDestination, None),
        (
            VehicleState::WaypointReached,
            MissionPhase::AtDestination,
            Some(FollowUp::ReturnToBase),
        ),
        (VehicleState::FlyingToBase, MissionPhase::ReturningToBase, None),
        (
            VehicleState::BaseReached,
            MissionPhase::LandingAtBase,
            Some(FollowUp::Land),
        ),
        (VehicleState::Landing, MissionPhase::LandingAtBase, None),
        (VehicleState::Landed, MissionPhase::Landed, None),
    ];

    for (state, phase, follow_up) in steps {
        let outcome = rig.ingest.apply(report(state, far())).await;
        assert_eq!(outcome.phase, phase, "after {state:?}");
        assert_eq!(outcome.follow_up, follow_up, "after {state:?}");
        assert_eq!(rig.store.phase(), phase);
    }

    assert_eq!(rig.log.count("vehicle.start"), 1);
    assert_eq!(rig.log.count("vehicle.return_to_base"), 1);
    assert_eq!(rig.log.count("vehicle.land"), 1);
    assert_eq!(rig.ingest.previous_state(), Some(VehicleState::Landed));
}

#[tokio::test]
async fn test_unreachable_waypoint_returns_to_base_without_command() {
    let mut rig = rig();
    rig.ingest.apply(report(VehicleState::Flying, far())).await;
    assert_eq!(rig.store.phase(), MissionPhase::FlyingToDestination);
    let before = rig.log.calls().len();

    let outcome = rig
        .ingest
        .apply(report(VehicleState::LastWaypointUnreachable, far()))
        .await;

    assert_eq!(outcome.phase, MissionPhase::ReturningToBase);
    assert_eq!(outcome.follow_up, None);
    assert_eq!(rig.store.phase(), MissionPhase::ReturningToBase);
    assert_eq!(rig.log.calls().len(), before);
    assert_eq!(rig.log.count("vehicle.return_to_base"), 0);
}

#[tokio::test]
async fn test_flying_without_prior_report_starts_mission() {
    let mut rig = rig();
    let outcome = rig.ingest.apply(report(VehicleState::Flying, far())).await;
    assert_eq!(outcome.follow_up, Some(FollowUp::Start));
}

#[tokio::test]
async fn test_takeoff_failure_lands_mission() {
    let mut rig = rig();
    rig.ingest.apply(report(VehicleState::TakingOff, far())).await;
    let outcome = rig
        .ingest
        .apply(report(VehicleState::TakeoffFailed, far()))
        .await;
    assert_eq!(outcome.phase, MissionPhase::Landed);
    assert_eq!(rig.log.count("vehicle.start"), 0);
}

#[tokio::test]
async fn test_status_updates_telemetry() {
    let mut rig = rig();
    rig.ingest
        .apply(StatusReport::new(VehicleState::Flying, near(), 42.5))
        .await;
    let telemetry = rig.store.telemetry();
    assert_eq!(telemetry.position, near());
    assert_eq!(telemetry.altitude, 42.5);
}

#[tokio::test]
async fn test_release_happens_at_most_once() {
    let mut rig = rig();
    rig.reconciler.prime().await;
    fly_to_destination(&mut rig).await;

    assert_eq!(
        rig.reconciler.tick().await,
        TickOutcome::ReportedArrival { released: true }
    );
    assert_eq!(rig.store.phase(), MissionPhase::DropSupplies);
    assert_eq!(rig.store.lock_latch(), LockLatch::Locked);
    assert!(rig.store.has_released());

    for _ in 0..5 {
        assert_eq!(rig.reconciler.tick().await, TickOutcome::ReportedDrop);
    }

    // A late arrival report re-enters AT_DESTINATION but cannot release again.
    rig.ingest
        .apply(report(VehicleState::WaypointReached, near()))
        .await;
    for _ in 0..5 {
        assert_eq!(
            rig.reconciler.tick().await,
            TickOutcome::ReportedArrival { released: false }
        );
    }

    assert_eq!(rig.log.count("payload.release"), 1);
    assert_eq!(rig.log.count("payload.unlock"), 1);
    // start-up lock plus the re-lock after release
    assert_eq!(rig.log.count("payload.lock"), 2);
}

#[tokio::test]
async fn test_unlock_precedes_release() {
    let mut rig = rig();
    rig.reconciler.prime().await;
    fly_to_destination(&mut rig).await;
    rig.reconciler.tick().await;

    let unlock = rig.log.position("payload.unlock").unwrap();
    let release = rig.log.position("payload.release").unwrap();
    assert!(unlock < release);

    let calls = rig.log.calls();
    assert_eq!(calls[release + 1], "payload.lock");
    assert_eq!(calls[0], "payload.lock");
    assert_eq!(calls[1], "vehicle.subscribe_status(2000)");
}

#[tokio::test]
async fn test_arrival_without_unlock_does_not_release() {
    let mut rig = rig();
    rig.reconciler.prime().await;
    rig.manager.set_mission_params(mission_params()).await;
    rig.manager.take_off().await;
    // Skips the near-destination pass, so the latch stays locked.
    rig.ingest.apply(report(VehicleState::Flying, far())).await;
    rig.ingest
        .apply(report(VehicleState::WaypointReached, far()))
        .await;

    assert_eq!(
        rig.reconciler.tick().await,
        TickOutcome::ReportedArrival { released: false }
    );
    assert_eq!(rig.log.count("payload.release"), 0);
    assert_eq!(rig.store.phase(), MissionPhase::AtDestination);
}

#[tokio::test]
async fn test_unlock_only_while_flying_to_destination() {
    let mut rig = rig();
    rig.reconciler.prime().await;
    rig.manager.set_mission_params(mission_params()).await;
    rig.ingest.apply(report(VehicleState::TakingOff, near())).await;
    assert_eq!(rig.reconciler.tick().await, TickOutcome::Idle);

    rig.ingest.apply(report(VehicleState::Flying, near())).await;
    assert_eq!(rig.reconciler.tick().await, TickOutcome::Unlocked);
    assert_eq!(rig.store.lock_latch(), LockLatch::Unlocked);
    // already unlocked
    assert_eq!(rig.reconciler.tick().await, TickOutcome::Idle);
    assert_eq!(rig.log.count("payload.unlock"), 1);
}

#[tokio::test]
async fn test_monitor_violation_does_not_block_release() {
    let log = CallLog::default();
    let mut rig = rig_with(
        log.clone(),
        RecordingVehicle::new(log.clone()),
        Arc::new(RecordingAssurance::new(log.clone(), false)),
        Arc::new(RecordingPayload::new(log.clone())),
    );
    rig.reconciler.prime().await;
    fly_to_destination(&mut rig).await;

    assert_eq!(
        rig.reconciler.tick().await,
        TickOutcome::ReportedArrival { released: true }
    );
    assert_eq!(log.count("assurance.check_state(at_destination)"), 1);
    assert_eq!(log.count("payload.release"), 1);
}

#[tokio::test]
async fn test_elapsed_time_advances_each_tick() {
    let mut rig = rig();
    rig.reconciler.prime().await;
    for _ in 0..4 {
        rig.reconciler.tick().await;
    }
    assert!((rig.store.elapsed_seconds() - 2.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_subscription_is_retried_until_it_succeeds() {
    let log = CallLog::default();
    let mut rig = rig_with(
        log.clone(),
        RecordingVehicle::failing_first_subscribes(log.clone(), 2),
        Arc::new(RecordingAssurance::new(log.clone(), true)),
        Arc::new(RecordingPayload::new(log.clone())),
    );

    rig.reconciler.prime().await;
    assert!(!rig.reconciler.is_subscribed());
    rig.reconciler.tick().await;
    assert!(!rig.reconciler.is_subscribed());
    rig.reconciler.tick().await;
    assert!(rig.reconciler.is_subscribed());
    rig.reconciler.tick().await;

    assert_eq!(log.count("vehicle.subscribe_status(2000)"), 3);
}

#[tokio::test]
async fn test_out_of_phase_commands_are_ignored() {
    let rig = rig();

    assert_eq!(
        rig.manager.take_off().await,
        CommandOutcome::Ignored {
            phase: MissionPhase::Initialized
        }
    );
    assert!(!rig.manager.clear_mission_params().await.is_applied());
    assert!(!rig.manager.abort().await.is_applied());

    assert!(rig.manager.set_mission_params(mission_params()).await.is_applied());
    let mut second = mission_params();
    second.destination = far();
    assert!(!rig.manager.set_mission_params(second).await.is_applied());
    assert_eq!(rig.store.destination().position, destination());
    assert!(!rig.manager.abort().await.is_applied());

    assert_eq!(
        rig.log.calls(),
        vec!["vehicle.add_waypoint(47.3977, 8.5456, 10)".to_string()]
    );
}

#[tokio::test]
async fn test_set_and_clear_mission_params() {
    let rig = rig();
    rig.manager.set_mission_params(mission_params()).await;

    let destination_record = rig.store.destination();
    assert_eq!(destination_record.position, destination());
    assert_eq!(destination_record.time_window_seconds, 600.0);
    assert_eq!(rig.store.takeoff_altitude(), 10.0);

    assert!(rig.manager.clear_mission_params().await.is_applied());
    assert_eq!(rig.store.phase(), MissionPhase::Initialized);
    assert_eq!(rig.store.destination().position, LatLon::default());
    assert_eq!(rig.store.destination().time_window_seconds, 0.0);
}

#[tokio::test]
async fn test_take_off_uses_mission_altitude() {
    let rig = rig();
    rig.manager.set_mission_params(mission_params()).await;
    assert!(rig.manager.take_off().await.is_applied());
    assert_eq!(rig.store.phase(), MissionPhase::TakeoffStarted);
    assert_eq!(rig.log.count("vehicle.take_off(10)"), 1);
    assert!(!rig.manager.take_off().await.is_applied());
}

#[tokio::test]
async fn test_abort_returns_to_base() {
    let mut rig = rig();
    rig.manager.set_mission_params(mission_params()).await;
    rig.manager.take_off().await;
    rig.ingest.apply(report(VehicleState::Flying, far())).await;

    assert!(rig.manager.abort().await.is_applied());
    assert_eq!(rig.store.phase(), MissionPhase::ReturningToBase);

    let clear = rig.log.position("vehicle.clear_route").unwrap();
    let home = rig.log.position("vehicle.return_to_base").unwrap();
    assert!(clear < home);

    assert_eq!(
        rig.manager.abort().await,
        CommandOutcome::Ignored {
            phase: MissionPhase::ReturningToBase
        }
    );
    assert_eq!(rig.log.count("vehicle.return_to_base"), 1);
}

#[tokio::test]
async fn test_abort_after_arrival_prevents_release() {
    let mut rig = rig();
    rig.reconciler.prime().await;
    fly_to_destination(&mut rig).await;

    assert!(rig.manager.abort().await.is_applied());
    assert_eq!(rig.reconciler.tick().await, TickOutcome::Idle);
    assert!(!rig.store.has_released());
    assert_eq!(rig.log.count("payload.release"), 0);
}

#[tokio::test]
async fn test_full_flow_with_simulated_payload_and_monitor() {
    let log = CallLog::default();
    let broker = Arc::new(AssuranceBroker::from_file(monitor_path()).unwrap());
    let payload = Arc::new(SimulatedPayload::new());
    let mut rig = rig_with(
        log.clone(),
        RecordingVehicle::new(log),
        broker.clone(),
        payload.clone(),
    );

    rig.reconciler.prime().await;
    assert!(payload.get_lock_status().await.unwrap());

    fly_to_destination(&mut rig).await;
    assert!(!payload.get_lock_status().await.unwrap());
    assert_eq!(broker.verdict(), Verdict::Inconclusive);

    assert_eq!(
        rig.reconciler.tick().await,
        TickOutcome::ReportedArrival { released: true }
    );
    assert!(payload.has_released().await.unwrap());
    assert!(payload.get_lock_status().await.unwrap());
    assert_eq!(broker.verdict(), Verdict::Accepted);

    assert_eq!(rig.reconciler.tick().await, TickOutcome::ReportedDrop);
    assert_eq!(broker.verdict(), Verdict::Accepted);
}

#[tokio::test(start_paused = true)]
async fn test_runtime_applies_queued_status_and_ticks() {
    let log = CallLog::default();
    let config = Config::default_config();
    let (context, runtime) = MissionContext::new(
        &config,
        Arc::new(RecordingAssurance::new(log.clone(), true)),
        Arc::new(RecordingVehicle::new(log.clone())),
        Arc::new(RecordingPayload::new(log.clone())),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(runtime.run(shutdown_rx));
    let step = Duration::from_millis(600);

    assert!(context.set_mission_params(mission_params()).await.is_applied());
    assert!(context.take_off().await.is_applied());

    context
        .save_status(report(VehicleState::TakingOff, far()))
        .await
        .unwrap();
    context
        .save_status(report(VehicleState::Flying, far()))
        .await
        .unwrap();
    tokio::time::sleep(step).await;
    assert_eq!(context.store().phase(), MissionPhase::FlyingToDestination);
    assert_eq!(context.store().lock_latch(), LockLatch::Locked);

    context
        .save_status(report(VehicleState::Flying, near()))
        .await
        .unwrap();
    tokio::time::sleep(step).await;
    assert_eq!(context.store().lock_latch(), LockLatch::Unlocked);

    context
        .status_sender()
        .try_save_status(report(VehicleState::WaypointReached, near()))
        .unwrap();
    tokio::time::sleep(step).await;
    tokio::time::sleep(step).await;

    let snapshot = context.store().snapshot();
    assert!(snapshot.released);
    assert_eq!(snapshot.phase, MissionPhase::DropSupplies);
    assert!(snapshot.elapsed_seconds >= 1.0);
    assert_eq!(log.count("vehicle.start"), 1);
    assert_eq!(log.count("payload.release"), 1);
    assert!(log.count("assurance.check_state(drop_supplies)") >= 1);

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();
}
