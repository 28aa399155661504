//! Skydrop mission node
//!
//! Wires a mission context to the runtime monitor, a simulated payload and a
//! logging vehicle, then serves JSON requests from stdin, one per line.

mod requests;
mod vehicle;

use anyhow::Context;
use skydrop_core::{logging, Config};
use skydrop_mission::{MissionContext, SimulatedPayload};
use skydrop_monitor::AssuranceBroker;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::watch;
use tracing::{error, info};

use requests::{handle_line, Response};
use vehicle::LoggingVehicle;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == JSON_FLAG) {
        logging::init_json();
    } else {
        logging::init();
    }

    let config = match parse_config_path(&args) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default_config(),
    };

    let broker = match AssuranceBroker::from_file(&config.monitor.property_file) {
        Ok(broker) => Arc::new(broker),
        Err(err) => {
            error!(error = %err, "Monitor failed to load, refusing to start");
            return Err(err).context("monitor description did not load");
        }
    };
    info!(
        property = broker.monitor().property(),
        "Assurance broker ready"
    );

    let (context, runtime) = MissionContext::new(
        &config,
        broker.clone(),
        Arc::new(LoggingVehicle),
        Arc::new(SimulatedPayload::new()),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let runtime = tokio::spawn(runtime.run(shutdown_rx));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = handle_line(&context, &broker, line).await;
        let encoded = serde_json::to_string(&response)
            .unwrap_or_else(|err| format!("{{\"ok\":false,\"error\":\"{err}\"}}"));
        stdout.write_all(encoded.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    info!("stdin closed, shutting down");
    let _ = shutdown_tx.send(true);
    runtime.await.context("mission runtime task failed")?;
    Ok(())
}

/// Switches logging to JSON lines.
const JSON_FLAG: &str = "--json";

/// `--config <path>` or the first bare argument.
fn parse_config_path(args: &[String]) -> Option<PathBuf> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            return iter.next().map(PathBuf::from);
        }
    }
    args.iter()
        .find(|arg| !arg.starts_with("--"))
        .map(PathBuf::from)
}
