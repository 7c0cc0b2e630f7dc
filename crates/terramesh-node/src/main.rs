//! Terramesh Node - field mesh node binary
//!
//! This binary runs one terramesh field node with:
//! - Flood relay over UDP broadcast (host stand-in for the radio)
//! - Relay role: operator console on stdin/stdout
//! - Sensor role: periodic soil/pressure sampling plus an HTTP + SSE
//!   server for browsers on the local access point

mod sensors;
mod server;

use clap::{Parser, ValueEnum};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use terramesh_core::NodeId;
use terramesh_relay::{
    BridgeHandle, LocalContent, RelayBridge, RelayCore, TransportConfig, UdpTransport,
    DEFAULT_UDP_PORT,
};

use sensors::{SensorSampler, SimulatedBarometer, SimulatedSoilProbe, SENSOR_INTERVAL};
use server::AppState;

/// Which local channel this node drives
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Role {
    /// Operator console: stdin in, stdout out
    Relay,
    /// Periodic sensor reports plus an HTTP/SSE server
    Sensor,
}

#[derive(Parser)]
#[command(name = "terramesh-node")]
#[command(about = "Terramesh flood-relay field node")]
struct Args {
    /// Node role
    #[arg(long, value_enum, default_value = "relay")]
    role: Role,

    /// Mesh identity (random node-XXXX when omitted)
    #[arg(long)]
    node_id: Option<String>,

    /// Display name stamped on chat messages
    #[arg(long, short, default_value = "Admin")]
    name: String,

    /// UDP broadcast port for the wireless stand-in
    #[arg(long, default_value_t = DEFAULT_UDP_PORT)]
    port: u16,

    /// HTTP server port (sensor role only)
    #[arg(long, default_value_t = 8080)]
    http_port: u16,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let node_id = NodeId::from(
        args.node_id
            .clone()
            .unwrap_or_else(|| format!("node-{:04x}", rand::random::<u16>())),
    );
    info!("Starting terramesh node {} as {:?}", node_id, args.role);

    let transport = UdpTransport::new(TransportConfig {
        port: args.port,
        ..TransportConfig::default()
    });
    let core = RelayCore::new(node_id.clone());
    let (bridge, handle) = RelayBridge::new(transport, core);

    // A dead transport at startup is fatal; a node that cannot reach the
    // medium is inert and should say so immediately.
    let bridge_task = tokio::spawn(async move {
        if let Err(e) = bridge.run().await {
            error!("relay bridge failed: {}", e);
            return Err(e);
        }
        Ok(())
    });

    match args.role {
        Role::Relay => run_relay_console(handle, &args.name).await?,
        Role::Sensor => run_sensor_node(handle, node_id, args.name.clone(), args.http_port).await?,
    }

    bridge_task.await??;
    Ok(())
}

/// Relay role: lines typed on stdin go out to the mesh, accepted mesh
/// frames are printed to stdout, one JSON frame per line.
async fn run_relay_console(handle: BridgeHandle, name: &str) -> anyhow::Result<()> {
    info!("operator console ready, type a message and press enter");

    // Printer task: accepted frames to stdout
    let mut local_out = handle.subscribe_local_out();
    tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        loop {
            match local_out.recv().await {
                Ok(frame) => {
                    if stdout.write_all(&frame).await.is_err() {
                        break;
                    }
                    if stdout.write_all(b"\n").await.is_err() {
                        break;
                    }
                    let _ = stdout.flush().await;
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "console printer lagged, frames skipped");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let content = LocalContent::Chat {
            sender_name: Some(name.to_string()),
            text: text.to_string(),
        };
        if let Err(e) = handle.send_local(content).await {
            error!("relay bridge gone: {}", e);
            break;
        }
    }

    info!("stdin closed, shutting down");
    handle.shutdown().await?;
    Ok(())
}

/// Sensor role: sample on a fixed interval and serve HTTP + SSE.
async fn run_sensor_node(
    handle: BridgeHandle,
    node_id: NodeId,
    node_name: String,
    http_port: u16,
) -> anyhow::Result<()> {
    // Sampler task. The simulated sensors stand in for the ADC probe and
    // I2C barometer on real hardware.
    let sampler_handle = handle.clone();
    tokio::spawn(async move {
        let mut sampler =
            SensorSampler::new(SimulatedSoilProbe::new(), Some(SimulatedBarometer::new()));
        let mut ticker = tokio::time::interval(SENSOR_INTERVAL);
        loop {
            ticker.tick().await;
            let report = sampler.sample();
            if let Err(e) = sampler_handle
                .send_local(LocalContent::Sensors(report))
                .await
            {
                error!("relay bridge gone, stopping sampler: {}", e);
                break;
            }
        }
    });

    let state = Arc::new(AppState {
        bridge: handle,
        start_time: Instant::now(),
        node_id,
        node_name,
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", http_port)).await?;
    let actual = listener.local_addr()?;
    info!("HTTP server listening on http://127.0.0.1:{}", actual.port());
    info!("  SSE feed:  http://127.0.0.1:{}/events", actual.port());
    info!("  send chat: POST http://127.0.0.1:{}/send", actual.port());

    let app = server::create_router(state);
    axum::serve(listener, app).await?;

    Ok(())
}
