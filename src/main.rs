//! Dispatch PoC - map-based dispatch/navigation aid core
//!
//! Wires the io tasks (catalog fetch, GPS watcher, operator control listener,
//! route worker, map publisher) to the route session event loop.

use clap::Parser;
use dispatch_poc::domain::types::SessionEvent;
use dispatch_poc::infra::{Config, Metrics};
use dispatch_poc::io::{
    create_map_channel, load_catalog, start_control_listener, CatalogClient,
    ControlListenerConfig, GpsWatcher, MapCommand, MapPublisher, RouterClient,
};
use dispatch_poc::services::{create_route_worker, RouteSession};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Dispatch PoC - route-session core
#[derive(Parser, Debug)]
#[command(name = "dispatch-poc", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,
}

/// Session event queue depth (bounded for backpressure)
const EVENT_QUEUE_DEPTH: usize = 1000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Structured logging, level configurable via RUST_LOG (default INFO)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!("dispatch-poc starting");

    let args = Args::parse();
    let config = Config::load_from_path(&args.config);

    info!(
        config_file = %config.config_file(),
        catalog_url = %config.catalog_base_url(),
        router_url = %config.router_base_url(),
        gps_device = %config.gps_device(),
        control_port = %config.control_port(),
        map_output = %config.map_output_file(),
        "config_loaded"
    );

    // Shutdown signal shared by all tasks
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let metrics = Arc::new(Metrics::new());

    // Map command bridge: session -> publisher -> front-end
    let (map_tx, map_rx) = create_map_channel(EVENT_QUEUE_DEPTH);
    let publisher = MapPublisher::new(config.map_output_file(), map_rx);
    let publisher_shutdown = shutdown_rx.clone();
    tokio::spawn(async move {
        publisher.run(publisher_shutdown).await;
    });

    // Initial view center, before any position fix
    let (center_lat, center_lon) = config.map_center();
    map_tx.send(MapCommand::SetViewCenter {
        lat: center_lat,
        lon: center_lon,
        zoom: config.initial_zoom(),
    });

    // Session event queue
    let (event_tx, event_rx) = mpsc::channel::<SessionEvent>(EVENT_QUEUE_DEPTH);

    // One-shot catalog load
    let catalog_client = CatalogClient::new(config.catalog_base_url(), config.catalog_timeout_ms())?;
    let catalog_tx = event_tx.clone();
    tokio::spawn(async move {
        load_catalog(catalog_client, catalog_tx).await;
    });

    // Continuous position observation
    let gps = GpsWatcher::new(config.gps_device(), config.gps_baud(), event_tx.clone());
    let gps_shutdown = shutdown_rx.clone();
    tokio::spawn(async move {
        gps.run(gps_shutdown).await;
    });

    // Operator control listener
    let control_config = ControlListenerConfig {
        port: config.control_port(),
        enabled: config.control_enabled(),
    };
    let control_tx = event_tx.clone();
    let control_shutdown = shutdown_rx.clone();
    tokio::spawn(async move {
        if let Err(e) = start_control_listener(control_config, control_tx, control_shutdown).await
        {
            tracing::error!(error = %e, "control listener error");
        }
    });

    // Route worker: keeps routing HTTP calls off the session loop
    let router = Arc::new(RouterClient::new(
        config.router_base_url(),
        config.router_timeout_ms(),
    )?);
    let (route_tx, route_worker) =
        create_route_worker(router, event_tx.clone(), metrics.clone(), 16);
    let worker_shutdown = shutdown_rx.clone();
    tokio::spawn(async move {
        route_worker.run(worker_shutdown).await;
    });
    drop(event_tx);

    // Periodic metrics summary
    let metrics_clone = metrics.clone();
    let metrics_interval = config.metrics_interval_secs();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(metrics_interval));
        loop {
            interval.tick().await;
            metrics_clone.snapshot().log();
        }
    });

    // Handle shutdown on Ctrl+C
    let shutdown_signal = shutdown_tx;
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("shutdown_signal_received");
        let _ = shutdown_signal.send(true);
    });

    // Run the session - consumes events until all producers are gone
    let mut session = RouteSession::new(config, map_tx, route_tx, metrics);
    info!("route_session_started");
    session.run(event_rx).await;

    info!("dispatch-poc shutdown complete");
    Ok(())
}
