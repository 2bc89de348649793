use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use front_desk::kitchen::PrintLog;
use front_desk::{Config, KitchenMonitor, KotTracker, LogAlertSink, init_logger_with_file, render_ticket};
use pms_client::{HotelApi, NetworkHttpClient, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment and logging
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!(api = %config.api_base_url, "Front desk starting");

    // 2. Transport
    let session = Session::new();
    let http = NetworkHttpClient::new(&config.client_config(), session.clone())
        .context("Failed to build HTTP client")?;
    if !session.is_active() {
        tracing::warn!("No API_TOKEN configured, requests will be unauthenticated");
    }
    let api = HotelApi::new(http);

    // 3. Kitchen board
    let tracker = Arc::new(
        KotTracker::new(api).with_alerts(Arc::new(LogAlertSink), config.alert_ttl()),
    );
    let shutdown = CancellationToken::new();
    let monitor = KitchenMonitor::new(Arc::clone(&tracker), config.poll_interval(), shutdown.clone());
    let mut boards = monitor.subscribe();
    let monitor_task = tokio::spawn(monitor.run(None));

    // Print each ticket once, when it first shows up on the active board
    let width = config.paper_width;
    let printer_task = tokio::spawn(async move {
        let mut printed = PrintLog::new();
        while boards.changed().await.is_ok() {
            let board = Arc::clone(&boards.borrow_and_update());
            tracing::info!(
                active = board.active.len(),
                history = board.history.len(),
                "Kitchen board updated"
            );
            for order in printed.take_unprinted(&board) {
                println!("{}", render_ticket(order, width));
            }
        }
    });

    // 4. Run until ctrl-c
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    tracing::info!("Shutdown requested");
    shutdown.cancel();

    monitor_task.await.context("Kitchen monitor task failed")?;
    printer_task.await.context("Board printer task failed")?;
    tracing::info!("Front desk stopped");
    Ok(())
}
