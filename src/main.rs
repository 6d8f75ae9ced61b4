//! IDS Alert Feed - Headless renderer
//!
//! Runs one scan and prints every feed event as a JSON line, then the final
//! dashboard view. Filters come from `IDS_FILTER_SEVERITY` / `IDS_SEARCH_IP`.

use std::process::ExitCode;

use ids_alert_feed::constants::{APP_NAME, APP_VERSION};
use ids_alert_feed::{Dashboard, FeedConfig, FeedEvent};
use tokio::sync::broadcast::{self, error::RecvError};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);

    let config = FeedConfig::from_env();
    log::info!(
        "Scan: {:?} every {:?}, keeping {} alerts",
        config.scan_duration,
        config.tick_interval,
        config.capacity
    );

    let dashboard = match Dashboard::new(config) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            log::error!("Cannot build dashboard: {}", e);
            return ExitCode::from(2);
        }
    };

    if let Ok(raw) = std::env::var("IDS_FILTER_SEVERITY") {
        if let Err(e) = dashboard.set_filter_severity_str(&raw) {
            log::warn!("{} - keeping 'all'", e);
        }
    }
    if let Ok(needle) = std::env::var("IDS_SEARCH_IP") {
        dashboard.set_search_ip(needle);
    }

    let renderer = tokio::spawn(render_events(dashboard.subscribe()));

    match dashboard.start_scan() {
        Ok(true) => {}
        Ok(false) => log::warn!("Scan already running"),
        Err(e) => {
            log::error!("Cannot start scan: {}", e);
            return ExitCode::FAILURE;
        }
    }

    dashboard.wait_idle().await;
    let view = dashboard.view();

    // Closing every sender lets the renderer drain and exit
    drop(dashboard);
    if let Err(e) = renderer.await {
        log::error!("Renderer task failed: {}", e);
    }

    match serde_json::to_string_pretty(&view) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Cannot serialize dashboard view: {}", e);
            return ExitCode::FAILURE;
        }
    }

    log::info!(
        "Done: {} of {} retained alerts match the filters",
        view.alerts.len(),
        view.total_alerts
    );
    ExitCode::SUCCESS
}

async fn render_events(mut rx: broadcast::Receiver<FeedEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(line) => println!("{}", line),
                Err(e) => log::error!("Failed to render '{}': {}", event.name(), e),
            },
            Err(RecvError::Lagged(skipped)) => {
                log::warn!("Renderer lagged, {} events skipped", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}
