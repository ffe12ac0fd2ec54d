use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

use qase_report_viewer::config::{CliArgs, ViewerConfig};
use qase_report_viewer::state::ViewerState;
use qase_report_viewer::{export, logging, server, source};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let _log_guard = logging::init(args.log_file.as_deref())?;

    info!("Starting qase-report-viewer v{}", env!("CARGO_PKG_VERSION"));

    let config = ViewerConfig::from_args(args);
    if let Some(dir) = config.report_dir() {
        if !dir.exists() {
            error!("Report directory does not exist: {:?}", dir);
            std::process::exit(1);
        }
    }

    let source = source::from_config(&config)?;
    info!("Report source: {}", source.describe());
    let export_dir = config.export_dir.clone();
    let listen_addr = config.listen_addr();
    let state = Arc::new(ViewerState::new(config, source));

    if let Some(out_dir) = export_dir {
        let summary = export::export(&state, &out_dir).await?;
        if !summary.failed_tests.is_empty() {
            warn!(
                "{} tests exported without details: {:?}",
                summary.failed_tests.len(),
                summary.failed_tests
            );
        }
        info!("Open {:?} in a browser", out_dir.join("index.html"));
        return Ok(());
    }

    // A failed first load is shown in the page; the user can reload later.
    if let Err(e) = state.load().await {
        warn!("Initial report load failed: {}", e);
    }

    let router = server::build_router(state.clone());
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!("Report viewer listening on http://{}", listen_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Report viewer shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
