//! Terminal truck viewer: fetches configuration, creates a headless map, and
//! refreshes nearby food trucks for every command read from stdin.

use std::sync::Arc;

use client::domain::{ViewerPorts, start_session};
use client::inbound::cli::forward_commands;
use client::inbound::session::run_session;
use client::outbound::http::{HttpTruckApi, resolve_api_base};
use client::outbound::location::FixedDeviceLocator;
use client::outbound::map::HeadlessMapSurface;
use client::outbound::notify::TracingNotificationSink;
use client::settings::ViewerSettings;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tokio::io::BufReader;
use tokio::runtime::Builder;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ViewerSettings::load().map_err(|err| eyre!("failed to load viewer settings: {err}"))?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build viewer runtime")?;
    runtime.block_on(run(settings))
}

async fn run(settings: ViewerSettings) -> Result<()> {
    let base = resolve_api_base(settings.api_base_url(), &DefaultEnv::new())?;
    let timeout = settings.request_timeout()?;
    info!(base = %base, ?timeout, "truck API configured");
    let api = HttpTruckApi::new(base, timeout)
        .wrap_err("failed to build HTTP client")?;
    let device = settings.device_position()?;

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let ports = ViewerPorts {
        api: Arc::new(api),
        map: Arc::new(HeadlessMapSurface::new(events_tx.clone())),
        notifier: Arc::new(TracingNotificationSink),
        locator: Arc::new(FixedDeviceLocator::new(device)),
    };
    let controller = start_session(ports, settings.controller_config()).await?;

    let reader = tokio::spawn(forward_commands(
        BufReader::new(tokio::io::stdin()),
        events_tx,
    ));
    let summary = run_session(&controller, events_rx).await;
    reader
        .await
        .wrap_err("command reader stopped unexpectedly")?
        .wrap_err("failed to read commands")?;

    info!(
        events = summary.outcomes.len(),
        final_phase = ?controller.snapshot().phase,
        "viewer closed"
    );
    Ok(())
}
