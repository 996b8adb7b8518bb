use anyhow::{anyhow, bail};
use clap::Parser;
use routeview::{
    sdk::config::ServiceConfig,
    sdk::controller::{RouteSearchController, Settlement},
    sdk::device::{DeviceEvent, DeviceTracker},
    sdk::overlay::{MarkerKind, OverlayManager, RenderSurface, SurfaceBridge},
    sdk::routing::{
        Coordinate, Geocoder, LocationCandidate, RemoteProvider, ReqwestHttpClient,
        SearchSession,
    },
    sdk::selection::RouteSelection,
    sdk::util::log::init_logging,
};
use std::{fs, path::PathBuf, sync::Arc};
use tokio::sync::mpsc;

/// Find a driving route between two places and print the map overlay it produces
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Where the route starts (e.g., "Jakarta"). Defaults to --here when omitted
    #[arg(short, long)]
    from: Option<String>,

    /// Where the route ends (e.g., "Bandung")
    #[arg(short, long)]
    to: String,

    /// [Optional] Device position as "lat,lon"
    #[arg(long)]
    here: Option<Coordinate>,

    /// Which search result to use for the origin
    #[arg(long, default_value_t = 0)]
    pick_from: usize,

    /// Which search result to use for the destination
    #[arg(long, default_value_t = 0)]
    pick_to: usize,

    /// [Optional] Also write the overlay JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Stands in for a map widget by logging every draw call.
struct LogSurface;

impl RenderSurface for LogSurface {
    fn set_overlay(&self, kind: MarkerKind, position: Coordinate, visible: bool) {
        log::info!("[MAP] {:?} marker at {} visible={}", kind, position, visible);
    }

    fn set_path(&self, coordinates: Option<&[Coordinate]>) {
        match coordinates {
            Some(points) => log::info!("[MAP] Route path with {} points", points.len()),
            None => log::info!("[MAP] Route path removed"),
        }
    }

    fn fit_view_to(&self, coordinates: &[Coordinate]) {
        if let (Some(first), Some(last)) = (coordinates.first(), coordinates.last()) {
            log::info!("[MAP] Fitting view to {} .. {}", first, last);
        }
    }

    fn set_heading(&self, degrees: f64) {
        log::info!("[MAP] Heading {:.0} degrees", degrees);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // --- 1. Dependency Initialization ---
    let config = ServiceConfig::from_env()?;
    config.log();

    let http = ReqwestHttpClient::new(&config.user_agent, config.request_timeout)?;
    let geocoder = Arc::new(Geocoder::new(RemoteProvider::new(http.clone(), &config)));
    let search = SearchSession::from_config(geocoder, &config);
    let overlay = OverlayManager::new();
    let controller = RouteSearchController::new(RemoteProvider::new(http, &config), overlay.clone());
    let tracker = DeviceTracker::new();
    let bridge = tokio::spawn(
        SurfaceBridge::new(LogSurface).run(overlay.subscribe(), tracker.subscribe()),
    );

    // --- 2. Resolve both ends ---
    let mut selection = RouteSelection::new();
    if let Some(text) = &cli.from {
        selection.set_from(pick(&search, text, cli.pick_from).await?);
    }
    if let Some(here) = cli.here {
        let (tx, rx) = mpsc::channel(1);
        tx.send(DeviceEvent::LocationAvailable(here)).await?;
        drop(tx);
        tracker
            .run(rx, |position| {
                if selection.prefill_from(position) {
                    log::info!("Origin set to your location ({})", position);
                }
            })
            .await;
    }
    selection.set_to(pick(&search, &cli.to, cli.pick_to).await?);

    let (from, to) = selection.query()?;
    if let (Some(origin), Some(destination)) = (selection.from(), selection.to()) {
        log::info!("Routing from {} to {}", origin.label, destination.label);
    }

    // --- 3. Fetch and apply the route ---
    let settlement = controller.submit(from, to).settled().await;

    // --- 4. Output Results ---
    let json = serde_json::to_string_pretty(&overlay.current())?;
    println!("{}", json);
    if let Some(path) = &cli.output {
        fs::write(path, &json)?;
        log::info!("Overlay written to {}", path.display());
    }
    // The bridge exits once it has drawn the last overlay and every writer is gone.
    drop(controller);
    drop(overlay);
    bridge.await?;

    if let Settlement::Failed(kind) = settlement {
        bail!(kind.user_message());
    }
    Ok(())
}

async fn pick(
    search: &SearchSession,
    text: &str,
    index: usize,
) -> anyhow::Result<LocationCandidate> {
    let results = search
        .settle(text)
        .await
        .ok_or_else(|| anyhow!("Search session stopped"))?;
    if let Some(e) = &results.failure {
        bail!("{} ({})", e.kind().user_message(), e);
    }

    log::info!("{} candidates for \"{}\"", results.candidates.len(), text);
    for (i, candidate) in results.candidates.iter().enumerate() {
        log::info!("  [{}] {} ({})", i, candidate.label, candidate.coordinate);
    }

    results
        .candidates
        .into_iter()
        .nth(index)
        .ok_or_else(|| anyhow!("No search result #{} for \"{}\"", index, text))
}
