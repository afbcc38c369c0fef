use clap::{CommandFactory, Parser};
use common::position::Position;
use injection::{MockLocationModule, injector::InjectionConfig};
use location_service::{LocationService, system::SystemLocationService};
use module_core::{Event, EventBus, EventKind, Module, ModuleCtx};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Image whose geotag is injected as the mock location
    #[arg(short, long)]
    image: Option<PathBuf>,
    /// Latitude in decimal degrees, takes precedence over --image
    #[arg(long, requires = "longitude")]
    latitude: Option<f64>,
    /// Longitude in decimal degrees, takes precedence over --image
    #[arg(long, requires = "latitude")]
    longitude: Option<f64>,
    /// Pause between two injected fixes in milliseconds
    #[arg(long, default_value_t = 250)]
    interval_ms: u64,
    /// Stop after this many injected fixes
    #[arg(long)]
    max_iterations: Option<u32>,
}

fn resolve_position(cli: &Cli) -> Result<Position, ()> {
    if let (Some(latitude), Some(longitude)) = (cli.latitude, cli.longitude) {
        return Ok(Position::new(&latitude, &longitude));
    }
    if let Some(image) = &cli.image {
        return match geotag::read_geotag(image) {
            Ok(Some(position)) => {
                info!(
                    "Image {} is geotagged at latitude {} longitude {}",
                    image.display(),
                    position.latitude,
                    position.longitude
                );
                Ok(position)
            }
            Ok(None) => {
                error!("The image {} carries no geotag", image.display());
                Err(())
            }
            Err(e) => {
                error!("Failed to read the image {}. Error: {}", image.display(), e);
                Err(())
            }
        };
    }
    error!("No coordinate specified. Use --image or --latitude/--longitude");
    Cli::command().print_help().unwrap();
    Err(())
}

/// Turns Ctrl-C and the injection core's shutdown request into a
/// bus-wide quit event.
async fn supervise(mut ctx: ModuleCtx) -> Result<(), ()> {
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl-C, stopping modules...");
                let _ = ctx.sender.send(Event { kind: EventKind::QuitEvent });
                return Ok(());
            }
            event = ctx.receiver.recv() => {
                match event {
                    Ok(event) => match event.kind {
                        EventKind::ShutdownRequestEvent => {
                            info!("Injection finished, stopping modules...");
                            let _ = ctx.sender.send(Event { kind: EventKind::QuitEvent });
                            return Ok(());
                        }
                        EventKind::QuitEvent => return Ok(()),
                        _ => {}
                    },
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => return Ok(()),
                    Err(e) => error!("Failed to receive event. Error: {}", e),
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), ()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let position = resolve_position(&cli)?;
    let service = Arc::new(SystemLocationService::new());
    if !service.mock_sources_permitted() {
        error!("Mock location sources are disabled on this host, enable them and try again");
        return Err(());
    }

    let config = InjectionConfig {
        interval: Duration::from_millis(cli.interval_ms),
        iteration_cap: cli.max_iterations,
    };
    let eb = EventBus::default();
    let supervisor_ctx = eb.context();
    let mut module = MockLocationModule::new(eb.context(), service.clone(), config, Some(position));

    info!("Starting modules...");
    tokio::join!(module.run(), supervise(supervisor_ctx)).0
}
