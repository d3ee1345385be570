/* 3rd party libraries */
use clap::Parser;
use crossbeam_channel as cbc;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::Builder;

/* Custom libraries */
use elevator_sim::config::{self, Config};
use elevator_sim::logging::{FacadeLogger, Logger};
use elevator_sim::{banner, unwrap_or_exit, ElevatorController, EventSource};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Parser, Debug)]
#[clap(author, version, about = "Single-car elevator dispatch simulation")]
struct Args {
    /// TOML configuration file [default: config.toml]
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Button press script, overrides the configuration
    #[clap(short, long)]
    events: Option<PathBuf>,

    /// Floor the car starts on, overrides the configuration
    #[clap(short, long, allow_hyphen_values = true)]
    start_floor: Option<i32>,

    /// Identifier of the car, overrides the configuration
    #[clap(long)]
    id: Option<u32>,
}

fn load_config(args: &Args) -> Config {
    let mut config = match &args.config {
        Some(path) => unwrap_or_exit!(config::load_config(path)),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            unwrap_or_exit!(config::load_config(Path::new(DEFAULT_CONFIG_PATH)))
        }
        None => {
            warn!("No {} found, using default configuration", DEFAULT_CONFIG_PATH);
            Config::default()
        }
    };

    if let Some(path) = &args.events {
        config.event_source.path = path.clone();
    }
    if let Some(floor) = args.start_floor {
        config.elevator.start_floor = floor;
    }
    if let Some(id) = args.id {
        config.elevator.id = id;
    }
    config
}

/* Main */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args);

    banner::print_title();

    let logger: Arc<dyn Logger> = Arc::new(FacadeLogger);
    let elevator = Arc::new(ElevatorController::new(&config.elevator, logger.clone()));
    let event_source = EventSource::from_path(&config.event_source.path, logger);
    let (stop_tx, stop_rx) = cbc::unbounded::<()>();

    // Ctrl-C stops the button presser; the car still serves what is queued
    let signalled_elevator = elevator.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Shutting down...");
        let _ = stop_tx.send(());
        signalled_elevator.terminate();
    }) {
        warn!("Failed to set signal handler: {}", e);
    }

    info!("Starting elevator simulation: {}", elevator);

    let runner = elevator.clone();
    let elevator_thread = unwrap_or_exit!(Builder::new()
        .name("elevator".into())
        .spawn(move || runner.run()));

    let presser = elevator.clone();
    let presser_thread = unwrap_or_exit!(Builder::new()
        .name("button_presser".into())
        .spawn(move || event_source.run(&presser, &stop_rx)));

    match presser_thread.join() {
        Ok(fired) => info!("Button presser finished after {} presses", fired),
        Err(_) => error!("Button presser thread panicked"),
    }

    elevator.terminate();
    if elevator_thread.join().is_err() {
        error!("Elevator thread panicked");
    }

    banner::print_scorecard(elevator.id(), &elevator.stats());
}
