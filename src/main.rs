use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::time::Duration;

use bus_eta::simulator::{Simulator, SimulatorConfig, DEFAULT_NOISE_DEG};
use bus_eta::web::{self, Config};

#[derive(Parser)]
#[command(name = "bus-eta")]
#[command(about = "Live bus arrival estimates for a loop route")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the ingest and broadcast server
    Serve {
        /// YAML config; the built-in demo route is used when omitted
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Check a config file and print its route
    Validate {
        #[arg(short, long)]
        config: String,
    },
    /// Drive synthetic buses against a running server
    Simulate {
        #[arg(short, long)]
        config: Option<String>,
        #[arg(long, default_value = "http://localhost:8000")]
        url: String,
        #[arg(long, default_value_t = 2)]
        buses: usize,
        #[arg(long, default_value = "5s", value_parser = humantime::parse_duration)]
        interval: Duration,
        #[arg(long, default_value_t = DEFAULT_NOISE_DEG)]
        noise: f64,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(config.as_deref()),
        Commands::Validate { config } => validate(&config),
        Commands::Simulate {
            config,
            url,
            buses,
            interval,
            noise,
        } => simulate(
            config.as_deref(),
            SimulatorConfig {
                base_url: url,
                buses,
                interval,
                noise_deg: noise,
            },
        ),
    }
}

fn load_config(path: Option<&str>) -> Option<Config> {
    match path {
        Some(path) => match Config::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Error loading config {}: {}", path, e);
                None
            }
        },
        None => {
            log::info!("No config given, using the demo route");
            Some(Config::default())
        }
    }
}

fn runtime() -> Option<tokio::runtime::Runtime> {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => Some(rt),
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            None
        }
    }
}

fn serve(path: Option<&str>) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };
    let Some(rt) = runtime() else {
        return ExitCode::FAILURE;
    };

    match rt.block_on(web::run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn validate(path: &str) -> ExitCode {
    let Some(config) = load_config(Some(path)) else {
        return ExitCode::FAILURE;
    };

    match config.build_route() {
        Ok(route) => {
            println!("Config is valid ({} stops)", route.len());
            for (i, stop) in route.stops().iter().enumerate() {
                println!("  {}: {} @ {:.5}, {:.5}", i, stop.id, stop.lat, stop.lon);
            }
            println!(
                "  history {} samples, proximity {} km, queue {} events",
                config.tracker.history_capacity,
                config.tracker.stop_proximity_km,
                config.hub.queue_capacity
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Invalid config: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn simulate(path: Option<&str>, sim_config: SimulatorConfig) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };
    let route = match config.build_route() {
        Ok(route) => route,
        Err(e) => {
            eprintln!("Invalid config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let simulator = match Simulator::new(sim_config, &route) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let Some(rt) = runtime() else {
        return ExitCode::FAILURE;
    };

    rt.block_on(async {
        tokio::select! {
            _ = simulator.run() => {}
            _ = tokio::signal::ctrl_c() => log::info!("Simulation stopped"),
        }
    });
    ExitCode::SUCCESS
}
