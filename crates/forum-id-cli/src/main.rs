#![doc = include_str!("../README.md")]

mod cli;

use clap::Parser;
use cli::commands;
use cli::config::{CliArgs, CliConfig};
use cli::telemetry::init_telemetry;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_telemetry(config.log_json)?;
    log_startup_info(&config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&config, &mut out)
}

fn log_startup_info(config: &CliConfig) {
    if cfg!(debug_assertions) {
        tracing::debug!("Running with full config: {:#?}", config);
    } else {
        tracing::debug!(
            "Running with layout {}/{}/{} and a {:?} tick",
            config.layout.timestamp_bits(),
            config.layout.counter_bits(),
            config.layout.random_bits(),
            config.unit
        );
    }
}
