//! SparkMart CLI.
//!
//! - `sparkmart run` - headless store simulation, prints the metrics summary
//! - `sparkmart config` - print (or write) the default configuration

use std::path::{Path, PathBuf};

use ai_tools::{LogTraceSink, NullTraceSink, TraceSink};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use sparkmart_core::{SimConfig, Simulation};

#[derive(Parser)]
#[command(name = "sparkmart")]
#[command(about = "Goal-driven store simulation", version)]
struct Cli {
    /// Verbose output, including per-agent planning traces
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation headless
    Run {
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Simulated seconds to run
        #[arg(long, default_value_t = 600.0)]
        seconds: f64,

        /// Override the configured seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the configured time scale (clamped to 0.1..=10)
        #[arg(long, value_parser = parse_time_scale)]
        time_scale: Option<f32>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default configuration as YAML
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            config,
            seconds,
            seed,
            time_scale,
            json,
        } => {
            let mut config = match config {
                Some(path) => SimConfig::load(&path)?,
                None => SimConfig::default(),
            };
            if let Some(seed) = seed {
                config.clock.seed = seed;
            }
            if let Some(scale) = time_scale {
                config.clock.time_scale = scale;
            }

            if cli.verbose {
                run(Simulation::with_trace(config, LogTraceSink), seconds, json)
            } else {
                run(Simulation::with_trace(config, NullTraceSink), seconds, json)
            }
        }
        Commands::Config { output } => write_default_config(output.as_deref()),
    }
}

fn parse_time_scale(value: &str) -> Result<f32, String> {
    let scale: f32 = value
        .parse()
        .map_err(|e| format!("`{value}` is not a number: {e}"))?;
    if !scale.is_finite() {
        return Err(format!("`{value}` is not a finite time scale"));
    }
    Ok(scale)
}

fn run<S: TraceSink>(mut sim: Simulation<S>, seconds: f64, json: bool) -> Result<()> {
    tracing::info!(seconds, seed = sim.config().clock.seed, "Starting simulation");
    let ticks = sim.run_for(seconds);
    tracing::info!(ticks, "Simulation finished");

    let summary = sim.summary();
    if json {
        let out = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{out}");
        return Ok(());
    }

    println!("SparkMart Summary");
    println!("=================");
    println!();
    println!("Simulated: {:.1}s over {} ticks", summary.sim_seconds, summary.ticks);
    println!(
        "Shoppers:  {} arrived, {} still inside",
        summary.customers_spawned, summary.customers_in_store
    );
    println!("Staff:     {}", summary.employees);
    println!();
    print!("{}", sim.metrics().summary());
    Ok(())
}

fn write_default_config(output: Option<&Path>) -> Result<()> {
    let yaml = SimConfig::default().to_yaml()?;
    match output {
        Some(path) => {
            std::fs::write(path, yaml)
                .with_context(|| format!("Failed to write config to {}", path.display()))?;
            println!("Wrote default configuration to {}", path.display());
        }
        None => print!("{yaml}"),
    }
    Ok(())
}
