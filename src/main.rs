use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use outbreak::{Config, Engine, Trajectory};
use std::{io, path::PathBuf};

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate the outbreak and print a summary of the final state.
    Run {
        #[arg(long)]
        days: Option<usize>,
    },

    /// Simulate the outbreak and print the stage totals of every day.
    Trajectory {
        #[arg(long)]
        days: Option<usize>,
    },
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let cfg = Config::from_file(&args.config).context("failed to construct cfg")?;
    log::info!("{cfg:#?}");

    let mut engine =
        Engine::new(cfg.disease, cfg.init).context("failed to construct engine")?;
    log::debug!("{engine:#?}");

    match args.command {
        Command::Run { days } => {
            let days = cfg.output.days(days)?;
            let trajectory = Trajectory::from_snapshots(engine.run(days));
            if let Some((day, contagious)) = trajectory.peak_contagious() {
                log::info!("contagious population peaked at {contagious:.6} on day {day}");
            }
            println!("{engine}");
        }
        Command::Trajectory { days } => {
            let days = cfg.output.days(days)?;
            let trajectory = Trajectory::from_snapshots(engine.run(days));
            let mut stdout = io::stdout().lock();
            trajectory
                .write_csv(&mut stdout)
                .context("failed to write trajectory")?;
        }
    }

    if engine.n_anomalies() > 0 {
        log::warn!("{} numeric anomalies were clamped", engine.n_anomalies());
    }

    Ok(())
}
