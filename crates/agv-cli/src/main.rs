//! Command-line front end: load payloads, run the reference deployment,
//! write the execution log and both reports.
//!
//! The simulation core stays I/O-free; this binary owns every file touch.
//! A deadlocked run is reported and still exits 0 — partial delivery is a
//! result, not a failure.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use agv_dispatch::PriorityLadder;
use agv_fleet::{load_payloads_csv, Fleet};
use agv_network::StationNetwork;
use agv_output::{detail_report, summary_report, MoveLogObserver};
use agv_sim::{RunOutcome, SimBuilder};

#[derive(Parser)]
#[command(
    name = "agv-fleet",
    version,
    about = "Simulate an AGV fleet delivering payloads across the station network"
)]
struct Args {
    /// Payload CSV: id,source,destination,weight,priority,dispatch_time
    #[arg(default_value = "payload.csv")]
    payload_file: PathBuf,

    /// Execution-log output (one move record per line)
    #[arg(default_value = "execution_logs.txt")]
    log_output: PathBuf,

    /// Detail report output
    #[arg(default_value = "simulation_report.txt")]
    detail_report: PathBuf,

    /// Summary report output
    #[arg(default_value = "summary_report.txt")]
    summary_report: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // Reference deployment: the 9-station grid and the three-vehicle fleet.
    let network = StationNetwork::grid_default();
    let payloads = load_payloads_csv(&args.payload_file, network.station_count())
        .with_context(|| format!("loading payloads from {}", args.payload_file.display()))?;
    if payloads.is_empty() {
        bail!("no payloads in {}", args.payload_file.display());
    }
    info!(count = payloads.len(), "payloads loaded");

    let mut sim = SimBuilder::new(network, Fleet::default_trio(), payloads, PriorityLadder)
        .build()
        .context("assembling simulation")?;

    let log_file = BufWriter::new(
        File::create(&args.log_output)
            .with_context(|| format!("creating {}", args.log_output.display()))?,
    );
    let mut observer = MoveLogObserver::new(log_file);

    let outcome = sim.run(&mut observer).context("running simulation")?;
    if let Some(err) = observer.take_error() {
        warn!(%err, "execution log may be incomplete");
    }

    let metrics = sim.metrics();
    std::fs::write(
        &args.detail_report,
        detail_report(&metrics, sim.fleet(), sim.payloads(), sim.move_log()),
    )
    .with_context(|| format!("writing {}", args.detail_report.display()))?;
    std::fs::write(&args.summary_report, summary_report(&metrics))
        .with_context(|| format!("writing {}", args.summary_report.display()))?;

    if outcome == RunOutcome::Deadlock {
        warn!("run ended in deadlock — see the undelivered-payloads section of the report");
    }
    println!("Simulation complete ({outcome:?})");
    println!("  Makespan: {} minutes", metrics.makespan_minutes);
    println!(
        "  Delivered: {} / {} ({:.1}%)",
        metrics.delivered_count,
        metrics.total_payloads,
        metrics.delivery_rate()
    );
    for (agv, charges) in &metrics.charge_counts {
        println!("  {agv}: {charges} charges");
    }
    println!(
        "  Outputs: {}, {}, {}",
        args.log_output.display(),
        args.detail_report.display(),
        args.summary_report.display()
    );

    Ok(())
}
