//! corridor — end-to-end demo of the lane-level traffic simulator.
//!
//! Builds a synthetic street grid, draws a random OD population, assigns
//! routes, runs the host device with a simple free-flow kernel, and writes
//! CSV snapshots at every checkpoint.
//!
//! ```text
//! cargo run -p corridor --release -- --agents 20000 --side 30 --output output/corridor
//! cargo run -p corridor -- --config corridor.json --log-level debug
//! ```

mod kernel;
mod network;

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lc_agent::{AgentSetBuilder, AgentStatus, DEFAULT_ROUTE_CAPACITY};
use lc_core::{SimConfig, VertexId};
use lc_device::HostDevice;
use lc_lanemap::Lanemap;
use lc_output::{CsvWriter, SnapshotObserver};
use lc_sim::SimBuilder;

use kernel::FreeFlowKernel;
use network::build_grid;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Run the lane-level traffic simulator on a synthetic grid")]
struct Args {
    /// JSON file with a `SimConfig`; flags below override its fields.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for checkpoint CSVs (created if missing).
    #[arg(short, long, default_value = "output/corridor")]
    output: PathBuf,

    /// Number of agents.
    #[arg(short, long, default_value_t = 5_000)]
    agents: usize,

    /// Intersections per side of the grid.
    #[arg(long, default_value_t = 20)]
    side: u32,

    /// Lanes per merged edge.
    #[arg(long, default_value_t = 2)]
    lanes: u8,

    #[arg(long)]
    end_time: Option<f64>,

    #[arg(long)]
    save_interval: Option<f64>,

    #[arg(long)]
    delta_time: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (default: all logical cores).
    #[arg(long)]
    threads: Option<usize>,

    /// `tracing` filter, e.g. `info` or `lc_sim=debug`.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Reject grid shapes that leave no vertex to draw trips from.
    fn check_grid(&self) -> Result<()> {
        if self.side == 0 {
            bail!("--side must be at least 1");
        }
        if self.side.checked_mul(self.side).is_none() {
            bail!("--side {} gives more vertices than fit in a u32", self.side);
        }
        Ok(())
    }

    fn sim_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
                serde_json::from_reader(file).with_context(|| format!("parsing {}", path.display()))?
            }
            None => SimConfig::default(),
        };
        if let Some(v) = self.end_time      { config.end_time = v; }
        if let Some(v) = self.save_interval { config.save_interval = v; }
        if let Some(v) = self.delta_time    { config.delta_time = v; }
        if let Some(v) = self.seed          { config.seed = v; }
        if self.threads.is_some()           { config.num_threads = self.threads; }
        Ok(config)
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log_level).context("invalid --log-level")?)
        .with_writer(std::io::stderr)
        .init();

    args.check_grid()?;
    let config = args.sim_config()?;
    if let Some(n) = config.num_threads {
        rayon::ThreadPoolBuilder::new().num_threads(n).build_global()?;
    }

    // 1. Network and lane map.
    let network = build_grid(args.side)?;
    let lanemap = Lanemap::from_network(&network, args.lanes)?;
    info!(
        vertices = network.vertex_count(),
        edges = network.edge_count(),
        lane_cells = lanemap.lane_cells().len(),
        "network built"
    );

    // 2. Random OD population.
    let vertex_count = network.vertex_count() as u32;
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let mut builder = AgentSetBuilder::new(DEFAULT_ROUTE_CAPACITY).with_expected(args.agents);
    for _ in 0..args.agents {
        let origin = VertexId(rng.gen_range(0..vertex_count));
        let destination = VertexId(rng.gen_range(0..vertex_count));
        builder.add_trip(origin, destination, rng.gen_range(0..2));
    }
    let agents = builder.build();

    // 3. Routes.
    let t0 = Instant::now();
    let (mut sim, report) = SimBuilder::new(config, &network, agents, lanemap).build()?;
    info!(
        routed = report.routed,
        trivial = report.trivial,
        unrouted = report.unrouted,
        secs = t0.elapsed().as_secs_f64(),
        "routes assigned"
    );

    // 4. Output.
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut observer = SnapshotObserver::new(CsvWriter::new(&args.output)?);

    // 5. Run.
    let mut device = HostDevice::new(FreeFlowKernel, sim.config.seed);
    let t0 = Instant::now();
    let summary = sim.run(&mut device, &mut observer)?;
    let elapsed = t0.elapsed();

    if let Some(e) = observer.take_error() {
        warn!(error = %e, "snapshot finalisation failed");
    }

    // 6. Summary.
    let finished = sim.agents.iter().filter(|a| a.status == AgentStatus::Finished).count();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  steps        : {}", summary.steps);
    println!("  checkpoints  : {}", summary.checkpoints);
    println!("  end time     : {} s", summary.end_time);
    println!("  finished     : {finished} / {}", sim.agents.len());
    println!("  output       : {}", args.output.display());

    Ok(())
}
