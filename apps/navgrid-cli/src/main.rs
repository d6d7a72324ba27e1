use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use glam::Vec3;
use navgrid_common::{Coordinate, DEFAULT_CELL_SIZE};
use navgrid_grid::Grid;
use navgrid_jobs::JobConfig;
use navgrid_paths::{LockPolicy, PathOutcome};
use navgrid_registry::{GridInfo, GridRegistry, Navigator};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "navgrid-cli", about = "CLI tool for navgrid operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Number of path worker threads
    #[arg(long, global = true)]
    workers: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and defaults
    Info,
    /// Run the three-node line scenario through the job manager
    Demo,
    /// Build a connected lattice on the z = 0 plane and write it as JSON
    Lattice {
        /// Cells along x
        #[arg(long, default_value = "8")]
        width: i32,
        /// Cells along y
        #[arg(long, default_value = "8")]
        depth: i32,
        /// Remove the middle column except for its last cell
        #[arg(long)]
        wall: bool,
        /// Grid name stored in the document
        #[arg(long, default_value = "lattice")]
        name: String,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print counts for a grid file
    Inspect {
        file: PathBuf,
    },
    /// Find a path between two cells of a grid file
    Path {
        file: PathBuf,
        /// Start cell as x,y,z
        #[arg(long, value_parser = parse_cell)]
        from: Coordinate,
        /// Goal cell as x,y,z
        #[arg(long, value_parser = parse_cell)]
        to: Coordinate,
        /// Cells to lock before searching, as x,y,z
        #[arg(long = "lock", value_parser = parse_cell)]
        locks: Vec<Coordinate>,
        /// Route through locked cells instead of around them
        #[arg(long)]
        traverse_locks: bool,
        /// Seconds to wait for the search
        #[arg(long, default_value = "30")]
        timeout: u64,
    },
}

fn parse_cell(s: &str) -> Result<Coordinate, String> {
    s.replace(',', " ")
        .parse()
        .map_err(|err| format!("{err}; expected x,y,z"))
}

fn job_config(workers: Option<usize>) -> JobConfig {
    workers.map(JobConfig::with_workers).unwrap_or_default()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = job_config(cli.workers);
            println!("navgrid-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("default cell size: {DEFAULT_CELL_SIZE}");
            println!("path workers: {}", config.workers);
        }
        Commands::Demo => demo(job_config(cli.workers))?,
        Commands::Lattice {
            width,
            depth,
            wall,
            name,
            output,
        } => {
            if width < 1 || depth < 1 {
                bail!("lattice needs at least one cell on each axis");
            }
            let grid = lattice(&name, width, depth, wall);
            navgrid_persist::save(&output, &grid)
                .with_context(|| format!("writing {}", output.display()))?;
            print_info(&GridInfo::from(&grid))?;
        }
        Commands::Inspect { file } => {
            let grid = navgrid_persist::load(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            print_info(&GridInfo::from(&grid))?;
        }
        Commands::Path {
            file,
            from,
            to,
            locks,
            traverse_locks,
            timeout,
        } => {
            let mut grid = navgrid_persist::load(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            for cell in &locks {
                if !grid.lock_node(*cell) {
                    tracing::warn!(%cell, "cannot lock cell");
                }
            }
            let name = grid.name().to_string();
            let cell_size = grid.cell_size();
            let mut registry = GridRegistry::new();
            registry.insert_grid(grid);

            let policy = if traverse_locks {
                LockPolicy::Traverse
            } else {
                LockPolicy::Avoid
            };
            let nav = Navigator::with_registry(
                registry,
                navgrid_jobs::PathJobManager::new(job_config(cli.workers))?,
            );
            let queued = nav.queue_path_with(
                &name,
                "cli",
                from.to_world(cell_size),
                to.to_world(cell_size),
                policy,
            );
            if !queued {
                bail!("no node at {from} or {to} in grid {name:?}");
            }
            if !nav.jobs().wait_idle(Duration::from_secs(timeout)) {
                bail!("search did not finish within {timeout}s");
            }
            match nav.take_path("cli") {
                Some(outcome) => print_outcome(&outcome),
                None => bail!("search result missing"),
            }
        }
    }

    Ok(())
}

/// Three nodes 35 units apart, queried end to end.
fn demo(config: JobConfig) -> anyhow::Result<()> {
    let mut nav = Navigator::new(config)?;
    nav.add_grid("demo", DEFAULT_CELL_SIZE);
    let cells: Vec<Vec3> = (0..3)
        .map(|x| Coordinate::new(x, 0, 0).to_world(DEFAULT_CELL_SIZE))
        .collect();
    for &p in &cells {
        nav.add_node("demo", p, p);
    }
    nav.connect_to("demo", cells[0], cells[1]);
    nav.connect_to("demo", cells[1], cells[2]);

    println!("Demo grid: {:?}", nav.grid_info("demo"));
    if !nav.queue_path("demo", "demo-path", cells[0], cells[2]) {
        bail!("demo path was rejected");
    }
    if !nav.jobs().wait_idle(Duration::from_secs(10)) {
        bail!("demo path did not finish");
    }
    for (id, outcome) in nav.drain_paths() {
        println!("Job {id}:");
        print_outcome(&outcome);
    }
    Ok(())
}

fn lattice(name: &str, width: i32, depth: i32, wall: bool) -> Grid {
    let mut grid = Grid::new(name, DEFAULT_CELL_SIZE);
    for x in 0..width {
        for y in 0..depth {
            let c = Coordinate::new(x, y, 0);
            grid.add_node(c, c.to_world(DEFAULT_CELL_SIZE));
        }
    }
    for x in 0..width {
        for y in 0..depth {
            let c = Coordinate::new(x, y, 0);
            for next in [c.offset(1, 0, 0), c.offset(0, 1, 0)].into_iter().flatten() {
                grid.connect_to(c, next);
            }
        }
    }
    if wall {
        for y in 0..depth - 1 {
            grid.remove_node(Coordinate::new(width / 2, y, 0));
        }
    }
    grid
}

fn print_info(info: &GridInfo) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(info)?);
    Ok(())
}

fn print_outcome(outcome: &PathOutcome) {
    match outcome {
        PathOutcome::Found(path) => {
            println!(
                "  cost={:.2} nodes={} revision={}",
                path.cost, path.node_count, path.revision
            );
            for p in &path.waypoints {
                println!("  {p}");
            }
        }
        PathOutcome::NoPath => println!("  no path"),
    }
}
