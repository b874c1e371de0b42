use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use quickdeliver::config::{PlannerConfig, TrafficConfig};
use quickdeliver::csv_io::{self, POINTS_FILE, VEHICLES_FILE};
use quickdeliver::osrm::OsrmConfig;
use quickdeliver::report::PlanReport;
use quickdeliver::sample::{DEFAULT_POINT_COUNT, generate_sample};
use quickdeliver::traits::TimeWindowPolicy;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a generated data set as points.csv and vehicles.csv
    Sample {
        /// Number of collection points besides the depot
        #[arg(short, long, default_value_t = DEFAULT_POINT_COUNT)]
        points: usize,

        #[arg(short, long, default_value_t = 42)]
        seed: u64,

        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Build routes and print the plan
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },
}

#[derive(Args)]
struct OptimizeArgs {
    /// Points CSV, depot first
    #[arg(long, requires = "vehicles", conflicts_with = "sample")]
    points: Option<PathBuf>,

    /// Vehicles CSV
    #[arg(long, requires = "points")]
    vehicles: Option<PathBuf>,

    /// Use a generated data set with this many points instead of CSV files
    #[arg(long)]
    sample: Option<usize>,

    /// Seed for the generated data set
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write every route's stops to this CSV file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Print the plan as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Only visit points before their window closes
    #[arg(long)]
    strict_windows: bool,

    /// Simulate traffic with this seed
    #[arg(long)]
    traffic_seed: Option<u64>,

    /// OSRM server for road distances, e.g. http://localhost:5000
    #[arg(long)]
    osrm_url: Option<String>,

    /// Average speed in km/h
    #[arg(long)]
    speed: Option<f64>,
}

fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Sample { points, seed, out_dir } => {
            let dataset = generate_sample(points, seed);
            csv_io::save_dataset(&dataset, &out_dir)
                .with_context(|| format!("writing sample data to {}", out_dir.display()))?;
            info!(
                points = %out_dir.join(POINTS_FILE).display(),
                vehicles = %out_dir.join(VEHICLES_FILE).display(),
                "sample data written"
            );
        }
        Commands::Optimize { args } => optimize(args)?,
    }

    Ok(())
}

fn optimize(args: OptimizeArgs) -> Result<(), anyhow::Error> {
    let mut config = PlannerConfig::from_env();
    if let Some(speed) = args.speed {
        if !(speed.is_finite() && speed > 0.0) {
            bail!("--speed must be a positive number, got {}", speed);
        }
        config.speed_kmh = speed;
    }
    if args.strict_windows {
        config.time_windows = TimeWindowPolicy::Strict;
    }
    if let Some(seed) = args.traffic_seed {
        config.traffic = Some(TrafficConfig::seeded(seed));
    }
    if let Some(base_url) = args.osrm_url {
        config.osrm = Some(OsrmConfig {
            base_url,
            ..OsrmConfig::default()
        });
    }

    let dataset = match (&args.points, &args.vehicles) {
        (Some(points), Some(vehicles)) => csv_io::load_dataset(points, vehicles)
            .with_context(|| format!("loading {} and {}", points.display(), vehicles.display()))?,
        _ => generate_sample(args.sample.unwrap_or(DEFAULT_POINT_COUNT), args.seed),
    };
    info!(
        depot = %dataset.depot.name,
        points = dataset.points.len(),
        vehicles = dataset.vehicles.len(),
        "data set ready"
    );

    let builder = config.route_builder().context("creating OSRM client")?;
    let report = PlanReport::new(builder.optimize_dataset(&dataset));

    if let Some(path) = &args.export {
        csv_io::export_routes(path, &report.plan.routes)
            .with_context(|| format!("exporting routes to {}", path.display()))?;
        info!(path = %path.display(), "routes exported");
    }

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render());
    }

    Ok(())
}
