use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use metro_planner::domain::{Coordinate, Itinerary, Station, StationId};
use metro_planner::live::{ArrivalsClient, ArrivalsClientConfig};
use metro_planner::planner::{PlanConfig, RoutePlanner};
use metro_planner::stations::{
    CachedStationClient, StationCache, StationCacheConfig, StationClient, StationClientConfig,
    StationSource,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Metro route planner")]
struct Cli {
    /// Override the station dataset URL.
    #[arg(long, env = "METRO_STATIONS_URL", global = true)]
    stations_url: Option<String>,

    /// Override the live departures board URL.
    #[arg(long, env = "METRO_ARRIVALS_URL", global = true)]
    arrivals_url: Option<String>,

    /// Cache the station dataset in this file.
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every station.
    Stations,
    /// Show a station and its upcoming trains.
    Arrivals {
        /// Station id.
        station: u32,
    },
    /// Find the stations closest to a position.
    Nearest {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Number of stations to list.
        #[arg(short = 'n', default_value_t = 5)]
        count: usize,
    },
    /// Plan a route between two station ids.
    Plan {
        /// Origin station id.
        #[arg(long)]
        from: u32,
        /// Destination station id.
        #[arg(long)]
        to: u32,
        /// Only ride lines the live board reports as running.
        #[arg(long)]
        live: bool,
        /// Fail if any live query fails, instead of skipping the station.
        #[arg(long, requires = "live")]
        strict_live: bool,
    },
    /// Plan a route between two positions.
    PlanCoords {
        #[arg(long, allow_negative_numbers = true)]
        from_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        from_lon: f64,
        #[arg(long, allow_negative_numbers = true)]
        to_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        to_lon: f64,
        /// Only ride lines the live board reports as running.
        #[arg(long)]
        live: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let stations = load_stations(&cli).await?;
    let live = arrivals_client(&cli)?;

    match cli.command {
        Command::Stations => {
            for station in &stations {
                print_station(station);
            }
        }
        Command::Arrivals { station } => {
            handle_arrivals(&stations, &live, StationId(station)).await?;
        }
        Command::Nearest { lat, lon, count } => {
            let point = coordinate(lat, lon)?;
            let config = PlanConfig::default();
            let planner = RoutePlanner::new(&stations, &live, &config);
            for station in planner.nearest_stations(point, count).await? {
                print_station(&station);
            }
        }
        Command::Plan {
            from,
            to,
            live: use_live,
            strict_live,
        } => {
            let config = PlanConfig::default().with_strict_live(strict_live);
            let planner = RoutePlanner::new(&stations, &live, &config);
            let itinerary = planner
                .plan_by_station_ids(StationId(from), StationId(to), use_live)
                .await
                .with_context(|| format!("failed to plan a route from {from} to {to}"))?;
            print_itinerary(&stations, &itinerary);
        }
        Command::PlanCoords {
            from_lat,
            from_lon,
            to_lat,
            to_lon,
            live: use_live,
        } => {
            let origin = coordinate(from_lat, from_lon)?;
            let destination = coordinate(to_lat, to_lon)?;
            let config = PlanConfig::default();
            let planner = RoutePlanner::new(&stations, &live, &config);
            let itinerary = planner
                .plan_by_coordinates(origin, destination, use_live)
                .await
                .with_context(|| format!("failed to plan a route from {origin} to {destination}"))?;
            print_itinerary(&stations, &itinerary);
        }
    }

    Ok(())
}

async fn load_stations(cli: &Cli) -> Result<Vec<Station>> {
    let mut config = StationClientConfig::new();
    if let Some(url) = &cli.stations_url {
        config = config.with_base_url(url);
    }
    let client = StationClient::new(config).context("failed to create station client")?;

    let stations = match &cli.cache {
        Some(path) => {
            let cache = StationCache::new(StationCacheConfig::new(path));
            CachedStationClient::new(client, cache)
                .fetch_stations()
                .await
        }
        None => client.fetch_stations().await,
    }
    .context("failed to load stations")?;

    tracing::info!(count = stations.len(), "Loaded stations");
    Ok(stations)
}

fn arrivals_client(cli: &Cli) -> Result<ArrivalsClient> {
    let mut config = ArrivalsClientConfig::new();
    if let Some(url) = &cli.arrivals_url {
        config = config.with_base_url(url);
    }
    ArrivalsClient::new(config).context("failed to create arrivals client")
}

async fn handle_arrivals(stations: &[Station], live: &ArrivalsClient, id: StationId) -> Result<()> {
    let Some(station) = stations.iter().find(|s| s.id() == id) else {
        bail!("unknown station {id}");
    };
    print_station(station);

    let arrivals = live
        .get_arrivals(id)
        .await
        .with_context(|| format!("failed to fetch arrivals for station {id}"))?;
    if arrivals.is_empty() {
        println!("  no upcoming trains");
    }
    for arrival in arrivals {
        println!(
            "  {} - {} - {}",
            arrival.line,
            arrival.destination,
            arrival.due_in_display()
        );
    }
    Ok(())
}

fn coordinate(lat: f64, lon: f64) -> Result<Coordinate> {
    Coordinate::new(lat, lon).with_context(|| format!("invalid position {lat}, {lon}"))
}

fn join<T: ToString>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_station(station: &Station) {
    println!(
        "{} ({}) lines [{}]",
        station.name(),
        station.id(),
        join(station.lines())
    );
    for entrance in station.entrances() {
        println!("  entrance {entrance}");
    }
}

fn print_itinerary(stations: &[Station], itinerary: &Itinerary) {
    let name = move |id: StationId| {
        stations
            .iter()
            .find(|s| s.id() == id)
            .map(Station::name)
            .unwrap_or("<unknown>")
    };

    println!("Route:");
    for step in itinerary.steps() {
        match &step.lines {
            Some(lines) => println!(
                "- {} ({}) take line {}",
                name(step.station),
                step.station,
                join(lines)
            ),
            None => println!("- {} ({}) arrive", name(step.station), step.station),
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
