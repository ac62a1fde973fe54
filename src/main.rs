use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use tripfinder::cache::PersistentCache;
use tripfinder::http;
use tripfinder::logging::init_tracing;
use tripfinder::models::duration::parse_duration;
use tripfinder::places::{CatalogPlaceFinder, GooglePlaceFinder, MergedPlaceFinder};
use tripfinder::ratelimit::RateLimiter;
use tripfinder::routing::{CachedItineraryResolver, GoogleItineraryResolver};
use tripfinder::weather::OpenWeatherForecastProvider;
use tripfinder::{
    Interval, ItineraryResolver, Location, PlaceFinder, Query, SolutionFactory, TripFinderConfig,
};

#[derive(Parser)]
#[command(
    name = "tripfinder",
    version,
    about = "Find round trips to nearby places that fit your time and weather"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Search round trips and print them as JSON
    Search(SearchArgs),
}

#[derive(Args)]
struct SearchArgs {
    /// Latitude of the starting point
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude of the starting point
    #[arg(long, allow_negative_numbers = true)]
    lng: f64,

    /// Earliest departure (RFC 3339)
    #[arg(long)]
    start: DateTime<Utc>,

    /// Latest return (RFC 3339)
    #[arg(long)]
    end: DateTime<Utc>,

    /// Place type, e.g. park or museum
    #[arg(long = "type")]
    place_type: String,

    /// Search radius in meters
    #[arg(long)]
    radius: Option<u32>,

    /// Travel budget excluding walking, as H:MM:SS
    #[arg(long, value_parser = duration_arg)]
    max_travel: Duration,

    /// Walking budget, as H:MM:SS
    #[arg(long, value_parser = duration_arg)]
    max_walk: Duration,

    /// Accepted weather condition ids, comma separated; any weather if omitted
    #[arg(long, value_delimiter = ',')]
    weather: Vec<u16>,

    #[arg(long)]
    max_results: Option<usize>,

    /// Language of forecast descriptions
    #[arg(long)]
    language: Option<String>,

    /// Place catalogue merged with the Google results
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Skip the itinerary cache
    #[arg(long)]
    no_cache: bool,
}

fn duration_arg(value: &str) -> std::result::Result<Duration, String> {
    parse_duration(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = TripFinderConfig::load_from_path(cli.config.clone())?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    init_tracing(&config.logging)?;

    match cli.command {
        Command::Search(args) => search(config, args).await,
    }
}

async fn search(mut config: TripFinderConfig, args: SearchArgs) -> Result<()> {
    if let Some(catalog) = args.catalog.clone() {
        config.places.catalog = Some(catalog);
    }
    if args.no_cache {
        config.cache.enabled = false;
    }

    let query = Query {
        location: Location::new(args.lat, args.lng),
        interval: Interval::new(args.start, args.end)?,
        radius: args.radius.unwrap_or(config.defaults.search_radius_m),
        place_type: args.place_type,
        max_travel: args.max_travel,
        max_walk: args.max_walk,
        accepted_weather_codes: args.weather,
        max_results: args.max_results.unwrap_or(config.defaults.max_results),
        language: args.language,
    };

    let factory = build_factory(&config)?;
    let solutions = match factory.execute(&query).await {
        Ok(solutions) => solutions,
        Err(e) => {
            error!("Search failed: {}", e);
            bail!(e.user_message());
        }
    };
    info!("Found {} solutions", solutions.len());

    let output = serde_json::to_string_pretty(&solutions).context("Failed to encode solutions")?;
    println!("{output}");
    Ok(())
}

fn build_factory(config: &TripFinderConfig) -> Result<SolutionFactory> {
    let client = http::build_client(&config.http)?;
    let limiter = || Arc::new(RateLimiter::new(config.http.requests_per_minute));

    let mut sources: Vec<Arc<dyn PlaceFinder>> = Vec::new();
    if config.places.google {
        sources.push(Arc::new(GooglePlaceFinder::new(
            client.clone(),
            &config.google,
            limiter(),
        )?));
    }
    if let Some(path) = &config.places.catalog {
        let catalog = CatalogPlaceFinder::load(path)
            .with_context(|| format!("Failed to load place catalogue {}", path.display()))?;
        sources.push(Arc::new(catalog));
    }
    let places: Arc<dyn PlaceFinder> = Arc::new(MergedPlaceFinder::new(sources));

    let mut routes: Arc<dyn ItineraryResolver> = Arc::new(GoogleItineraryResolver::new(
        client.clone(),
        &config.google,
        limiter(),
    )?);
    if config.cache.enabled {
        let cache = PersistentCache::open(&config.cache.location)
            .with_context(|| format!("Failed to open cache at {}", config.cache.location))?;
        routes = Arc::new(CachedItineraryResolver::new(
            routes,
            Arc::new(cache),
            config.cache.ttl(),
        ));
    }

    let forecasts = Arc::new(OpenWeatherForecastProvider::new(
        client,
        &config.openweather,
        limiter(),
    )?);

    Ok(SolutionFactory::new(
        places,
        routes,
        forecasts,
        config.pipeline.clone(),
    ))
}
