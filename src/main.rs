use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use waypost::cache::FileStore;
use waypost::config::Config;
use waypost::engine::Engine;
use waypost::providers::ProviderId;
use waypost::server;

/// Waypost v0.4: multi-provider geocoding from the command line.
///
/// Geocodes street addresses and place names, reverse-geocodes coordinate
/// pairs, and locates IP addresses. Results print as JSON on stdout.
///
/// Examples:
///   waypost "Eiffel Tower"
///   waypost 8.8.8.8
///   waypost --lat 48.8584 --lon 2.2945
///   waypost --provider yandex "Red Square, Moscow"
///   waypost --coordinates-only "285 Bedford Ave, Brooklyn"
///   waypost --cache "Eiffel Tower"
///   waypost --serve --port 8080
#[derive(Parser)]
#[command(name = "waypost", version, about, long_about = None)]
struct Cli {
    /// Address, place name, or IP address (positional).
    #[arg(index = 1)]
    query: Option<String>,

    /// Latitude for reverse geocoding (-90 to 90).
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude for reverse geocoding (-180 to 180).
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Street-address provider: google, yahoo, bing, geocoder_ca, yandex.
    /// IP queries always use freegeoip.
    #[arg(long, short = 'p', value_parser = parse_provider)]
    provider: Option<ProviderId>,

    /// API key passed to the provider.
    #[arg(long)]
    api_key: Option<String>,

    /// Response language, for providers that support one.
    #[arg(long, default_value = "en")]
    language: String,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 3)]
    timeout: u64,

    /// Talk to providers over HTTPS.
    #[arg(long)]
    https: bool,

    /// Cache responses in a JSON file (~/.waypost/cache.json).
    #[arg(long)]
    cache: bool,

    /// Cache file path override (implies --cache).
    #[arg(long)]
    cache_file: Option<PathBuf>,

    /// Cache entry lifetime in seconds; older entries re-fetch.
    #[arg(long)]
    ttl: Option<u64>,

    /// Cache key prefix.
    #[arg(long, default_value = "waypost:")]
    cache_prefix: String,

    /// Print only "lat,lon" of the best match.
    #[arg(long)]
    coordinates_only: bool,

    /// Print only the display address of the best match.
    #[arg(long)]
    address_only: bool,

    /// Run the HTTP API server instead of a one-shot lookup.
    #[arg(long)]
    serve: bool,

    /// Server bind host.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server bind port.
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

fn parse_provider(s: &str) -> Result<ProviderId, String> {
    s.parse().map_err(|e: waypost::Error| e.to_string())
}

fn main() {
    let cli = Cli::parse();

    // ── Build the engine ────────────────────────────────────────

    let config = Config {
        provider: cli.provider,
        api_key: cli.api_key.clone(),
        timeout: Duration::from_secs(cli.timeout),
        language: cli.language.clone(),
        use_https: cli.https,
        cache_prefix: cli.cache_prefix.clone(),
    };

    let engine = build_engine(&cli, config);

    // ── Serve mode ──────────────────────────────────────────────

    if cli.serve {
        let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("Error: Cannot start async runtime: {}", e);
            std::process::exit(1);
        });
        runtime.block_on(server::start(&cli.host, cli.port, engine));
        return;
    }

    // ── One-shot lookup ─────────────────────────────────────────

    run_lookup(&cli, &engine);
}

fn build_engine(cli: &Cli, config: Config) -> Engine {
    if !(cli.cache || cli.cache_file.is_some() || cli.ttl.is_some()) {
        return Engine::new(config);
    }

    let store = match &cli.cache_file {
        Some(path) => FileStore::open(path.clone()),
        None => FileStore::open_default(),
    };
    let store = match cli.ttl {
        Some(secs) => store.with_ttl(Duration::from_secs(secs)),
        None => store,
    };
    Engine::with_cache(config, store)
}

fn run_lookup(cli: &Cli, engine: &Engine) {
    // Priority: positional query > --lat/--lon > error

    let outcome = if let Some(ref query) = cli.query {
        engine.search(query.as_str())
    } else if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            eprintln!("Error: Invalid coordinates. Lat: -90..90, Lon: -180..180");
            std::process::exit(1);
        }
        engine.search((lat, lon))
    } else {
        eprintln!("Error: No query specified.");
        eprintln!();
        eprintln!("Usage:");
        eprintln!("  waypost \"Eiffel Tower\"");
        eprintln!("  waypost 8.8.8.8");
        eprintln!("  waypost --lat 48.8584 --lon 2.2945");
        eprintln!("  waypost --provider yandex \"Red Square, Moscow\"");
        eprintln!("  waypost --serve --port 8080");
        std::process::exit(1);
    };

    let results = outcome.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if cli.coordinates_only {
        match results.first() {
            Some(first) => println!("{},{}", first.lat, first.lon),
            None => {
                eprintln!("No results.");
                std::process::exit(1);
            }
        }
        return;
    }

    if cli.address_only {
        match results.first() {
            Some(first) => println!("{}", first.address),
            None => {
                eprintln!("No results.");
                std::process::exit(1);
            }
        }
        return;
    }

    eprintln!("  {} result(s)", results.len());
    println!("{}", serde_json::to_string_pretty(&results).unwrap());
}
