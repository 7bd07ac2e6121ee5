use clap::{Args, Parser, Subcommand};
use shipping_fee::location::LocationQuery;
use shipping_fee::{CheckoutIntegration, EngineConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shipping fee engine: distance and delivery fee between two places.
///
/// Places are province names (resolved through the built-in table, then the
/// geocoder) or raw coordinates.
///
/// Examples:
///   shipping-fee quote --from Bangkok --to "Chiang Mai"
///   shipping-fee quote --to-lat 7.88 --to-lon 98.39
///   shipping-fee resolve Korat
///   shipping-fee serve --port 3000
#[derive(Parser)]
#[command(name = "shipping-fee", version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.shipping-fee/config.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Offline mode: only use the province table and cache.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Quote distance and fee for one shipment.
    Quote(QuoteArgs),
    /// Resolve a single place to coordinates.
    Resolve {
        /// Province or place name.
        province: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },
    /// List the built-in provinces.
    Provinces,
    /// Serve the HTTP API.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, short = 'p', default_value_t = 3000)]
        port: u16,
    },
}

#[derive(Args)]
struct QuoteArgs {
    /// Origin province (defaults to the configured origin).
    #[arg(long)]
    from: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    from_lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    from_lon: Option<f64>,

    /// Destination province.
    #[arg(long)]
    to: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    to_lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    to_lon: Option<f64>,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e),
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let config = EngineConfig::load(cli.config.as_deref()).unwrap_or_else(|e| fail(e));

    match cli.command {
        Command::Quote(args) => {
            let checkout = CheckoutIntegration::from_config(&config, cli.offline);

            let origin = LocationQuery {
                province: args.from,
                lat: args.from_lat,
                lon: args.from_lon,
            };
            let origin = if origin.is_specified() {
                origin
            } else {
                config.origin.clone().unwrap_or_else(|| fail("No origin. Use --from or set 'origin' in the config."))
            };
            let destination = LocationQuery {
                province: args.to,
                lat: args.to_lat,
                lon: args.to_lon,
            };
            if !destination.is_specified() {
                fail("No destination. Use --to or --to-lat/--to-lon.");
            }

            let quote = checkout.quote(&origin, &destination);
            match (quote.distance_km, quote.fee) {
                (Some(d), Some(fee)) => eprintln!("  {:.1} km \u{2192} fee {}.{:02}", d, fee / 100, fee % 100),
                _ => eprintln!("  Distance unknown; no shipping fee."),
            }
            print_json(&quote);
        }
        Command::Resolve { province, lat, lon } => {
            let checkout = CheckoutIntegration::from_config(&config, cli.offline);
            let query = LocationQuery { province, lat, lon };
            match checkout.resolver().resolve_query(&query) {
                Some(resolved) => {
                    eprintln!("  {} ({})", resolved.coordinate, resolved.source);
                    print_json(&resolved);
                }
                None => fail(format!(
                    "Location not found: '{}'",
                    query.province_name().unwrap_or_default()
                )),
            }
        }
        Command::Provinces => {
            let table = shipping_fee::location::StaticLocationTable::thailand();
            print_json(&table.provinces());
        }
        Command::Serve { host, port } => {
            let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| fail(e));
            if let Err(e) = runtime.block_on(shipping_fee::server::start(&host, port, &config, cli.offline)) {
                fail(format!("server error on {}:{}: {}", host, port, e));
            }
        }
    }
}
