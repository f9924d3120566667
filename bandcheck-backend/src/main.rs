use bandcheck_backend::config::{AppConfig, DEFAULT_CONFIG_PATH};
use bandcheck_backend::logging;
use bandcheck_backend::module::catalog::{process_tac_file, Catalog, CatalogCache, CatalogLoader};
use bandcheck_backend::module::device::{Capability, DeviceQuery, SimSupport, supports_satellite};
use bandcheck_backend::module::operator::{
    find_country, find_operator, suggest_operators, DEFAULT_THRESHOLD,
};
use bandcheck_backend::module::report::CompatibilityReport;
use bandcheck_common::Device;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Check whether a phone supports the network bands of a carrier"
)]
struct Cli {
    /// Config file; defaults are used when it does not exist
    #[arg(long, short = 'c', env = "BANDCHECK_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Only use the curated device catalog
    #[arg(long)]
    curated_only: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List countries with known carriers
    Countries,
    /// List the carriers of a country
    Operators { country: String },
    /// Search the device catalog
    Search {
        #[arg(default_value = "")]
        text: String,
        /// Only devices whose name starts with this brand
        #[arg(long)]
        brand: Option<String>,
        /// all, esim, esim_only or satellite
        #[arg(long, default_value = "all")]
        filter: Capability,
    },
    /// Identify a device from a full or partial IMEI
    Imei { digits: String },
    /// Check a device against a carrier
    Check {
        #[arg(long)]
        country: String,
        /// Carrier name or MCC-MNC
        #[arg(long)]
        operator: String,
        /// Device id or name
        #[arg(long, required_unless_present = "imei", conflicts_with = "imei")]
        device: Option<String>,
        #[arg(long)]
        imei: Option<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build the bulk TAC database from the TAC master file
    TacLite {
        #[arg(long, default_value = "data/tac_master.json")]
        input: PathBuf,
        #[arg(long, default_value = "data/tac_lite.json")]
        output: PathBuf,
    },
}

impl Commands {
    fn needs_catalog(&self) -> bool {
        !matches!(self, Commands::TacLite { .. })
    }

    fn needs_devices(&self) -> bool {
        matches!(
            self,
            Commands::Search { .. } | Commands::Imei { .. } | Commands::Check { .. }
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)?;
    let _logging_guard = logging::init_logging(&config.log_dir, "bandcheck", &config.log_level)?;

    tracing::info!("bandcheck starting...");

    let catalog = if cli.command.needs_catalog() {
        load_catalog(&config, !cli.curated_only, cli.command.needs_devices()).await?
    } else {
        Arc::new(Catalog::empty())
    };

    match cli.command {
        Commands::Countries => {
            for country in catalog.countries() {
                println!("{}", country);
            }
        }
        Commands::Operators { country } => {
            let country = resolve_country(&catalog, &country)?;
            for op in catalog.operators_by_country(&country) {
                println!("{:<28} {:<9} {}", op.display_name(), op.network_code(), op.bands);
            }
        }
        Commands::Search {
            text,
            brand,
            filter,
        } => {
            let query = DeviceQuery {
                text,
                brand,
                capability: filter,
            };
            let results = catalog.search_devices(&query);
            if results.is_empty() {
                println!("No devices found");
            }
            for device in results {
                println!("{}", describe_device(device));
            }
        }
        Commands::Imei { digits } => {
            let resolution = catalog.resolve_imei(&digits);
            if let Some(device) = resolution.device() {
                println!("{}", describe_device(device));
            }
            if let Some(message) = resolution.message() {
                println!("{}", message);
            }
        }
        Commands::Check {
            country,
            operator,
            device,
            imei,
            json,
        } => {
            let country = resolve_country(&catalog, &country)?;
            let operators = catalog.operators_by_country(&country);
            let Some(op) = find_operator(&operators, &operator) else {
                let suggestions: Vec<&str> = suggest_operators(&operators, &operator, DEFAULT_THRESHOLD)
                    .into_iter()
                    .map(|o| o.display_name())
                    .collect();
                if suggestions.is_empty() {
                    bail!("No carrier '{}' in {}", operator, country);
                }
                bail!(
                    "No carrier '{}' in {}. Did you mean: {}?",
                    operator,
                    country,
                    suggestions.join(", ")
                );
            };

            let device = match (device, imei) {
                (Some(query), _) => resolve_device(&catalog, &query)?,
                (None, Some(imei)) => {
                    let resolution = catalog.resolve_imei(&imei);
                    match resolution.device() {
                        Some(device) => {
                            if let Some(message) = resolution.message() {
                                tracing::info!("{}", message);
                            }
                            device
                        }
                        None => bail!(
                            "{}",
                            resolution.message().unwrap_or_else(|| "Device not recognized".to_string())
                        ),
                    }
                }
                (None, None) => bail!("Either --device or --imei is required"),
            };

            let report = CompatibilityReport::new(device, op, catalog.check(device, op));
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("Failed to serialize report")?
                );
            } else {
                println!("{}", report);
            }
        }
        Commands::TacLite { input, output } => {
            let count = process_tac_file(&input, &output).await?;
            println!("Processed {} TACs into {}", count, output.display());
        }
    }

    Ok(())
}

/// Publish the initial catalog, then merge the full device catalog in the
/// background. With `wait_for_devices` the merged catalog is returned.
async fn load_catalog(
    config: &AppConfig,
    merge_full: bool,
    wait_for_devices: bool,
) -> Result<Arc<Catalog>> {
    let loader = Arc::new(CatalogLoader::new(config)?);
    let cache = CatalogCache::new();
    cache.init(loader.load_initial().await).await;

    if merge_full && config.fetch_full_catalog {
        let refresh = spawn_full_refresh(loader, cache.clone());
        if wait_for_devices {
            if let Err(e) = refresh.await {
                tracing::warn!("Full catalog refresh did not finish: {}", e);
            }
        }
    }

    let catalog = cache.snapshot().await;
    tracing::debug!("Catalog stats: {:?}", catalog.stats());
    Ok(catalog)
}

fn spawn_full_refresh(loader: Arc<CatalogLoader>, cache: CatalogCache) -> JoinHandle<()> {
    tokio::spawn(async move {
        let initial = cache.snapshot().await;
        let full = loader.load_full(&initial).await;
        cache.refresh(full).await;
    })
}

fn resolve_country(catalog: &Catalog, query: &str) -> Result<String> {
    let countries = catalog.countries();
    match find_country(&countries, query, DEFAULT_THRESHOLD) {
        Some(country) => Ok(country.to_string()),
        None => bail!("Unknown country '{}'", query),
    }
}

/// Exact id or name first, then the best search hit
fn resolve_device<'a>(catalog: &'a Catalog, query: &str) -> Result<&'a Device> {
    if let Some(device) = catalog.find_device(query) {
        return Ok(device);
    }
    match catalog.search_devices(&DeviceQuery::text(query)).first() {
        Some(device) => {
            tracing::info!("Using closest device match: {}", device.name);
            Ok(*device)
        }
        None => bail!("No device matching '{}'", query),
    }
}

fn describe_device(device: &Device) -> String {
    let mut line = format!(
        "{} [{}] {}",
        device.name,
        device.id,
        SimSupport::of(device).label()
    );
    if supports_satellite(device) {
        line.push_str(", satellite");
    }
    if device.provenance.is_curated() {
        line.push_str(" (curated)");
    }
    line
}
