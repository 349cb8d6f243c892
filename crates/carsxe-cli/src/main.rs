//! CarsXE command-line runner
//!
//! Reads input items as JSON, dispatches them against the CarsXE API and
//! prints one output record per item to stdout.

use anyhow::{Context, Result};
use carsxe_catalog::{CatalogVariant, OperationCatalog};
use carsxe_core::{CarsxeConfig, CatalogProfile, JsonItem};
use carsxe_dispatch::{Dispatcher, ReqwestTransport};
use carsxe_telemetry::attributes::SYSTEM_NAME;
use carsxe_telemetry::init_telemetry;
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "carsxe")]
#[command(version)]
#[command(about = "Run CarsXE vehicle-data lookups over a batch of JSON items", long_about = None)]
struct Cli {
    /// Path to carsxe.toml (searched upward from the working directory by default)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch every item in a JSON array
    Run {
        /// File holding the items, or "-" for stdin
        #[arg(long, default_value = "-")]
        items: String,

        /// Turn failures into error records instead of aborting
        #[arg(long)]
        continue_on_fail: bool,

        /// Catalog variant (grouped or flat)
        #[arg(long)]
        variant: Option<CatalogProfile>,
    },

    /// List supported operations with their method, path and parameters
    Operations {
        /// Catalog variant (grouped or flat)
        #[arg(long)]
        variant: Option<CatalogProfile>,

        /// Print the parameter schema of each operation
        #[arg(long)]
        schema: bool,
    },

    /// Check that the configured API key is accepted
    Verify,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CarsxeConfig::load_from(path)?,
        None => CarsxeConfig::load()?,
    };

    let service_name = config
        .observability
        .service_name
        .as_deref()
        .unwrap_or(SYSTEM_NAME);
    init_telemetry(service_name, cli.json_logs);

    match cli.command {
        Commands::Run {
            items,
            continue_on_fail,
            variant,
        } => run(config, &items, continue_on_fail, variant).await,
        Commands::Operations { variant, schema } => {
            let profile = variant.unwrap_or(config.dispatch.variant);
            list_operations(profile, schema)
        }
        Commands::Verify => verify(config).await,
    }
}

async fn run(
    mut config: CarsxeConfig,
    items_path: &str,
    continue_on_fail: bool,
    variant: Option<CatalogProfile>,
) -> Result<()> {
    if continue_on_fail {
        config.dispatch.continue_on_fail = true;
    }
    if let Some(variant) = variant {
        config.dispatch.variant = variant;
    }

    let items = JsonItem::many_from_value(read_items(items_path)?)?;
    info!("Loaded {} item(s)", items.len());

    let dispatcher = dispatcher(&config)?;
    let outputs = dispatcher.run_outputs(&items).await?;

    println!("{}", serde_json::to_string_pretty(&outputs)?);
    Ok(())
}

async fn verify(config: CarsxeConfig) -> Result<()> {
    dispatcher(&config)?.verify_credentials().await?;
    println!("API key accepted");
    Ok(())
}

fn dispatcher(config: &CarsxeConfig) -> Result<Dispatcher> {
    let transport = Arc::new(ReqwestTransport::from_config(&config.api)?);
    Ok(Dispatcher::from_config(config, transport)?)
}

fn list_operations(profile: CatalogProfile, schema: bool) -> Result<()> {
    let catalog = OperationCatalog::new(CatalogVariant::from(profile));

    let listing: Vec<Value> = catalog
        .specs()
        .iter()
        .map(|spec| {
            let mut entry = json!({
                "resource": spec.resource().key(),
                "resourceName": spec.resource().display_name(),
                "operation": spec.key(),
                "alias": spec.operation.alias(),
                "method": spec.method.as_str(),
                "path": spec.path,
                "description": spec.description,
            });
            if schema {
                entry["schema"] = spec.schema();
            }
            entry
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

fn read_items(path: &str) -> Result<Value> {
    let raw = if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read items from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read items file: {}", path))?
    };

    serde_json::from_str(&raw).context("Items must be a JSON array of objects")
}
