//! Quickstart: decode a VIN and check recalls with typed queries.
//!
//! Set CARSXE_API_KEY (or set it in carsxe.toml), then run:
//!   cargo run --example quickstart

use anyhow::Result;
use carsxe_catalog::VehicleQuery;
use carsxe_core::CarsxeConfig;
use carsxe_dispatch::{Dispatcher, FailurePolicy, ReqwestTransport};
use carsxe_telemetry::attributes::SYSTEM_NAME;
use carsxe_telemetry::init_telemetry;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let config = CarsxeConfig::load()?;
    let service_name = config
        .observability
        .service_name
        .as_deref()
        .unwrap_or(SYSTEM_NAME);
    init_telemetry(service_name, false);

    let transport = Arc::new(ReqwestTransport::from_config(&config.api)?);
    let dispatcher =
        Dispatcher::from_config(&config, transport)?.with_policy(FailurePolicy::ContinueOnFail);

    println!("Checking API key...");
    dispatcher.verify_credentials().await?;

    let queries = [
        VehicleQuery::specs("WBAFR7C57CC811956"),
        VehicleQuery::recalls("1C4JJXR64PW696340"),
        VehicleQuery::obd("P0115"),
    ];

    for result in dispatcher.run(&queries).await? {
        let label = result.operation.as_deref().unwrap_or("unknown");
        if result.is_success() {
            println!("✓ {}: {}", label, result.to_output());
        } else {
            println!("✗ {}: {}", label, result.failure_message());
        }
    }

    Ok(())
}
