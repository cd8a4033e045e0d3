//! vaults-checker binary entrypoint.
//!
//! Fetches the protocol snapshot (ilk parameters, urn rows, OSM quotes),
//! runs the risk evaluation engine, and prints one report per ilk.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use alloy::providers::ProviderBuilder;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vaults_common::config::AppConfig;
use vaults_common::types::EvaluationRequest;
use vaults_datasource::{VulcanizeClient, load_snapshot};
use vaults_engine::evaluate_snapshot;
use vaults_oracle::deployment::Deployment;

mod report;

#[derive(Parser)]
#[command(name = "vaults-checker")]
#[command(version, about = "Report vaults at risk of liquidation per collateral type", long_about = None)]
struct Cli {
    /// JSON-RPC host URL
    #[arg(long, env = "VAULTS_RPC_URL")]
    rpc_url: String,

    /// Path to the deployment JSON mapping ilks to pip addresses
    #[arg(long, env = "VAULTS_ADDRESSES")]
    addresses: PathBuf,

    /// Ilk to query (default: every ilk in the deployment)
    #[arg(long)]
    ilk: Option<String>,

    /// Target price for the given ilk (default: next OSM price per ilk)
    #[arg(long)]
    target_price: Option<f64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(
                "vaults_cli=info,vaults_engine=info,vaults_datasource=info,vaults_oracle=info",
            )
        }))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let deployment = Deployment::from_file(&cli.addresses)?;
    tracing::info!(ilks = deployment.len(), "Deployment loaded");

    let provider = ProviderBuilder::new().connect_http(cli.rpc_url.parse()?);
    let client = VulcanizeClient::new(
        &config.vulcanize_url,
        Duration::from_secs(config.http_timeout_secs),
    )?;

    let snapshot = load_snapshot(&client, &provider, &deployment, cli.ilk.as_deref()).await?;

    let reports = evaluate_snapshot(
        Arc::new(snapshot),
        EvaluationRequest {
            ilk: cli.ilk,
            target_price: cli.target_price,
        },
    )
    .await?;

    for (ilk, ilk_report) in &reports {
        print!("{}", report::render(ilk, ilk_report));
    }

    Ok(())
}
